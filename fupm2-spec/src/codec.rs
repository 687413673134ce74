//! Word codec
//!
//! Conversion between four bytes and one 32-bit word. All of memory and the
//! raw state image use big-endian order (most significant byte first).

use crate::{Word, WORD_BYTES};

/// Assemble a word from four big-endian bytes
#[inline]
pub const fn word_from_bytes(bytes: [u8; WORD_BYTES]) -> Word {
    ((bytes[0] as u32) << 24) | ((bytes[1] as u32) << 16) | ((bytes[2] as u32) << 8) | bytes[3] as u32
}

/// Split a word into four big-endian bytes
#[inline]
pub const fn word_to_bytes(word: Word) -> [u8; WORD_BYTES] {
    [
        (word >> 24) as u8,
        (word >> 16) as u8,
        (word >> 8) as u8,
        word as u8,
    ]
}

/// Read the word starting at `offset` bytes into `buf`
///
/// Panics if fewer than four bytes are available at `offset`.
#[inline]
pub fn read_word(buf: &[u8], offset: usize) -> Word {
    let mut bytes = [0u8; WORD_BYTES];
    bytes.copy_from_slice(&buf[offset..offset + WORD_BYTES]);
    word_from_bytes(bytes)
}

/// Write `word` at `offset` bytes into `buf`
#[inline]
pub fn write_word(buf: &mut [u8], offset: usize, word: Word) {
    buf[offset..offset + WORD_BYTES].copy_from_slice(&word_to_bytes(word));
}
