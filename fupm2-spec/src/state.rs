//! # Machine State
//!
//! Registers, flags and memory of one FUPM2 machine. Memory is stored as a
//! flat big-endian byte buffer of `MEMORY_SIZE` words. Word accessors here
//! always succeed: addresses wrap modulo the memory size. The execution
//! engine layers the configurable [`AddressingMode`](crate::AddressingMode)
//! on top of [`State::checked_word`] and [`State::set_checked_word`].

use crate::codec::{read_word, write_word};
use crate::config::AddressingMode;
use crate::error::Result;
use crate::flags::Flags;
use crate::register::{Register, NUM_REGISTERS};
use crate::{Address, Word, MEMORY_BYTES, MEMORY_SIZE, STATE_HEADER_BYTES, WORD_BYTES};

/// Complete machine state
#[derive(Clone, PartialEq, Eq)]
pub struct State {
    /// General purpose registers; r14 is SP and r15 is IP
    pub registers: [i32; NUM_REGISTERS],
    /// Result of the most recent comparison
    pub flags: Flags,
    memory: Vec<u8>,
}

impl State {
    /// Zero-filled state
    pub fn new() -> Self {
        Self {
            registers: [0; NUM_REGISTERS],
            flags: Flags::empty(),
            memory: vec![0; MEMORY_BYTES],
        }
    }

    // ========== Memory ==========

    #[inline]
    fn byte_offset(address: Address) -> usize {
        (address as usize % MEMORY_SIZE) * WORD_BYTES
    }

    /// Read the word at `address` (modulo memory size)
    #[inline]
    pub fn get_word(&self, address: Address) -> Word {
        read_word(&self.memory, Self::byte_offset(address))
    }

    /// Write `value` at `address` (modulo memory size)
    #[inline]
    pub fn set_word(&mut self, address: Address, value: Word) {
        write_word(&mut self.memory, Self::byte_offset(address), value)
    }

    /// Read a word after resolving `address` under `mode`
    pub fn checked_word(&self, mode: AddressingMode, address: i64) -> Result<Word> {
        let address = mode.resolve(address)?;
        Ok(self.get_word(address))
    }

    /// Write a word after resolving `address` under `mode`
    pub fn set_checked_word(&mut self, mode: AddressingMode, address: i64, value: Word) -> Result<()> {
        let address = mode.resolve(address)?;
        self.set_word(address, value);
        Ok(())
    }

    /// Raw big-endian memory image
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    // ========== Registers ==========

    #[inline]
    pub fn reg(&self, reg: Register) -> i32 {
        self.registers[reg.index()]
    }

    #[inline]
    pub fn set_reg(&mut self, reg: Register, value: i32) {
        self.registers[reg.index()] = value;
    }

    #[inline]
    pub fn ip(&self) -> i32 {
        self.reg(Register::IP)
    }

    #[inline]
    pub fn set_ip(&mut self, value: i32) {
        self.set_reg(Register::IP, value);
    }

    #[inline]
    pub fn sp(&self) -> i32 {
        self.reg(Register::SP)
    }

    #[inline]
    pub fn set_sp(&mut self, value: i32) {
        self.set_reg(Register::SP, value);
    }

    /// 64-bit pattern of the pair `(lo, lo+1)`; `lo` holds the low half
    ///
    /// Returns `None` when `lo` is r15 and has no partner.
    pub fn pair_bits(&self, lo: Register) -> Option<u64> {
        let hi = lo.pair()?;
        Some(self.reg(lo) as u32 as u64 | (self.reg(hi) as u32 as u64) << 32)
    }

    /// Store a 64-bit pattern into the pair `(lo, lo+1)`
    ///
    /// Returns `None`, leaving the registers untouched, when `lo` is r15.
    pub fn set_pair_bits(&mut self, lo: Register, bits: u64) -> Option<()> {
        let hi = lo.pair()?;
        self.set_reg(lo, bits as u32 as i32);
        self.set_reg(hi, (bits >> 32) as u32 as i32);
        Some(())
    }

    /// The pair `(lo, lo+1)` reinterpreted as a double
    pub fn pair_f64(&self, lo: Register) -> Option<f64> {
        self.pair_bits(lo).map(f64::from_bits)
    }

    /// Store a double into the pair `(lo, lo+1)`
    pub fn set_pair_f64(&mut self, lo: Register, value: f64) -> Option<()> {
        self.set_pair_bits(lo, value.to_bits())
    }

    // ========== Raw image ==========

    /// Build a state from a raw image
    ///
    /// Layout: sixteen big-endian register words (r0..r15), one flags byte,
    /// then memory bytes from address 0. A short image leaves the rest zero;
    /// bytes past the end of memory are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut state = Self::new();

        let header = bytes.len().min(NUM_REGISTERS * WORD_BYTES);
        let mut regs = [0u8; NUM_REGISTERS * WORD_BYTES];
        regs[..header].copy_from_slice(&bytes[..header]);
        for (i, reg) in state.registers.iter_mut().enumerate() {
            *reg = read_word(&regs, i * WORD_BYTES) as i32;
        }

        if let Some(&flags) = bytes.get(NUM_REGISTERS * WORD_BYTES) {
            state.flags = Flags::from_bits_retain(flags);
        }

        if bytes.len() > STATE_HEADER_BYTES {
            let body = &bytes[STATE_HEADER_BYTES..];
            let len = body.len().min(MEMORY_BYTES);
            state.memory[..len].copy_from_slice(&body[..len]);
        }

        state
    }

    /// Serialize to the raw image layout read by [`State::from_bytes`]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(STATE_HEADER_BYTES + MEMORY_BYTES);
        for reg in self.registers {
            bytes.extend_from_slice(&(reg as u32).to_be_bytes());
        }
        bytes.push(self.flags.bits());
        bytes.extend_from_slice(&self.memory);
        bytes
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("registers", &self.registers)
            .field("flags", &self.flags)
            .field("memory_words", &MEMORY_SIZE)
            .finish()
    }
}
