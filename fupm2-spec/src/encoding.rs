//! # Instruction Encoding Constants and Helpers
//!
//! Field layout of the 32-bit FUPM2 instruction word.
//!
//! ## Instruction Format (32-bit, high to low)
//!
//! ```text
//! RI: [opcode:8][rd:4][imm:20]
//! RR: [opcode:8][rd:4][rs:4][imm:16]
//! RM: [opcode:8][rd:4][addr:20]
//! Me: [opcode:8][unused:4][addr:20]
//! Im: [opcode:8][unused:4][imm:20]
//! ```
//!
//! Immediates are two's complement and sign-extended; addresses are unsigned.

use crate::Opcode;

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Opcode field: bits 24-31 (8 bits)
pub const OPCODE_SHIFT: u32 = 24;

/// First register field: bits 20-23 (4 bits)
pub const R1_SHIFT: u32 = 20;

/// Second register field (RR only): bits 16-19 (4 bits)
pub const R2_SHIFT: u32 = 16;

// ============================================================================
// Field Masks
// ============================================================================

/// Opcode mask (8 bits, applied after shifting)
pub const OPCODE_MASK: u32 = 0xFF;

/// Register field mask (4 bits, applied after shifting)
pub const REGISTER_MASK: u32 = 0xF;

/// 16-bit immediate mask (RR)
pub const IMM16_MASK: u32 = 0xFFFF;

/// 20-bit immediate / address mask (RI, RM, Me, Im)
pub const IMM20_MASK: u32 = 0xF_FFFF;

/// Largest literal that fits a 16-bit field
pub const IMM16_MAX: u32 = IMM16_MASK;

/// Largest literal that fits a 20-bit field
pub const IMM20_MAX: u32 = IMM20_MASK;

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Extract the raw opcode byte (bits 24-31)
#[inline]
pub const fn extract_opcode(inst: u32) -> u8 {
    ((inst >> OPCODE_SHIFT) & OPCODE_MASK) as u8
}

/// Extract the first register field (bits 20-23)
#[inline]
pub const fn extract_r1(inst: u32) -> u8 {
    ((inst >> R1_SHIFT) & REGISTER_MASK) as u8
}

/// Extract the second register field (bits 16-19)
#[inline]
pub const fn extract_r2(inst: u32) -> u8 {
    ((inst >> R2_SHIFT) & REGISTER_MASK) as u8
}

/// Extract the low 16 bits, sign-extended
#[inline]
pub const fn extract_imm16(inst: u32) -> i32 {
    sign_extend(inst & IMM16_MASK, 16)
}

/// Extract the low 20 bits, sign-extended
#[inline]
pub const fn extract_imm20(inst: u32) -> i32 {
    sign_extend(inst & IMM20_MASK, 20)
}

/// Extract the low 20 bits as an unsigned address
#[inline]
pub const fn extract_addr20(inst: u32) -> u32 {
    inst & IMM20_MASK
}

/// Sign-extend the low `bits` bits of `value`
#[inline]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

// ============================================================================
// Instruction Encoding Functions
// ============================================================================

#[inline]
const fn opcode_bits(opcode: Opcode) -> u32 {
    (opcode as u32) << OPCODE_SHIFT
}

#[inline]
const fn reg_bits(reg: u8, shift: u32) -> u32 {
    ((reg as u32) & REGISTER_MASK) << shift
}

/// Encode an RI instruction; `imm` is truncated to 20 bits
#[inline]
pub const fn encode_ri(opcode: Opcode, rd: u8, imm: i32) -> u32 {
    opcode_bits(opcode) | reg_bits(rd, R1_SHIFT) | (imm as u32 & IMM20_MASK)
}

/// Encode an RR instruction; `imm` is truncated to 16 bits
#[inline]
pub const fn encode_rr(opcode: Opcode, rd: u8, rs: u8, imm: i32) -> u32 {
    opcode_bits(opcode)
        | reg_bits(rd, R1_SHIFT)
        | reg_bits(rs, R2_SHIFT)
        | (imm as u32 & IMM16_MASK)
}

/// Encode an RM instruction; `addr` is truncated to 20 bits
#[inline]
pub const fn encode_rm(opcode: Opcode, rd: u8, addr: u32) -> u32 {
    opcode_bits(opcode) | reg_bits(rd, R1_SHIFT) | (addr & IMM20_MASK)
}

/// Encode an Me instruction; `addr` is truncated to 20 bits
#[inline]
pub const fn encode_me(opcode: Opcode, addr: u32) -> u32 {
    opcode_bits(opcode) | (addr & IMM20_MASK)
}

/// Encode an Im instruction; `imm` is truncated to 20 bits
#[inline]
pub const fn encode_im(opcode: Opcode, imm: i32) -> u32 {
    opcode_bits(opcode) | (imm as u32 & IMM20_MASK)
}
