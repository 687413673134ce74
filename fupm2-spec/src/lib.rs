//! # FUPM2 Machine Specification
//!
//! 32-bit word-addressed virtual CPU with a fixed-width instruction encoding.
//!
//! ## Key Features
//! - 16 signed 32-bit registers (r14 = stack pointer, r15 = instruction pointer)
//! - 2^20 words of flat, word-addressed memory with modular addressing
//! - 8-bit opcodes in the top byte of every instruction word
//! - Five operand formats (RI, RR, RM, Me, Im)
//! - Register pairs hold 64-bit products/dividends and IEEE-754 doubles
//! - Big-endian byte order in memory and in the raw state file

pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod flags;
pub mod instruction;
pub mod opcode;
pub mod register;
pub mod state;

pub use config::AddressingMode;
pub use error::{Result, SpecError};
pub use flags::Flags;
pub use instruction::{Instruction, Operands};
pub use opcode::{OperandFormat, Opcode};
pub use register::{Register, NUM_REGISTERS};
pub use state::State;

/// Machine word (memory cell and instruction)
pub type Word = u32;

/// Word address
pub type Address = u32;

/// Bytes per machine word
pub const WORD_BYTES: usize = 4;

/// Bits per machine word
pub const WORD_BITS: u32 = 32;

/// Width of address fields in bits
pub const ADDRESS_BITS: u32 = 20;

/// Addressable memory size in words (2^20)
pub const MEMORY_SIZE: usize = 1 << ADDRESS_BITS;

/// Addressable memory size in bytes
pub const MEMORY_BYTES: usize = MEMORY_SIZE * WORD_BYTES;

/// Size of the register + flags header of a raw state image
pub const STATE_HEADER_BYTES: usize = NUM_REGISTERS * WORD_BYTES + 1;
