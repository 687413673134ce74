//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use fupm2_spec::encoding::extract_opcode;
use fupm2_spec::Instruction;

/// Decode 32-bit instruction word
pub fn decode(word: u32) -> Result<Instruction> {
    Instruction::decode(word).ok_or(DisassemblerError::UnknownOpcode(extract_opcode(word)))
}
