//! Disassembler errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error("Unknown opcode: {0}")]
    UnknownOpcode(u8),
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
