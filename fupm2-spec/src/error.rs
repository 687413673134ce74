//! # Error Types for the FUPM2 machine model

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("Invalid opcode: {0}")]
    InvalidOpcode(u8),

    #[error("Invalid register index: {0} (valid range: 0-15)")]
    InvalidRegister(u8),

    #[error("Unknown register name: {0}")]
    UnknownRegister(String),

    #[error("Memory access out of bounds: address {address}")]
    OutOfBounds { address: i64 },
}

pub type Result<T> = std::result::Result<T, SpecError>;
