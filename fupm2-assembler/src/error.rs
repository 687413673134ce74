//! Assembler errors

use thiserror::Error;

/// Cause of an assembling failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("unknown operation code `{0}`")]
    UnknownOpcode(String),

    #[error("unknown register name `{0}`")]
    UnknownRegister(String),

    #[error("register argument was expected but was not specified")]
    RegisterExpected,

    #[error("immediate argument was expected but was not specified")]
    ImmediateExpected,

    #[error("address was expected but was not specified")]
    AddressExpected,

    #[error("label argument was expected but was not specified")]
    LabelExpected,

    #[error("undeclared label `{0}`")]
    UndeclaredLabel(String),

    #[error("immediate operand `{0}` is too big")]
    ImmediateTooLarge(String),

    #[error("address `{0}` is too big")]
    AddressTooLarge(String),
}

#[derive(Debug, Error)]
pub enum AssemblerError {
    /// `address` is the 1-based number of the failing word
    #[error("error assembling command {address}: {kind}")]
    AssemblingFailed { address: u32, kind: ErrorKind },
}

impl AssemblerError {
    pub fn kind(&self) -> &ErrorKind {
        match self {
            AssemblerError::AssemblingFailed { kind, .. } => kind,
        }
    }

    pub fn address(&self) -> u32 {
        match self {
            AssemblerError::AssemblingFailed { address, .. } => *address,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
