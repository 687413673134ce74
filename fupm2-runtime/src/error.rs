//! Runtime error types for FUPM2

use thiserror::Error;

/// Condition raised inside a single instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("access to an invalid register")]
    InvalidReg,

    #[error("access to an invalid address")]
    InvalidMem,

    #[error("division by zero")]
    DivByZero,

    #[error("register overflow")]
    RegOverflow,
}

impl OperationError {
    /// Arithmetic conditions become machine faults; the rest invalid-state faults
    pub fn is_arithmetic(self) -> bool {
        matches!(self, OperationError::DivByZero | OperationError::RegOverflow)
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("machine fault at {ip}: {cause}")]
    MachineFault { ip: i32, cause: OperationError },

    #[error("invalid state at {ip}: {cause}")]
    InvalidState { ip: i32, cause: OperationError },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Engine-level fault for `cause` raised by the instruction at `ip`
    pub fn fault(ip: i32, cause: OperationError) -> Self {
        if cause.is_arithmetic() {
            RuntimeError::MachineFault { ip, cause }
        } else {
            RuntimeError::InvalidState { ip, cause }
        }
    }

    /// Underlying operation error, if this is a machine or invalid-state fault
    pub fn cause(&self) -> Option<OperationError> {
        match self {
            RuntimeError::MachineFault { cause, .. } | RuntimeError::InvalidState { cause, .. } => {
                Some(*cause)
            }
            RuntimeError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Failure inside one step, before it is tagged with the faulting IP
#[derive(Debug)]
pub(crate) enum Fault {
    Operation(OperationError),
    Io(std::io::Error),
}

impl From<OperationError> for Fault {
    fn from(err: OperationError) -> Self {
        Fault::Operation(err)
    }
}

impl From<std::io::Error> for Fault {
    fn from(err: std::io::Error) -> Self {
        Fault::Io(err)
    }
}
