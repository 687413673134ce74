//! # Addressing Configuration
//!
//! Controls how an out-of-range word address is resolved when the engine
//! touches memory.

use crate::{Address, SpecError, MEMORY_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory addressing policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressingMode {
    /// Addresses wrap modulo the memory size (reference behaviour)
    #[default]
    Modular,
    /// Addresses outside `0..MEMORY_SIZE` are rejected
    Checked,
}

impl AddressingMode {
    /// Resolve a raw address to a memory index
    ///
    /// The address is first reinterpreted as unsigned, so a negative register
    /// value such as `-1` names the last word of memory in modular mode.
    pub fn resolve(self, address: i64) -> Result<Address, SpecError> {
        match self {
            AddressingMode::Modular => Ok((address as u32) % MEMORY_SIZE as u32),
            AddressingMode::Checked => {
                if (0..MEMORY_SIZE as i64).contains(&address) {
                    Ok(address as Address)
                } else {
                    Err(SpecError::OutOfBounds { address })
                }
            }
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressingMode::Modular => write!(f, "modular"),
            AddressingMode::Checked => write!(f, "checked"),
        }
    }
}
