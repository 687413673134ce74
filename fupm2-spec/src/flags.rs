//! Comparison flags register

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Result of the most recent CMP/CMPI
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Flags: u8 {
        /// Operands compared equal
        const EQUALITY = 0b01;
        /// Left operand compared less than the right
        const MAJORITY = 0b10;
    }
}

impl Flags {
    /// Flags produced by comparing `left` against `right`
    pub fn compare<T: PartialOrd>(left: T, right: T) -> Self {
        let mut flags = Flags::empty();
        flags.set(Flags::EQUALITY, left == right);
        flags.set(Flags::MAJORITY, left < right);
        flags
    }
}
