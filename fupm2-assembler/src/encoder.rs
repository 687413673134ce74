//! Instruction encoding to 32-bit words
//!
//! Label operands are encoded as zero and filled in later by [`Field::patch`].

use crate::error::ErrorKind;
use crate::parser::{Operand, ParsedInstruction};
use fupm2_spec::encoding::{
    encode_im, encode_me, encode_ri, encode_rm, encode_rr, IMM16_MASK, IMM20_MASK,
};
use fupm2_spec::{OperandFormat, Register};

/// Trailing numeric field of an instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// 20-bit immediate (RI, Im)
    Imm20,
    /// 16-bit immediate (RR)
    Imm16,
    /// 20-bit address (RM, Me)
    Addr20,
}

impl Field {
    pub fn for_format(format: OperandFormat) -> Self {
        match format {
            OperandFormat::RI | OperandFormat::Im => Field::Imm20,
            OperandFormat::RR => Field::Imm16,
            OperandFormat::RM | OperandFormat::Me => Field::Addr20,
        }
    }

    /// Largest unsigned value the field holds
    pub fn max(self) -> u32 {
        match self {
            Field::Imm20 | Field::Addr20 => IMM20_MASK,
            Field::Imm16 => IMM16_MASK,
        }
    }

    /// Error for a missing operand of this field
    pub fn expected(self) -> ErrorKind {
        match self {
            Field::Imm20 | Field::Imm16 => ErrorKind::ImmediateExpected,
            Field::Addr20 => ErrorKind::AddressExpected,
        }
    }

    /// Error for a value that does not fit this field
    pub fn too_large(self, text: &str) -> ErrorKind {
        match self {
            Field::Imm20 | Field::Imm16 => ErrorKind::ImmediateTooLarge(text.to_string()),
            Field::Addr20 => ErrorKind::AddressTooLarge(text.to_string()),
        }
    }

    /// OR a resolved label address into `word`
    pub fn patch(self, word: u32, value: u32) -> Result<u32, ErrorKind> {
        if value > self.max() {
            return Err(self.too_large(&value.to_string()));
        }
        Ok(word | value)
    }
}

/// Encode a parsed instruction; unresolved labels leave the field zero
pub fn encode(inst: &ParsedInstruction<'_>) -> u32 {
    let value = match inst.operand {
        Operand::Literal(value) => value,
        Operand::Label(_) => 0,
    };
    let r1 = inst.r1.unwrap_or(Register::R0) as u8;
    let r2 = inst.r2.unwrap_or(Register::R0) as u8;

    match inst.opcode.format() {
        OperandFormat::RI => encode_ri(inst.opcode, r1, value as i32),
        OperandFormat::RR => encode_rr(inst.opcode, r1, r2, value as i32),
        OperandFormat::RM => encode_rm(inst.opcode, r1, value),
        OperandFormat::Me => encode_me(inst.opcode, value),
        OperandFormat::Im => encode_im(inst.opcode, value as i32),
    }
}
