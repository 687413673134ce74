//! FUPM2 decoded instruction
//!
//! A structured view of one instruction word. Register fields keep the raw
//! 4-bit index and immediates keep their sign-extended value, so decoding and
//! re-encoding a word with a known opcode is lossless for every bit the
//! format defines.

use crate::encoding::{
    encode_im, encode_me, encode_ri, encode_rm, encode_rr, extract_addr20, extract_imm16,
    extract_imm20, extract_opcode, extract_r1, extract_r2,
};
use crate::opcode::{OperandFormat, Opcode};
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// Operand fields, one variant per operand format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operands {
    /// RI: register and sign-extended 20-bit immediate
    RegImm { reg: Register, imm: i32 },
    /// RR: two registers and sign-extended 16-bit immediate
    RegReg { dst: Register, src: Register, imm: i32 },
    /// RM: register and unsigned 20-bit address
    RegAddr { reg: Register, addr: u32 },
    /// Me: unsigned 20-bit address
    Addr { addr: u32 },
    /// Im: sign-extended 20-bit immediate
    Imm { imm: i32 },
}

/// FUPM2 instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Operands,
}

/// Register named by a 4-bit field (always in range)
fn field_register(bits: u8) -> Register {
    Register::ALL[(bits & 0xF) as usize]
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Operands) -> Self {
        Self { opcode, operands }
    }

    /// Decode a word, or `None` if its top byte names no opcode
    pub fn decode(word: u32) -> Option<Self> {
        let opcode = Opcode::from_u8(extract_opcode(word))?;
        let operands = match opcode.format() {
            OperandFormat::RI => Operands::RegImm {
                reg: field_register(extract_r1(word)),
                imm: extract_imm20(word),
            },
            OperandFormat::RR => Operands::RegReg {
                dst: field_register(extract_r1(word)),
                src: field_register(extract_r2(word)),
                imm: extract_imm16(word),
            },
            OperandFormat::RM => Operands::RegAddr {
                reg: field_register(extract_r1(word)),
                addr: extract_addr20(word),
            },
            OperandFormat::Me => Operands::Addr {
                addr: extract_addr20(word),
            },
            OperandFormat::Im => Operands::Imm {
                imm: extract_imm20(word),
            },
        };
        Some(Self { opcode, operands })
    }

    /// Encode to a word
    ///
    /// Operands are encoded per their variant; fields wider than the format
    /// allows are truncated.
    pub fn encode(&self) -> u32 {
        match self.operands {
            Operands::RegImm { reg, imm } => encode_ri(self.opcode, reg as u8, imm),
            Operands::RegReg { dst, src, imm } => {
                encode_rr(self.opcode, dst as u8, src as u8, imm)
            }
            Operands::RegAddr { reg, addr } => encode_rm(self.opcode, reg as u8, addr),
            Operands::Addr { addr } => encode_me(self.opcode, addr),
            Operands::Imm { imm } => encode_im(self.opcode, imm),
        }
    }

    /// Check that the operand variant matches the opcode's format
    pub fn is_well_formed(&self) -> bool {
        matches!(
            (self.opcode.format(), &self.operands),
            (OperandFormat::RI, Operands::RegImm { .. })
                | (OperandFormat::RR, Operands::RegReg { .. })
                | (OperandFormat::RM, Operands::RegAddr { .. })
                | (OperandFormat::Me, Operands::Addr { .. })
                | (OperandFormat::Im, Operands::Imm { .. })
        )
    }
}
