//! Instruction formatting to assembly text
//!
//! Immediates and addresses are printed as the unsigned contents of their
//! field, the only literal form the assembler reads back.

use crate::decoder::decode;
use fupm2_spec::encoding::{IMM16_MASK, IMM20_MASK};
use fupm2_spec::{Instruction, Operands};

/// Format instruction as assembly text
pub fn format(instr: &Instruction) -> String {
    let name = instr.opcode.mnemonic();
    match instr.operands {
        Operands::RegImm { reg, imm } => {
            format!("{} {} {}", name, reg, imm as u32 & IMM20_MASK)
        }
        Operands::RegReg { dst, src, imm } => {
            format!("{} {} {} {}", name, dst, src, imm as u32 & IMM16_MASK)
        }
        Operands::RegAddr { reg, addr } => format!("{} {} {}", name, reg, addr & IMM20_MASK),
        Operands::Addr { addr } => format!("{} {}", name, addr & IMM20_MASK),
        Operands::Imm { imm } => format!("{} {}", name, imm as u32 & IMM20_MASK),
    }
}

/// Format a raw memory word: an instruction if it decodes, else its decimal value
pub fn format_word(word: u32) -> String {
    match decode(word) {
        Ok(instr) => format(&instr),
        Err(_) => word.to_string(),
    }
}
