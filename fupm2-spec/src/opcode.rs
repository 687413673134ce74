//! # FUPM2 Opcode Definitions
//!
//! Opcodes occupy the top byte of every instruction word. The opcode space is
//! 0-71 with gaps; a value that does not name an opcode is rejected when the
//! instruction is executed, not when it is decoded.
//!
//! ## Opcode Encoding
//!
//! Opcodes are organized by instruction family:
//! - 0-1: System (HALT, SYSCALL)
//! - 2-9: Integer arithmetic (ADD, ADDI, SUB, SUBI, MUL, MULI, DIV, DIVI)
//! - 12, 24: Register load (LC, MOV)
//! - 13-23: Shift and logic (SHL ... XORI, NOT)
//! - 32-37: Floating point (ADDD, SUBD, MULD, DIVD, ITOD, DTOI)
//! - 38-39: Stack (PUSH, POP)
//! - 40-42: Calls (CALL, CALLI, RET)
//! - 43-44: Compare (CMP, CMPI)
//! - 46-52: Jumps (JMP, JNE, JEQ, JLE, JL, JGE, JG)
//! - 64-71: Memory (LOAD, STORE, LOAD2, STORE2, LOADR, LOADR2, STORER, STORER2)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand layout of an instruction word (high to low bits)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandFormat {
    /// `[opcode:8][reg:4][imm20:20]`, imm20 sign-extended
    RI,
    /// `[opcode:8][reg:4][reg:4][imm16:16]`, imm16 sign-extended
    RR,
    /// `[opcode:8][reg:4][addr20:20]`
    RM,
    /// `[opcode:8][addr20:20]` (register bits unused)
    Me,
    /// `[opcode:8][imm20:20]` (register bits unused), imm20 sign-extended
    Im,
}

impl fmt::Display for OperandFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperandFormat::RI => "RI",
            OperandFormat::RR => "RR",
            OperandFormat::RM => "RM",
            OperandFormat::Me => "Me",
            OperandFormat::Im => "Im",
        };
        write!(f, "{}", name)
    }
}

/// Instruction opcode (8 bits, values 0-71)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ========== System ==========
    /// HALT: stop the machine
    Halt = 0,
    /// SYSCALL: host service selected by the immediate
    Syscall = 1,

    // ========== Integer arithmetic ==========
    /// ADD: rd += rs + imm16
    Add = 2,
    /// ADDI: rd += imm20
    Addi = 3,
    /// SUB: rd -= rs + imm16
    Sub = 4,
    /// SUBI: rd -= imm20
    Subi = 5,
    /// MUL: (rd, rd+1) = rd * (rs + imm16)
    Mul = 6,
    /// MULI: (rd, rd+1) = rd * imm20
    Muli = 7,
    /// DIV: (rd, rd+1) = (rd, rd+1) / rs, remainder
    Div = 8,
    /// DIVI: (rd, rd+1) = (rd, rd+1) / imm20, remainder
    Divi = 9,

    // ========== Register load ==========
    /// LC: rd = imm20
    Lc = 12,

    // ========== Shift and logic ==========
    /// SHL: rd <<= rs + imm16
    Shl = 13,
    /// SHLI: rd <<= imm20
    Shli = 14,
    /// SHR: rd >>= rs + imm16
    Shr = 15,
    /// SHRI: rd >>= imm20
    Shri = 16,
    /// AND: rd &= rs + imm16
    And = 17,
    /// ANDI: rd &= imm20
    Andi = 18,
    /// OR: rd |= rs + imm16
    Or = 19,
    /// ORI: rd |= imm20
    Ori = 20,
    /// XOR: rd ^= rs + imm16
    Xor = 21,
    /// XORI: rd ^= imm20
    Xori = 22,
    /// NOT: rd = !rd
    Not = 23,
    /// MOV: rd = rs + imm16
    Mov = 24,

    // ========== Floating point ==========
    /// ADDD: (rd, rd+1) += (rs, rs+1)
    Addd = 32,
    /// SUBD: (rd, rd+1) -= (rs, rs+1)
    Subd = 33,
    /// MULD: (rd, rd+1) *= (rs, rs+1)
    Muld = 34,
    /// DIVD: (rd, rd+1) /= (rs, rs+1)
    Divd = 35,
    /// ITOD: (rd, rd+1) = rs as double
    Itod = 36,
    /// DTOI: rd = (rs, rs+1) as integer
    Dtoi = 37,

    // ========== Stack ==========
    /// PUSH: sp -= 1; mem[sp] = rd + imm20
    Push = 38,
    /// POP: rd = mem[sp] + imm20; sp += 1
    Pop = 39,

    // ========== Calls ==========
    /// CALL: push return address; ip = rd + addr20
    Call = 40,
    /// CALLI: push return address; ip = addr20
    Calli = 41,
    /// RET: ip = pop; sp += imm20
    Ret = 42,

    // ========== Compare ==========
    /// CMP: flags = compare(rd, rs)
    Cmp = 43,
    /// CMPI: flags = compare(rd, imm20)
    Cmpi = 44,

    // ========== Jumps ==========
    /// JMP: ip = addr20
    Jmp = 46,
    /// JNE: jump if not equal
    Jne = 47,
    /// JEQ: jump if equal
    Jeq = 48,
    /// JLE: jump if less or equal
    Jle = 49,
    /// JL: jump if less
    Jl = 50,
    /// JGE: jump if greater or equal
    Jge = 51,
    /// JG: jump if greater
    Jg = 52,

    // ========== Memory ==========
    /// LOAD: rd = mem[addr20]
    Load = 64,
    /// STORE: mem[addr20] = rd
    Store = 65,
    /// LOAD2: (rd, rd+1) = (mem[addr20], mem[addr20+1])
    Load2 = 66,
    /// STORE2: (mem[addr20], mem[addr20+1]) = (rd, rd+1)
    Store2 = 67,
    /// LOADR: rd = mem[rs + imm16]
    Loadr = 68,
    /// LOADR2: (rd, rd+1) = (mem[rs + imm16], mem[rs + imm16 + 1])
    Loadr2 = 69,
    /// STORER: mem[rs + imm16] = rd
    Storer = 70,
    /// STORER2: (mem[rs + imm16], mem[rs + imm16 + 1]) = (rd, rd+1)
    Storer2 = 71,
}

impl Opcode {
    /// Opcode width in bits
    pub const BITS: u32 = 8;

    /// Every defined opcode, in numeric order
    pub const ALL: [Opcode; 51] = [
        Opcode::Halt,
        Opcode::Syscall,
        Opcode::Add,
        Opcode::Addi,
        Opcode::Sub,
        Opcode::Subi,
        Opcode::Mul,
        Opcode::Muli,
        Opcode::Div,
        Opcode::Divi,
        Opcode::Lc,
        Opcode::Shl,
        Opcode::Shli,
        Opcode::Shr,
        Opcode::Shri,
        Opcode::And,
        Opcode::Andi,
        Opcode::Or,
        Opcode::Ori,
        Opcode::Xor,
        Opcode::Xori,
        Opcode::Not,
        Opcode::Mov,
        Opcode::Addd,
        Opcode::Subd,
        Opcode::Muld,
        Opcode::Divd,
        Opcode::Itod,
        Opcode::Dtoi,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Call,
        Opcode::Calli,
        Opcode::Ret,
        Opcode::Cmp,
        Opcode::Cmpi,
        Opcode::Jmp,
        Opcode::Jne,
        Opcode::Jeq,
        Opcode::Jle,
        Opcode::Jl,
        Opcode::Jge,
        Opcode::Jg,
        Opcode::Load,
        Opcode::Store,
        Opcode::Load2,
        Opcode::Store2,
        Opcode::Loadr,
        Opcode::Loadr2,
        Opcode::Storer,
        Opcode::Storer2,
    ];

    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Opcode::Halt),
            1 => Some(Opcode::Syscall),
            2 => Some(Opcode::Add),
            3 => Some(Opcode::Addi),
            4 => Some(Opcode::Sub),
            5 => Some(Opcode::Subi),
            6 => Some(Opcode::Mul),
            7 => Some(Opcode::Muli),
            8 => Some(Opcode::Div),
            9 => Some(Opcode::Divi),
            12 => Some(Opcode::Lc),
            13 => Some(Opcode::Shl),
            14 => Some(Opcode::Shli),
            15 => Some(Opcode::Shr),
            16 => Some(Opcode::Shri),
            17 => Some(Opcode::And),
            18 => Some(Opcode::Andi),
            19 => Some(Opcode::Or),
            20 => Some(Opcode::Ori),
            21 => Some(Opcode::Xor),
            22 => Some(Opcode::Xori),
            23 => Some(Opcode::Not),
            24 => Some(Opcode::Mov),
            32 => Some(Opcode::Addd),
            33 => Some(Opcode::Subd),
            34 => Some(Opcode::Muld),
            35 => Some(Opcode::Divd),
            36 => Some(Opcode::Itod),
            37 => Some(Opcode::Dtoi),
            38 => Some(Opcode::Push),
            39 => Some(Opcode::Pop),
            40 => Some(Opcode::Call),
            41 => Some(Opcode::Calli),
            42 => Some(Opcode::Ret),
            43 => Some(Opcode::Cmp),
            44 => Some(Opcode::Cmpi),
            46 => Some(Opcode::Jmp),
            47 => Some(Opcode::Jne),
            48 => Some(Opcode::Jeq),
            49 => Some(Opcode::Jle),
            50 => Some(Opcode::Jl),
            51 => Some(Opcode::Jge),
            52 => Some(Opcode::Jg),
            64 => Some(Opcode::Load),
            65 => Some(Opcode::Store),
            66 => Some(Opcode::Load2),
            67 => Some(Opcode::Store2),
            68 => Some(Opcode::Loadr),
            69 => Some(Opcode::Loadr2),
            70 => Some(Opcode::Storer),
            71 => Some(Opcode::Storer2),
            _ => None,
        }
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Extract opcode from the top byte of an instruction word
    #[inline]
    pub fn from_instruction(word: u32) -> Option<Self> {
        Self::from_u8((word >> 24) as u8)
    }

    /// Operand layout used by this opcode
    pub const fn format(self) -> OperandFormat {
        use OperandFormat::*;
        match self {
            Opcode::Halt | Opcode::Syscall => RI,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => RR,
            Opcode::Addi | Opcode::Subi | Opcode::Muli | Opcode::Divi => RI,
            Opcode::Lc => RI,
            Opcode::Mov => RR,
            Opcode::Shl | Opcode::Shr | Opcode::And | Opcode::Or | Opcode::Xor => RR,
            Opcode::Shli | Opcode::Shri | Opcode::Andi | Opcode::Ori | Opcode::Xori => RI,
            Opcode::Not => RI,
            Opcode::Addd | Opcode::Subd | Opcode::Muld | Opcode::Divd => RR,
            Opcode::Itod | Opcode::Dtoi => RR,
            Opcode::Push | Opcode::Pop => RI,
            Opcode::Call => RM,
            Opcode::Calli => Me,
            Opcode::Ret => Im,
            Opcode::Cmp => RR,
            Opcode::Cmpi => RI,
            Opcode::Jmp
            | Opcode::Jne
            | Opcode::Jeq
            | Opcode::Jle
            | Opcode::Jl
            | Opcode::Jge
            | Opcode::Jg => Me,
            Opcode::Load | Opcode::Store | Opcode::Load2 | Opcode::Store2 => RM,
            Opcode::Loadr | Opcode::Loadr2 | Opcode::Storer | Opcode::Storer2 => RR,
        }
    }

    /// Assembly mnemonic (lowercase)
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Syscall => "syscall",
            Opcode::Add => "add",
            Opcode::Addi => "addi",
            Opcode::Sub => "sub",
            Opcode::Subi => "subi",
            Opcode::Mul => "mul",
            Opcode::Muli => "muli",
            Opcode::Div => "div",
            Opcode::Divi => "divi",
            Opcode::Lc => "lc",
            Opcode::Shl => "shl",
            Opcode::Shli => "shli",
            Opcode::Shr => "shr",
            Opcode::Shri => "shri",
            Opcode::And => "and",
            Opcode::Andi => "andi",
            Opcode::Or => "or",
            Opcode::Ori => "ori",
            Opcode::Xor => "xor",
            Opcode::Xori => "xori",
            Opcode::Not => "not",
            Opcode::Mov => "mov",
            Opcode::Addd => "addd",
            Opcode::Subd => "subd",
            Opcode::Muld => "muld",
            Opcode::Divd => "divd",
            Opcode::Itod => "itod",
            Opcode::Dtoi => "dtoi",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Call => "call",
            Opcode::Calli => "calli",
            Opcode::Ret => "ret",
            Opcode::Cmp => "cmp",
            Opcode::Cmpi => "cmpi",
            Opcode::Jmp => "jmp",
            Opcode::Jne => "jne",
            Opcode::Jeq => "jeq",
            Opcode::Jle => "jle",
            Opcode::Jl => "jl",
            Opcode::Jge => "jge",
            Opcode::Jg => "jg",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Load2 => "load2",
            Opcode::Store2 => "store2",
            Opcode::Loadr => "loadr",
            Opcode::Loadr2 => "loadr2",
            Opcode::Storer => "storer",
            Opcode::Storer2 => "storer2",
        }
    }

    /// Look up an opcode by mnemonic, ignoring ASCII case
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(name))
    }

    /// Check if this opcode reads or writes a register pair `(r, r+1)`
    pub const fn uses_register_pair(self) -> bool {
        matches!(
            self,
            Opcode::Mul
                | Opcode::Muli
                | Opcode::Div
                | Opcode::Divi
                | Opcode::Addd
                | Opcode::Subd
                | Opcode::Muld
                | Opcode::Divd
                | Opcode::Itod
                | Opcode::Dtoi
                | Opcode::Load2
                | Opcode::Store2
                | Opcode::Loadr2
                | Opcode::Storer2
        )
    }
}

impl TryFrom<u8> for Opcode {
    type Error = crate::SpecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(crate::SpecError::InvalidOpcode(value))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::Halt.to_u8(), 0);
        assert_eq!(Opcode::Lc.to_u8(), 12);
        assert_eq!(Opcode::Mov.to_u8(), 24);
        assert_eq!(Opcode::Addd.to_u8(), 32);
        assert_eq!(Opcode::Jmp.to_u8(), 46);
        assert_eq!(Opcode::Load.to_u8(), 64);
        assert_eq!(Opcode::Storer2.to_u8(), 71);
    }

    #[test]
    fn test_from_u8_matches_table() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_u8(op.to_u8()), Some(op));
        }
        let defined = (0..=u8::MAX).filter(|v| Opcode::from_u8(*v).is_some()).count();
        assert_eq!(defined, Opcode::ALL.len());
    }

    #[test]
    fn test_gaps_are_undefined() {
        for gap in [10u8, 11, 25, 31, 45, 53, 63, 72, 0xFF] {
            assert_eq!(Opcode::from_u8(gap), None, "opcode {}", gap);
        }
        assert!(Opcode::try_from(45u8).is_err());
    }

    #[test]
    fn test_mnemonic_lookup() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
        }
        assert_eq!(Opcode::from_mnemonic("LOADR2"), Some(Opcode::Loadr2));
        assert_eq!(Opcode::from_mnemonic("cmpd"), None);
        assert_eq!(Opcode::from_mnemonic(""), None);
    }

    #[test]
    fn test_formats() {
        assert_eq!(Opcode::Halt.format(), OperandFormat::RI);
        assert_eq!(Opcode::Add.format(), OperandFormat::RR);
        assert_eq!(Opcode::Load.format(), OperandFormat::RM);
        assert_eq!(Opcode::Call.format(), OperandFormat::RM);
        assert_eq!(Opcode::Calli.format(), OperandFormat::Me);
        assert_eq!(Opcode::Jg.format(), OperandFormat::Me);
        assert_eq!(Opcode::Ret.format(), OperandFormat::Im);
        assert_eq!(Opcode::Loadr.format(), OperandFormat::RR);
    }

    #[test]
    fn test_from_instruction() {
        let word = (Opcode::Jeq.to_u8() as u32) << 24 | 0x00F_FFFF;
        assert_eq!(Opcode::from_instruction(word), Some(Opcode::Jeq));
    }

    #[test]
    fn test_uses_register_pair() {
        assert!(Opcode::Load2.uses_register_pair());
        assert!(Opcode::Dtoi.uses_register_pair());
        assert!(!Opcode::Load.uses_register_pair());
    }
}
