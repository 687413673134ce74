//! # FUPM2 Disassembler
//!
//! Turn a machine state back into assembly text that the assembler accepts.
//!
//! ## Example
//!
//! ```rust
//! use fupm2_spec::State;
//! use fupm2_disassembler::disassemble;
//!
//! // All of zeroed memory collapses to a single line
//! let state = State::new();
//! assert_eq!(disassemble(&state), "halt r0 0\n");
//! ```

pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod formatter;

pub use decoder::decode;
pub use disassembler::{disassemble, listing, Walk};
pub use error::{DisassemblerError, Result};
pub use formatter::{format, format_word};

#[cfg(test)]
mod tests {
    use super::*;
    use fupm2_spec::encoding::encode_me;
    use fupm2_spec::Opcode;

    #[test]
    fn test_public_exports() {
        let _ = DisassemblerError::UnknownOpcode(0xFF);
        let instr = decode(encode_me(Opcode::Jmp, 3)).unwrap();
        assert_eq!(format(&instr), "jmp 3");
        assert_eq!(format_word(encode_me(Opcode::Jmp, 3)), "jmp 3");
    }

    #[test]
    fn test_result_type() {
        let err: Result<i32> = Err(DisassemblerError::UnknownOpcode(0xFF));
        assert_eq!(err.unwrap_err().to_string(), "Unknown opcode: 255");
    }
}
