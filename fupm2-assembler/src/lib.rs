//! FUPM2 Assembler
//!
//! Assemble FUPM2 mnemonic source straight into a machine [`State`](fupm2_spec::State).
//!
//! ## Example
//!
//! ```rust
//! use fupm2_assembler::assemble;
//!
//! let source = r#"
//!     main:
//!         lc r0 5     ; load constant
//!         addi r0 3
//!         halt r0 0
//!     end main
//! "#;
//!
//! let state = assemble(source).unwrap();
//! assert_eq!(state.get_word(0) >> 24, 12);
//! ```

pub mod assembler;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod parser;

pub use assembler::{assemble, assemble_into, Assembler};
pub use encoder::{encode, Field};
pub use error::{AssemblerError, ErrorKind, Result};
pub use parser::{parse_instruction, parse_operand, parse_register, Operand, ParsedInstruction};
