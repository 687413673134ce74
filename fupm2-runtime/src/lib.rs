//! # FUPM2 Runtime
//!
//! Execute FUPM2 machine states.
//!
//! The runtime fetches words from the state's memory at IP, executes them
//! and talks to the console through any `BufRead`/`Write` pair.
//!
//! ## Features
//!
//! - **51 instructions**: integer, floating point, stack, call and memory
//! - **Register pairs**: 64-bit products, quotient/remainder and doubles
//! - **Addressing modes**: modular (wrapping) or checked memory access
//! - **Syscalls**: exit, integer/double/char console I/O
//!
//! ## Example
//!
//! ```rust
//! use fupm2_runtime::{Emulator, HaltReason, VMConfig};
//! use fupm2_spec::{Register, State};
//! use std::io::Cursor;
//!
//! let mut state = fupm2_assembler::assemble("lc r0 5\naddi r0 3\nhalt r0 0").unwrap();
//! let mut input = Cursor::new(Vec::new());
//! let mut output = Vec::new();
//! let result = Emulator::new(VMConfig::default())
//!     .run(&mut state, &mut input, &mut output)
//!     .unwrap();
//! assert_eq!(result.halt_reason, HaltReason::Terminated);
//! assert_eq!(state.reg(Register::R0), 8);
//! ```

pub mod error;
pub mod execute;
pub mod io;
pub mod syscall;
pub mod vm;

pub use error::{OperationError, Result, RuntimeError};
pub use execute::{step, StepOutcome};
pub use vm::{run, Emulator, ExecutionResult, HaltReason, VMConfig};
