//! Syscall handling for FUPM2
//!
//! Implements console syscalls selected by the SYSCALL immediate:
//! - Exit (0): Terminate the run
//! - Scan int (100): Read an integer token into the register
//! - Scan double (101): Read a double token into the register pair
//! - Print int (102): Write the register as a decimal integer
//! - Print double (103): Write the register pair as a double
//! - Put char (105): Write the register's low byte
//! - Get char (106): Read one byte into the register (-1 at end of input)

use crate::error::{Fault, OperationError};
use crate::execute::StepOutcome;
use crate::io::{format_double, read_byte, read_token};
use fupm2_spec::{Register, State};
use std::io::{BufRead, Write};
use std::num::IntErrorKind;
use tracing::warn;

/// Syscall numbers
pub const SYSCALL_EXIT: i32 = 0;
pub const SYSCALL_SCANINT: i32 = 100;
pub const SYSCALL_SCANDOUBLE: i32 = 101;
pub const SYSCALL_PRINTINT: i32 = 102;
pub const SYSCALL_PRINTDOUBLE: i32 = 103;
pub const SYSCALL_PUTCHAR: i32 = 105;
pub const SYSCALL_GETCHAR: i32 = 106;

/// Parse a decimal integer token, saturating values outside `i32`
fn parse_int(token: &str) -> Option<i32> {
    match token.parse::<i32>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i32::MAX),
            IntErrorKind::NegOverflow => Some(i32::MIN),
            _ => None,
        },
    }
}

/// Handle a syscall with code `code` on register `reg`
pub(crate) fn handle_syscall<R, W>(
    state: &mut State,
    reg: Register,
    code: i32,
    input: &mut R,
    output: &mut W,
) -> Result<StepOutcome, Fault>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    match code {
        SYSCALL_EXIT => return Ok(StepOutcome::Terminate),
        SYSCALL_SCANINT => {
            output.flush()?;
            let value = match read_token(input)? {
                Some(token) => parse_int(&token).unwrap_or_else(|| {
                    warn!(%token, "integer expected on input, storing 0");
                    0
                }),
                None => {
                    warn!("end of input while reading an integer, storing 0");
                    0
                }
            };
            state.set_reg(reg, value);
        }
        SYSCALL_SCANDOUBLE => {
            reg.pair().ok_or(OperationError::InvalidReg)?;
            output.flush()?;
            let value = match read_token(input)? {
                Some(token) => token.parse::<f64>().unwrap_or_else(|_| {
                    warn!(%token, "double expected on input, storing 0");
                    0.0
                }),
                None => {
                    warn!("end of input while reading a double, storing 0");
                    0.0
                }
            };
            state
                .set_pair_f64(reg, value)
                .ok_or(OperationError::InvalidReg)?;
        }
        SYSCALL_PRINTINT => {
            write!(output, "{}", state.reg(reg))?;
        }
        SYSCALL_PRINTDOUBLE => {
            let value = state.pair_f64(reg).ok_or(OperationError::InvalidReg)?;
            write!(output, "{}", format_double(value))?;
        }
        SYSCALL_PUTCHAR => {
            output.write_all(&[state.reg(reg) as u8])?;
        }
        SYSCALL_GETCHAR => {
            output.flush()?;
            let value = read_byte(input)?.map_or(-1, i32::from);
            state.set_reg(reg, value);
        }
        _ => {
            warn!(code, "unspecified syscall");
            return Ok(StepOutcome::Warning);
        }
    }
    Ok(StepOutcome::Continue)
}
