//! Instruction execution for FUPM2
//!
//! One call to [`step`] fetches the word at IP, executes it and advances IP
//! by one. The increment happens after every dispatch, including a faulting
//! one, so control transfers store their target minus one.

use crate::error::{Fault, OperationError, Result, RuntimeError};
use crate::syscall::handle_syscall;
use fupm2_disassembler::format_word;
use fupm2_spec::encoding::{
    extract_addr20, extract_imm16, extract_imm20, extract_r1, extract_r2,
};
use fupm2_spec::{AddressingMode, Flags, Opcode, Register, State, Word};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::trace;

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Keep running
    Continue,
    /// HALT or exit syscall
    Terminate,
    /// Unspecified but tolerated operation (unknown syscall); stops the run
    Warning,
    /// Unknown opcode; stops the run
    Error,
}

/// Every operand field of a word, decoded up front
struct Fields {
    r1: Register,
    r2: Register,
    imm16: i32,
    imm20: i32,
    addr20: u32,
}

impl Fields {
    fn new(word: Word) -> Self {
        Self {
            r1: Register::ALL[extract_r1(word) as usize],
            r2: Register::ALL[extract_r2(word) as usize],
            imm16: extract_imm16(word),
            imm20: extract_imm20(word),
            addr20: extract_addr20(word),
        }
    }
}

/// Execute one instruction
pub fn step<R, W>(
    state: &mut State,
    mode: AddressingMode,
    input: &mut R,
    output: &mut W,
) -> Result<StepOutcome>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let ip = state.ip();
    let result = fetch(state, mode, ip).and_then(|word| {
        trace!(
            ip,
            word = format_args!("{:08X}", word),
            text = %format_word(word),
            "step"
        );
        execute(word, state, mode, input, output)
    });
    state.set_ip(state.ip().wrapping_add(1));

    match result {
        Ok(outcome) => Ok(outcome),
        Err(Fault::Operation(cause)) => Err(RuntimeError::fault(ip, cause)),
        Err(Fault::Io(err)) => Err(RuntimeError::Io(err)),
    }
}

fn fetch(state: &State, mode: AddressingMode, ip: i32) -> std::result::Result<Word, Fault> {
    Ok(load(state, mode, ip as i64)? as Word)
}

#[inline]
fn load(state: &State, mode: AddressingMode, address: i64) -> std::result::Result<i32, OperationError> {
    state
        .checked_word(mode, address)
        .map(|word| word as i32)
        .map_err(|_| OperationError::InvalidMem)
}

#[inline]
fn store(
    state: &mut State,
    mode: AddressingMode,
    address: i64,
    value: i32,
) -> std::result::Result<(), OperationError> {
    state
        .set_checked_word(mode, address, value as Word)
        .map_err(|_| OperationError::InvalidMem)
}

#[inline]
fn pair(reg: Register) -> std::result::Result<Register, OperationError> {
    reg.pair().ok_or(OperationError::InvalidReg)
}

#[inline]
fn get_f64(state: &State, reg: Register) -> std::result::Result<f64, OperationError> {
    state.pair_f64(reg).ok_or(OperationError::InvalidReg)
}

#[inline]
fn set_f64(state: &mut State, reg: Register, value: f64) -> std::result::Result<(), OperationError> {
    state.set_pair_f64(reg, value).ok_or(OperationError::InvalidReg)
}

/// Store a 64-bit product into `(reg, reg+1)`
#[inline]
fn set_wide(state: &mut State, reg: Register, value: i64) -> std::result::Result<(), OperationError> {
    state
        .set_pair_bits(reg, value as u64)
        .ok_or(OperationError::InvalidReg)
}

/// Divide the register pair at `reg` by `divisor`, quotient low, remainder high
fn divide(state: &mut State, reg: Register, divisor: i32) -> std::result::Result<(), OperationError> {
    let hi = pair(reg)?;
    if divisor == 0 {
        return Err(OperationError::DivByZero);
    }
    // The low half is sign-extended before the halves are combined
    let dividend = (state.reg(reg) as i64) | ((state.reg(hi) as i64) << 32);
    let divisor = divisor as i64;
    let quotient = dividend
        .checked_div(divisor)
        .ok_or(OperationError::DivByZero)?;
    if quotient > u32::MAX as i64 {
        return Err(OperationError::DivByZero);
    }
    let remainder = dividend
        .checked_rem(divisor)
        .ok_or(OperationError::DivByZero)?;
    state.set_reg(reg, quotient as i32);
    state.set_reg(hi, remainder as i32);
    Ok(())
}

/// Jump to `target` (IP is advanced after dispatch)
#[inline]
fn jump(state: &mut State, target: u32) {
    state.set_ip((target as i32).wrapping_sub(1));
}

fn push(state: &mut State, mode: AddressingMode, value: i32) -> std::result::Result<(), OperationError> {
    let sp = state.sp().wrapping_sub(1);
    state.set_sp(sp);
    store(state, mode, sp as i64, value)
}

fn compare(state: &mut State, left: i32, right: i32) {
    state.flags.remove(Flags::EQUALITY | Flags::MAJORITY);
    state.flags.insert(Flags::compare(left, right));
}

fn execute<R, W>(
    word: Word,
    state: &mut State,
    mode: AddressingMode,
    input: &mut R,
    output: &mut W,
) -> std::result::Result<StepOutcome, Fault>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let Some(opcode) = Opcode::from_instruction(word) else {
        return Ok(StepOutcome::Error);
    };
    let Fields {
        r1,
        r2,
        imm16,
        imm20,
        addr20,
    } = Fields::new(word);
    let rd = state.reg(r1);
    let src = state.reg(r2);
    // Right-hand operand of register forms
    let rs = src.wrapping_add(imm16);

    if opcode.uses_register_pair() {
        // DTOI reads its pair through r2 and writes a single register
        pair(if opcode == Opcode::Dtoi { r2 } else { r1 })?;
    }

    match opcode {
        // ========== System ==========
        Opcode::Halt => return Ok(StepOutcome::Terminate),
        Opcode::Syscall => return handle_syscall(state, r1, imm20, input, output),

        // ========== Integer arithmetic ==========
        Opcode::Add => state.set_reg(r1, rd.wrapping_add(rs)),
        Opcode::Addi => state.set_reg(r1, rd.wrapping_add(imm20)),
        Opcode::Sub => state.set_reg(r1, rd.wrapping_sub(rs)),
        Opcode::Subi => state.set_reg(r1, rd.wrapping_sub(imm20)),
        Opcode::Mul => set_wide(state, r1, rd as i64 * rs as i64)?,
        Opcode::Muli => set_wide(state, r1, rd as i64 * imm20 as i64)?,
        // The divisor is the register alone; imm16 does not take part
        Opcode::Div => divide(state, r1, src)?,
        Opcode::Divi => divide(state, r1, imm20)?,

        // ========== Register load ==========
        Opcode::Lc => state.set_reg(r1, imm20),
        Opcode::Mov => state.set_reg(r1, rs),

        // ========== Shift and logic ==========
        Opcode::Shl => state.set_reg(r1, rd.wrapping_shl(rs as u32)),
        Opcode::Shli => state.set_reg(r1, rd.wrapping_shl(imm20 as u32)),
        Opcode::Shr => state.set_reg(r1, rd.wrapping_shr(rs as u32)),
        Opcode::Shri => state.set_reg(r1, rd.wrapping_shr(imm20 as u32)),
        Opcode::And => state.set_reg(r1, rd & rs),
        Opcode::Andi => state.set_reg(r1, rd & imm20),
        Opcode::Or => state.set_reg(r1, rd | rs),
        Opcode::Ori => state.set_reg(r1, rd | imm20),
        Opcode::Xor => state.set_reg(r1, rd ^ rs),
        Opcode::Xori => state.set_reg(r1, rd ^ imm20),
        Opcode::Not => state.set_reg(r1, !rd),

        // ========== Floating point ==========
        Opcode::Addd | Opcode::Subd | Opcode::Muld | Opcode::Divd => {
            let left = get_f64(state, r1)?;
            let right = get_f64(state, r2)?;
            let value = match opcode {
                Opcode::Addd => left + right,
                Opcode::Subd => left - right,
                Opcode::Muld => left * right,
                _ => left / right,
            };
            set_f64(state, r1, value)?;
        }
        Opcode::Itod => {
            set_f64(state, r1, src as f64)?;
        }
        Opcode::Dtoi => {
            let value = get_f64(state, r2)?;
            let limit = i32::MAX as f64;
            if value > limit || value < -limit {
                return Err(OperationError::RegOverflow.into());
            }
            state.set_reg(r1, value as i32);
        }

        // ========== Stack ==========
        Opcode::Push => {
            let sp = state.sp().wrapping_sub(1);
            state.set_sp(sp);
            // Read after the decrement, so PUSH through SP stores the new SP
            let value = state.reg(r1).wrapping_add(imm20);
            store(state, mode, sp as i64, value)?;
        }
        Opcode::Pop => {
            let sp = state.sp();
            let value = load(state, mode, sp as i64)?;
            state.set_reg(r1, value.wrapping_add(imm20));
            state.set_sp(state.sp().wrapping_add(1));
        }

        // ========== Calls ==========
        Opcode::Call => {
            let ret = state.ip().wrapping_add(1);
            push(state, mode, ret)?;
            let target = state.reg(r1).wrapping_add(addr20 as i32);
            jump(state, target as u32);
        }
        Opcode::Calli => {
            let ret = state.ip().wrapping_add(1);
            push(state, mode, ret)?;
            jump(state, addr20);
        }
        Opcode::Ret => {
            let sp = state.sp();
            let ret = load(state, mode, sp as i64)?;
            jump(state, ret as u32);
            state.set_sp(sp.wrapping_add(1).wrapping_add(imm20));
        }

        // ========== Compare ==========
        Opcode::Cmp => compare(state, rd, src),
        Opcode::Cmpi => compare(state, rd, imm20),

        // ========== Jumps ==========
        Opcode::Jmp => jump(state, addr20),
        Opcode::Jne | Opcode::Jeq | Opcode::Jle | Opcode::Jl | Opcode::Jge | Opcode::Jg => {
            let equal = state.flags.contains(Flags::EQUALITY);
            let less = state.flags.contains(Flags::MAJORITY);
            let taken = match opcode {
                Opcode::Jne => !equal,
                Opcode::Jeq => equal,
                Opcode::Jle => less || equal,
                Opcode::Jl => less && !equal,
                Opcode::Jge => !less || equal,
                _ => !less && !equal,
            };
            if taken {
                jump(state, addr20);
            }
        }

        // ========== Memory ==========
        Opcode::Load => {
            let value = load(state, mode, addr20 as i64)?;
            state.set_reg(r1, value);
        }
        Opcode::Store => store(state, mode, addr20 as i64, rd)?,
        Opcode::Load2 => {
            let hi = pair(r1)?;
            let lo_value = load(state, mode, addr20 as i64)?;
            let hi_value = load(state, mode, addr20 as i64 + 1)?;
            state.set_reg(r1, lo_value);
            state.set_reg(hi, hi_value);
        }
        Opcode::Store2 => {
            let hi = pair(r1)?;
            let hi_value = state.reg(hi);
            store(state, mode, addr20 as i64, rd)?;
            store(state, mode, addr20 as i64 + 1, hi_value)?;
        }
        Opcode::Loadr => {
            let value = load(state, mode, rs as i64)?;
            state.set_reg(r1, value);
        }
        Opcode::Storer => store(state, mode, rs as i64, rd)?,
        Opcode::Loadr2 => {
            let hi = pair(r1)?;
            let lo_value = load(state, mode, rs as i64)?;
            let hi_value = load(state, mode, rs as i64 + 1)?;
            state.set_reg(r1, lo_value);
            state.set_reg(hi, hi_value);
        }
        Opcode::Storer2 => {
            let hi = pair(r1)?;
            let hi_value = state.reg(hi);
            store(state, mode, rs as i64, rd)?;
            store(state, mode, rs as i64 + 1, hi_value)?;
        }
    }

    Ok(StepOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fupm2_spec::encoding::{encode_im, encode_me, encode_ri, encode_rm, encode_rr};
    use fupm2_spec::MEMORY_SIZE;
    use std::io::Cursor;

    fn run_word(state: &mut State, word: Word) -> Result<StepOutcome> {
        let ip = state.ip() as u32;
        state.set_word(ip, word);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        step(state, AddressingMode::Modular, &mut input, &mut output)
    }

    #[test]
    fn test_ip_advances() {
        let mut state = State::new();
        let outcome = run_word(&mut state, encode_ri(Opcode::Lc, 0, 5)).unwrap();
        assert_eq!(outcome, StepOutcome::Continue);
        assert_eq!(state.reg(Register::R0), 5);
        assert_eq!(state.ip(), 1);
    }

    #[test]
    fn test_halt_still_advances_ip() {
        let mut state = State::new();
        assert_eq!(run_word(&mut state, 0).unwrap(), StepOutcome::Terminate);
        assert_eq!(state.ip(), 1);
    }

    #[test]
    fn test_unknown_opcode() {
        let mut state = State::new();
        let outcome = run_word(&mut state, 0x2D00_0000).unwrap();
        assert_eq!(outcome, StepOutcome::Error);
        assert_eq!(state.ip(), 1);
    }

    #[test]
    fn test_sign_extended_immediates() {
        let mut state = State::new();
        run_word(&mut state, encode_ri(Opcode::Lc, 0, -1)).unwrap();
        assert_eq!(state.reg(Register::R0), -1);
        run_word(&mut state, encode_rr(Opcode::Mov, 1, 0, -2)).unwrap();
        assert_eq!(state.reg(Register::R1), -3);
    }

    #[test]
    fn test_mul_wide() {
        let mut state = State::new();
        state.set_reg(Register::R0, 0x10000);
        state.set_reg(Register::R2, 0x10000);
        run_word(&mut state, encode_rr(Opcode::Mul, 0, 2, 0)).unwrap();
        assert_eq!(state.reg(Register::R0), 0);
        assert_eq!(state.reg(Register::R1), 1);

        state.set_reg(Register::R0, -3);
        run_word(&mut state, encode_ri(Opcode::Muli, 0, 4)).unwrap();
        assert_eq!(state.reg(Register::R0), -12);
        assert_eq!(state.reg(Register::R1), -1);
    }

    #[test]
    fn test_mul_without_pair_faults() {
        let mut state = State::new();
        let err = run_word(&mut state, encode_rr(Opcode::Mul, 15, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidState {
                ip: 0,
                cause: OperationError::InvalidReg
            }
        ));
        assert_eq!(state.ip(), 1);
    }

    #[test]
    fn test_div() {
        let mut state = State::new();
        state.set_reg(Register::R0, 10);
        state.set_reg(Register::R2, 3);
        run_word(&mut state, encode_rr(Opcode::Div, 0, 2, 0)).unwrap();
        assert_eq!(state.reg(Register::R0), 3);
        assert_eq!(state.reg(Register::R1), 1);

        state.set_reg(Register::R0, 100);
        state.set_reg(Register::R1, 0);
        run_word(&mut state, encode_ri(Opcode::Divi, 0, 7)).unwrap();
        assert_eq!(state.reg(Register::R0), 14);
        assert_eq!(state.reg(Register::R1), 2);
    }

    #[test]
    fn test_div_ignores_imm16() {
        let mut state = State::new();
        state.set_reg(Register::R0, 10);
        state.set_reg(Register::R2, 5);
        run_word(&mut state, encode_rr(Opcode::Div, 0, 2, 100)).unwrap();
        assert_eq!(state.reg(Register::R0), 2);
    }

    #[test]
    fn test_div_by_zero() {
        let mut state = State::new();
        state.set_reg(Register::R0, 10);
        let err = run_word(&mut state, encode_ri(Opcode::Divi, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::MachineFault {
                cause: OperationError::DivByZero,
                ..
            }
        ));
    }

    #[test]
    fn test_div_large_quotient_is_div_by_zero() {
        let mut state = State::new();
        state.set_reg(Register::R0, 0);
        state.set_reg(Register::R1, 1); // dividend 2^32
        let err = run_word(&mut state, encode_ri(Opcode::Divi, 0, 1)).unwrap_err();
        assert_eq!(err.cause(), Some(OperationError::DivByZero));
    }

    #[test]
    fn test_shifts() {
        let mut state = State::new();
        state.set_reg(Register::R0, -16);
        run_word(&mut state, encode_ri(Opcode::Shri, 0, 2)).unwrap();
        assert_eq!(state.reg(Register::R0), -4);
        state.set_reg(Register::R1, 3);
        run_word(&mut state, encode_rr(Opcode::Shl, 0, 1, 1)).unwrap();
        assert_eq!(state.reg(Register::R0), -64);
    }

    #[test]
    fn test_logic() {
        let mut state = State::new();
        state.set_reg(Register::R0, 0b1100);
        run_word(&mut state, encode_ri(Opcode::Andi, 0, 0b1010)).unwrap();
        assert_eq!(state.reg(Register::R0), 0b1000);
        run_word(&mut state, encode_ri(Opcode::Ori, 0, 1)).unwrap();
        assert_eq!(state.reg(Register::R0), 0b1001);
        run_word(&mut state, encode_ri(Opcode::Xori, 0, 0b1111)).unwrap();
        assert_eq!(state.reg(Register::R0), 0b0110);
        run_word(&mut state, encode_ri(Opcode::Not, 0, 0)).unwrap();
        assert_eq!(state.reg(Register::R0), !0b0110);
    }

    #[test]
    fn test_float_ops() {
        let mut state = State::new();
        state.set_pair_f64(Register::R0, 1.5).unwrap();
        state.set_pair_f64(Register::R2, 0.25).unwrap();
        run_word(&mut state, encode_rr(Opcode::Addd, 0, 2, 0)).unwrap();
        assert_eq!(state.pair_f64(Register::R0), Some(1.75));
        run_word(&mut state, encode_rr(Opcode::Muld, 0, 2, 0)).unwrap();
        assert_eq!(state.pair_f64(Register::R0), Some(0.4375));
        run_word(&mut state, encode_rr(Opcode::Divd, 0, 2, 0)).unwrap();
        assert_eq!(state.pair_f64(Register::R0), Some(1.75));
        run_word(&mut state, encode_rr(Opcode::Subd, 0, 2, 0)).unwrap();
        assert_eq!(state.pair_f64(Register::R0), Some(1.5));
    }

    #[test]
    fn test_float_pair_checks() {
        let mut state = State::new();
        let err = run_word(&mut state, encode_rr(Opcode::Addd, 0, 15, 0)).unwrap_err();
        assert_eq!(err.cause(), Some(OperationError::InvalidReg));
    }

    #[test]
    fn test_itod_dtoi() {
        let mut state = State::new();
        state.set_reg(Register::R5, -7);
        run_word(&mut state, encode_rr(Opcode::Itod, 2, 5, 0)).unwrap();
        assert_eq!(state.pair_f64(Register::R2), Some(-7.0));

        state.set_pair_f64(Register::R2, 9.99).unwrap();
        run_word(&mut state, encode_rr(Opcode::Dtoi, 0, 2, 0)).unwrap();
        assert_eq!(state.reg(Register::R0), 9);
    }

    #[test]
    fn test_dtoi_overflow() {
        let mut state = State::new();
        state.set_pair_f64(Register::R2, 3e9).unwrap();
        let err = run_word(&mut state, encode_rr(Opcode::Dtoi, 0, 2, 0)).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::MachineFault {
                cause: OperationError::RegOverflow,
                ..
            }
        ));
    }

    #[test]
    fn test_push_pop() {
        let mut state = State::new();
        state.set_sp(MEMORY_SIZE as i32 - 1);
        state.set_reg(Register::R0, 42);
        run_word(&mut state, encode_ri(Opcode::Push, 0, 1)).unwrap();
        assert_eq!(state.sp(), MEMORY_SIZE as i32 - 2);
        assert_eq!(state.get_word(MEMORY_SIZE as u32 - 2), 43);
        run_word(&mut state, encode_ri(Opcode::Pop, 1, 0)).unwrap();
        assert_eq!(state.reg(Register::R1), 43);
        assert_eq!(state.sp(), MEMORY_SIZE as i32 - 1);
    }

    #[test]
    fn test_call_and_ret() {
        let mut state = State::new();
        state.set_sp(100);
        state.set_ip(5);
        run_word(&mut state, encode_me(Opcode::Calli, 20)).unwrap();
        assert_eq!(state.ip(), 20);
        assert_eq!(state.sp(), 99);
        assert_eq!(state.get_word(99), 6);

        run_word(&mut state, encode_im(Opcode::Ret, 2)).unwrap();
        assert_eq!(state.ip(), 6);
        assert_eq!(state.sp(), 102);
    }

    #[test]
    fn test_call_register_relative() {
        let mut state = State::new();
        state.set_sp(100);
        state.set_reg(Register::R3, 30);
        run_word(&mut state, encode_rm(Opcode::Call, 3, 4)).unwrap();
        assert_eq!(state.ip(), 34);
        assert_eq!(state.get_word(99), 1);
    }

    #[test]
    fn test_push_sp_stores_decremented_sp() {
        let mut state = State::new();
        state.set_sp(100);
        run_word(&mut state, encode_ri(Opcode::Push, 14, 0)).unwrap();
        assert_eq!(state.sp(), 99);
        assert_eq!(state.get_word(99), 99);

        run_word(&mut state, encode_ri(Opcode::Push, 14, 3)).unwrap();
        assert_eq!(state.sp(), 98);
        assert_eq!(state.get_word(98), 101);
    }

    #[test]
    fn test_call_through_sp_uses_decremented_sp() {
        let mut state = State::new();
        state.set_sp(100);
        run_word(&mut state, encode_rm(Opcode::Call, 14, 0)).unwrap();
        assert_eq!(state.sp(), 99);
        assert_eq!(state.get_word(99), 1);
        assert_eq!(state.ip(), 99);

        let mut state = State::new();
        state.set_sp(100);
        run_word(&mut state, encode_rm(Opcode::Call, 14, 5)).unwrap();
        assert_eq!(state.ip(), 104);
    }

    #[test]
    fn test_loadr2_address_taken_once() {
        let mut state = State::new();
        state.set_reg(Register::R0, 200);
        state.set_word(200, 300);
        state.set_word(201, 7);
        state.set_word(301, 9);
        run_word(&mut state, encode_rr(Opcode::Loadr2, 0, 0, 0)).unwrap();
        assert_eq!(state.reg(Register::R0), 300);
        assert_eq!(state.reg(Register::R1), 7);
    }

    #[test]
    fn test_pair_checked_before_dispatch() {
        let mut state = State::new();
        state.set_reg(Register::R15, 9);
        state.set_sp(100);
        for word in [
            encode_ri(Opcode::Muli, 15, 2),
            encode_rm(Opcode::Load2, 15, 0),
            encode_rr(Opcode::Storer2, 15, 0, 0),
            encode_rr(Opcode::Itod, 15, 0, 0),
        ] {
            let err = run_word(&mut state, word).unwrap_err();
            assert!(matches!(
                err,
                RuntimeError::MachineFault {
                    cause: OperationError::InvalidReg,
                    ..
                }
            ));
        }
        assert_eq!(state.reg(Register::R15), 9);
        assert_eq!(state.get_word(0), encode_ri(Opcode::Muli, 15, 2));

        // DTOI pairs its source, so r15 is a valid destination
        state.set_pair_f64(Register::R2, 7.0).unwrap();
        run_word(&mut state, encode_rr(Opcode::Dtoi, 15, 2, 0)).unwrap();
        assert_eq!(state.reg(Register::R15), 7);
    }

    #[test]
    fn test_compare_and_jumps() {
        let cases = [
            // (left, right, jne, jeq, jle, jl, jge, jg)
            (1, 2, true, false, true, true, false, false),
            (2, 2, false, true, true, false, true, false),
            (3, 2, true, false, false, false, true, true),
        ];
        let jumps = [
            Opcode::Jne,
            Opcode::Jeq,
            Opcode::Jle,
            Opcode::Jl,
            Opcode::Jge,
            Opcode::Jg,
        ];
        for (left, right, jne, jeq, jle, jl, jge, jg) in cases {
            let expected = [jne, jeq, jle, jl, jge, jg];
            for (op, taken) in jumps.iter().zip(expected) {
                let mut state = State::new();
                state.set_reg(Register::R0, left);
                state.set_reg(Register::R1, right);
                run_word(&mut state, encode_rr(Opcode::Cmp, 0, 1, 0)).unwrap();
                run_word(&mut state, encode_me(*op, 50)).unwrap();
                let target = if taken { 50 } else { 2 };
                assert_eq!(state.ip(), target, "{} after cmp {} {}", op, left, right);
            }
        }
    }

    #[test]
    fn test_cmp_ignores_imm16() {
        let mut state = State::new();
        state.set_reg(Register::R0, 5);
        state.set_reg(Register::R1, 5);
        run_word(&mut state, encode_rr(Opcode::Cmp, 0, 1, 3)).unwrap();
        assert_eq!(state.flags, Flags::EQUALITY);
    }

    #[test]
    fn test_cmpi() {
        let mut state = State::new();
        state.set_reg(Register::R0, -2);
        run_word(&mut state, encode_ri(Opcode::Cmpi, 0, -1)).unwrap();
        assert_eq!(state.flags, Flags::MAJORITY);
    }

    #[test]
    fn test_memory_ops() {
        let mut state = State::new();
        state.set_reg(Register::R0, 11);
        state.set_reg(Register::R1, 22);
        run_word(&mut state, encode_rm(Opcode::Store2, 0, 500)).unwrap();
        assert_eq!(state.get_word(500), 11);
        assert_eq!(state.get_word(501), 22);

        state.set_reg(Register::R4, 499);
        run_word(&mut state, encode_rr(Opcode::Loadr2, 2, 4, 1)).unwrap();
        assert_eq!(state.reg(Register::R2), 11);
        assert_eq!(state.reg(Register::R3), 22);

        run_word(&mut state, encode_rr(Opcode::Storer, 3, 4, 10)).unwrap();
        assert_eq!(state.get_word(509), 22);
        run_word(&mut state, encode_rm(Opcode::Load, 7, 509)).unwrap();
        assert_eq!(state.reg(Register::R7), 22);
    }

    #[test]
    fn test_modular_register_address() {
        let mut state = State::new();
        state.set_reg(Register::R1, -1);
        state.set_reg(Register::R0, 77);
        run_word(&mut state, encode_rr(Opcode::Storer, 0, 1, 0)).unwrap();
        assert_eq!(state.get_word(MEMORY_SIZE as u32 - 1), 77);
    }

    #[test]
    fn test_checked_addressing() {
        let mut state = State::new();
        state.set_reg(Register::R1, -1);
        state.set_word(0, encode_rr(Opcode::Loadr, 0, 1, 0));
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = step(&mut state, AddressingMode::Checked, &mut input, &mut output).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidState {
                cause: OperationError::InvalidMem,
                ..
            }
        ));
    }

    #[test]
    fn test_checked_fetch() {
        let mut state = State::new();
        state.set_ip(MEMORY_SIZE as i32);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = step(&mut state, AddressingMode::Checked, &mut input, &mut output).unwrap_err();
        assert_eq!(err.cause(), Some(OperationError::InvalidMem));
    }
}
