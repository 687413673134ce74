//! Run loop for FUPM2

use crate::error::Result;
use crate::execute::{step, StepOutcome};
use fupm2_spec::{AddressingMode, State};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, error, warn};

/// VM configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VMConfig {
    /// How addresses outside memory are treated
    pub addressing: AddressingMode,

    /// Stop after this many steps (unbounded when `None`)
    pub max_steps: Option<u64>,

    /// Log every executed instruction at debug level
    pub trace: bool,
}

/// Why a run stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// HALT or exit syscall
    Terminated,
    /// Unspecified syscall
    Warning,
    /// Unknown opcode
    Error,
    /// `max_steps` reached
    StepLimit,
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Number of steps executed, the stopping one included
    pub steps: u64,

    /// Reason for halting
    pub halt_reason: HaltReason,
}

/// FUPM2 emulator
///
/// Holds only configuration; the machine state and the console streams are
/// borrowed for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct Emulator {
    config: VMConfig,
}

impl Emulator {
    pub fn new(config: VMConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }

    /// Run from the current IP until the machine stops
    ///
    /// Output is flushed before returning, on success and on error.
    pub fn run<R, W>(&self, state: &mut State, input: &mut R, output: &mut W) -> Result<ExecutionResult>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        debug!(ip = state.ip(), sp = state.sp(), mode = %self.config.addressing, "starting run");

        let mut steps = 0u64;
        let halt_reason = loop {
            if self.config.max_steps.is_some_and(|limit| steps >= limit) {
                break HaltReason::StepLimit;
            }

            let ip = state.ip();
            let outcome = match step(state, self.config.addressing, input, output) {
                Ok(outcome) => outcome,
                Err(err) => {
                    // The fault is reported even if flushing fails
                    let _ = output.flush();
                    error!(ip, steps, "{}", err);
                    return Err(err);
                }
            };
            steps += 1;

            if self.config.trace {
                debug!(step = steps, ip, ?outcome, "executed");
            }

            match outcome {
                StepOutcome::Continue => {}
                StepOutcome::Terminate => break HaltReason::Terminated,
                StepOutcome::Warning => {
                    warn!(ip, "stopped on an unspecified operation");
                    break HaltReason::Warning;
                }
                StepOutcome::Error => {
                    error!(ip, word = state.get_word(ip as u32), "unknown opcode");
                    break HaltReason::Error;
                }
            }
        };

        output.flush()?;
        debug!(steps, ?halt_reason, "run finished");
        Ok(ExecutionResult { steps, halt_reason })
    }
}

/// Run `state` with the default configuration
pub fn run<R, W>(state: &mut State, input: &mut R, output: &mut W) -> Result<ExecutionResult>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    Emulator::default().run(state, input, output)
}
