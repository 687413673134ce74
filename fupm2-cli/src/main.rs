//! `fupm2`: load or assemble a FUPM2 program and run it

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use fupm2_runtime::{Emulator, HaltReason, VMConfig};
use fupm2_spec::{AddressingMode, State};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LISTING: &str = "a.asm";

#[derive(Parser, Debug)]
#[command(name = "fupm2", version, about = "FUPM2 emulator")]
struct Args {
    /// Load a raw machine state (registers, flags, memory) and run it
    #[arg(short, long, value_name = "FILE", conflicts_with = "assemble")]
    load: Option<PathBuf>,

    /// Assemble a source file into a fresh state and run it
    #[arg(short, long, value_name = "FILE")]
    assemble: Option<PathBuf>,

    /// Write the disassembled memory to FILE before running
    #[arg(
        short,
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_LISTING
    )]
    disassemble: Option<PathBuf>,

    /// Report assembling and execution wall time
    #[arg(short, long)]
    benchmark: bool,

    /// Reject memory accesses outside the address space instead of wrapping
    #[arg(long)]
    checked_memory: bool,

    /// Stop after this many instructions
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Prepare the state without running it
    #[arg(long)]
    no_run: bool,

    /// Write the final raw machine state to FILE
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_state(path: &Path) -> Result<State> {
    let bytes = fs::read(path).with_context(|| format!("failed to open {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "loaded state");
    Ok(State::from_bytes(&bytes))
}

fn assemble_file(path: &Path, benchmark: bool) -> Result<State> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to open {}", path.display()))?;
    let start = Instant::now();
    let state = fupm2_assembler::assemble(&source)
        .with_context(|| format!("failed to assemble {}", path.display()))?;
    if benchmark {
        report("Assembling", start);
    }
    Ok(state)
}

fn report(stage: &str, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
    println!("[BENCHMARK]: {} time used: {:.2}ms", stage, elapsed);
}

fn run(args: Args) -> Result<ExitCode> {
    let mut state = match (&args.load, &args.assemble) {
        (Some(path), _) => load_state(path)?,
        (None, Some(path)) => assemble_file(path, args.benchmark)?,
        (None, None) => State::new(),
    };

    if let Some(path) = &args.disassemble {
        fs::write(path, fupm2_disassembler::disassemble(&state))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote disassembly");
    }

    let mut code = ExitCode::SUCCESS;
    if !args.no_run {
        let config = VMConfig {
            addressing: if args.checked_memory {
                AddressingMode::Checked
            } else {
                AddressingMode::Modular
            },
            max_steps: args.max_steps,
            trace: args.verbose > 0,
        };

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = BufWriter::new(io::stdout().lock());

        let start = Instant::now();
        let result = Emulator::new(config)
            .run(&mut state, &mut input, &mut output)
            .context("execution stopped")?;
        output.flush()?;
        drop(output);
        if args.benchmark {
            report("Execution", start);
        }

        debug!(steps = result.steps, halt_reason = ?result.halt_reason, "done");
        if matches!(result.halt_reason, HaltReason::Error) {
            code = ExitCode::FAILURE;
        }
    }

    if let Some(path) = &args.dump {
        fs::write(path, state.to_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote state");
    }

    Ok(code)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(args)
}
