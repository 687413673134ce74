//! Main assembler logic
//!
//! Single read pass over the source writing words into the target state,
//! followed by a back-patch pass that resolves label references.

use crate::encoder::{encode, Field};
use crate::error::{AssemblerError, ErrorKind, Result};
use crate::lexer::Words;
use crate::parser::{parse_instruction, Operand};
use fupm2_spec::{Address, Opcode, State, MEMORY_SIZE};
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// Reserve one blank word
const DIRECTIVE_WORD: &str = "word";
/// Set the entry point to an already declared label
const DIRECTIVE_END: &str = "end";

/// Label use awaiting resolution
#[derive(Debug, Clone, Copy)]
struct Fixup<'a> {
    address: Address,
    field: Field,
    label: &'a str,
}

/// Two-pass assembler over one source text
pub struct Assembler<'a> {
    words: Words<'a>,
    labels: HashMap<&'a str, Address>,
    fixups: Vec<Fixup<'a>>,
    address: Address,
}

impl<'a> Assembler<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            words: Words::new(source),
            labels: HashMap::new(),
            fixups: Vec::new(),
            address: 0,
        }
    }

    /// Assemble into `state`
    ///
    /// Words written before a failure stay in `state`.
    pub fn run(mut self, state: &mut State) -> Result<()> {
        while let Some(word) = self.words.next() {
            self.command(word, state)
                .map_err(|kind| self.fail(self.address, kind))?;
        }

        for fixup in &self.fixups {
            self.resolve(fixup, state)
                .map_err(|kind| self.fail(fixup.address, kind))?;
        }

        state.set_sp(MEMORY_SIZE as i32 - 1);
        debug!(
            words = self.address,
            labels = self.labels.len(),
            fixups = self.fixups.len(),
            "assembled"
        );
        Ok(())
    }

    fn command(&mut self, word: &'a str, state: &mut State) -> std::result::Result<(), ErrorKind> {
        if let Some(label) = word.strip_suffix(':') {
            self.declare(label);
            return Ok(());
        }

        if word.eq_ignore_ascii_case(DIRECTIVE_WORD) {
            debug!(address = self.address, "reserved word");
            self.address += 1;
            return Ok(());
        }

        if word.eq_ignore_ascii_case(DIRECTIVE_END) {
            let label = self
                .words
                .next()
                .ok_or(ErrorKind::LabelExpected)?;
            let entry = *self
                .labels
                .get(label)
                .ok_or_else(|| ErrorKind::UndeclaredLabel(label.to_string()))?;
            debug!(label, entry, "entry point");
            state.set_ip(entry as i32);
            return Ok(());
        }

        let opcode =
            Opcode::from_mnemonic(word).ok_or_else(|| ErrorKind::UnknownOpcode(word.to_string()))?;
        let inst = parse_instruction(opcode, &mut self.words)?;
        if let Operand::Label(label) = inst.operand {
            self.fixups.push(Fixup {
                address: self.address,
                field: inst.field(),
                label,
            });
        }
        state.set_word(self.address, encode(&inst));
        self.address += 1;
        Ok(())
    }

    fn declare(&mut self, label: &'a str) {
        if let Some(existing) = self.labels.get(label) {
            warn!(
                label,
                existing = *existing,
                ignored = self.address,
                "label declared twice, keeping first declaration"
            );
            return;
        }
        debug!(label, address = self.address, "label");
        self.labels.insert(label, self.address);
    }

    fn resolve(&self, fixup: &Fixup<'a>, state: &mut State) -> std::result::Result<(), ErrorKind> {
        let target = *self
            .labels
            .get(fixup.label)
            .ok_or_else(|| ErrorKind::UndeclaredLabel(fixup.label.to_string()))?;
        let word = fixup.field.patch(state.get_word(fixup.address), target)?;
        debug!(address = fixup.address, label = fixup.label, target, "patched");
        state.set_word(fixup.address, word);
        Ok(())
    }

    fn fail(&self, address: Address, kind: ErrorKind) -> AssemblerError {
        let address = address + 1;
        error!(address, %kind, "error assembling command");
        AssemblerError::AssemblingFailed { address, kind }
    }
}

/// Assemble `source` into a fresh zeroed state
pub fn assemble(source: &str) -> Result<State> {
    let mut state = State::new();
    assemble_into(source, &mut state)?;
    Ok(state)
}

/// Assemble `source` into an existing state
pub fn assemble_into(source: &str, state: &mut State) -> Result<()> {
    Assembler::new(source).run(state)
}
