//! Main disassembler logic
//!
//! Walks memory from address 0. A zero word is printed once; the run of zero
//! words following it is skipped.

use crate::formatter::format_word;
use fupm2_spec::{Address, State, Word, MEMORY_SIZE};
use std::fmt::Write;

/// Iterator over the `(address, word)` pairs the disassembler prints
pub struct Walk<'a> {
    state: &'a State,
    address: usize,
}

impl<'a> Walk<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state, address: 0 }
    }
}

impl Iterator for Walk<'_> {
    type Item = (Address, Word);

    fn next(&mut self) -> Option<Self::Item> {
        if self.address >= MEMORY_SIZE {
            return None;
        }
        let address = self.address as Address;
        let word = self.state.get_word(address);
        self.address += 1;
        if word == 0 {
            while self.address < MEMORY_SIZE && self.state.get_word(self.address as Address) == 0 {
                self.address += 1;
            }
        }
        Some((address, word))
    }
}

/// Disassemble the memory of `state` into assembly text, one line per word
pub fn disassemble(state: &State) -> String {
    let mut output = String::new();
    for (_, word) in Walk::new(state) {
        output.push_str(&format_word(word));
        output.push('\n');
    }
    output
}

/// Annotated listing: word address, raw hex word, then the assembly text
pub fn listing(state: &State) -> String {
    let mut output = String::new();
    output.push_str("; FUPM2 Disassembly\n");
    output.push_str(&format!("; Entry point: {}\n", state.ip()));
    output.push_str(&format!("; Stack pointer: {}\n", state.sp()));
    output.push('\n');

    for (address, word) in Walk::new(state) {
        // Writing to a String cannot fail
        let _ = writeln!(output, "{:07}:  {:08X}  {}", address, word, format_word(word));
    }
    output
}
