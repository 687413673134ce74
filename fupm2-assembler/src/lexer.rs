//! # Lexer for FUPM2 Assembly Language
//!
//! Source is a stream of whitespace-separated words. A word beginning with
//! `;` starts a comment that runs to the end of the line. A `;` inside a
//! word does not start a comment.

use logos::Logos;

/// Tokens for FUPM2 assembly
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\x0B\x0C]+")]
#[logos(skip r";[^\n]*")]
pub enum Token<'a> {
    /// Mnemonic, directive, label, register or number
    #[regex(r"[^ \t\r\n\x0B\x0C;][^ \t\r\n\x0B\x0C]*", |lex| lex.slice())]
    Word(&'a str),
}

/// Iterator over the words of a source text
pub struct Words<'a> {
    lexer: logos::Lexer<'a, Token<'a>>,
}

impl<'a> Words<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
        }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    /// Every byte is either whitespace, a comment or part of a word, so the
    /// lexer never reports an error
    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.find_map(|token| token.ok()).map(|Token::Word(word)| word)
    }
}
