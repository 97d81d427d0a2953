// src/lexer/statements.rs
//! Groups a token stream into statements ending in a terminator kind.
//!
//! This sits downstream of the scanner; the scanner itself knows nothing
//! about statements.

use thiserror::Error;

use crate::{
    error::LexError,
    lexer::{cpu::Token, tables::KindId},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Input ended with tokens after the last terminator.
    #[error("statement starting at offset {start} is missing its terminator ({tokens} tokens)")]
    Unterminated { start: usize, tokens: usize },
}

/// Adapter yielding one `Vec<Token>` per terminated statement, terminator
/// included.
pub struct Statements<'a, I> {
    tokens: I,
    terminator: KindId,
    pending: Vec<Token<'a>>,
    done: bool,
}

impl<'a, I> Statements<'a, I>
where
    I: Iterator<Item = Result<Token<'a>, LexError>>,
{
    pub fn new(tokens: I, terminator: KindId) -> Self {
        Self {
            tokens,
            terminator,
            pending: Vec::new(),
            done: false,
        }
    }
}

impl<'a, I> Iterator for Statements<'a, I>
where
    I: Iterator<Item = Result<Token<'a>, LexError>>,
{
    type Item = Result<Vec<Token<'a>>, StatementError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.tokens.next() {
                Some(Ok(tok)) => {
                    let ends = tok.kind == self.terminator;
                    self.pending.push(tok);
                    if ends {
                        return Some(Ok(std::mem::take(&mut self.pending)));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    let first = self.pending.first()?;
                    return Some(Err(StatementError::Unterminated {
                        start: first.start,
                        tokens: self.pending.len(),
                    }));
                }
            }
        }
    }
}
