//! Regex-to-automaton compiler and maximal-munch lexer for the LangB token set.
//!
//! Token specifications are compiled into Thompson NFA fragments, assembled
//! into one combined NFA, determinized by subset construction, and finally
//! driven over source text by [`lexer::cpu::Scanner`].

pub mod dev;
pub mod error;
pub mod lexer;

pub use error::{LexError, Result};
pub use lexer::{
    cpu::{Scanner, Token},
    tables::{LexerConfig, Pattern, Tables, TokenSpec, build_tables},
};
