// src/lexer/tables/mod.rs
pub mod build;
pub mod dfa;
pub mod io;
pub mod nfa;
pub mod tokens;

pub use build::{build_nfa, build_tables};
pub use dfa::{Dfa, DfaId, determinize, epsilon_closure, move_on};
pub use io::{AutomatonView, load_config_json, load_config_json_bytes, save_automaton_json, save_config_json};
pub use nfa::{Fragment, Nfa, NfaBuilder, StateId, Symbol};
pub use tokens::{KindId, LANGB_MAX_IDENT, LexerConfig, Pattern, TokenSpec};

use crate::{
    error::Result,
    lexer::cpu::{Scanner, Token},
};

/// A compiled lexer: the combined NFA, its DFA, and the configuration they
/// were built from. Read-only once built, so one `Tables` can back any
/// number of concurrent scans.
#[derive(Debug, Clone)]
pub struct Tables {
    nfa: Nfa,
    dfa: Dfa,
    config: LexerConfig,
}

impl Tables {
    pub(crate) fn new(nfa: Nfa, dfa: Dfa, config: LexerConfig) -> Self {
        Self { nfa, dfa, config }
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    pub fn kind_name(&self, kind: KindId) -> &str {
        &self.config.tokens[kind.idx()].kind
    }

    pub fn kind_id(&self, name: &str) -> Option<KindId> {
        self.config.kind_id(name)
    }

    pub fn pattern(&self, kind: KindId) -> &Pattern {
        &self.config.tokens[kind.idx()].pattern
    }

    pub fn max_ident_len(&self) -> Option<usize> {
        self.config.max_ident_len
    }

    /// Lazily scans `input` from offset zero.
    pub fn scan<'a>(&'a self, input: &'a str) -> Scanner<'a> {
        Scanner::new(self, input)
    }

    /// Scans all of `input`, stopping at the first error.
    pub fn tokenize<'a>(&'a self, input: &'a str) -> Result<Vec<Token<'a>>> {
        self.scan(input).collect()
    }
}
