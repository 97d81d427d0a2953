// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    Tables,
    dfa::Dfa,
    nfa::{Nfa, Symbol},
    tokens::LexerConfig,
};

#[derive(Error, Debug)]
pub enum IoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Lex(#[from] crate::error::LexError),
}

// -------------------- lexer configuration --------------------

pub fn load_config_json_bytes(data: &[u8]) -> Result<LexerConfig, IoError> {
    let cfg: LexerConfig = serde_json::from_slice(data)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config_json(path: &Path) -> Result<LexerConfig, IoError> {
    let data = std::fs::read(path)?;
    log::debug!("Loading lexer config from: {}", path.display());
    load_config_json_bytes(&data)
}

pub fn save_config_json(path: &Path, cfg: &LexerConfig) -> Result<(), IoError> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, cfg)?;
    w.flush()?;
    Ok(())
}

// -------------------- diagnostic automaton view --------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    /// `"ε"` for epsilon edges, otherwise the character.
    pub symbol: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateView {
    pub name: String,
    pub accepting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// NFA members of a DFA state; absent for NFA states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset: Option<Vec<String>>,
    pub edges: Vec<EdgeView>,
}

/// Read-only snapshot of both automata, for reporting. Only reachable NFA
/// states are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonView {
    pub nfa_start: String,
    pub nfa: Vec<StateView>,
    pub dfa_start: String,
    pub dfa: Vec<StateView>,
}

impl AutomatonView {
    pub fn from_tables(t: &Tables) -> Self {
        Self {
            nfa_start: t.nfa().name(t.nfa().start()),
            nfa: nfa_view(t, t.nfa()),
            dfa_start: Dfa::name(t.dfa().start()),
            dfa: dfa_view(t, t.dfa()),
        }
    }
}

fn nfa_view(t: &Tables, nfa: &Nfa) -> Vec<StateView> {
    nfa.reachable()
        .into_iter()
        .map(|id| {
            let st = nfa.state(id);
            StateView {
                name: nfa.name(id),
                accepting: st.accepting,
                kind: st.accept_kind().map(|k| t.kind_name(k).to_owned()),
                subset: None,
                edges: st
                    .edges
                    .iter()
                    .map(|(sym, targets)| EdgeView {
                        symbol: sym.to_string(),
                        targets: targets.iter().map(|&to| nfa.name(to)).collect(),
                    })
                    .collect(),
            }
        })
        .collect()
}

fn dfa_view(t: &Tables, dfa: &Dfa) -> Vec<StateView> {
    dfa.states()
        .iter()
        .enumerate()
        .map(|(i, st)| StateView {
            name: Dfa::name(i as u32),
            accepting: st.is_accepting(),
            kind: st.accept.map(|k| t.kind_name(k).to_owned()),
            subset: Some(st.subset.iter().map(|&s| t.nfa().name(s)).collect()),
            edges: st
                .next
                .iter()
                .map(|(&c, &to)| EdgeView {
                    symbol: Symbol::Char(c).to_string(),
                    targets: vec![Dfa::name(to)],
                })
                .collect(),
        })
        .collect()
}

pub fn save_automaton_json(path: &Path, t: &Tables) -> Result<(), IoError> {
    let instant = Instant::now();
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &AutomatonView::from_tables(t))?;
    w.flush()?;
    log::debug!(
        "Saved automaton view to {} in {} ms",
        path.display(),
        instant.elapsed().as_millis()
    );
    Ok(())
}
