// src/lexer/tables/nfa.rs
//! Thompson-style NFA fragments over a private state arena.
//!
//! States refer to each other by [`StateId`] (an index into the owning
//! arena), so Kleene back-edges and shared epsilon targets are plain indices
//! rather than owning references. The arena length is the id generator: a
//! builder hands out `q0, q1, ...` for the duration of one build and shares
//! nothing with any other builder.

use std::{collections::BTreeMap, fmt};

use hashbrown::HashSet;

use super::tokens::{KindId, Pattern, TokenSpec};
use crate::error::{LexError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl StateId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Edge label. `Epsilon` sorts before every character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => f.write_str("ε"),
            Symbol::Char(c) => write!(f, "{}", c.escape_debug()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfaState {
    /// Display name override (`q<KIND>` for tagged accepting states).
    pub label: Option<String>,
    /// Symbol -> targets, insertion ordered and duplicate free.
    pub edges: BTreeMap<Symbol, Vec<StateId>>,
    pub accepting: bool,
    /// Only meaningful when `accepting`.
    pub kind: Option<KindId>,
}

impl NfaState {
    pub fn targets(&self, sym: Symbol) -> &[StateId] {
        self.edges.get(&sym).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The resolved kind of an accepting state; `None` otherwise.
    pub fn accept_kind(&self) -> Option<KindId> {
        if self.accepting { self.kind } else { None }
    }
}

/// A sub-automaton with one entry and one accepting exit.
///
/// Not `Clone`: combinators take their operands by value, so a fragment
/// cannot be wired into two places by accident.
#[derive(Debug, PartialEq, Eq)]
pub struct Fragment {
    start: StateId,
    accept: StateId,
}

impl Fragment {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }
}

#[derive(Debug, Default)]
pub struct NfaBuilder {
    states: Vec<NfaState>,
}

impl NfaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id.idx()]
    }

    /// Allocates a fresh, unconnected state.
    pub fn fresh(&mut self) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(NfaState::default());
        id
    }

    pub fn edge(&mut self, from: StateId, sym: Symbol, to: StateId) {
        let targets = self.states[from.idx()].edges.entry(sym).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    fn set_accepting(&mut self, id: StateId, accepting: bool) {
        self.states[id.idx()].accepting = accepting;
    }

    pub fn literal(&mut self, c: char) -> Fragment {
        let start = self.fresh();
        let accept = self.fresh();
        self.edge(start, Symbol::Char(c), accept);
        self.set_accepting(accept, true);
        Fragment { start, accept }
    }

    pub fn concat(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.edge(a.accept, Symbol::Epsilon, b.start);
        self.set_accepting(a.accept, false);
        Fragment {
            start: a.start,
            accept: b.accept,
        }
    }

    pub fn union(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let start = self.fresh();
        let accept = self.fresh();
        self.join(start, accept, [a, b]);
        Fragment { start, accept }
    }

    /// N-ary union under one fresh start/accept pair.
    pub fn union_all<I>(&mut self, fragments: I) -> Result<Fragment>
    where
        I: IntoIterator<Item = Fragment>,
    {
        let mut fragments = fragments.into_iter().peekable();
        if fragments.peek().is_none() {
            return Err(LexError::spec("union of an empty fragment list"));
        }
        let start = self.fresh();
        let accept = self.fresh();
        self.join(start, accept, fragments);
        Ok(Fragment { start, accept })
    }

    fn join(&mut self, start: StateId, accept: StateId, parts: impl IntoIterator<Item = Fragment>) {
        for part in parts {
            self.edge(start, Symbol::Epsilon, part.start);
            self.edge(part.accept, Symbol::Epsilon, accept);
            self.set_accepting(part.accept, false);
        }
        self.set_accepting(accept, true);
    }

    pub fn star(&mut self, a: Fragment) -> Fragment {
        let start = self.fresh();
        let accept = self.fresh();
        self.edge(start, Symbol::Epsilon, accept);
        self.edge(start, Symbol::Epsilon, a.start);
        self.edge(a.accept, Symbol::Epsilon, start);
        self.edge(a.accept, Symbol::Epsilon, accept);
        self.set_accepting(a.accept, false);
        self.set_accepting(accept, true);
        Fragment { start, accept }
    }

    pub fn literal_chain(&mut self, text: &str) -> Result<Fragment> {
        let mut chars = text.chars();
        let first = chars
            .next()
            .ok_or_else(|| LexError::spec("empty literal"))?;
        let mut frag = self.literal(first);
        for c in chars {
            let next = self.literal(c);
            frag = self.concat(frag, next);
        }
        Ok(frag)
    }

    fn union_of_chars(&mut self, chars: impl IntoIterator<Item = char>) -> Result<Fragment> {
        let parts: Vec<Fragment> = chars.into_iter().map(|c| self.literal(c)).collect();
        self.union_all(parts)
    }

    /// `[0-9]+` as `D · D*`.
    pub fn digit_run(&mut self) -> Result<Fragment> {
        let head = self.union_of_chars('0'..='9')?;
        let body = self.union_of_chars('0'..='9')?;
        let tail = self.star(body);
        Ok(self.concat(head, tail))
    }

    /// `"` (printable-but-not-quote)* `"`, as an explicit four-state chain.
    pub fn quoted_string(&mut self) -> Fragment {
        let start = self.fresh();
        let open = self.fresh();
        let body = self.fresh();
        let close = self.fresh();

        self.edge(start, Symbol::Char('"'), open);
        for c in (' '..='~').filter(|&c| c != '"') {
            self.edge(open, Symbol::Char(c), body);
            self.edge(body, Symbol::Char(c), body);
        }
        self.edge(body, Symbol::Char('"'), close);
        // ""
        self.edge(open, Symbol::Char('"'), close);

        self.set_accepting(close, true);
        Fragment {
            start,
            accept: close,
        }
    }

    /// `[a-zA-Z_][a-zA-Z0-9_]*`
    pub fn identifier(&mut self) -> Result<Fragment> {
        let letters = || ('a'..='z').chain('A'..='Z');
        let head = self.union_of_chars(letters().chain(['_']))?;
        let body = self.union_of_chars(letters().chain('0'..='9').chain(['_']))?;
        let tail = self.star(body);
        Ok(self.concat(head, tail))
    }

    pub fn rename(&mut self, id: StateId, label: impl Into<String>) {
        self.states[id.idx()].label = Some(label.into());
    }

    /// Renames the accepting state to `q<KIND>` and tags it with `kind`.
    pub fn tag(&mut self, frag: &Fragment, kind: KindId, label: &str) {
        self.rename(frag.accept, format!("q{label}"));
        self.states[frag.accept.idx()].kind = Some(kind);
    }

    /// Builds and tags the fragment for one specification.
    pub fn fragment_for(&mut self, spec: &TokenSpec, kind: KindId) -> Result<Fragment> {
        let frag = match &spec.pattern {
            Pattern::Literal(text) => self
                .literal_chain(text)
                .map_err(|_| LexError::spec(format!("empty literal for kind {}", spec.kind)))?,
            Pattern::Digits => self.digit_run()?,
            Pattern::String => self.quoted_string(),
            Pattern::Identifier => self.identifier()?,
        };
        self.tag(&frag, kind, &spec.kind);
        Ok(frag)
    }

    /// Moves every state of `other` into this arena and returns `frag`
    /// re-addressed to the new ids. Nothing already here is touched.
    pub fn absorb(&mut self, other: NfaBuilder, frag: Fragment) -> Fragment {
        let offset = self.states.len() as u32;
        let shift = |id: StateId| StateId(id.0 + offset);
        self.states.extend(other.states.into_iter().map(|mut st| {
            for targets in st.edges.values_mut() {
                for t in targets.iter_mut() {
                    *t = shift(*t);
                }
            }
            st
        }));
        Fragment {
            start: shift(frag.start),
            accept: shift(frag.accept),
        }
    }

    pub fn finish(self, start: StateId) -> Nfa {
        debug_assert!(start.idx() < self.states.len(), "start state outside arena");
        Nfa {
            start,
            states: self.states,
        }
    }
}

/// A finished automaton: start state plus its owning arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    start: StateId,
    states: Vec<NfaState>,
}

impl Nfa {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id.idx()]
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &NfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, st)| (StateId(i as u32), st))
    }

    pub fn name(&self, id: StateId) -> String {
        match &self.state(id).label {
            Some(label) => label.clone(),
            None => id.to_string(),
        }
    }

    /// States reachable from the start, in depth-first discovery order.
    pub fn reachable(&self) -> Vec<StateId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![self.start];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            for targets in self.state(id).edges.values() {
                stack.extend(targets.iter().rev().copied().filter(|t| !seen.contains(t)));
            }
        }
        order
    }
}
