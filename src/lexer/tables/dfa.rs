// src/lexer/tables/dfa.rs
//! Subset construction.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use hashbrown::{HashMap, HashSet};

use super::{
    nfa::{Nfa, StateId, Symbol},
    tokens::KindId,
};

/// Index into [`Dfa::states`]. The start state is always 0.
pub type DfaId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    /// Canonical (sorted, duplicate-free) NFA subset this state stands for.
    pub subset: Vec<StateId>,
    pub next: BTreeMap<char, DfaId>,
    /// Resolved kind; `Some` iff the state is accepting.
    pub accept: Option<KindId>,
}

impl DfaState {
    pub fn is_accepting(&self) -> bool {
        self.accept.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    pub const START: DfaId = 0;

    pub fn start(&self) -> DfaId {
        Self::START
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: DfaId) -> &DfaState {
        &self.states[id as usize]
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    #[inline]
    pub fn step(&self, from: DfaId, c: char) -> Option<DfaId> {
        self.states[from as usize].next.get(&c).copied()
    }

    #[inline]
    pub fn accept(&self, id: DfaId) -> Option<KindId> {
        self.states[id as usize].accept
    }

    pub fn name(id: DfaId) -> String {
        format!("D{id}")
    }
}

fn canonical(set: HashSet<StateId>) -> Vec<StateId> {
    let mut v: Vec<StateId> = set.into_iter().collect();
    v.sort_unstable();
    v
}

/// Every state reachable from `seed` through epsilon edges alone, `seed`
/// included, in canonical order.
pub fn epsilon_closure(nfa: &Nfa, seed: impl IntoIterator<Item = StateId>) -> Vec<StateId> {
    let mut closure: HashSet<StateId> = HashSet::new();
    let mut work = Vec::new();
    for s in seed {
        if closure.insert(s) {
            work.push(s);
        }
    }
    while let Some(s) = work.pop() {
        for &t in nfa.state(s).targets(Symbol::Epsilon) {
            if closure.insert(t) {
                work.push(t);
            }
        }
    }
    canonical(closure)
}

/// States reached from any member of `subset` by consuming `c`.
pub fn move_on(nfa: &Nfa, subset: &[StateId], c: char) -> Vec<StateId> {
    let mut out: HashSet<StateId> = HashSet::new();
    for &s in subset {
        out.extend(nfa.state(s).targets(Symbol::Char(c)).iter().copied());
    }
    canonical(out)
}

fn local_alphabet(nfa: &Nfa, subset: &[StateId]) -> BTreeSet<char> {
    let mut alphabet = BTreeSet::new();
    for &s in subset {
        for sym in nfa.state(s).edges.keys() {
            if let Symbol::Char(c) = sym {
                alphabet.insert(*c);
            }
        }
    }
    alphabet
}

/// Earliest-declared accepting member wins.
fn resolve_accept(nfa: &Nfa, subset: &[StateId]) -> Option<KindId> {
    subset
        .iter()
        .filter_map(|&s| {
            let st = nfa.state(s);
            debug_assert!(
                !st.accepting || st.kind.is_some(),
                "accepting NFA state {s} carries no token kind"
            );
            st.accept_kind()
        })
        .min()
}

/// Converts `nfa` into an equivalent DFA. Subsets are interned by their
/// canonical form, so two paths reaching the same subset share one state.
pub fn determinize(nfa: &Nfa) -> Dfa {
    let mut states: Vec<DfaState> = Vec::new();
    let mut interned: HashMap<Vec<StateId>, DfaId> = HashMap::new();
    let mut queue: VecDeque<DfaId> = VecDeque::new();

    let start = epsilon_closure(nfa, [nfa.start()]);
    interned.insert(start.clone(), 0);
    states.push(DfaState {
        accept: resolve_accept(nfa, &start),
        subset: start,
        next: BTreeMap::new(),
    });
    queue.push_back(0);

    while let Some(id) = queue.pop_front() {
        let alphabet = local_alphabet(nfa, &states[id as usize].subset);
        for c in alphabet {
            let moved = move_on(nfa, &states[id as usize].subset, c);
            if moved.is_empty() {
                continue;
            }
            let dest = epsilon_closure(nfa, moved);
            let to = match interned.get(&dest) {
                Some(&to) => to,
                None => {
                    let to = states.len() as DfaId;
                    log::trace!("[dfa] {} = {:?}", Dfa::name(to), dest);
                    interned.insert(dest.clone(), to);
                    states.push(DfaState {
                        accept: resolve_accept(nfa, &dest),
                        subset: dest,
                        next: BTreeMap::new(),
                    });
                    queue.push_back(to);
                    to
                }
            };
            states[id as usize].next.insert(c, to);
        }
    }

    Dfa { states }
}
