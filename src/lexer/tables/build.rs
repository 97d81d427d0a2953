// src/lexer/tables/build.rs
use std::time::Instant;

use rayon::prelude::*;

use super::{
    Tables,
    dfa::determinize,
    nfa::{Fragment, Nfa, NfaBuilder, Symbol},
    tokens::{KindId, LexerConfig, TokenSpec},
};
use crate::error::{LexError, Result};

/// Builds one tagged fragment per spec and hangs them all off a fresh
/// `q_start` with epsilon edges.
///
/// Fragments are built in parallel, each in its own arena, then spliced in
/// declaration order so state ids and priorities don't depend on scheduling.
pub fn build_nfa(specs: &[TokenSpec]) -> Result<Nfa> {
    if specs.is_empty() {
        return Err(LexError::spec("no token specifications"));
    }

    let parts: Vec<(NfaBuilder, Fragment)> = specs
        .par_iter()
        .enumerate()
        .map(|(i, spec)| {
            let mut b = NfaBuilder::new();
            let frag = b.fragment_for(spec, KindId(i as u32))?;
            Ok((b, frag))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut nfa = NfaBuilder::new();
    let start = nfa.fresh();
    nfa.rename(start, "q_start");
    for (sub, frag) in parts {
        let frag = nfa.absorb(sub, frag);
        nfa.edge(start, Symbol::Epsilon, frag.start());
    }
    Ok(nfa.finish(start))
}

pub fn build_tables(config: &LexerConfig) -> Result<Tables> {
    config.validate()?;

    let t0 = Instant::now();
    let nfa = build_nfa(&config.tokens)?;
    log::debug!(
        "[tables] nfa: {} specs -> {} states ({} ms)",
        config.tokens.len(),
        nfa.len(),
        t0.elapsed().as_millis()
    );

    let t1 = Instant::now();
    let dfa = determinize(&nfa);
    log::debug!(
        "[tables] dfa: {} states, {} accepting ({} ms)",
        dfa.len(),
        dfa.states().iter().filter(|s| s.is_accepting()).count(),
        t1.elapsed().as_millis()
    );

    Ok(Tables::new(nfa, dfa, config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::nfa::StateId;

    #[test]
    fn start_fans_out_to_every_fragment() {
        let specs = LexerConfig::langb().tokens;
        let nfa = build_nfa(&specs).unwrap();
        assert_eq!(nfa.name(nfa.start()), "q_start");
        let starts = nfa.state(nfa.start()).targets(Symbol::Epsilon);
        assert_eq!(starts.len(), specs.len());
        assert!(nfa.state(nfa.start()).edges.keys().all(|s| *s == Symbol::Epsilon));
    }

    #[test]
    fn every_fragment_keeps_its_own_accepting_state() {
        let specs = LexerConfig::langb().tokens;
        let nfa = build_nfa(&specs).unwrap();
        let mut tagged: Vec<(KindId, String)> = nfa
            .states()
            .filter(|(_, st)| st.accepting)
            .map(|(id, st)| (st.kind.unwrap(), nfa.name(id)))
            .collect();
        tagged.sort();
        assert_eq!(tagged.len(), specs.len());
        for (i, (kind, name)) in tagged.iter().enumerate() {
            assert_eq!(kind.idx(), i);
            assert_eq!(name, &format!("q{}", specs[i].kind));
        }
    }

    #[test]
    fn assembly_is_deterministic() {
        let specs = LexerConfig::langb().tokens;
        let a = build_nfa(&specs).unwrap();
        let b = build_nfa(&specs).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.reachable().len(), a.len());
    }

    #[test]
    fn fragments_are_spliced_in_declaration_order() {
        let nfa = build_nfa(&[TokenSpec::literal("A", "a"), TokenSpec::literal("B", "b")]).unwrap();
        assert_eq!(
            nfa.state(nfa.start()).targets(Symbol::Epsilon),
            &[StateId(1), StateId(3)]
        );
    }

    #[test]
    fn empty_specification_list_fails() {
        assert!(matches!(build_nfa(&[]), Err(LexError::Specification(_))));
    }

    #[test]
    fn build_tables_validates_first() {
        let cfg = LexerConfig::new(vec![
            TokenSpec::identifier("VAR"),
            TokenSpec::literal("VAR", "var"),
        ]);
        assert!(build_tables(&cfg).is_err());
    }

    #[test]
    fn tables_expose_the_automata_they_were_built_from() {
        let cfg = LexerConfig::new(vec![
            TokenSpec::literal("SHOW", "show"),
            TokenSpec::identifier("VAR"),
        ]);
        let t = build_tables(&cfg).unwrap();
        assert_eq!(t.config(), &cfg);
        assert_eq!(t.nfa().len(), build_nfa(&cfg.tokens).unwrap().len());
        let dfa = determinize(t.nfa());
        assert_eq!(t.dfa().len(), dfa.len());
        let show = t.dfa().states().iter().filter_map(|s| s.accept).min();
        assert_eq!(show.map(|k| t.kind_name(k)), Some("SHOW"));
    }
}
