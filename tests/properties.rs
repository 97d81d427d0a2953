//! Property tests over the LangB tables.

use langblex::{
    LexError, LexerConfig, Tables, build_tables,
    dev::reference::lex_reference,
    lexer::tables::{epsilon_closure, nfa::StateId},
};
use proptest::prelude::*;
use std::sync::OnceLock;

fn langb() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| build_tables(&LexerConfig::langb()).expect("langb tables"))
}

proptest! {
    #[test]
    fn scanner_agrees_with_reference(src in "[ -~\t\n]{0,64}") {
        let t = langb();
        let got: Result<Vec<_>, LexError> = t
            .tokenize(&src)
            .map(|toks| toks.iter().map(|tok| (tok.kind, tok.start, tok.len())).collect());
        prop_assert_eq!(got, lex_reference(t.config(), &src));
    }

    #[test]
    fn identifiers_within_limit_are_single_tokens(name in "[a-zA-Z_][a-zA-Z0-9_]{0,29}") {
        let t = langb();
        let toks = t.tokenize(&name).unwrap();
        prop_assert_eq!(toks.len(), 1);
        prop_assert_eq!(toks[0].lexeme, name.as_str());
        let kw = ["num", "text", "true", "false", "show"];
        let expected = match name.as_str() {
            "num" => "NUMKW",
            "_" => "UNDERSCORE",
            n if kw.contains(&n) => n,
            _ => "VAR",
        };
        prop_assert!(toks[0].name.eq_ignore_ascii_case(expected));
    }

    #[test]
    fn digit_runs_are_one_token(digits in "[0-9]{1,40}") {
        let toks = langb().tokenize(&digits).unwrap();
        prop_assert_eq!(toks.len(), 1);
        prop_assert_eq!(toks[0].name, "NUM");
    }

    #[test]
    fn strings_are_one_token(body in "[ !#-~]{0,40}") {
        let src = format!("\"{body}\"");
        let toks = langb().tokenize(&src).unwrap();
        prop_assert_eq!(toks.len(), 1);
        prop_assert_eq!(toks[0].name, "STRING");
        prop_assert_eq!(toks[0].lexeme, src.as_str());
    }

    #[test]
    fn closure_is_idempotent_on_random_subsets(picks in proptest::collection::vec(any::<u32>(), 0..8)) {
        let nfa = langb().nfa();
        let seed: Vec<StateId> = picks.iter().map(|p| StateId(p % nfa.len() as u32)).collect();
        let once = epsilon_closure(nfa, seed.iter().copied());
        let twice = epsilon_closure(nfa, once.iter().copied());
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn dfa_is_deterministic_and_subsets_unique() {
    let dfa = langb().dfa();
    let mut subsets: Vec<&Vec<StateId>> = dfa.states().iter().map(|s| &s.subset).collect();
    subsets.sort();
    subsets.dedup();
    assert_eq!(subsets.len(), dfa.len());
    for st in dfa.states() {
        // BTreeMap keys are unique, so one target per symbol.
        for &to in st.next.values() {
            assert!((to as usize) < dfa.len());
        }
    }
}
