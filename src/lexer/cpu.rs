// src/lexer/cpu.rs
// Maximal-munch scanner driving the determinized tables.

use std::iter::FusedIterator;

use crate::{
    error::{LexError, Result},
    lexer::tables::{KindId, Pattern, Tables},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: KindId,
    /// Label of `kind`, e.g. `"SHOW"`.
    pub name: &'a str,
    pub lexeme: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
}

impl Token<'_> {
    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }

    pub fn end(&self) -> usize {
        self.start + self.lexeme.len()
    }
}

#[inline]
pub fn is_white(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Lazy token stream over one input.
///
/// Each call to `next` starts idle at the current offset, walks the DFA as
/// far as transitions allow while remembering the last accepting position,
/// then emits that longest match. The iterator yields at most one error and
/// is fused afterwards. [`Scanner::restart`] rewinds to offset zero.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    tables: &'a Tables,
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(tables: &'a Tables, input: &'a str) -> Self {
        Self {
            tables,
            input,
            pos: 0,
            failed: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn restart(&mut self) {
        self.pos = 0;
        self.failed = false;
    }

    /// End offset and kind of the longest accepted prefix at `from`.
    fn longest_match(&self, from: usize) -> Option<(usize, KindId)> {
        let dfa = self.tables.dfa();
        let mut state = dfa.start();
        let mut best = None;
        for (off, c) in self.input[from..].char_indices() {
            let Some(next) = dfa.step(state, c) else {
                break;
            };
            state = next;
            if let Some(kind) = dfa.accept(state) {
                best = Some((from + off + c.len_utf8(), kind));
            }
        }
        best
    }

    fn check_policy(&self, kind: KindId, lexeme: &str, start: usize) -> Result<()> {
        if let (Pattern::Identifier, Some(max)) =
            (self.tables.pattern(kind), self.tables.max_ident_len())
        {
            if lexeme.chars().count() > max {
                return Err(LexError::IdentifierLength {
                    lexeme: lexeme.to_owned(),
                    offset: start,
                    max,
                });
            }
        }
        Ok(())
    }

    fn fail(&mut self, err: LexError) -> Option<Result<Token<'a>>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && self.pos < self.input.len() {
            let start = self.pos;

            if let Some((end, kind)) = self.longest_match(start) {
                let lexeme = &self.input[start..end];
                if let Err(e) = self.check_policy(kind, lexeme, start) {
                    return self.fail(e);
                }
                self.pos = end;
                return Some(Ok(Token {
                    kind,
                    name: self.tables.kind_name(kind),
                    lexeme,
                    start,
                }));
            }

            let c = self.input[start..].chars().next()?;
            if is_white(c) {
                self.pos += c.len_utf8();
                continue;
            }
            return self.fail(LexError::UnrecognizedCharacter { ch: c, offset: start });
        }
        None
    }
}

impl FusedIterator for Scanner<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::{LexerConfig, TokenSpec, build_tables};

    fn kinds<'a>(toks: &[Token<'a>]) -> Vec<(&'a str, &'a str)> {
        toks.iter().map(|t| (t.name, t.lexeme)).collect()
    }

    fn show_semicolon() -> Tables {
        build_tables(&LexerConfig::new(vec![
            TokenSpec::literal("SHOW", "show"),
            TokenSpec::literal("SEMICOLON", ";"),
        ]))
        .unwrap()
    }

    #[test]
    fn keyword_beats_identifier() {
        let t = build_tables(&LexerConfig::new(vec![
            TokenSpec::literal("SHOW", "show"),
            TokenSpec::identifier("VAR"),
        ]))
        .unwrap();
        let toks = t.tokenize("show").unwrap();
        assert_eq!(kinds(&toks), vec![("SHOW", "show")]);
        assert_eq!(toks[0].start, 0);
    }

    #[test]
    fn whitespace_is_skipped() {
        let t = show_semicolon();
        let toks = t.tokenize("show   ;").unwrap();
        assert_eq!(kinds(&toks), vec![("SHOW", "show"), ("SEMICOLON", ";")]);
        assert_eq!(toks[1].start, 7);
    }

    #[test]
    fn unrecognized_character_stops_the_scan() {
        let t = show_semicolon();
        let mut scan = t.scan("show@;");
        assert_eq!(scan.next().unwrap().unwrap().lexeme, "show");
        assert_eq!(
            scan.next(),
            Some(Err(LexError::UnrecognizedCharacter { ch: '@', offset: 4 }))
        );
        assert_eq!(scan.next(), None);
        assert_eq!(scan.next(), None);
    }

    #[test]
    fn longest_match_wins_over_shorter_prefix() {
        let t = build_tables(&LexerConfig::new(vec![
            TokenSpec::literal("EQ", "="),
            TokenSpec::literal("EQEQ", "=="),
        ]))
        .unwrap();
        let toks = t.tokenize("===").unwrap();
        assert_eq!(kinds(&toks), vec![("EQEQ", "=="), ("EQ", "=")]);
    }

    #[test]
    fn backtracks_to_last_accepting_offset() {
        // "ab" is a prefix of "abcd" but not accepted; the scan must fall
        // back to "a" and resume right after it.
        let t = build_tables(&LexerConfig::new(vec![
            TokenSpec::literal("A", "a"),
            TokenSpec::literal("ABCD", "abcd"),
            TokenSpec::literal("B", "b"),
        ]))
        .unwrap();
        let toks = t.tokenize("abc").err();
        assert_eq!(toks, Some(LexError::UnrecognizedCharacter { ch: 'c', offset: 2 }));
        let toks = t.tokenize("ab abcd").unwrap();
        assert_eq!(kinds(&toks), vec![("A", "a"), ("B", "b"), ("ABCD", "abcd")]);
    }

    #[test]
    fn lone_underscore_beats_identifier_but_not_longer_names() {
        let t = build_tables(&LexerConfig::langb()).unwrap();
        let names: Vec<&str> = t.tokenize("_ _x x_").unwrap().iter().map(|tok| tok.name).collect();
        assert_eq!(names, ["UNDERSCORE", "VAR", "VAR"]);
    }

    #[test]
    fn every_literal_round_trips() {
        let t = build_tables(&LexerConfig::langb()).unwrap();
        for spec in &t.config().tokens {
            if let Pattern::Literal(text) = &spec.pattern {
                let toks = t.tokenize(text).unwrap();
                assert_eq!(toks.len(), 1, "{text}");
                assert_eq!(toks[0].lexeme, text);
                assert_eq!(toks[0].name, spec.kind);
            }
        }
    }

    #[test]
    fn identifier_length_boundary() {
        let t = build_tables(&LexerConfig::langb()).unwrap();
        let ok = "a".repeat(30);
        let toks = t.tokenize(&ok).unwrap();
        assert_eq!(kinds(&toks), vec![("VAR", ok.as_str())]);

        let long = format!("x {}", "b".repeat(31));
        let err = t.tokenize(&long).unwrap_err();
        assert_eq!(
            err,
            LexError::IdentifierLength {
                lexeme: "b".repeat(31),
                offset: 2,
                max: 30,
            }
        );
    }

    #[test]
    fn length_policy_ignores_non_identifiers() {
        let t = build_tables(&LexerConfig::langb()).unwrap();
        let digits = "9".repeat(64);
        let toks = t.tokenize(&digits).unwrap();
        assert_eq!(kinds(&toks), vec![("NUM", digits.as_str())]);
    }

    #[test]
    fn langb_statement() {
        let t = build_tables(&LexerConfig::langb()).unwrap();
        let src = "num x = 12+y3;\nshow \"hi there\";\ntext s=\"\";";
        let toks = t.tokenize(src).unwrap();
        assert_eq!(
            kinds(&toks),
            vec![
                ("NUMKW", "num"),
                ("VAR", "x"),
                ("EQ", "="),
                ("NUM", "12"),
                ("PLUS", "+"),
                ("VAR", "y3"),
                ("SEMICOLON", ";"),
                ("SHOW", "show"),
                ("STRING", "\"hi there\""),
                ("SEMICOLON", ";"),
                ("TEXT", "text"),
                ("VAR", "s"),
                ("EQ", "="),
                ("STRING", "\"\""),
                ("SEMICOLON", ";"),
            ]
        );
    }

    #[test]
    fn restart_replays_from_zero() {
        let t = show_semicolon();
        let mut scan = t.scan("show ;");
        let first: Vec<_> = scan.by_ref().collect();
        assert!(scan.next().is_none());
        scan.restart();
        let second: Vec<_> = scan.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        let t = show_semicolon();
        assert!(t.tokenize("").unwrap().is_empty());
        assert!(t.tokenize(" \t\r\n ").unwrap().is_empty());
    }

    #[test]
    fn unterminated_string_is_an_error_at_the_quote() {
        let t = build_tables(&LexerConfig::langb()).unwrap();
        let err = t.tokenize("show \"abc").unwrap_err();
        assert_eq!(err, LexError::UnrecognizedCharacter { ch: '"', offset: 5 });
    }

    #[test]
    fn non_ascii_is_unrecognized() {
        let t = build_tables(&LexerConfig::langb()).unwrap();
        let err = t.tokenize("x é").unwrap_err();
        assert_eq!(err, LexError::UnrecognizedCharacter { ch: 'é', offset: 2 });
    }
}
