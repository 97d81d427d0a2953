//! Negative lexer tests: inputs the LangB tables must reject.

use langblex::{LexError, LexerConfig, Tables, build_tables};

fn langb() -> Tables {
    build_tables(&LexerConfig::langb()).expect("langb tables")
}

#[test]
fn unterminated_string_eof() {
    let t = langb();
    let src = "s=\"hello"; // missing closing quote
    assert_eq!(
        t.tokenize(src).unwrap_err(),
        LexError::UnrecognizedCharacter { ch: '"', offset: 2 }
    );
}

#[test]
fn newline_in_string() {
    let t = langb();
    let src = "s=\"hello\nworld\""; // newline inside string not allowed
    // No prefix of the broken string is a token, so the scanner backs off to
    // the opening quote.
    assert_eq!(
        t.tokenize(src).unwrap_err(),
        LexError::UnrecognizedCharacter { ch: '"', offset: 2 }
    );
}

#[test]
fn unknown_symbol_after_keyword() {
    // '@' is a LangB token, so use a config that lacks it.
    let small = build_tables(&LexerConfig::new(vec![
        langblex::TokenSpec::literal("SHOW", "show"),
        langblex::TokenSpec::literal("SEMICOLON", ";"),
    ]))
    .unwrap();
    assert_eq!(
        small.tokenize("show@;").unwrap_err(),
        LexError::UnrecognizedCharacter { ch: '@', offset: 4 }
    );
}

#[test]
fn brackets_are_not_langb() {
    let t = langb();
    for (src, ch, offset) in [("f(x)", '(', 1), ("a[0]", '[', 1), ("{}", '{', 0), ("x ~ y", '~', 2)] {
        assert_eq!(
            t.tokenize(src).unwrap_err(),
            LexError::UnrecognizedCharacter { ch, offset },
            "{src:?}"
        );
    }
}

#[test]
fn overlong_identifier() {
    let t = langb();
    let name = "v".repeat(31);
    let src = format!("num {name} = 1;");
    match t.tokenize(&src) {
        Err(LexError::IdentifierLength { lexeme, offset, max }) => {
            assert_eq!(lexeme, name);
            assert_eq!(offset, 4);
            assert_eq!(max, 30);
        }
        other => panic!("expected identifier length error, got {other:?}"),
    }
}

#[test]
fn empty_literal_spec() {
    let cfg = LexerConfig::new(vec![langblex::TokenSpec::literal("NOTHING", "")]);
    assert!(matches!(build_tables(&cfg), Err(LexError::Specification(_))));
}
