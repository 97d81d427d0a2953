// src/dev/reference.rs
// Naive rule-by-rule matcher used as an oracle for the DFA scanner. Every
// rule is tried at the current offset; the longest match wins and equal
// lengths go to the earlier rule.

use crate::{
    error::{LexError, Result},
    lexer::{
        cpu::is_white,
        tables::{KindId, LexerConfig, Pattern},
    },
};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte length of the longest prefix of `rest` matched by `pattern`.
pub fn match_len(pattern: &Pattern, rest: &str) -> Option<usize> {
    match pattern {
        Pattern::Literal(text) => rest.starts_with(text.as_str()).then_some(text.len()),
        Pattern::Digits => {
            let n = rest.bytes().take_while(u8::is_ascii_digit).count();
            (n > 0).then_some(n)
        }
        Pattern::String => {
            let body = rest.strip_prefix('"')?;
            for (i, c) in body.char_indices() {
                match c {
                    '"' => return Some(i + 2),
                    ' '..='~' => {}
                    _ => return None,
                }
            }
            None
        }
        Pattern::Identifier => {
            let mut chars = rest.chars();
            if !chars.next().is_some_and(is_ident_start) {
                return None;
            }
            Some(1 + chars.take_while(|&c| is_ident_continue(c)).count())
        }
    }
}

/// `(kind, start, len)` for every token of `input`.
pub fn lex_reference(cfg: &LexerConfig, input: &str) -> Result<Vec<(KindId, usize, usize)>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        let mut best: Option<(usize, KindId)> = None;
        for (i, spec) in cfg.tokens.iter().enumerate() {
            if let Some(n) = match_len(&spec.pattern, rest) {
                if best.is_none_or(|(len, _)| n > len) {
                    best = Some((n, KindId(i as u32)));
                }
            }
        }

        match best {
            Some((len, kind)) => {
                if let (Pattern::Identifier, Some(max)) =
                    (&cfg.tokens[kind.idx()].pattern, cfg.max_ident_len)
                {
                    if len > max {
                        return Err(LexError::IdentifierLength {
                            lexeme: rest[..len].to_owned(),
                            offset: pos,
                            max,
                        });
                    }
                }
                out.push((kind, pos, len));
                pos += len;
            }
            None => {
                let c = rest.chars().next().unwrap_or_default();
                if !is_white(c) {
                    return Err(LexError::UnrecognizedCharacter { ch: c, offset: pos });
                }
                pos += c.len_utf8();
            }
        }
    }
    Ok(out)
}
