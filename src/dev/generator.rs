// src/dev/generator.rs
// Random-but-valid LangB sources. Every emitted token is followed by
// whitespace, so neighbours never fuse into one longer token.

use rand::Rng;

const KEYWORDS: &[&str] = &["num", "text", "true", "false", "show"];
const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", ">", "<", "=", "!", "@", "#", "$", "%", "&", "?", "|", ";",
];
const IDENT_HEAD: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
const IDENT_BODY: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=12usize);
    out.push(IDENT_HEAD[rng.random_range(0..IDENT_HEAD.len())] as char);
    for _ in 1..len {
        out.push(IDENT_BODY[rng.random_range(0..IDENT_BODY.len())] as char);
    }
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=9usize);
    for _ in 0..len {
        out.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
}

fn push_string<R: Rng>(rng: &mut R, out: &mut String) {
    out.push('"');
    let len = rng.random_range(0..=16usize);
    for _ in 0..len {
        let c = loop {
            let c = char::from(rng.random_range(b' '..=b'~'));
            if c != '"' {
                break c;
            }
        };
        out.push(c);
    }
    out.push('"');
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    out.push(match rng.random_range(0u32..8) {
        0 => '\n',
        1 => '\t',
        2 => '\r',
        _ => ' ',
    });
}

/// Produces at least `target_len` bytes of whitespace-separated LangB tokens.
pub fn gen_valid_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + 32);

    while out.len() < target_len {
        let roll = rng.random_range(0u32..100);

        match roll {
            0..=29 => push_ident(rng, &mut out),
            30..=44 => push_int(rng, &mut out),
            45..=54 => push_string(rng, &mut out),
            55..=69 => out.push_str(pick(rng, KEYWORDS)),
            70..=99 => out.push_str(pick(rng, OPERATORS)),
            _ => unreachable!(),
        }
        push_ws(rng, &mut out);
    }

    out
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn reaches_target_length_and_stays_ascii() {
        let mut rng = StdRng::seed_from_u64(7);
        for target in [0usize, 1, 17, 500] {
            let src = gen_valid_source(&mut rng, target);
            assert!(src.len() >= target);
            assert!(src.is_ascii());
        }
    }
}
