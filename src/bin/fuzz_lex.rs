// src/bin/fuzz_lex.rs
// Generate big random-but-valid inputs, run the DFA scanner and the
// rule-by-rule reference matcher, compare.
//   - FUZZ_SAVE=1 and FUZZ_DIR=... save generated fuzz cases
//   - FUZZ_INPUT=path         replay a saved case
//   - FUZZ_EX=<files>         comma/colon-separated list of handcrafted .lan files
//   - FUZZ_EX_DIR=<dir>       directory of .lan files (default: "lexer_tests")
//   - FUZZ_CONFIG=path        token specification JSON (default: built-in LangB)
//
// Handcrafted cases may carry a sidecar golden file <case>.tokens.json with
// {"tokens":[{"kind":"...", "text":"..."}...]}; when present both streams
// must match it.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result, bail};
use langblex::{
    LexerConfig, Tables, build_tables,
    dev::{generator::gen_valid_source, reference::lex_reference},
    lexer::tables::{KindId, load_config_json},
};
use rand::{SeedableRng, rngs::StdRng};

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

// ------------------ goldens ------------------

#[derive(serde::Deserialize)]
struct Golden {
    tokens: Vec<GoldenTok>,
}
#[derive(serde::Deserialize)]
struct GoldenTok {
    kind: String,
    text: String,
}

fn load_golden_for(base_lan: &Path) -> Option<Golden> {
    let candidates = [
        base_lan.with_extension("tokens.json"),
        base_lan.with_extension("golden.json"),
    ];
    for p in candidates {
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            match serde_json::from_str::<Golden>(&s) {
                Ok(g) => return Some(g),
                Err(e) => {
                    eprintln!("[golden] failed to parse {}: {e}", p.display());
                    return None;
                }
            }
        }
    }
    None
}

fn check_against_golden(label: &str, got: &[(String, String)], golden: &Golden) -> bool {
    if got.len() != golden.tokens.len() {
        eprintln!(
            "[golden:{label}] count mismatch: got={} expected={}",
            got.len(),
            golden.tokens.len()
        );
        return false;
    }
    for (i, ((kind, text), exp)) in got.iter().zip(&golden.tokens).enumerate() {
        if *kind != exp.kind || *text != exp.text {
            eprintln!(
                "[golden:{label}] mismatch at {i}:\n  got:  kind={kind} text={text:?}\n  want: kind={} text={:?}",
                exp.kind, exp.text
            );
            return false;
        }
    }
    true
}

// ---------- run one (DFA vs reference [+ optional golden]) ----------

fn run_once(tables: &Tables, src: &str, label: &str, golden_for: Option<&Path>) -> bool {
    let t0 = Instant::now();
    let dfa = tables.tokenize(src).map(|toks| {
        toks.iter()
            .map(|t| (t.kind, t.start, t.len()))
            .collect::<Vec<_>>()
    });
    let t1 = Instant::now();
    let reference = lex_reference(tables.config(), src);
    let t2 = Instant::now();

    let eq = dfa == reference;
    eprintln!(
        "[{label}] dfa {} ms  |  reference {} ms  |  tokens = {}  -> {}",
        (t1 - t0).as_millis(),
        (t2 - t1).as_millis(),
        dfa.as_ref().map(Vec::len).unwrap_or(0),
        if eq { "OK" } else { "MISMATCH!" }
    );

    let mut ok = eq;
    if !eq {
        dump_divergence(tables, src, &dfa, &reference);
    }

    if let Some(p) = golden_for {
        match (load_golden_for(p), &dfa) {
            (Some(g), Ok(toks)) => ok &= check_against_golden(label, &named(tables, src, toks), &g),
            (Some(_), Err(e)) => {
                eprintln!("[golden:{label}] scanner failed: {e}");
                ok = false;
            }
            (None, _) => eprintln!("[golden] no sidecar found for {}", p.display()),
        }
    }
    ok
}

type Triples = Vec<(KindId, usize, usize)>;

fn named(tables: &Tables, src: &str, toks: &[(KindId, usize, usize)]) -> Vec<(String, String)> {
    toks.iter()
        .map(|&(k, start, len)| {
            (
                tables.kind_name(k).to_owned(),
                src[start..start + len].to_owned(),
            )
        })
        .collect()
}

fn dump_divergence(
    tables: &Tables,
    src: &str,
    dfa: &langblex::Result<Triples>,
    reference: &langblex::Result<Triples>,
) {
    match (dfa, reference) {
        (Ok(a), Ok(b)) => {
            let at = a
                .iter()
                .zip(b)
                .position(|(x, y)| x != y)
                .unwrap_or(a.len().min(b.len()));
            let lo = at.saturating_sub(2);
            eprintln!("--- context tokens [{lo}..{}) ---", at + 3);
            for i in lo..at + 3 {
                eprintln!(
                    "#{i:06} dfa={:?} reference={:?}",
                    a.get(i).map(|&t| named(tables, src, &[t])),
                    b.get(i).map(|&t| named(tables, src, &[t]))
                );
            }
        }
        _ => eprintln!("dfa={dfa:?}\nreference={reference:?}"),
    }
}

// ---------- handcrafted examples discovery ----------

fn collect_examples() -> Vec<PathBuf> {
    if let Ok(list) = std::env::var("FUZZ_EX") {
        let out: Vec<PathBuf> = list
            .split([',', ':'])
            .map(|part| PathBuf::from(part.trim()))
            .filter(|p| !p.as_os_str().is_empty() && p.exists())
            .collect();
        if !out.is_empty() {
            return out;
        }
    }

    let dir = std::env::var("FUZZ_EX_DIR").unwrap_or_else(|_| "lexer_tests".into());
    let Ok(rd) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = rd
        .flatten()
        .map(|ent| ent.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("lan"))
        })
        .collect();
    out.sort();
    out
}

// ---------- save / replay helpers ----------

#[derive(serde::Serialize)]
struct CaseMeta<'a> {
    unix_ts: u64,
    seed: u64,
    iter: usize,
    actual_bytes: usize,
    note: &'a str,
}

fn save_case(dir: &str, seed: u64, iter: usize, src: &str) -> Result<PathBuf> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let path = Path::new(dir).join(format!("case_s{seed}_i{iter}_n{}.lan", src.len()));
    fs::write(&path, src).with_context(|| format!("writing {}", path.display()))?;

    let meta = CaseMeta {
        unix_ts: ts,
        seed,
        iter,
        actual_bytes: src.len(),
        note: "Replay with: FUZZ_INPUT=<this file> cargo run --bin fuzz_lex",
    };
    fs::write(path.with_extension("json"), serde_json::to_string_pretty(&meta)?)?;
    Ok(path)
}

// ------------------ main ------------------

fn main() -> Result<()> {
    let config = match std::env::var("FUZZ_CONFIG") {
        Ok(path) => load_config_json(Path::new(&path))?,
        Err(_) => LexerConfig::langb(),
    };
    let tables = build_tables(&config)?;

    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let s = fs::read_to_string(&path).context("failed to read FUZZ_INPUT")?;
        if !run_once(&tables, &s, "replay", None) {
            bail!("replay mismatch");
        }
        return Ok(());
    }

    // --- HANDCRAFTED EXAMPLES (run before fuzzing) ---
    let examples = collect_examples();
    if !examples.is_empty() {
        eprintln!("[ex] running {} handcrafted example(s)…", examples.len());
        for (j, p) in examples.iter().enumerate() {
            let s = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            if !run_once(&tables, &s, &format!("ex {j}"), Some(p)) {
                bail!("example {} failed", p.display());
            }
        }
    }

    // --- FUZZ MODE ---
    let save_cases = std::env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let out_dir = std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".to_string());
    let len: usize = env_parse("FUZZ_LEN", 1_000_000);
    let iters: usize = env_parse("FUZZ_ITERS", 3);
    let seed: u64 = env_parse("FUZZ_SEED", 42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    if save_cases {
        fs::create_dir_all(&out_dir).with_context(|| format!("creating {out_dir}"))?;
    }

    for i in 0..iters {
        let s = gen_valid_source(&mut rng, len);
        eprintln!("[fuzz] iter {i}: generated {} bytes", s.len());

        if save_cases {
            let path = save_case(&out_dir, seed, i, &s)?;
            eprintln!("[save] wrote {}", path.display());
        }

        if !run_once(&tables, &s, &format!("fuzz {i}"), None) {
            bail!("iteration {i} diverged");
        }
    }
    eprintln!("[fuzz] all iterations matched ✅");
    Ok(())
}
