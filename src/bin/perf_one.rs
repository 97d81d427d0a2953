// src/bin/perf_one.rs
use std::{env, fs, path::PathBuf, process, time::Instant};

use langblex::{LexerConfig, build_tables, dev::generator::gen_valid_source};
use rand::{SeedableRng, rngs::StdRng};

fn fmt_mib(bytes: u64) -> String {
    let mib = (bytes as f64) / (1024.0 * 1024.0);
    format!("{mib:.2} MiB")
}

fn throughput_mibs(bytes: u64, ms: f64) -> f64 {
    if ms <= 0.0 {
        return 0.0;
    }
    (bytes as f64) / (1024.0 * 1024.0) / (ms / 1_000.0)
}

fn parse_target_len() -> usize {
    // Default: 10,000,000 characters
    env::var("PERF_ONE_LEN")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000_000)
}

fn parse_seed() -> u64 {
    env::var("PERF_ONE_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42)
}

fn main() {
    // ---------------- tables ----------------
    let build_t0 = Instant::now();
    let tables = match build_tables(&LexerConfig::langb()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Building tables failed: {e}");
            process::exit(1);
        }
    };
    let build_ms = build_t0.elapsed().as_secs_f64() * 1e3;
    println!(
        "Build: {:.3} ms | nfa={} states | dfa={} states",
        build_ms,
        tables.nfa().len(),
        tables.dfa().len()
    );

    // If a path is supplied, we use it; otherwise we generate input in memory.
    let text = if let Some(path) = env::args().nth(1) {
        let p = PathBuf::from(path);
        let load_t0 = Instant::now();
        let src = match fs::read_to_string(&p) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", p.display());
                process::exit(2);
            }
        };
        let load_ms = load_t0.elapsed().as_secs_f64() * 1e3;
        let bytes = src.len() as u64;
        println!(
            "Input: file={}  ({} | {} bytes)",
            p.display(),
            fmt_mib(bytes),
            bytes
        );
        println!("Load:  {load_ms:.3} ms");
        src
    } else {
        let target_len = parse_target_len();
        let seed = parse_seed();
        let gen_t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let src = gen_valid_source(&mut rng, target_len);
        let gen_ms = gen_t0.elapsed().as_secs_f64() * 1e3;
        let bytes = src.len() as u64;
        println!(
            "Input: generated in-memory (len={} | {}) [seed={}]",
            bytes,
            fmt_mib(bytes),
            seed
        );
        println!("Gen:   {gen_ms:.3} ms");
        src
    };

    let bytes = text.len() as u64;

    // ---------------- scan ----------------
    let scan_t0 = Instant::now();
    let mut count = 0usize;
    for tok in tables.scan(&text) {
        if let Err(e) = tok {
            eprintln!("Scan failed: {e}");
            process::exit(1);
        }
        count += 1;
    }
    let scan_ms = scan_t0.elapsed().as_secs_f64() * 1e3;
    println!(
        "Scan:  {:.3} ms | tokens={} | throughput={:.1} MiB/s",
        scan_ms,
        count,
        throughput_mibs(bytes, scan_ms)
    );

    let total_ms = build_ms + scan_ms;
    println!(
        "Total: {:.3} ms | (build+scan) | throughput={:.1} MiB/s",
        total_ms,
        throughput_mibs(bytes, total_ms)
    );
}
