// src/bin/gen_lex_tables.rs
// Writes the built-in LangB token specification and a dump of its compiled
// automata under tables/.
use std::{fs, path::Path};

use anyhow::Result;
use langblex::{
    LexerConfig, build_tables,
    lexer::tables::{save_automaton_json, save_config_json},
};

fn main() -> Result<()> {
    let cfg = LexerConfig::langb();
    println!(
        "[gen_lex_tables] building automata for {} token kinds...",
        cfg.tokens.len()
    );
    let tables = build_tables(&cfg)?;

    let dir = Path::new("tables");
    fs::create_dir_all(dir)?;

    let cfg_path = dir.join("langb.config.json");
    save_config_json(&cfg_path, &cfg)?;
    println!("[gen_lex_tables] wrote {}", cfg_path.display());

    let view_path = dir.join("langb.automaton.json");
    save_automaton_json(&view_path, &tables)?;
    println!(
        "[gen_lex_tables] wrote {} (nfa={} states, dfa={} states)",
        view_path.display(),
        tables.nfa().len(),
        tables.dfa().len()
    );
    Ok(())
}
