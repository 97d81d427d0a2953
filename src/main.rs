// src/main.rs
use std::{fs, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use langblex::{
    LexerConfig, Tables, build_tables,
    lexer::{
        statements::{StatementError, Statements},
        tables::{load_config_json, save_automaton_json},
    },
};
use tracing_subscriber::EnvFilter;

// A tiny sample covering keywords, identifiers, numbers, strings and operators.
const SAMPLE: &str = r#"
    num total = 12 + count * 3;
    text greeting = "hello, world";
    show greeting;
    show total > 40;
"#;

/// Lex LangB source with an automaton compiled from token specifications.
#[derive(Parser, Debug)]
#[command(name = "langblex", version, about, long_about = None)]
struct Cli {
    /// Source file to lex (defaults to a built-in sample)
    input: Option<PathBuf>,

    /// JSON token specification to use instead of the built-in LangB set
    #[arg(short, long, env = "LANGB_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum identifier length (overrides the configuration)
    #[arg(long, env = "LANGB_MAX_IDENT")]
    max_ident: Option<usize>,

    /// Write the NFA and DFA states/transitions to this JSON file
    #[arg(long, value_name = "OUT")]
    dump_automaton: Option<PathBuf>,

    /// Group tokens into statements ending in KIND
    #[arg(
        long,
        value_name = "KIND",
        num_args = 0..=1,
        default_missing_value = "SEMICOLON"
    )]
    statements: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

fn print_tokens(tables: &Tables, src: &str) -> Result<()> {
    println!("TOKENS:");
    for tok in tables.scan(src) {
        let tok = tok?;
        println!("{:<10} {:?}  @{}", tok.name, tok.lexeme, tok.start);
    }
    Ok(())
}

fn print_statements(tables: &Tables, src: &str, terminator: &str) -> Result<()> {
    let kind = tables
        .kind_id(terminator)
        .ok_or_else(|| anyhow!("unknown terminator kind {terminator}"))?;
    for (i, stmt) in Statements::new(tables.scan(src), kind).enumerate() {
        let stmt = match stmt {
            Ok(stmt) => stmt,
            Err(StatementError::Unterminated { start, tokens }) => {
                log::warn!("{tokens} trailing token(s) from offset {start} have no {terminator}");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        let rendered: Vec<String> = stmt
            .iter()
            .map(|t| format!("{}({})", t.name, t.lexeme))
            .collect();
        println!("[{i}] {}", rendered.join(" "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => load_config_json(path)
            .with_context(|| format!("loading token specification {}", path.display()))?,
        None => LexerConfig::langb(),
    };
    if let Some(max) = cli.max_ident {
        config.max_ident_len = Some(max);
    }

    let tables = build_tables(&config).context("building lexer tables")?;
    log::info!(
        "compiled {} token kinds: {} NFA states, {} DFA states",
        config.tokens.len(),
        tables.nfa().len(),
        tables.dfa().len()
    );

    if let Some(out) = &cli.dump_automaton {
        save_automaton_json(out, &tables)
            .with_context(|| format!("writing automaton view to {}", out.display()))?;
        log::info!("automaton view written to {}", out.display());
    }

    let src = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => SAMPLE.to_owned(),
    };

    match &cli.statements {
        Some(terminator) => print_statements(&tables, &src, terminator),
        None => print_tokens(&tables, &src),
    }
}
