//! Helpers shared by the sweep tests and the `fuzz_lex` binary.

pub mod generator;
pub mod reference;
