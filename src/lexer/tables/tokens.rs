// src/lexer/tables/tokens.rs
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::{LexError, Result};

/// Index of the declaring specification.
///
/// Doubles as the declaration priority: when several accepting NFA states
/// meet in one DFA state, the smallest `KindId` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindId(pub u32);

impl KindId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Pattern class of one token specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Exact text, e.g. a keyword or an operator.
    Literal(String),
    /// `[0-9]+`
    Digits,
    /// `"[^"]*"` over printable ASCII.
    String,
    /// `[a-zA-Z_][a-zA-Z0-9_]*`
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub kind: String,
    pub pattern: Pattern,
}

impl TokenSpec {
    pub fn literal(kind: &str, text: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            pattern: Pattern::Literal(text.to_owned()),
        }
    }

    pub fn digits(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            pattern: Pattern::Digits,
        }
    }

    pub fn string(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            pattern: Pattern::String,
        }
    }

    pub fn identifier(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            pattern: Pattern::Identifier,
        }
    }
}

/// Identifier length bound of the LangB grammar (`[a-zA-Z_][a-zA-Z0-9_]{0,29}`).
pub const LANGB_MAX_IDENT: usize = 30;

/// Ordered token specifications plus the scan-time identifier policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerConfig {
    pub tokens: Vec<TokenSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ident_len: Option<usize>,
}

impl LexerConfig {
    pub fn new(tokens: Vec<TokenSpec>) -> Self {
        Self {
            tokens,
            max_ident_len: None,
        }
    }

    pub fn with_max_ident_len(mut self, max: usize) -> Self {
        self.max_ident_len = Some(max);
        self
    }

    /// The LangB token set. Every literal, `UNDERSCORE` included, is declared
    /// before `VAR` so it wins over the identifier pattern on equal-length
    /// matches. Longer identifiers such as `_x` still scan as `VAR`.
    pub fn langb() -> Self {
        let tokens = vec![
            TokenSpec::digits("NUM"),
            TokenSpec::string("STRING"),
            TokenSpec::literal("NUMKW", "num"),
            TokenSpec::literal("TEXT", "text"),
            TokenSpec::literal("FALSE", "false"),
            TokenSpec::literal("TRUE", "true"),
            TokenSpec::literal("SHOW", "show"),
            TokenSpec::literal("PLUS", "+"),
            TokenSpec::literal("MINUS", "-"),
            TokenSpec::literal("MPY", "*"),
            TokenSpec::literal("DIV", "/"),
            TokenSpec::literal("GT", ">"),
            TokenSpec::literal("LT", "<"),
            TokenSpec::literal("EQ", "="),
            TokenSpec::literal("EXC", "!"),
            TokenSpec::literal("AT", "@"),
            TokenSpec::literal("HASH", "#"),
            TokenSpec::literal("DOLLAR", "$"),
            TokenSpec::literal("PCT", "%"),
            TokenSpec::literal("AMPERSAND", "&"),
            TokenSpec::literal("QUESTION", "?"),
            TokenSpec::literal("PIPE", "|"),
            TokenSpec::literal("SEMICOLON", ";"),
            TokenSpec::literal("UNDERSCORE", "_"),
            TokenSpec::identifier("VAR"),
        ];
        Self::new(tokens).with_max_ident_len(LANGB_MAX_IDENT)
    }

    /// Checks the invariants the builders rely on: at least one spec, unique
    /// non-empty kind labels, non-empty literals.
    pub fn validate(&self) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(LexError::spec("no token specifications"));
        }
        if self.tokens.len() > u32::MAX as usize {
            return Err(LexError::spec("too many token specifications"));
        }
        let mut seen = HashSet::with_capacity(self.tokens.len());
        for spec in &self.tokens {
            if spec.kind.is_empty() {
                return Err(LexError::spec("empty token kind label"));
            }
            if !seen.insert(spec.kind.as_str()) {
                return Err(LexError::spec(format!("duplicate token kind {}", spec.kind)));
            }
            if let Pattern::Literal(text) = &spec.pattern {
                if text.is_empty() {
                    return Err(LexError::spec(format!("empty literal for kind {}", spec.kind)));
                }
            }
        }
        if self.max_ident_len == Some(0) {
            return Err(LexError::spec("max_ident_len must be at least 1"));
        }
        Ok(())
    }

    pub fn kind_id(&self, name: &str) -> Option<KindId> {
        self.tokens
            .iter()
            .position(|t| t.kind == name)
            .map(|i| KindId(i as u32))
    }
}
