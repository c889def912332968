use thiserror::Error;

/// Errors raised while lexing or parsing a single formula.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormulaParseError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unmatched bracket at position {pos}")]
    UnmatchedBracket { pos: usize },

    #[error("expected atom, negation, or parenthesized expression at position {pos}")]
    EmptyPrimary { pos: usize },

    #[error("trailing garbage after formula at position {pos}: '{rest}'")]
    TrailingGarbage { pos: usize, rest: String },

    #[error("formula too long (max {limit} chars)")]
    TooLong { limit: usize },

    #[error("formula too deeply nested (max {limit} levels)")]
    TooDeep { limit: usize },
}

impl FormulaParseError {
    pub fn position(&self) -> usize {
        match self {
            FormulaParseError::UnexpectedChar { pos, .. }
            | FormulaParseError::UnmatchedBracket { pos }
            | FormulaParseError::EmptyPrimary { pos }
            | FormulaParseError::TrailingGarbage { pos, .. } => *pos,
            FormulaParseError::TooLong { .. } | FormulaParseError::TooDeep { .. } => 0,
        }
    }
}

/// Library-wide error for genuinely exceptional internal conditions.
///
/// Never used for ordinary validation failures — those are represented
/// as data in `ParseResult`/`ValidationResult`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Formula(#[from] FormulaParseError),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
