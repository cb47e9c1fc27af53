//! # error.rs
//!
//! Error types for the calculator.
//!
//! [`EvalError`] describes why a canonical expression could not be turned into a
//! finite number. It never leaves [`crate::calculate`] or the engine: both absorb it
//! into [`crate::Outcome::Error`]. [`Error`] covers the fallible operations that are
//! surfaced to callers (function-key names, history text, preferences).

/// Reasons an expression fails to evaluate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Nothing to evaluate.
    #[error("empty expression")]
    Empty,

    /// A lexeme that is neither a number, an operator, a parenthesis nor a known function.
    #[error("unknown token {0}")]
    UnknownToken(String),

    /// Structurally invalid input, e.g. a missing operand or a stray `)`.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The expression nests deeper than the parser allows.
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    /// The expression evaluated to NaN or an infinity.
    #[error("result is not a finite number ({0})")]
    NonFinite(f64),
}

/// Errors surfaced by the public API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A function key name that the calculator does not provide.
    #[error("unknown function key `{0}`")]
    UnknownKeyFunction(String),

    /// A history index past the end of the history.
    #[error("no history entry at index {0}")]
    HistoryIndex(usize),

    /// History text that is not a valid JSON entry list.
    #[error("invalid history text: {0}")]
    History(#[from] serde_json::Error),

    /// Preferences text that is not valid TOML for [`crate::Preferences`].
    #[error("invalid preferences: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
