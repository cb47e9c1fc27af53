//! # calcpad
//!
//! `calcpad` is the engine behind a keypad calculator widget: it edits the
//! expression as keys are pressed, evaluates it, and keeps a history of results.
//!
//! ## Overview
//! - Typed operators collapse: `5+` followed by `*` gives `5*`.
//! - Function keys open calls (`sin(`), inserting `*` after an operand (`5*sin(`).
//! - `pi`, `e`, `ans` and `rand` insert numbers; `fact`, `inv`, `toggle-sign` and
//!   `pow` edit the whole buffer.
//! - Before evaluation, open parentheses are closed, `÷`/`×` become `/`/`*`,
//!   `log` becomes the base-10 `log10` (`ln` stays natural), and `n!` is replaced by
//!   its value.
//! - Evaluation uses a dedicated shunting-yard parser over a fixed set of
//!   operators and functions; anything else, and any non-finite result, is `Error`.
//!
//! Internally, the buffer is normalized, tokenized into lexemes,
//! parsed into an AST and evaluated to an `f64`.
//!
//! ## Example
//! ```rust
//! use calcpad::{calculate, Outcome};
//!
//! assert_eq!(calculate("2+3*4"), Outcome::Number(14.0));
//! assert_eq!(calculate("(2+3"), Outcome::Number(5.0));
//! assert_eq!(calculate("1/0"), Outcome::Error);
//! assert_eq!(calculate("1/0").to_string(), "Error");
//! ```
//!
//! ## Example: A Session
//! ```rust
//! use calcpad::{Builder, KeyFunction};
//!
//! let mut calculator = Builder::new().build();
//! calculator.press("5");
//! calculator.invoke(KeyFunction::Fact);
//! calculator.equals();
//! assert_eq!(calculator.display(), "120");
//! assert_eq!(calculator.history().get(0).unwrap().to_string(), "5! = 120");
//! ```
//!
//! ## License
//! Licensed under either **MIT** or **Apache-2.0** at your option.

mod lexer;
pub mod builder;
pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod keys;
pub mod normalize;
pub mod outcome;
pub mod parser;
pub mod random;

pub use builder::Builder;
pub use calculator::Calculator;
pub use config::{Language, Preferences, Theme};
pub use engine::{append_function, normalize_operator, toggle_sign, Engine};
pub use error::{Error, EvalError, Result};
pub use history::{History, HistoryEntry};
pub use keys::{KeyAction, KeyFunction};
pub use normalize::{factorial, normalize_expression};
pub use outcome::{format_number, Outcome, ERROR_MARKER};

/// Normalizes and evaluates a buffer.
///
/// This never fails: every parse error, unknown token or non-finite result is
/// reported as [`Outcome::Error`].
///
/// # Example
/// ```rust
/// use calcpad::{calculate, Outcome};
///
/// assert_eq!(calculate("log(100)"), Outcome::Number(2.0));
/// assert_eq!(calculate("6÷2×3"), Outcome::Number(9.0));
/// assert_eq!(calculate("2+"), Outcome::Error);
/// ```
pub fn calculate(expr: &str) -> Outcome {
    let canonical = normalize_expression(expr);
    let result = parser::evaluate(&canonical);
    if let Err(err) = &result {
        tracing::debug!(expression = expr, error = %err, "evaluation failed");
    }
    Outcome::from(result)
}
