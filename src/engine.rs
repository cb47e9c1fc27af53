//! # engine.rs
//!
//! The expression engine: the in-progress buffer, the last answer, and the rules
//! for editing the buffer key by key.
//!
//! The editing rules are plain functions over `&str` ([`normalize_operator`],
//! [`append_function`], [`toggle_sign`]); [`Engine`] owns the state and applies
//! them in response to one input event at a time.

use crate::error::Result;
use crate::history::HistoryEntry;
use crate::keys::{KeyAction, KeyFunction};
use crate::lexer::POWER_OPERATOR;
use crate::outcome::{format_number, Outcome};
use crate::random::{RandomSource, SystemRandom};

/// Operators that collapse into each other when typed back to back.
const BINARY_OPERATORS: [char; 4] = ['+', '-', '*', '/'];

fn is_binary_operator(c: char) -> bool {
    BINARY_OPERATORS.contains(&c)
}

/// Appends a typed token to the buffer.
///
/// If the token is a single binary operator and the buffer already ends in one,
/// the trailing operator is replaced instead, so `5+` followed by `*` gives `5*`.
pub fn normalize_operator(current: &str, incoming: &str) -> String {
    let mut chars = incoming.chars();
    let is_operator = matches!((chars.next(), chars.next()), (Some(c), None) if is_binary_operator(c));

    let mut next = current.to_string();
    if is_operator && current.ends_with(is_binary_operator) {
        next.pop();
    }
    next.push_str(incoming);
    next
}

/// Negates the whole buffer by adding or removing a single leading `-`.
///
/// Only the first character is looked at: `5+3` becomes `-5+3`, not `5-3`.
pub fn toggle_sign(current: &str) -> String {
    match current.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => format!("-{current}"),
    }
}

/// Opens a function call, inserting `*` after an operand when the key asks for it.
fn open_call(current: &str, key: KeyFunction) -> String {
    let implicit_mul = key.action() == KeyAction::Call { implicit_mul: true }
        && current.ends_with(|c: char| c.is_ascii_digit() || c == ')');

    let mut next = current.to_string();
    if implicit_mul {
        next.push('*');
    }
    next.push_str(key.name());
    next.push('(');
    next
}

/// Applies a function key to the buffer.
///
/// - calls append `name(`; `sin`, `cos`, `tan`, `log` and `sqrt` first insert `*`
///   when the buffer ends in a digit or `)`
/// - `pi`, `e`, `ans` and `rand` append a decimal number; `ans` is `last_answer`
///   and `rand` draws from `random`
/// - `fact` appends `!`, `inv` wraps the buffer in `1/(...)`, `pow` appends `**`
///   and `toggle-sign` calls [`toggle_sign`]
pub fn append_function<R>(current: &str, key: KeyFunction, last_answer: f64, random: &mut R) -> String
where
    R: RandomSource + ?Sized,
{
    use KeyFunction::*;

    let append_number = |val: f64| format!("{current}{}", format_number(val));
    match key {
        Sin | Cos | Tan | Log | Sqrt | Ln | Abs | Exp => open_call(current, key),
        Pi => append_number(std::f64::consts::PI),
        E => append_number(std::f64::consts::E),
        Ans => append_number(last_answer),
        Rand => append_number(random.next_f64()),
        Fact => format!("{current}!"),
        Inv => format!("1/({current})"),
        Pow => format!("{current}{POWER_OPERATOR}"),
        ToggleSign => toggle_sign(current),
    }
}

/// Calculator state: the buffer being typed and the last successful answer.
#[derive(Debug, Clone)]
pub struct Engine<R = SystemRandom> {
    buffer: String,
    last_answer: Option<f64>,
    random: R,
}

impl Engine<SystemRandom> {
    /// Creates an engine with an empty buffer and an entropy-seeded `rand` key.
    pub fn new() -> Self {
        Self::with_random_source(SystemRandom::new())
    }
}

impl Default for Engine<SystemRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Engine<R> {
    /// Creates an engine whose `rand` key draws from `random`.
    pub fn with_random_source(random: R) -> Self {
        Self {
            buffer: String::new(),
            last_answer: None,
            random,
        }
    }

    /// The raw buffer, possibly empty.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The buffer as displayed: `0` when empty.
    pub fn display(&self) -> &str {
        if self.buffer.is_empty() { "0" } else { &self.buffer }
    }

    /// The last successful result, 0 before the first one.
    pub fn last_answer(&self) -> f64 {
        self.last_answer.unwrap_or_default()
    }

    /// Whether any evaluation has succeeded yet.
    pub fn has_answer(&self) -> bool {
        self.last_answer.is_some()
    }

    /// Appends a digit, operator, decimal point or parenthesis.
    pub fn append(&mut self, token: &str) {
        self.buffer = normalize_operator(&self.buffer, token);
    }

    /// Applies a function key.
    pub fn invoke(&mut self, key: KeyFunction) {
        let last_answer = self.last_answer();
        self.buffer = append_function(&self.buffer, key, last_answer, &mut self.random);
    }

    /// Applies a function key given by name, leaving the buffer untouched if the name is unknown.
    pub fn invoke_named(&mut self, name: &str) -> Result<()> {
        self.invoke(name.parse()?);
        Ok(())
    }

    /// Removes the last character.
    pub fn delete_last(&mut self) {
        self.buffer.pop();
    }

    /// Empties the buffer. The last answer is kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Replaces the buffer, e.g. with an expression picked from history.
    pub fn set_buffer(&mut self, expr: impl Into<String>) {
        self.buffer = expr.into();
    }

    /// Evaluates the buffer without committing anything.
    ///
    /// Returns `None` when the buffer is empty.
    pub fn preview(&self) -> Option<Outcome> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(crate::calculate(&self.buffer))
    }

    /// Evaluates the buffer.
    ///
    /// Returns `None` when the buffer is empty. Otherwise the buffer is replaced by
    /// the displayed outcome, the last answer is updated on success, and the
    /// evaluated expression is returned as a history entry.
    pub fn evaluate(&mut self) -> Option<HistoryEntry> {
        if self.buffer.is_empty() {
            return None;
        }

        let outcome = crate::calculate(&self.buffer);
        if let Outcome::Number(val) = outcome {
            self.last_answer = Some(val);
        }

        let expression = std::mem::replace(&mut self.buffer, outcome.to_string());
        Some(HistoryEntry::new(expression, outcome))
    }
}


#[cfg(test)]
mod append_function_tests {
    use super::*;
    use crate::random::FixedRandom;

    fn apply(current: &str, key: KeyFunction) -> String {
        append_function(current, key, 0.0, &mut FixedRandom(0.5))
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(apply("5", KeyFunction::Sin), "5*sin(");
        assert_eq!(apply("(1+2)", KeyFunction::Sqrt), "(1+2)*sqrt(");
        assert_eq!(apply("2", KeyFunction::Log), "2*log(");
        assert_eq!(apply("5+", KeyFunction::Cos), "5+cos(");
        assert_eq!(apply("", KeyFunction::Tan), "tan(");
    }

    #[test]
    fn test_calls_without_implicit_multiplication() {
        assert_eq!(apply("5", KeyFunction::Ln), "5ln(");
        assert_eq!(apply("5", KeyFunction::Abs), "5abs(");
        assert_eq!(apply("", KeyFunction::Exp), "exp(");
    }

    #[test]
    fn test_constants() {
        assert_eq!(apply("", KeyFunction::Pi), "3.141592653589793");
        assert_eq!(apply("2*", KeyFunction::E), "2*2.718281828459045");
        assert_eq!(apply("1+", KeyFunction::Rand), "1+0.5");
        assert_eq!(append_function("", KeyFunction::Ans, 42.0, &mut FixedRandom(0.0)), "42");
        assert_eq!(apply("", KeyFunction::Ans), "0");
    }

    #[test]
    fn test_whole_buffer_edits() {
        assert_eq!(apply("2+3", KeyFunction::Fact), "2+3!");
        assert_eq!(apply("2+3", KeyFunction::Inv), "1/(2+3)");
        assert_eq!(apply("2", KeyFunction::Pow), "2**");
    }

    #[test]
    fn test_toggle_sign_round_trip() {
        let once = apply("5+3", KeyFunction::ToggleSign);
        assert_eq!(once, "-5+3");
        assert_eq!(apply(&once, KeyFunction::ToggleSign), "5+3");
        // only one leading sign is stripped
        assert_eq!(toggle_sign("--5"), "-5");
        assert_eq!(toggle_sign(""), "-");
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;
    use crate::error::Error;
    use crate::random::FixedRandom;

    fn engine() -> Engine<FixedRandom> {
        Engine::with_random_source(FixedRandom(0.25))
    }

    #[test]
    fn test_preview_leaves_state_alone() {
        let mut engine = engine();
        assert_eq!(engine.preview(), None);

        engine.set_buffer("2*(3+4");
        assert_eq!(engine.preview(), Some(Outcome::Number(14.0)));
        assert_eq!(engine.buffer(), "2*(3+4");
        assert!(!engine.has_answer());

        engine.set_buffer("2+");
        assert_eq!(engine.preview(), Some(Outcome::Error));
    }

    #[test]
    fn test_display_of_empty_buffer() {
        let mut engine = engine();
        assert_eq!(engine.display(), "0");
        engine.append("7");
        assert_eq!(engine.display(), "7");
        engine.delete_last();
        assert_eq!(engine.display(), "0");
        // deleting from an empty buffer is harmless
        engine.delete_last();
        assert_eq!(engine.buffer(), "");
    }

    #[test]
    fn test_evaluate_success() {
        let mut engine = engine();
        for token in ["2", "+", "3", "*", "4"] {
            engine.append(token);
        }
        let entry = engine.evaluate().unwrap();
        assert_eq!(entry, HistoryEntry::new("2+3*4", Outcome::Number(14.0)));
        assert_eq!(engine.buffer(), "14");
        assert_eq!(engine.last_answer(), 14.0);
        assert!(engine.has_answer());
    }

    #[test]
    fn test_evaluate_error_keeps_last_answer() {
        let mut engine = engine();
        engine.set_buffer("6/3");
        engine.evaluate();
        engine.set_buffer("1/0");
        let entry = engine.evaluate().unwrap();
        assert_eq!(entry.value, Outcome::Error);
        assert_eq!(engine.buffer(), "Error");
        assert_eq!(engine.last_answer(), 2.0);

        // a fresh buffer right after an error evaluates normally
        engine.clear();
        engine.append("1");
        assert_eq!(engine.evaluate().unwrap().value, Outcome::Number(1.0));
    }

    #[test]
    fn test_evaluate_empty_is_noop() {
        let mut engine = engine();
        assert_eq!(engine.evaluate(), None);
        assert!(!engine.has_answer());
        assert_eq!(engine.last_answer(), 0.0);
    }

    #[test]
    fn test_ans_and_rand() {
        let mut engine = engine();
        engine.set_buffer("3*3");
        engine.evaluate();
        engine.clear();
        engine.invoke(KeyFunction::Ans);
        engine.append("+");
        engine.invoke(KeyFunction::Rand);
        assert_eq!(engine.buffer(), "9+0.25");
        assert_eq!(engine.evaluate().unwrap().value, Outcome::Number(9.25));
    }

    #[test]
    fn test_function_keys_evaluate() {
        let mut engine = engine();
        engine.append("5");
        engine.invoke(KeyFunction::Fact);
        assert_eq!(engine.evaluate().unwrap().value, Outcome::Number(120.0));

        engine.set_buffer("4");
        engine.invoke(KeyFunction::Inv);
        assert_eq!(engine.evaluate().unwrap().value, Outcome::Number(0.25));

        engine.set_buffer("2");
        engine.invoke(KeyFunction::Log);
        engine.append("100");
        assert_eq!(engine.buffer(), "2*log(100");
        assert_eq!(engine.evaluate().unwrap().value, Outcome::Number(4.0));
    }

    #[test]
    fn test_invoke_named() {
        let mut engine = engine();
        engine.append("9");
        engine.invoke_named("sqrt").unwrap();
        assert_eq!(engine.buffer(), "9*sqrt(");
        assert!(matches!(engine.invoke_named("cbrt"), Err(Error::UnknownKeyFunction(_))));
        assert_eq!(engine.buffer(), "9*sqrt(");
    }
}
