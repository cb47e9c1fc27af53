//! # calculator.rs
//!
//! A calculator session: the engine, its history, and the two lines of the screen.
//!
//! The screen shows a *display* line (the buffer while typing, the outcome after
//! `=`) and a *result* line (the buffer while typing, the evaluated expression
//! after `=`). Once either line shows `Error`, the next key or function press
//! starts from an empty buffer.

use crate::config::Preferences;
use crate::engine::Engine;
use crate::error::Result;
use crate::history::History;
use crate::keys::KeyFunction;
use crate::outcome::{Outcome, ERROR_MARKER};
use crate::random::{RandomSource, SystemRandom};

/// Text of a screen line with nothing on it.
const EMPTY_LINE: &str = "0";

/// Engine, history and screen state behind one calculator widget.
///
/// Build one with [`crate::Builder`] or [`Calculator::new`].
#[derive(Debug, Clone)]
pub struct Calculator<R = SystemRandom> {
    engine: Engine<R>,
    history: History,
    preferences: Preferences,
    display: String,
    result: String,
}

impl Calculator<SystemRandom> {
    /// Creates a session with default preferences and an empty history.
    pub fn new() -> Self {
        crate::Builder::new().build()
    }
}

impl Default for Calculator<SystemRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Calculator<R> {
    pub(crate) fn from_parts(engine: Engine<R>, history: History, preferences: Preferences) -> Self {
        let mut calculator = Self {
            engine,
            history,
            preferences,
            display: EMPTY_LINE.to_string(),
            result: EMPTY_LINE.to_string(),
        };
        calculator.history.set_capacity(calculator.preferences.history_capacity);
        calculator
    }

    /// The display line.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The result line.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The engine holding the buffer and the last answer.
    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    /// Evaluated expressions, newest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The preferences currently applied.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn shows_error(&self) -> bool {
        self.display == ERROR_MARKER || self.result == ERROR_MARKER
    }

    fn sync_lines(&mut self) {
        self.display = self.engine.display().to_string();
        self.result = self.display.clone();
    }

    fn reset_after_error(&mut self) {
        if self.shows_error() {
            tracing::debug!("clearing buffer after error");
            self.engine.clear();
            self.sync_lines();
        }
    }

    /// Presses a digit, operator, decimal point or parenthesis key.
    pub fn press(&mut self, token: &str) {
        self.reset_after_error();
        self.engine.append(token);
        self.sync_lines();
    }

    /// Presses a function key.
    pub fn invoke(&mut self, key: KeyFunction) {
        self.reset_after_error();
        self.engine.invoke(key);
        self.sync_lines();
    }

    /// Presses a function key given by name.
    pub fn invoke_named(&mut self, name: &str) -> Result<()> {
        self.invoke(name.parse()?);
        Ok(())
    }

    /// Presses the delete key.
    pub fn delete_last(&mut self) {
        self.engine.delete_last();
        self.sync_lines();
    }

    /// Presses the clear key.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.sync_lines();
    }

    /// Presses `=`.
    ///
    /// Returns `None` and changes nothing when the buffer is empty. Otherwise the
    /// result line shows the evaluated expression, the display line shows the
    /// outcome, and the entry is recorded at the top of the history.
    pub fn equals(&mut self) -> Option<Outcome> {
        let entry = self.engine.evaluate()?;
        let outcome = entry.value;

        self.result = entry.expression.clone();
        self.display = outcome.to_string();
        self.history.record(entry);
        Some(outcome)
    }

    /// Puts the expression of history entry `index` (0 is the newest) back into the buffer.
    pub fn reuse_history(&mut self, index: usize) -> Result<()> {
        let expression = self.history.get(index)?.expression.clone();
        self.engine.set_buffer(expression);
        self.display = self.engine.display().to_string();
        Ok(())
    }

    /// Removes every history entry.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Replaces the preferences and applies the history capacity.
    pub fn apply_preferences(&mut self, preferences: Preferences) {
        self.history.set_capacity(preferences.history_capacity);
        self.preferences = preferences;
    }
}
