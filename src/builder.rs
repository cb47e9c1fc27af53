//! # builder.rs
//!
//! This module provides a builder for [`Calculator`] sessions.

use crate::calculator::Calculator;
use crate::config::Preferences;
use crate::engine::Engine;
use crate::error::Result;
use crate::history::History;
use crate::random::{RandomSource, SystemRandom};

/// Configures and creates a [`Calculator`].
#[derive(Debug, Clone)]
pub struct Builder<R = SystemRandom>
{
    preferences: Preferences,
    history: History,
    random: R,
}

impl Builder<SystemRandom>
{
    /// Creates a new `Builder` with default preferences, an empty history and a
    /// entropy-seeded random source.
    ///
    /// You can chain methods like `with_preferences` and `with_history`
    /// to configure the builder before calling `build`.
    ///
    /// # Examples
    /// ```rust
    /// use calcpad::Builder;
    ///
    /// let mut calculator = Builder::new().build();
    /// calculator.press("6");
    /// calculator.press("*");
    /// calculator.press("7");
    /// calculator.equals();
    /// assert_eq!(calculator.display(), "42");
    /// ```
    pub fn new() -> Self
    {
        Self {
            preferences: Preferences::default(),
            history: History::new(),
            random: SystemRandom::new(),
        }
    }
}

impl Default for Builder<SystemRandom>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Builder<R>
{
    /// Sets the preferences for the session.
    ///
    /// The history capacity in `preferences` is applied to the history when the
    /// session is built.
    pub fn with_preferences(mut self, preferences: Preferences) -> Self
    {
        self.preferences = preferences;
        self
    }

    /// Starts the session with an existing history.
    pub fn with_history(mut self, history: History) -> Self
    {
        self.history = history;
        self
    }

    /// Starts the session with a history read from its JSON text.
    ///
    /// # Examples
    /// ```rust
    /// use calcpad::Builder;
    ///
    /// let saved = r#"[{"expression":"2+2","value":4}]"#;
    /// let calculator = Builder::new().with_history_json(saved).unwrap().build();
    /// assert_eq!(calculator.history().len(), 1);
    /// ```
    pub fn with_history_json(self, text: &str) -> Result<Self>
    {
        Ok(self.with_history(History::from_json(text)?))
    }

    /// Replaces the source of the values inserted by the `rand` key.
    ///
    /// # Examples
    /// ```rust
    /// use calcpad::{Builder, KeyFunction};
    /// use calcpad::random::FixedRandom;
    ///
    /// let mut calculator = Builder::new().with_random_source(FixedRandom(0.5)).build();
    /// calculator.invoke(KeyFunction::Rand);
    /// assert_eq!(calculator.display(), "0.5");
    /// ```
    pub fn with_random_source<S: RandomSource>(self, random: S) -> Builder<S>
    {
        Builder {
            preferences: self.preferences,
            history: self.history,
            random,
        }
    }

    /// Creates the session.
    pub fn build(self) -> Calculator<R>
    {
        let engine = Engine::with_random_source(self.random);
        Calculator::from_parts(engine, self.history, self.preferences)
    }
}

#[cfg(test)]
mod build_test {
    use super::*;
    use crate::config::Theme;
    use crate::history::HistoryEntry;
    use crate::outcome::Outcome;
    use crate::random::FixedRandom;

    #[test]
    fn test_defaults() {
        let calculator = Builder::new().build();
        assert_eq!(calculator.preferences(), &Preferences::default());
        assert!(calculator.history().is_empty());
        assert_eq!(calculator.engine().buffer(), "");
    }

    #[test]
    fn test_preferences_cap_loaded_history() {
        let mut history = History::new();
        for expr in ["1", "2", "3"] {
            history.record(HistoryEntry::new(expr, Outcome::Number(expr.parse().unwrap())));
        }
        let preferences = Preferences { theme: Theme::Dark, history_capacity: Some(2), ..Preferences::default() };

        let calculator = Builder::new()
            .with_history(history)
            .with_preferences(preferences)
            .build();
        assert_eq!(calculator.preferences().theme, Theme::Dark);
        let exprs: Vec<_> = calculator.history().iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(exprs, vec!["3", "2"]);
    }

    #[test]
    fn test_random_source_survives_other_settings() {
        let mut calculator = Builder::new()
            .with_random_source(FixedRandom(0.125))
            .with_preferences(Preferences::default())
            .build();
        calculator.invoke(crate::KeyFunction::Rand);
        assert_eq!(calculator.display(), "0.125");
    }

    #[test]
    fn test_invalid_history_json() {
        assert!(Builder::new().with_history_json("not json").is_err());
    }
}
