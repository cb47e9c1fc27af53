//! # config.rs
//!
//! User preferences of the calculator widget.
//!
//! Preferences are plain values for the UI collaborator to act on; the engine
//! itself only uses `history_capacity`. They are read from TOML:
//!
//! ```toml
//! theme = "dark"
//! language = "ar"
//! sound = false
//! history_capacity = 50
//! ```
//!
//! Missing keys fall back to the defaults (light theme, English, sound on,
//! unbounded history).

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// The language tag, as used for the document language.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Whether text in this language runs right to left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Ar)
    }
}

/// Theme, language, sound and history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    /// Play a click on every key press.
    pub sound: bool,
    /// Maximum number of history entries kept; unbounded when absent.
    pub history_capacity: Option<usize>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            sound: true,
            history_capacity: None,
        }
    }
}

impl Preferences {
    /// Reads preferences from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
