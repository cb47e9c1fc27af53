//! # history.rs
//!
//! Calculation history, newest entry first.
//!
//! The history is stored by an outside collaborator as text: a JSON array of
//! `{"expression": ..., "value": ...}` objects where `value` is a number or the
//! string `"Error"`. [`History::to_json`] and [`History::from_json`] read and write
//! exactly that.

use crate::error::{Error, Result};
use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// One evaluated expression and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The buffer as it was when `=` was pressed.
    pub expression: String,
    /// The number it evaluated to, or the error marker.
    pub value: Outcome,
}

impl HistoryEntry {
    /// Pairs an evaluated expression with its outcome.
    pub fn new(expression: impl Into<String>, value: Outcome) -> Self {
        Self { expression: expression.into(), value }
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.expression, self.value)
    }
}

/// Ordered list of history entries, newest first.
///
/// An optional capacity drops the oldest entries once exceeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    capacity: Option<usize>,
}

impl History {
    /// Creates an empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history keeping at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity: Some(capacity) }
    }

    /// Sets or removes the capacity, dropping the oldest entries if needed.
    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
        self.truncate();
    }

    /// Puts an entry at the front.
    pub fn record(&mut self, entry: HistoryEntry) {
        tracing::debug!(entry = %entry, "recording history entry");
        self.entries.insert(0, entry);
        self.truncate();
    }

    fn truncate(&mut self) {
        if let Some(capacity) = self.capacity {
            self.entries.truncate(capacity);
        }
    }

    /// Returns the entry at `index`, 0 being the newest.
    pub fn get(&self, index: usize) -> Result<&HistoryEntry> {
        self.entries.get(index).ok_or(Error::HistoryIndex(index))
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Serializes the entries to JSON text, newest first.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Reads entries from JSON text written by [`History::to_json`].
    ///
    /// The resulting history is unbounded.
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(text)?;
        Ok(Self { entries, capacity: None })
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut history = History::new();
        history.record(HistoryEntry::new("1+1", Outcome::Number(2.0)));
        history.record(HistoryEntry::new("2+2", Outcome::Number(4.0)));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap(), &HistoryEntry::new("2+2", Outcome::Number(4.0)));
        assert_eq!(history.get(1).unwrap().expression, "1+1");
        assert!(matches!(history.get(2), Err(Error::HistoryIndex(2))));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::with_capacity(2);
        for expr in ["1", "2", "3"] {
            history.record(HistoryEntry::new(expr, Outcome::Number(expr.parse().unwrap())));
        }
        let exprs: Vec<_> = history.iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(exprs, vec!["3", "2"]);

        history.set_capacity(Some(1));
        assert_eq!(history.len(), 1);
        history.set_capacity(None);
        history.record(HistoryEntry::new("4", Outcome::Number(4.0)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record(HistoryEntry::new("1/0", Outcome::Error));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(HistoryEntry::new("2+2", Outcome::Number(4.0)).to_string(), "2+2 = 4");
        assert_eq!(HistoryEntry::new("1/0", Outcome::Error).to_string(), "1/0 = Error");
    }

    #[test]
    fn test_json_text() {
        let mut history = History::new();
        history.record(HistoryEntry::new("1/0", Outcome::Error));
        history.record(HistoryEntry::new("0.5*3", Outcome::Number(1.5)));

        let text = history.to_json().unwrap();
        assert_eq!(
            text,
            r#"[{"expression":"0.5*3","value":1.5},{"expression":"1/0","value":"Error"}]"#
        );
        assert_eq!(History::from_json(&text).unwrap(), history);
    }

    #[test]
    fn test_json_written_by_widget() {
        let text = r#"[{"expression":"2+2","value":4},{"expression":"5+","value":"Error"}]"#;
        let history = History::from_json(text).unwrap();
        assert_eq!(history.get(0).unwrap().value, Outcome::Number(4.0));
        assert_eq!(history.get(1).unwrap().value, Outcome::Error);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(History::from_json("{"), Err(Error::History(_))));
    }
}
