use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Recently sent quotes, oldest first.
///
/// Serialises as a plain JSON array so the state file stays readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageLedger {
    entries: VecDeque<String>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, quote: &str) -> bool {
        self.entries.iter().any(|entry| entry == quote)
    }

    pub fn oldest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn push(&mut self, quote: String) {
        self.entries.push_back(quote);
    }

    /// Moves the oldest entry to the back and returns it.
    pub fn rotate_oldest(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.rotate_left(1);
        self.entries.back().cloned()
    }

    /// Drops the oldest entries until at most `keep` remain.
    pub fn retain_recent(&mut self, keep: usize) {
        let excess = self.entries.len().saturating_sub(keep);
        self.entries.drain(..excess);
    }
}

impl<S: Into<String>> FromIterator<S> for UsageLedger {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_front_to_back() {
        let mut ledger: UsageLedger = ["a", "b", "c"].into_iter().collect();
        assert_eq!(ledger.rotate_oldest().as_deref(), Some("a"));
        assert_eq!(ledger.iter().collect::<Vec<_>>(), vec!["b", "c", "a"]);
    }

    #[test]
    fn rotating_empty_ledger_yields_nothing() {
        let mut ledger = UsageLedger::new();
        assert_eq!(ledger.rotate_oldest(), None);
        assert!(ledger.is_empty());
    }

    #[test]
    fn retain_recent_keeps_tail() {
        let mut ledger: UsageLedger = ["a", "b", "c", "d"].into_iter().collect();
        ledger.retain_recent(2);
        assert_eq!(ledger.iter().collect::<Vec<_>>(), vec!["c", "d"]);
        ledger.retain_recent(5);
        assert_eq!(ledger.len(), 2);
        ledger.retain_recent(0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn serialises_as_plain_array() {
        let ledger: UsageLedger = ["x", "y"].into_iter().collect();
        let raw = serde_json::to_string(&ledger).unwrap();
        assert_eq!(raw, r#"["x","y"]"#);
        let parsed: UsageLedger = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, ledger);
    }
}
