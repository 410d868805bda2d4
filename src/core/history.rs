//! Navigation history.
//!
//! The ledger records the path of step ids actually walked. It only grows
//! at the tail and only shrinks by truncation, so the relative order of the
//! surviving entries never changes.

use super::step::StepId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected attempt to build a ledger from an invalid sequence.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("History must contain at least one step")]
    Empty,

    #[error("Step '{0}' appears more than once in history")]
    Duplicate(StepId),
}

/// Ordered, deduplicated list of visited step ids.
///
/// The ledger is never empty: its first entry is the starting step and its
/// last entry is the current step.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{HistoryLedger, StepId};
///
/// let mut history = HistoryLedger::new(StepId::new("a"));
/// assert!(history.append(StepId::new("b")));
/// assert!(history.append(StepId::new("c")));
/// assert!(!history.append(StepId::new("b"))); // already visited
///
/// assert!(history.truncate_at(&StepId::new("b")));
/// assert_eq!(history.as_slice(), &[StepId::new("a"), StepId::new("b")]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StepId>", into = "Vec<StepId>")]
pub struct HistoryLedger {
    entries: Vec<StepId>,
}

impl HistoryLedger {
    /// Create a ledger holding only the starting step.
    pub fn new(start: StepId) -> Self {
        Self {
            entries: vec![start],
        }
    }

    /// Create a ledger from a seed, keeping the first occurrence of each id.
    ///
    /// Returns `None` for an empty seed.
    pub fn seeded<I>(seed: I) -> Option<Self>
    where
        I: IntoIterator<Item = StepId>,
    {
        let mut entries: Vec<StepId> = Vec::new();
        for id in seed {
            if !entries.contains(&id) {
                entries.push(id);
            }
        }

        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// Push `id` to the tail unless it was already visited.
    ///
    /// Returns `true` if the ledger changed.
    pub fn append(&mut self, id: StepId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Drop every entry after `id`, keeping `id` itself.
    ///
    /// Returns `false` and leaves the ledger untouched when `id` was never
    /// visited.
    pub fn truncate_at(&mut self, id: &StepId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.truncate(index + 1);
                true
            }
            None => false,
        }
    }

    /// Replace the whole ledger with `seed`.
    ///
    /// An empty seed is ignored so the ledger never becomes empty.
    pub fn reset(&mut self, seed: &[StepId]) {
        if let Some(fresh) = Self::seeded(seed.iter().cloned()) {
            *self = fresh;
        }
    }

    /// The current step: the last entry.
    pub fn current(&self) -> &StepId {
        &self.entries[self.entries.len() - 1]
    }

    /// The starting step: the first entry.
    pub fn first(&self) -> &StepId {
        &self.entries[0]
    }

    /// The step visited before the current one, if any.
    pub fn previous(&self) -> Option<&StepId> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.entries.contains(id)
    }

    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.entries.iter().position(|entry| entry == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[StepId] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepId> {
        self.entries.iter()
    }
}

impl TryFrom<Vec<StepId>> for HistoryLedger {
    type Error = LedgerError;

    fn try_from(entries: Vec<StepId>) -> Result<Self, Self::Error> {
        for (index, id) in entries.iter().enumerate() {
            if entries[..index].contains(id) {
                return Err(LedgerError::Duplicate(id.clone()));
            }
        }
        if entries.is_empty() {
            return Err(LedgerError::Empty);
        }
        Ok(Self { entries })
    }
}

impl From<HistoryLedger> for Vec<StepId> {
    fn from(ledger: HistoryLedger) -> Self {
        ledger.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(ids: &[&str]) -> HistoryLedger {
        HistoryLedger::seeded(ids.iter().map(|id| StepId::new(*id))).unwrap()
    }

    fn ids(ledger: &HistoryLedger) -> Vec<&str> {
        ledger.iter().map(StepId::as_str).collect()
    }

    #[test]
    fn new_ledger_holds_start_step() {
        let history = HistoryLedger::new(StepId::new("a"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), "a");
        assert_eq!(history.first(), "a");
        assert!(history.previous().is_none());
        assert!(!history.is_empty());
    }

    #[test]
    fn append_pushes_unvisited_step() {
        let mut history = ledger(&["a"]);
        assert!(history.append(StepId::new("b")));
        assert_eq!(ids(&history), vec!["a", "b"]);
        assert_eq!(history.current(), "b");
        assert_eq!(history.previous(), Some(&StepId::new("a")));
    }

    #[test]
    fn append_is_idempotent() {
        let mut history = ledger(&["a", "b", "c"]);
        assert!(!history.append(StepId::new("a")));
        assert!(!history.append(StepId::new("c")));
        assert_eq!(ids(&history), vec!["a", "b", "c"]);
    }

    #[test]
    fn truncate_keeps_target_inclusive() {
        let mut history = ledger(&["a", "b", "c", "d"]);
        assert!(history.truncate_at(&StepId::new("b")));
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn truncate_at_current_is_a_no_op_change() {
        let mut history = ledger(&["a", "b"]);
        assert!(history.truncate_at(&StepId::new("b")));
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn truncate_unknown_step_leaves_ledger_untouched() {
        let mut history = ledger(&["a", "b"]);
        assert!(!history.truncate_at(&StepId::new("z")));
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn reset_replaces_wholesale() {
        let mut history = ledger(&["a", "b", "c"]);
        history.reset(&[StepId::new("x"), StepId::new("y")]);
        assert_eq!(ids(&history), vec!["x", "y"]);
    }

    #[test]
    fn reset_with_empty_seed_is_ignored() {
        let mut history = ledger(&["a", "b"]);
        history.reset(&[]);
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn seeded_drops_duplicates_and_rejects_empty() {
        assert!(HistoryLedger::seeded(Vec::new()).is_none());
        let history = ledger(&["a", "b", "a"]);
        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn serializes_as_plain_list() {
        let history = ledger(&["a", "b"]);
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let back: HistoryLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }

    #[test]
    fn deserialize_rejects_invalid_sequences() {
        assert!(serde_json::from_str::<HistoryLedger>("[]").is_err());
        assert!(serde_json::from_str::<HistoryLedger>(r#"["a","b","a"]"#).is_err());
    }
}
