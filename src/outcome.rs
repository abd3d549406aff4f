//! Per-item outcomes and batch summaries.
//!
//! Every batch in this crate (composing, fetching, probing) runs each item
//! to completion, records an [`ItemOutcome`] and folds the outcomes into a
//! [`BatchSummary`]. A failed item never stops the ones after it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// Output file or resource name the item refers to
    pub name: String,
    pub succeeded: bool,
    /// Status information on success (content type, written path),
    /// failure reason otherwise
    pub detail: String,
}

impl ItemOutcome {
    pub fn success(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            succeeded: true,
            detail: detail.into(),
        }
    }

    pub fn failure(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            succeeded: false,
            detail: reason.into(),
        }
    }

    /// Build an outcome from a fallible step, using `ok_detail` on success
    /// and the error's display text on failure.
    pub fn from_result<T, E: std::fmt::Display>(
        name: impl Into<String>,
        result: &std::result::Result<T, E>,
        ok_detail: impl FnOnce(&T) -> String,
    ) -> Self {
        match result {
            Ok(v) => Self::success(name, ok_detail(v)),
            Err(e) => Self::failure(name, e.to_string()),
        }
    }
}

/// Ordered outcomes of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// `(successCount, total)`
    pub fn counts(&self) -> (usize, usize) {
        (self.succeeded(), self.total())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }
}

impl FromIterator<ItemOutcome> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = ItemOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}
