//! Status filters over the image set.
//!
//! A filter never mutates items. It selects an ordered subsequence of the
//! backing store, and navigation indices handed to the session always refer
//! to the subsequence of the filter passed alongside them.

use crate::types::ReviewItem;

/// Which images the gallery shows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFilter {
    /// Every image in the session.
    #[default]
    All,
    /// Images with a terminal status (approved or flagged).
    SavedOnly,
    /// Images still awaiting a decision.
    UnsavedOnly,
}

impl ReviewFilter {
    /// Returns a human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            ReviewFilter::All => "All",
            ReviewFilter::SavedOnly => "Saved",
            ReviewFilter::UnsavedOnly => "Unsaved",
        }
    }

    pub fn matches(self, item: &ReviewItem) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::SavedOnly => item.status().is_terminal(),
            ReviewFilter::UnsavedOnly => !item.status().is_terminal(),
        }
    }

    /// Cycle order: `All` → `SavedOnly` → `UnsavedOnly` → `All`.
    pub fn next(self) -> Self {
        match self {
            ReviewFilter::All => ReviewFilter::SavedOnly,
            ReviewFilter::SavedOnly => ReviewFilter::UnsavedOnly,
            ReviewFilter::UnsavedOnly => ReviewFilter::All,
        }
    }

    /// Backing-store indices of the items this filter selects, in order.
    pub fn indices(self, items: &[ReviewItem]) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.matches(item))
            .map(|(i, _)| i)
            .collect()
    }

    /// The items this filter selects, preserving their relative order.
    pub fn apply(self, items: &[ReviewItem]) -> Vec<&ReviewItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
