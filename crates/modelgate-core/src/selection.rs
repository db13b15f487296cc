//! Rotating candidate selection with a permanent exclusion set.
//!
//! [`SelectionState`] is a plain owned value. It never fetches anything on its
//! own; the lazy refresh from an empty state lives in
//! [`RefreshCoordinator::next`](crate::refresh::RefreshCoordinator::next),
//! which borrows the state mutably for the whole query.
//!
//! Selection is a sticky continuation: the cursor moves only to the index that
//! was actually returned, so asking twice without excluding anything yields
//! the same candidate.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::debug;

use crate::catalog::CatalogEntry;

/// Why a selection query produced no candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// No candidates survived the latest refresh.
    EmptyCatalog,
    /// Candidates exist but every one has been excluded.
    Exhausted,
}

impl Display for UnavailableReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCatalog => f.write_str("no candidates in the catalog"),
            Self::Exhausted => f.write_str("every candidate has been excluded"),
        }
    }
}

/// Outcome of a selection query.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Candidate(CatalogEntry),
    Unavailable(UnavailableReason),
}

impl Selection {
    pub fn into_candidate(self) -> Option<CatalogEntry> {
        match self {
            Self::Candidate(entry) => Some(entry),
            Self::Unavailable(_) => None,
        }
    }

    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Candidate sequence, rotation cursor and exclusion set.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    entries: Vec<CatalogEntry>,
    cursor: usize,
    excluded: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sequence and rewinds the cursor. Exclusions survive.
    pub fn reset(&mut self, entries: Vec<CatalogEntry>) {
        self.entries = entries;
        self.cursor = 0;
    }

    /// Returns the first non-excluded entry at or after the cursor, wrapping.
    ///
    /// On a miss neither the cursor nor the exclusion set changes.
    pub fn select(&mut self) -> Selection {
        let len = self.entries.len();
        if len == 0 {
            return Selection::Unavailable(UnavailableReason::EmptyCatalog);
        }

        for offset in 0..len {
            let index = (self.cursor + offset) % len;
            let entry = &self.entries[index];
            if !self.excluded.contains(&entry.id) {
                if index != self.cursor {
                    debug!(from = self.cursor, to = index, id = %entry.id, "rotated past excluded candidates");
                }
                self.cursor = index;
                return Selection::Candidate(entry.clone());
            }
        }

        Selection::Unavailable(UnavailableReason::Exhausted)
    }

    /// Marks `id` unusable. Idempotent; unknown ids are accepted.
    pub fn exclude(&mut self, id: impl Into<String>) -> bool {
        self.excluded.insert(id.into())
    }

    pub fn is_excluded(&self, id: &str) -> bool {
        self.excluded.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn excluded(&self) -> &HashSet<String> {
        &self.excluded
    }

    /// Entries not currently excluded, in sequence order.
    pub fn available(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| !self.excluded.contains(&entry.id))
    }
}
