use tracing::debug;

use crate::catalog::{CatalogEntry, RawCatalogRecord};

pub const DEFAULT_FREE_MARKER: &str = ":free";
pub const DEFAULT_TOOL_MARKER: &str = "tools";

/// Cost and capability predicates a record must satisfy to become a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    /// Substring of an id that marks a free-tier offering regardless of pricing.
    pub free_marker: String,
    /// Entry of `supported_parameters` that marks tool-call support.
    pub tool_marker: String,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            free_marker: String::from(DEFAULT_FREE_MARKER),
            tool_marker: String::from(DEFAULT_TOOL_MARKER),
        }
    }
}

/// Reduces raw catalog records to usable candidates.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    policy: FilterPolicy,
}

impl CatalogFilter {
    pub fn new(policy: FilterPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Keeps records that are free and support tool calls, in input order.
    ///
    /// Free means both prices are exactly zero, or the id carries the
    /// free-tier marker. Missing prices count as [`crate::catalog::UNKNOWN_COST`].
    /// Duplicates are passed through untouched.
    pub fn filter(&self, raw: &[RawCatalogRecord]) -> Vec<CatalogEntry> {
        let entries = raw
            .iter()
            .filter(|record| self.accepts(record))
            .map(CatalogEntry::from)
            .collect::<Vec<_>>();

        debug!(
            received = raw.len(),
            retained = entries.len(),
            "filtered catalog records"
        );
        entries
    }

    pub fn accepts(&self, record: &RawCatalogRecord) -> bool {
        let zero_cost = record.prompt_cost() == 0.0 && record.completion_cost() == 0.0;
        let free = zero_cost || record.id.contains(&self.policy.free_marker);
        free && record.supports(&self.policy.tool_marker)
    }
}
