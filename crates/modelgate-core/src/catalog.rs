//! Catalog wire records and the validated entry type.
//!
//! | Type | Role |
//! |------|------|
//! | [`CatalogResponse`] | Body of `GET {base_url}/models` |
//! | [`RawCatalogRecord`] | One upstream record, fields possibly missing |
//! | [`CatalogEntry`] | Candidate kept by the filter and handed to callers |

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Cost recorded when upstream omits a price or sends something unparseable.
pub const UNKNOWN_COST: f64 = -1.0;

/// Top-level catalog body. A missing `data` array decodes as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub data: Vec<RawCatalogRecord>,
}

/// Upstream price; the catalog sends decimal strings but numbers are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(f64),
}

impl RawPrice {
    fn as_cost(&self) -> Option<f64> {
        let value = match self {
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Number(value) => *value,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPricing {
    #[serde(default)]
    pub prompt: Option<RawPrice>,
    #[serde(default)]
    pub completion: Option<RawPrice>,
}

/// One catalog record as received. Only `id` is mandatory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCatalogRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub pricing: Option<RawPricing>,
    #[serde(default)]
    pub supported_parameters: Option<Vec<String>>,
}

impl RawCatalogRecord {
    pub fn prompt_cost(&self) -> f64 {
        self.pricing
            .as_ref()
            .and_then(|pricing| pricing.prompt.as_ref())
            .and_then(RawPrice::as_cost)
            .unwrap_or(UNKNOWN_COST)
    }

    pub fn completion_cost(&self) -> f64 {
        self.pricing
            .as_ref()
            .and_then(|pricing| pricing.completion.as_ref())
            .and_then(RawPrice::as_cost)
            .unwrap_or(UNKNOWN_COST)
    }

    pub fn supports(&self, parameter: &str) -> bool {
        self.supported_parameters
            .as_deref()
            .is_some_and(|params| params.iter().any(|p| p == parameter))
    }
}

/// A validated candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub context_length: u64,
    pub prompt_cost: f64,
    pub completion_cost: f64,
    pub capabilities: BTreeSet<String>,
}

impl CatalogEntry {
    /// Bare entry with unknown costs and no capabilities.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            context_length: 0,
            prompt_cost: UNKNOWN_COST,
            completion_cost: UNKNOWN_COST,
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_context_length(mut self, context_length: u64) -> Self {
        self.context_length = context_length;
        self
    }
}

impl From<&RawCatalogRecord> for CatalogEntry {
    fn from(record: &RawCatalogRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone().unwrap_or_else(|| record.id.clone()),
            context_length: record.context_length.unwrap_or(0),
            prompt_cost: record.prompt_cost(),
            completion_cost: record.completion_cost(),
            capabilities: record
                .supported_parameters
                .iter()
                .flatten()
                .cloned()
                .collect(),
        }
    }
}
