//! # Modelgate Core
//!
//! Catalog-driven candidate selection with rotation and failover.
//!
//! ## Overview
//!
//! This crate fetches a remote model catalog, keeps only the offerings that
//! are free and support tool calls, and answers "give me a usable candidate"
//! queries. Callers report candidates that failed; later queries skip them.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Wire records and the validated [`CatalogEntry`] |
//! | [`config`] | Credential, endpoint and policy settings |
//! | [`error`] | Fetch and configuration errors |
//! | [`failover`] | Caller retry loop over a selector |
//! | [`fetcher`] | `GET {base_url}/models` |
//! | [`filter`] | Cost and capability predicates |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`refresh`] | Fetch → filter → state replacement |
//! | [`selection`] | Rotation cursor and exclusion set |
//! | [`selector`] | Mutex-guarded selector and its builder |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modelgate_core::{ModelSelector, Selection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let selector = ModelSelector::from_env()?;
//!
//!     match selector.next().await {
//!         Selection::Candidate(entry) => println!("using {}", entry.id),
//!         Selection::Unavailable(reason) => println!("nothing usable: {reason}"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Caller loop    │── exclude(id) on failure
//! └────────┬────────┘
//!          │ next()
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ ModelSelector   │────▶│ SelectionState   │
//! │ (async mutex)   │     │ cursor/exclusion │
//! └────────┬────────┘     └──────────────────┘
//!          │ refresh when empty
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ CatalogFetcher  │────▶│ CatalogFilter    │
//! │ (HttpClient)    │     │ free + tools     │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Fetch failures never escape the fetcher: they become an empty catalog and
//! a [`FetchError`] in the [`RefreshReport`]. The only failure a selection
//! query reports is [`Selection::Unavailable`]:
//!
//! ```rust
//! use modelgate_core::{Selection, UnavailableReason};
//!
//! fn describe(selection: &Selection) -> &'static str {
//!     match selection {
//!         Selection::Candidate(_) => "ready",
//!         Selection::Unavailable(UnavailableReason::EmptyCatalog) => "catalog empty",
//!         Selection::Unavailable(UnavailableReason::Exhausted) => "all excluded",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The credential is read from the environment or passed explicitly; there
//!   is no built-in default
//! - `Debug` output of configs and auth values redacts the credential

pub mod catalog;
pub mod config;
pub mod error;
pub mod failover;
pub mod fetcher;
pub mod filter;
pub mod http_client;
pub mod refresh;
pub mod selection;
pub mod selector;

pub use catalog::{CatalogEntry, CatalogResponse, RawCatalogRecord, UNKNOWN_COST};

pub use config::SelectorConfig;

pub use error::{ConfigError, FetchError, FetchErrorKind};

pub use failover::{
    run_with_failover, AttemptError, FailoverFailure, FailoverResult, FailoverStop,
    FailoverSuccess,
};

pub use fetcher::CatalogFetcher;

pub use filter::{CatalogFilter, FilterPolicy};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpFuture, HttpRequest, HttpResponse,
    NoopHttpClient, ReqwestHttpClient,
};

pub use refresh::{elapsed_ms, RefreshCoordinator, RefreshReport};

pub use selection::{Selection, SelectionState, UnavailableReason};

pub use selector::{ModelSelector, SelectorBuilder, SelectorSnapshot};
