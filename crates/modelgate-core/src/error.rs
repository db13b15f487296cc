use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Classification of a failed catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Transport failure or timeout; no response was received.
    Network,
    /// The endpoint answered with a status other than 200.
    Status,
    /// The body did not match the catalog shape.
    Decode,
}

/// Structured fetch failure.
///
/// The fetcher recovers from every variant locally; this type exists so the
/// refresh report and tests can name the condition that produced an empty
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    status: Option<u16>,
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            message: message.into(),
            status: None,
        }
    }

    pub fn status(status: u16, body_excerpt: &str) -> Self {
        let message = if body_excerpt.is_empty() {
            format!("catalog endpoint returned status {status}")
        } else {
            format!("catalog endpoint returned status {status}: {body_excerpt}")
        };
        Self {
            kind: FetchErrorKind::Status,
            message,
            status: Some(status),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            message: message.into(),
            status: None,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub const fn http_status(&self) -> Option<u16> {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Network => "catalog.network",
            FetchErrorKind::Status => "catalog.status",
            FetchErrorKind::Decode => "catalog.decode",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Configuration errors raised while building a selector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("catalog credential is missing; set MODELGATE_API_KEY or OPENROUTER_API_KEY")]
    MissingCredential,

    #[error("catalog base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },

    #[error("timeout must be a positive number of milliseconds: '{value}'")]
    InvalidTimeout { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_code_and_status() {
        let error = FetchError::status(500, "upstream exploded");

        assert_eq!(error.kind(), FetchErrorKind::Status);
        assert_eq!(error.http_status(), Some(500));
        assert_eq!(error.code(), "catalog.status");
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn missing_credential_names_both_variables() {
        let rendered = ConfigError::MissingCredential.to_string();

        assert!(rendered.contains("MODELGATE_API_KEY"));
        assert!(rendered.contains("OPENROUTER_API_KEY"));
    }
}
