//! Error types for the `ragkit-cloud` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in cloud index operations.
#[derive(Debug, Error)]
pub enum CloudError {
    /// A remote response omitted a required identifier.
    #[error("Missing identifier in {resource} response")]
    MissingIdentifier {
        /// The resource whose response lacked an id (project, pipeline, run).
        resource: &'static str,
    },

    /// The remote ingestion run reported an error status.
    #[error("Ingestion run failed")]
    IngestionFailed,

    /// The ingestion run did not reach a terminal status within the
    /// configured deadline.
    #[error("Ingestion run still pending after {0:?}")]
    IngestionTimeout(Duration),

    /// An index cannot be created from an empty document set.
    #[error("Document set must not be empty")]
    EmptyDocuments,

    /// The remote service returned a non-success HTTP status.
    #[error("API error (status {code}): {}", description.as_deref().unwrap_or("none"))]
    Api {
        /// The HTTP status code.
        code: u16,
        /// The response body, if one could be read.
        description: Option<String>,
    },

    /// An HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A base or endpoint URL could not be constructed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// An error propagated from `ragkit-core` (e.g. during synthesis in a
    /// query engine).
    #[error(transparent)]
    Core(#[from] ragkit_core::CoreError),
}

/// A convenience result type for cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;
