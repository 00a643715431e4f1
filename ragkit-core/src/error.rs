//! Error types for the `ragkit-core` crate.

use thiserror::Error;

/// Errors that can occur in core content handling and synthesis.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A requested mode of operation is not supported by this version.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A prompt template produced a shape the caller cannot consume
    /// (e.g. a chat-style message list where a flat string was required).
    #[error("Invalid prompt shape: {0}")]
    InvalidPromptShape(String),

    /// An image payload could not be converted into an inline data URL.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// An error from a language-model prediction backend.
    #[error("Prediction error ({provider}): {message}")]
    Prediction {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
