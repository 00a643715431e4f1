//! The language-model prediction seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One part of a multi-part prompt sent to a model.
///
/// A prompt is an ordered part sequence; for multi-modal synthesis the
/// text part always comes first, followed by image parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptPart {
    /// A textual prompt segment.
    Text {
        /// The text of the segment.
        text: String,
    },
    /// An inline-embeddable image reference (a `data:` URL).
    ImageUrl {
        /// The image data URL.
        url: String,
    },
}

/// A single textual prediction result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// The generated text.
    pub text: String,
}

/// A remote prediction endpoint that turns prompt parts into text.
///
/// Implementations wrap specific model backends behind a unified async
/// interface; tests substitute scripted mocks.
#[async_trait]
pub trait Llm: Send + Sync {
    /// A human-readable backend name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Run one prediction over the ordered prompt parts.
    async fn predict(&self, parts: &[PromptPart]) -> Result<Prediction>;
}
