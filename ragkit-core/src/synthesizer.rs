//! Multi-modal response synthesis.
//!
//! The [`MultiModalSynthesizer`] merges retrieved text and image nodes with
//! a query into a single multi-part prompt and forwards it to an [`Llm`]
//! backend: partition nodes by kind, render text context through the
//! text-QA template, inline image payloads as data URLs, then predict.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::image::to_data_url;
use crate::llm::{Llm, PromptPart};
use crate::node::{MetadataMode, Node, NodeContent, NodeWithScore, split_nodes_by_kind};
use crate::prompt::{PromptOutput, PromptTemplate};

/// A generated answer together with the nodes it was grounded on.
///
/// `source_nodes` is the caller's original scored node list, order intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynthesizedResponse {
    /// The generated answer text.
    pub text: String,
    /// The scored nodes the answer was synthesized from.
    pub source_nodes: Vec<NodeWithScore>,
}

/// Turns a query plus retrieved nodes into a final answer.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize a response. `streaming` requests a streamed result;
    /// implementations that do not support it must fail with
    /// [`CoreError::NotImplemented`].
    async fn synthesize(
        &self,
        query: &str,
        nodes: &[NodeWithScore],
        streaming: bool,
    ) -> Result<SynthesizedResponse>;
}

/// A [`Synthesizer`] that assembles one text part plus inline image parts.
///
/// Only the non-streaming path is supported in this version.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit_core::MultiModalSynthesizer;
///
/// let synthesizer = MultiModalSynthesizer::new(llm);
/// let response = synthesizer.synthesize("what is shown?", &scored_nodes, false).await?;
/// ```
pub struct MultiModalSynthesizer {
    llm: Arc<dyn Llm>,
    metadata_mode: MetadataMode,
    text_qa_template: PromptTemplate,
}

impl MultiModalSynthesizer {
    /// Create a synthesizer with [`MetadataMode::None`] and the default
    /// text-QA template.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm, metadata_mode: MetadataMode::None, text_qa_template: PromptTemplate::default() }
    }

    /// Set the metadata rendering mode for text context.
    pub fn with_metadata_mode(mut self, mode: MetadataMode) -> Self {
        self.metadata_mode = mode;
        self
    }

    /// Set the text-QA prompt template.
    pub fn with_text_qa_template(mut self, template: PromptTemplate) -> Self {
        self.text_qa_template = template;
        self
    }

    /// Return the current text-QA prompt template.
    pub fn text_qa_template(&self) -> &PromptTemplate {
        &self.text_qa_template
    }

    /// Replace the text-QA template if a new one is supplied; no-op on `None`.
    pub fn update_text_qa_template(&mut self, template: Option<PromptTemplate>) {
        if let Some(template) = template {
            self.text_qa_template = template;
        }
    }

    /// Format the text prompt from the rendered context and the query,
    /// rejecting chat-shaped template output.
    fn format_text_prompt(&self, context: &str, query: &str) -> Result<String> {
        match self.text_qa_template.format(context, query) {
            PromptOutput::Text(prompt) => Ok(prompt),
            PromptOutput::Messages(_) => Err(CoreError::InvalidPromptShape(
                "text QA template produced a chat message list; a flat string is required".into(),
            )),
        }
    }
}

#[async_trait]
impl Synthesizer for MultiModalSynthesizer {
    async fn synthesize(
        &self,
        query: &str,
        nodes: &[NodeWithScore],
        streaming: bool,
    ) -> Result<SynthesizedResponse> {
        if streaming {
            return Err(CoreError::NotImplemented("streaming synthesis".into()));
        }

        let (text_nodes, image_nodes) = split_nodes_by_kind(nodes.iter().map(|s| &s.node));
        debug!(
            text_nodes = text_nodes.len(),
            image_nodes = image_nodes.len(),
            "partitioned nodes for synthesis"
        );

        let context = text_nodes
            .iter()
            .map(|node| node.text_content(self.metadata_mode))
            .collect::<Vec<_>>()
            .join("\n\n");

        // The template shape is validated before any image work or remote
        // call so a bad template fails fast.
        let text_prompt = self.format_text_prompt(&context, query)?;

        let images = try_join_all(image_nodes.iter().copied().map(inline_image)).await?;

        let mut parts = Vec::with_capacity(1 + images.len());
        parts.push(PromptPart::Text { text: text_prompt });
        parts.extend(images.into_iter().map(|url| PromptPart::ImageUrl { url }));

        let prediction = self.llm.predict(&parts).await?;
        info!(
            model = self.llm.name(),
            parts = parts.len(),
            "multi-modal synthesis completed"
        );

        Ok(SynthesizedResponse { text: prediction.text, source_nodes: nodes.to_vec() })
    }
}

/// Inline a single image node's payload as a data URL.
async fn inline_image(node: &Node) -> Result<String> {
    match &node.content {
        NodeContent::Image { source } => to_data_url(source).await,
        NodeContent::Text { .. } => Err(CoreError::ImageConversion(format!(
            "node '{}' is not an image node",
            node.id
        ))),
    }
}
