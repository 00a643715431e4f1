//! Query engine adapter over a retriever.

use std::sync::Arc;

use ragkit_core::{MetadataMode, NodeWithScore, SynthesizedResponse, Synthesizer};
use tracing::info;

use crate::error::Result;
use crate::retriever::Retriever;

/// Reorders or filters retrieved nodes before synthesis.
pub trait NodePostprocessor: Send + Sync {
    /// Transform the scored node list for the given query.
    fn postprocess(&self, nodes: Vec<NodeWithScore>, query: &str) -> Vec<NodeWithScore>;
}

/// A request/response engine: retrieve, postprocess, synthesize.
///
/// When no synthesizer is injected the engine answers with the retrieved
/// text context joined verbatim, making retrieval usable without a model
/// backend.
pub struct RetrieverQueryEngine {
    retriever: Arc<dyn Retriever>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    postprocessors: Vec<Arc<dyn NodePostprocessor>>,
}

impl RetrieverQueryEngine {
    /// Create an engine over a retriever with no synthesizer or
    /// postprocessors.
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever, synthesizer: None, postprocessors: Vec::new() }
    }

    /// Inject a response synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Append a node postprocessor; postprocessors run in insertion order.
    pub fn with_postprocessor(mut self, postprocessor: Arc<dyn NodePostprocessor>) -> Self {
        self.postprocessors.push(postprocessor);
        self
    }

    /// Answer a query: retrieve nodes, run postprocessors, synthesize.
    pub async fn query(&self, query: &str) -> Result<SynthesizedResponse> {
        let mut nodes = self.retriever.retrieve(query).await?;
        for postprocessor in &self.postprocessors {
            nodes = postprocessor.postprocess(nodes, query);
        }
        info!(nodes = nodes.len(), "query retrieval completed");

        match &self.synthesizer {
            Some(synthesizer) => Ok(synthesizer.synthesize(query, &nodes, false).await?),
            None => {
                let text = nodes
                    .iter()
                    .map(|scored| scored.node.text_content(MetadataMode::None))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                Ok(SynthesizedResponse { text, source_nodes: nodes })
            }
        }
    }
}
