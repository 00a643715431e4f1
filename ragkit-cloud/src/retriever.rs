//! Retrieval from a deployed cloud pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use ragkit_core::{Node, NodeWithScore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::PlatformApi;
use crate::error::Result;

/// Call-time retrieval parameters.
///
/// Every field is optional; unset fields fall back to the index handle's
/// stored defaults via [`merge_retrieve_params`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrieveParams {
    /// Number of results to return.
    pub top_k: Option<usize>,
    /// Platform-side metadata filters applied before similarity search.
    pub filters: Option<Value>,
}

/// Merge stored defaults with call-site overrides, field by field.
///
/// Precedence: a field set in `overrides` wins; an unset field falls back
/// to `defaults`. Neither input is mutated.
pub fn merge_retrieve_params(
    defaults: &RetrieveParams,
    overrides: &RetrieveParams,
) -> RetrieveParams {
    RetrieveParams {
        top_k: overrides.top_k.or(defaults.top_k),
        filters: overrides.filters.clone().or_else(|| defaults.filters.clone()),
    }
}

/// Fetches scored nodes relevant to a query.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve nodes for the query, best first.
    async fn retrieve(&self, query: &str) -> Result<Vec<NodeWithScore>>;
}

/// A [`Retriever`] over a deployed managed pipeline.
///
/// Construction is pure; the only remote call happens in
/// [`retrieve`](Retriever::retrieve).
pub struct CloudRetriever {
    api: Arc<dyn PlatformApi>,
    pipeline_id: String,
    params: RetrieveParams,
}

impl CloudRetriever {
    /// Create a retriever for a pipeline with its effective parameters.
    pub fn new(
        api: Arc<dyn PlatformApi>,
        pipeline_id: impl Into<String>,
        params: RetrieveParams,
    ) -> Self {
        Self { api, pipeline_id: pipeline_id.into(), params }
    }

    /// The effective retrieval parameters after merging.
    pub fn params(&self) -> &RetrieveParams {
        &self.params
    }

    /// The pipeline this retriever searches.
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }
}

#[async_trait]
impl Retriever for CloudRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<NodeWithScore>> {
        let response = self.api.run_search(&self.pipeline_id, query, &self.params).await?;
        debug!(
            pipeline_id = %self.pipeline_id,
            hits = response.retrieval_nodes.len(),
            "pipeline search completed"
        );

        Ok(response
            .retrieval_nodes
            .into_iter()
            .map(|chunk| {
                let mut node = Node::text(chunk.text);
                node.id = chunk.id;
                NodeWithScore::new(node, chunk.score)
            })
            .collect())
    }
}
