//! The platform API surface: wire DTOs and the client trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::PipelineCreate;
use crate::retriever::RetrieveParams;

/// A project on the managed platform.
///
/// Ids are optional on the wire; callers that need one map its absence to
/// [`CloudError::MissingIdentifier`](crate::CloudError::MissingIdentifier).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// The project id, if the service assigned one.
    pub id: Option<String>,
    /// The project name.
    pub name: String,
}

/// A pipeline under a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipeline {
    /// The pipeline id, if the service assigned one.
    pub id: Option<String>,
}

/// One execution instance of a managed pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestionRun {
    /// The run id, if the service assigned one.
    pub id: Option<String>,
}

/// The reported state of an ingestion run.
///
/// Statuses the client does not recognize deserialize as
/// [`Unknown`](IngestionStatus::Unknown) and are treated as non-terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionStatus {
    /// The run has not reached a terminal state.
    Pending,
    /// The run completed successfully.
    Success,
    /// The run failed.
    Error,
    /// A status value this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// The status-poll response for an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunStatusResponse {
    /// The current run status.
    pub status: IngestionStatus,
}

/// A retrieval hit on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    /// The node id assigned by the platform.
    pub id: String,
    /// The chunk text.
    pub text: String,
    /// The relevance score (higher is more relevant).
    pub score: f32,
}

/// The retrieval response for a pipeline search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// The retrieved chunks, best first.
    pub retrieval_nodes: Vec<RetrievedChunk>,
}

/// The remote platform client.
///
/// One method per REST operation; implementations are stateless per call.
/// Tests substitute scripted mocks to drive orchestration paths.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Create or update a project by name.
    async fn upsert_project(&self, name: &str) -> Result<Project>;

    /// Create or update a pipeline under a project.
    async fn upsert_pipeline(&self, project_id: &str, request: &PipelineCreate)
    -> Result<Pipeline>;

    /// Start a managed ingestion run for a pipeline.
    async fn start_managed_ingestion(&self, pipeline_id: &str) -> Result<IngestionRun>;

    /// Fetch the current status of an ingestion run.
    async fn get_ingestion_status(
        &self,
        pipeline_id: &str,
        run_id: &str,
    ) -> Result<RunStatusResponse>;

    /// Run a similarity search against a deployed pipeline.
    async fn run_search(
        &self,
        pipeline_id: &str,
        query: &str,
        params: &RetrieveParams,
    ) -> Result<SearchResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_status_deserializes_as_unknown() {
        let response: RunStatusResponse =
            serde_json::from_str(r#"{"status": "PARTIAL_SUCCESS"}"#).unwrap();
        assert_eq!(response.status, IngestionStatus::Unknown);
    }

    #[test]
    fn known_statuses_deserialize() {
        let response: RunStatusResponse = serde_json::from_str(r#"{"status": "SUCCESS"}"#).unwrap();
        assert_eq!(response.status, IngestionStatus::Success);
    }
}
