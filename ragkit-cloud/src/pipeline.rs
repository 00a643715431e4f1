//! Pipeline creation requests and ingestion transformations.

use ragkit_core::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// How a pipeline's ingestion is executed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineType {
    /// Ingestion runs on the managed platform.
    Managed,
}

/// The kind of processing a [`Transformation`] performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformationCategory {
    /// Vector embedding of document content.
    Embedding,
    /// Splitting documents into chunks.
    Splitter,
    /// Parsing raw document formats.
    Parser,
}

/// One configured processing step applied during ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transformation {
    /// The component name, e.g. `default-embedding`.
    pub name: String,
    /// The kind of processing this step performs.
    pub category: TransformationCategory,
    /// Component-specific configuration.
    pub config: Value,
}

impl Transformation {
    /// The platform's default embedding step, used when a caller supplies
    /// no transformations.
    pub fn default_embedding() -> Self {
        Self {
            name: "default-embedding".to_string(),
            category: TransformationCategory::Embedding,
            config: json!({}),
        }
    }
}

/// The default transformation list: exactly one default embedding step.
pub fn default_transformations() -> Vec<Transformation> {
    vec![Transformation::default_embedding()]
}

/// A pipeline-creation request.
///
/// Built once per index-creation call and immutable afterwards; the
/// documents and transformations are serialized as-is to the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineCreate {
    /// The pipeline name.
    pub name: String,
    /// How ingestion is executed.
    pub pipeline_type: PipelineType,
    /// The documents fed into the pipeline.
    pub input_documents: Vec<Document>,
    /// The ordered processing steps applied during ingestion.
    pub transformations: Vec<Transformation>,
}

impl PipelineCreate {
    /// Build a managed pipeline-creation request. An omitted transformation
    /// list falls back to [`default_transformations`].
    pub fn managed(
        name: impl Into<String>,
        input_documents: Vec<Document>,
        transformations: Option<Vec<Transformation>>,
    ) -> Self {
        Self {
            name: name.into(),
            pipeline_type: PipelineType::Managed,
            input_documents,
            transformations: transformations.unwrap_or_else(default_transformations),
        }
    }
}
