//! Managed cloud index client for RagKit.
//!
//! This crate provides:
//! - The [`PlatformApi`] surface and its HTTPS implementation
//! - Pipeline-creation requests and default ingestion transformations
//! - An explicit ingestion-run polling state machine
//! - The [`CloudIndex`] handle with retriever and query-engine adapters

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod index;
pub mod pipeline;
pub mod poll;
pub mod retriever;

pub use api::{
    IngestionRun, IngestionStatus, Pipeline, PlatformApi, Project, RetrievedChunk,
    RunStatusResponse, SearchResponse,
};
pub use config::{CloudConfig, CloudConfigBuilder, DEFAULT_BASE_URL};
pub use engine::{NodePostprocessor, RetrieverQueryEngine};
pub use error::{CloudError, Result};
pub use http::HttpPlatformApi;
pub use index::{CloudIndex, FromDocumentsParams, QueryEngineParams};
pub use pipeline::{
    PipelineCreate, PipelineType, Transformation, TransformationCategory, default_transformations,
};
pub use poll::{IngestionPoller, RunState};
pub use retriever::{CloudRetriever, RetrieveParams, Retriever, merge_retrieve_params};
