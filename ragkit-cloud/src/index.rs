//! The managed cloud index handle.
//!
//! [`CloudIndex::from_documents`] drives the full deployment sequence:
//! build a pipeline-creation request, upsert project and pipeline, start a
//! managed ingestion run, and wait for it to finish. The resulting handle
//! is immutable; retrievers and query engines are constructed fresh on
//! demand without further remote calls.

use std::io::Write;
use std::sync::Arc;

use ragkit_core::{Document, Synthesizer};
use tracing::info;

use crate::api::PlatformApi;
use crate::config::CloudConfig;
use crate::engine::{NodePostprocessor, RetrieverQueryEngine};
use crate::error::{CloudError, Result};
use crate::http::HttpPlatformApi;
use crate::pipeline::{PipelineCreate, Transformation};
use crate::poll::IngestionPoller;
use crate::retriever::{CloudRetriever, RetrieveParams, merge_retrieve_params};

/// Parameters for [`CloudIndex::from_documents`].
pub struct FromDocumentsParams {
    /// The index (and pipeline, and project) name.
    pub name: String,
    /// The documents to ingest; must be non-empty.
    pub documents: Vec<Document>,
    /// Ingestion steps; `None` selects the single default embedding step.
    pub transformations: Option<Vec<Transformation>>,
    /// Emit human-readable progress lines to stdout.
    pub verbose: bool,
    /// Controls the ingestion status poll.
    pub poller: IngestionPoller,
    /// Default retrieval parameters carried by the resulting handle.
    pub retrieve_defaults: RetrieveParams,
}

impl FromDocumentsParams {
    /// Create parameters with defaults: default transformations, quiet
    /// output, one-second unbounded polling.
    pub fn new(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents,
            transformations: None,
            verbose: false,
            poller: IngestionPoller::default(),
            retrieve_defaults: RetrieveParams::default(),
        }
    }

    /// Set explicit ingestion transformations.
    pub fn with_transformations(mut self, transformations: Vec<Transformation>) -> Self {
        self.transformations = Some(transformations);
        self
    }

    /// Enable or disable console progress output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replace the ingestion poller.
    pub fn with_poller(mut self, poller: IngestionPoller) -> Self {
        self.poller = poller;
        self
    }

    /// Set the default retrieval parameters the handle will carry.
    pub fn with_retrieve_defaults(mut self, params: RetrieveParams) -> Self {
        self.retrieve_defaults = params;
        self
    }
}

/// Optional components for [`CloudIndex::as_query_engine`].
#[derive(Default)]
pub struct QueryEngineParams {
    /// Call-site retrieval overrides.
    pub retrieve: RetrieveParams,
    /// A response synthesizer; omitted, the engine answers with joined
    /// retrieved text.
    pub synthesizer: Option<Arc<dyn Synthesizer>>,
    /// Node postprocessors, run in order after retrieval.
    pub postprocessors: Vec<Arc<dyn NodePostprocessor>>,
}

/// A handle to a deployed managed index.
///
/// Returned only after the backing ingestion run reached a terminal
/// success status. The handle stores its construction parameters and never
/// mutates them; [`as_retriever`](CloudIndex::as_retriever) and
/// [`as_query_engine`](CloudIndex::as_query_engine) are pure constructors.
pub struct CloudIndex {
    api: Arc<dyn PlatformApi>,
    config: CloudConfig,
    name: String,
    project_id: String,
    pipeline_id: String,
    retrieve_defaults: RetrieveParams,
}

impl std::fmt::Debug for CloudIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudIndex")
            .field("name", &self.name)
            .field("project_id", &self.project_id)
            .field("pipeline_id", &self.pipeline_id)
            .finish_non_exhaustive()
    }
}

impl CloudIndex {
    /// Attach a handle to an already-deployed pipeline.
    pub fn new(
        api: Arc<dyn PlatformApi>,
        config: CloudConfig,
        name: impl Into<String>,
        project_id: impl Into<String>,
        pipeline_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            config,
            name: name.into(),
            project_id: project_id.into(),
            pipeline_id: pipeline_id.into(),
            retrieve_defaults: RetrieveParams::default(),
        }
    }

    /// Deploy documents as a managed index over HTTPS.
    ///
    /// Convenience wrapper that builds an [`HttpPlatformApi`] from the
    /// config and delegates to [`from_documents`](Self::from_documents).
    pub async fn from_documents_http(
        config: CloudConfig,
        params: FromDocumentsParams,
    ) -> Result<Self> {
        let api = Arc::new(HttpPlatformApi::new(&config)?);
        Self::from_documents(api, config, params).await
    }

    /// Deploy documents as a managed index using the given platform client.
    ///
    /// Sequential remote steps: upsert project, upsert pipeline, start a
    /// managed ingestion run, then poll its status until terminal. Each
    /// step's response must carry an id before the next step is attempted.
    /// A partially created project or pipeline is left in place if a later
    /// step fails; there is no compensating deletion.
    ///
    /// # Errors
    ///
    /// - [`CloudError::EmptyDocuments`] for an empty document set.
    /// - [`CloudError::MissingIdentifier`] if a response omits its id.
    /// - [`CloudError::IngestionFailed`] / [`CloudError::IngestionTimeout`]
    ///   from the status poll.
    /// - Any transport error, propagated unmodified.
    pub async fn from_documents(
        api: Arc<dyn PlatformApi>,
        config: CloudConfig,
        params: FromDocumentsParams,
    ) -> Result<Self> {
        if params.documents.is_empty() {
            return Err(CloudError::EmptyDocuments);
        }

        let request =
            PipelineCreate::managed(&params.name, params.documents, params.transformations);

        let project = api.upsert_project(&params.name).await?;
        let project_id =
            project.id.ok_or(CloudError::MissingIdentifier { resource: "project" })?;

        let pipeline = api.upsert_pipeline(&project_id, &request).await?;
        let pipeline_id =
            pipeline.id.ok_or(CloudError::MissingIdentifier { resource: "pipeline" })?;

        info!(%project_id, %pipeline_id, name = %params.name, "pipeline upserted");
        if params.verbose {
            println!("Created pipeline {pipeline_id} with name {}", params.name);
        }

        let run = api.start_managed_ingestion(&pipeline_id).await?;
        let run_id = run.id.ok_or(CloudError::MissingIdentifier { resource: "ingestion run" })?;

        let verbose = params.verbose;
        params
            .poller
            .wait_until_terminal(api.as_ref(), &pipeline_id, &run_id, || {
                if verbose {
                    print!(".");
                    let _ = std::io::stdout().flush();
                }
            })
            .await?;

        let link = config.deploy_link(&project_id, &pipeline_id);
        info!(%link, "index deployed");
        if verbose {
            println!("Ingestion completed, find your index at {link}");
        }

        Ok(Self {
            api,
            config,
            name: params.name,
            project_id,
            pipeline_id,
            retrieve_defaults: params.retrieve_defaults,
        })
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The platform project id.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// The deployed pipeline id.
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Construct a retriever over this index.
    ///
    /// Pure construction, no remote call; `overrides` are merged over the
    /// handle's stored defaults with call-site precedence.
    pub fn as_retriever(&self, overrides: RetrieveParams) -> CloudRetriever {
        let params = merge_retrieve_params(&self.retrieve_defaults, &overrides);
        CloudRetriever::new(self.api.clone(), self.pipeline_id.clone(), params)
    }

    /// Construct a query engine over this index.
    ///
    /// Pure construction, no remote call; wraps a fresh retriever and
    /// injects the caller's synthesizer and postprocessors.
    pub fn as_query_engine(&self, params: QueryEngineParams) -> RetrieverQueryEngine {
        let retriever = Arc::new(self.as_retriever(params.retrieve));
        let mut engine = RetrieverQueryEngine::new(retriever);
        if let Some(synthesizer) = params.synthesizer {
            engine = engine.with_synthesizer(synthesizer);
        }
        for postprocessor in params.postprocessors {
            engine = engine.with_postprocessor(postprocessor);
        }
        engine
    }
}
