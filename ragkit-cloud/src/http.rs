//! The reqwest-backed [`PlatformApi`] implementation.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::api::{
    IngestionRun, Pipeline, PlatformApi, Project, RunStatusResponse, SearchResponse,
};
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::pipeline::PipelineCreate;
use crate::retriever::RetrieveParams;

/// A [`PlatformApi`] over HTTPS with bearer-token authentication.
///
/// The API key is installed as a default header on the underlying client;
/// every call is a stateless request against the configured base URL.
pub struct HttpPlatformApi {
    http: Client,
    base_url: Url,
}

impl HttpPlatformApi {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Config`] if the API key cannot be used as a
    /// header value, or [`CloudError::Http`] if the client cannot be built.
    pub fn new(config: &CloudConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|_| CloudError::Config("api_key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http, base_url: config.base_url().clone() })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Map a non-success HTTP status to [`CloudError::Api`], carrying the
    /// response body as the description when it can be read.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let description = response.text().await.ok();
            Err(CloudError::Api { code: status.as_u16(), description })
        }
    }

    async fn get_json<Res: DeserializeOwned>(&self, url: Url) -> Result<Res> {
        debug!(%url, method = "GET", "platform request");
        let response = self.http.get(url).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<Req: Serialize + ?Sized, Res: DeserializeOwned>(
        &self,
        url: Url,
        body: &Req,
    ) -> Result<Res> {
        debug!(%url, method = "POST", "platform request");
        let response = self.http.post(url).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn upsert_project(&self, name: &str) -> Result<Project> {
        let url = self.endpoint("api/v1/projects")?;
        self.post_json(url, &json!({ "name": name })).await
    }

    async fn upsert_pipeline(
        &self,
        project_id: &str,
        request: &PipelineCreate,
    ) -> Result<Pipeline> {
        let url = self.endpoint(&format!("api/v1/projects/{project_id}/pipelines"))?;
        self.post_json(url, request).await
    }

    async fn start_managed_ingestion(&self, pipeline_id: &str) -> Result<IngestionRun> {
        let url = self.endpoint(&format!("api/v1/pipelines/{pipeline_id}/managed-ingestion"))?;
        self.post_json(url, &json!({})).await
    }

    async fn get_ingestion_status(
        &self,
        pipeline_id: &str,
        run_id: &str,
    ) -> Result<RunStatusResponse> {
        let url =
            self.endpoint(&format!("api/v1/pipelines/{pipeline_id}/managed-ingestion/{run_id}"))?;
        self.get_json(url).await
    }

    async fn run_search(
        &self,
        pipeline_id: &str,
        query: &str,
        params: &RetrieveParams,
    ) -> Result<SearchResponse> {
        let url = self.endpoint(&format!("api/v1/pipelines/{pipeline_id}/retrieve"))?;
        let mut body = json!({ "query": query });
        if let Some(top_k) = params.top_k {
            body["top_k"] = json!(top_k);
        }
        if let Some(filters) = &params.filters {
            body["filters"] = filters.clone();
        }
        self.post_json(url, &body).await
    }
}
