//! Configuration for the managed cloud platform client.

use url::Url;

use crate::error::{CloudError, Result};

/// The default platform API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.ragkit.dev/";

/// Connection parameters for the managed platform.
///
/// Construct via [`CloudConfig::builder()`]. The `app_url` (the human-facing
/// console) is derived from the API base URL by dropping a leading `api.`
/// host label unless set explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudConfig {
    api_key: String,
    base_url: Url,
    app_url: Url,
}

impl CloudConfig {
    /// Create a new builder for constructing a [`CloudConfig`].
    pub fn builder() -> CloudConfigBuilder {
        CloudConfigBuilder::default()
    }

    /// Create a config with the default base URL.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// The API key sent as a bearer token.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The platform API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The human-facing console base URL.
    pub fn app_url(&self) -> &Url {
        &self.app_url
    }

    /// Render the console deep link for a deployed pipeline.
    pub fn deploy_link(&self, project_id: &str, pipeline_id: &str) -> String {
        format!(
            "{}project/{project_id}/deploy/{pipeline_id}",
            self.app_url.as_str()
        )
    }
}

/// Derive the console URL from an API URL by dropping a leading `api.`
/// host label. URLs without that label map to themselves.
fn derive_app_url(base_url: &Url) -> Url {
    let Some(host) = base_url.host_str() else {
        return base_url.clone();
    };
    let Some(stripped) = host.strip_prefix("api.") else {
        return base_url.clone();
    };
    let mut app_url = base_url.clone();
    if app_url.set_host(Some(stripped)).is_err() {
        return base_url.clone();
    }
    app_url
}

/// Builder for constructing a validated [`CloudConfig`].
#[derive(Debug, Clone, Default)]
pub struct CloudConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    app_url: Option<String>,
}

impl CloudConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the platform API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the console base URL (otherwise derived from `base_url`).
    pub fn app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = Some(app_url.into());
        self
    }

    /// Build the [`CloudConfig`], validating the key and URLs.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Config`] if the API key is missing or empty,
    /// or [`CloudError::Url`] if a URL does not parse.
    pub fn build(self) -> Result<CloudConfig> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CloudError::Config("api_key is required".to_string()))?;

        // Trailing slash matters for Url::join.
        let base_url = normalize(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let app_url = match self.app_url.as_deref() {
            Some(url) => normalize(url)?,
            None => derive_app_url(&base_url),
        };

        Ok(CloudConfig { api_key, base_url, app_url })
    }
}

fn normalize(url: &str) -> Result<Url> {
    if url.ends_with('/') {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse(&format!("{url}/"))?)
    }
}
