use anyhow::{Context, Result};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;

mod error;
mod exercises;
mod feedback;
mod plans;
mod retry;
mod schedule;

pub use error::{error_message, ApiError};
pub use plans::plan_path;
pub use retry::RetryConfig;

/// Generic `{success, message, error}` envelope for mutating calls
#[derive(Debug, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default = "default_true")]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ActionResponse {
    /// Turn a `success: false` body into an error
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            let message = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "Request was not accepted".to_string());
            Err(ApiError::Rejected(message).into())
        }
    }
}

/// API client for the Lasko backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &Config) -> Result<Self> {
        let retry_config = RetryConfig::with_max_retries(config.api.max_retries);
        Self::with_retry_config(config, retry_config)
    }

    /// Create a new API client with custom retry configuration
    pub fn with_retry_config(config: &Config, retry_config: RetryConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            token: config.auth.token.clone(),
            retry_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Result<&str> {
        if self.token.is_empty() {
            return Err(ApiError::NotAuthenticated.into());
        }
        Ok(&self.token)
    }

    /// Authenticated GET, retried per the retry configuration
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.token()?;
        let url = self.url(path);
        let url = url.as_str();
        let client = &self.client;

        tracing::debug!("GET {}", url);

        self.retry_config
            .execute(|| async move {
                let response = client
                    .get(url)
                    .bearer_auth(token)
                    .send()
                    .await
                    .with_context(|| format!("Failed to send GET {}", url))?;

                parse_response(response).await
            })
            .await
    }

    /// Authenticated request with an optional JSON body. Sent exactly once.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.token()?;
        let url = self.url(path);

        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {} {}", method, url))?;

        parse_response(response).await
    }

    /// Mutating call whose response is a plain action envelope
    pub async fn action<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ActionResponse>
    where
        B: Serialize + ?Sized,
    {
        let response: ActionResponse = self.send_json(method, path, body).await?;
        response.into_result()
    }
}

/// Map non-2xx statuses to [`ApiError`] and decode the body. Empty bodies
/// decode as `{}` so DELETE/204 responses work with defaulted envelopes.
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        return Err(ApiError::from_status(status, error_message(&text)).into());
    }

    let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
    serde_json::from_str(body).context("Failed to parse response")
}
