//! HTTP transport.
//!
//! The acquisition loop only needs "GET this URL, give me the body", so it
//! talks to a [`Transport`]. [`HttpTransport`] is the real implementation
//! on top of `reqwest`; tests substitute an in-memory one.

use arda_source_models::{EndpointDefinition, QueryUrl, RetryConfig};
use async_trait::async_trait;

use crate::{SourceError, retry};

/// Something that can fetch the body of a query URL.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] on network failure and
    /// [`SourceError::Status`] on a non-2xx status.
    async fn get_text(&self, url: &QueryUrl) -> Result<String, SourceError>;
}

/// `reqwest`-backed [`Transport`] with a fixed `User-Agent`, a
/// per-request timeout and bounded retry.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Builds a transport sending `user_agent` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be built.
    pub fn new(user_agent: &str, retry: RetryConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(retry.timeout())
            .build()?;
        Ok(Self { client, retry })
    }

    /// Builds a transport from an endpoint's `user_agent` and `retry`
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be built.
    pub fn for_endpoint(definition: &EndpointDefinition) -> Result<Self, SourceError> {
        Self::new(&definition.user_agent, definition.retry)
    }

    async fn get_once(&self, url: &QueryUrl) -> Result<String, SourceError> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &QueryUrl) -> Result<String, SourceError> {
        retry::with_retry(&self.retry, url.as_str(), || self.get_once(url)).await
    }
}
