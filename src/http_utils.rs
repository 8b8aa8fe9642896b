//! HTTP utilities for the Ephany client.
//!
//! Wraps a pooled `reqwest::Client` carrying the authentication headers, and
//! turns transport results into [`ApiError`] kinds.
//!
//! The configured timeout bounds connecting and each read on every request.
//! JSON calls also get it as a deadline for the whole exchange; downloads do
//! not, so a slow but steady body is never cut off.

use std::{future::Future, time::Duration};

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};
use url::Url;

use crate::{
    auth,
    configuration::{ClientConfig, ConfigurationError},
    error::ApiError,
};

/// HTTP client wrapper with common request handling logic
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client from the given configuration
    pub fn new(config: &ClientConfig) -> Result<HttpClient, ConfigurationError> {
        let headers = auth::default_headers(config.credential())?;
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()
            .map_err(ConfigurationError::HttpClient)?;

        Ok(HttpClient {
            client,
            base_url: config.base_url().clone(),
            timeout: config.timeout(),
        })
    }

    /// Resolve a path relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::invalid_argument("path", format!("{}: {}", path, e)))
    }

    /// GET `url` with `query` and decode the JSON body
    pub async fn get_json<T>(
        &self,
        url: Url,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        cancellable(cancel, async {
            let response = self.send_get(url, query, Some(self.timeout)).await?;
            let request_url = response.url().to_string();

            let response_text = response
                .text()
                .await
                .map_err(|e| ApiError::connectivity(request_url.clone(), e))?;
            trace!("Raw response text for deserialization: {}", response_text);

            serde_json::from_str::<T>(&response_text).map_err(|e| {
                error!(
                    "Failed to deserialize response from {}: {}. Raw response: {}",
                    request_url, e, response_text
                );
                ApiError::Parse { source: e }
            })
        })
        .await
    }

    /// GET `url` and return as soon as the response headers arrived.
    ///
    /// The status has already been checked; the body is left unread. There is
    /// no overall deadline, only the per-read timeout.
    pub async fn open(&self, url: Url, cancel: &CancellationToken) -> Result<Response, ApiError> {
        cancellable(cancel, self.send_get(url, &[], None)).await
    }

    async fn send_get(
        &self,
        url: Url,
        query: &[(&str, String)],
        deadline: Option<Duration>,
    ) -> Result<Response, ApiError> {
        let url_string = url.to_string();
        debug!("GET {} {:?}", url_string, query);

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::connectivity(url_string.clone(), e))?;

        check_status(response)
    }
}

/// Classify the response status: 401/403 are authentication failures, any
/// other non-success status is an HTTP error.
fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        debug!("Received authentication error ({}) from {}", status, response.url());
        Err(ApiError::Authentication { status })
    } else if status.is_success() {
        Ok(response)
    } else {
        debug!("Received error status {} from {}", status, response.url());
        Err(ApiError::Http {
            url: response.url().to_string(),
            status,
        })
    }
}

/// Run `operation` unless `cancel` fires first.
///
/// When the token fires, the operation future is dropped, which aborts any
/// in-flight request, and [`ApiError::Cancelled`] is returned.
pub async fn cancellable<F, T>(cancel: &CancellationToken, operation: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Operation cancelled");
            Err(ApiError::Cancelled)
        }
        result = operation => result,
    }
}
