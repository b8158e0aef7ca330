use std::time::Duration;

use async_trait::async_trait;
use fretefip_core::{AsyncTransport, TransportError, TransportRequest, TransportResponse, Verb};

use super::{DEFAULT_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

/// Async transport using reqwest.
///
/// Requires a tokio runtime at the call site. Error statuses are handed back
/// as responses; only failures that produce no response become a
/// [`TransportError`].
///
/// # Example
///
/// ```ignore
/// use backend_fretefip::{AsyncFretefipClient, ReqwestClient};
///
/// #[tokio::main]
/// async fn main() -> backend_fretefip::Result<()> {
///     let client = AsyncFretefipClient::new(
///         "https://fretefip.up.railway.app",
///         "token",
///         ReqwestClient::new()?,
///     )?;
///     let report = client.metrics(&Default::default()).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new reqwest client with the default 30 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new reqwest client with a custom per-request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a new reqwest client with a custom client configuration.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AsyncTransport for ReqwestClient {
    async fn send(
        &self,
        request: &TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let method = match request.verb {
            Verb::Post => reqwest::Method::POST,
            Verb::Get => reqwest::Method::GET,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            let error = transport_error(e);
            log::debug!("{} {} failed: {}", request.verb, request.url.path(), error);
            error
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Map a reqwest failure. The URL is stripped since a `GET` carries the token
/// in its query string.
fn transport_error(e: reqwest::Error) -> TransportError {
    let e = e.without_url();
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}
