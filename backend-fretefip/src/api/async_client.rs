use fretefip_core::{AsyncNegotiator, AsyncTransport, Credential, Outcome, Verb};

use super::structs::{ForecastReport, ForecastRequest, MetricsFilter, MetricsReport};
use crate::error::Result;

/// Async version of [`FretefipClient`](crate::FretefipClient).
#[derive(Debug)]
pub struct AsyncFretefipClient<H: AsyncTransport> {
    metrics: AsyncNegotiator<H>,
    forecast: AsyncNegotiator<H>,
}

impl<H: AsyncTransport + Clone> AsyncFretefipClient<H> {
    /// Create a client that uses the same HTTP client for both endpoints.
    ///
    /// # Arguments
    /// * `host_url` - Base URL of the API server
    /// * `token` - API token
    /// * `http_client` - Async HTTP client implementation
    pub fn new(host_url: &str, token: &str, http_client: H) -> Result<Self> {
        Self::with_transports(host_url, token, http_client.clone(), http_client)
    }
}

impl<H: AsyncTransport> AsyncFretefipClient<H> {
    pub fn with_transports(
        host_url: &str,
        token: &str,
        metrics_http: H,
        forecast_http: H,
    ) -> Result<Self> {
        let (metrics_url, forecast_url) = super::endpoints(host_url)?;
        let credential = Credential::new(token)?;

        Ok(Self {
            metrics: AsyncNegotiator::new(&metrics_url, credential.clone(), metrics_http)?,
            forecast: AsyncNegotiator::new(&forecast_url, credential, forecast_http)?,
        })
    }

    pub async fn metrics(&self, filter: &MetricsFilter) -> Result<Outcome<MetricsReport>> {
        let outcome = self.metrics.query(&filter.to_query()).await;
        Ok(outcome.decode()?)
    }

    pub async fn forecast(&self, request: &ForecastRequest) -> Result<Outcome<ForecastReport>> {
        let outcome = self.forecast.query(&request.to_query()).await;
        Ok(outcome.decode()?)
    }

    pub fn metrics_verb(&self) -> Verb {
        self.metrics.preferred_verb()
    }

    pub fn forecast_verb(&self) -> Verb {
        self.forecast.preferred_verb()
    }

    pub fn metrics_negotiator(&self) -> &AsyncNegotiator<H> {
        &self.metrics
    }

    pub fn forecast_negotiator(&self) -> &AsyncNegotiator<H> {
        &self.forecast
    }
}

#[cfg(feature = "reqwest-client")]
impl AsyncFretefipClient<crate::ReqwestClient> {
    /// reqwest-backed client with the default per-endpoint timeouts.
    pub fn with_default_timeouts(host_url: &str, token: &str) -> Result<Self> {
        use crate::client::{DEFAULT_TIMEOUT_SECS, FORECAST_TIMEOUT_SECS};

        Self::with_transports(
            host_url,
            token,
            crate::ReqwestClient::with_timeout(DEFAULT_TIMEOUT_SECS)?,
            crate::ReqwestClient::with_timeout(FORECAST_TIMEOUT_SECS)?,
        )
    }
}
