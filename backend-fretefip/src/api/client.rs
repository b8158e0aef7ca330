use fretefip_core::{Credential, Negotiator, Outcome, Transport, Verb};

use super::structs::{ForecastReport, ForecastRequest, MetricsFilter, MetricsReport};
use crate::error::Result;

/// Blocking client for the freight metrics and forecast APIs.
///
/// Each endpoint has its own negotiator, so each learns independently whether
/// the server takes `POST` or only `GET`.
#[derive(Debug)]
pub struct FretefipClient<H: Transport> {
    metrics: Negotiator<H>,
    forecast: Negotiator<H>,
}

impl<H: Transport + Clone> FretefipClient<H> {
    /// Create a client that uses the same HTTP client for both endpoints.
    ///
    /// # Arguments
    /// * `host_url` - Base URL of the API server
    /// * `token` - API token
    /// * `http_client` - HTTP client implementation
    pub fn new(host_url: &str, token: &str, http_client: H) -> Result<Self> {
        Self::with_transports(host_url, token, http_client.clone(), http_client)
    }
}

impl<H: Transport> FretefipClient<H> {
    /// Create a client with a separate HTTP client per endpoint, e.g. to give
    /// the forecast endpoint a longer timeout.
    pub fn with_transports(
        host_url: &str,
        token: &str,
        metrics_http: H,
        forecast_http: H,
    ) -> Result<Self> {
        let (metrics_url, forecast_url) = super::endpoints(host_url)?;
        let credential = Credential::new(token)?;

        Ok(Self {
            metrics: Negotiator::new(&metrics_url, credential.clone(), metrics_http)?,
            forecast: Negotiator::new(&forecast_url, credential, forecast_http)?,
        })
    }

    /// Query freight metrics. `Err` only if a successful payload does not
    /// match [`MetricsReport`].
    pub fn metrics(&self, filter: &MetricsFilter) -> Result<Outcome<MetricsReport>> {
        Ok(self.metrics.query(&filter.to_query()).decode()?)
    }

    /// Query a price forecast. `Err` only if a successful payload does not
    /// match [`ForecastReport`].
    pub fn forecast(&self, request: &ForecastRequest) -> Result<Outcome<ForecastReport>> {
        Ok(self.forecast.query(&request.to_query()).decode()?)
    }

    pub fn metrics_verb(&self) -> Verb {
        self.metrics.preferred_verb()
    }

    pub fn forecast_verb(&self) -> Verb {
        self.forecast.preferred_verb()
    }

    /// Raw access to the metrics endpoint.
    pub fn metrics_negotiator(&self) -> &Negotiator<H> {
        &self.metrics
    }

    /// Raw access to the forecast endpoint.
    pub fn forecast_negotiator(&self) -> &Negotiator<H> {
        &self.forecast
    }
}

#[cfg(feature = "ureq-client")]
impl FretefipClient<crate::UreqClient> {
    /// ureq-backed client with the default per-endpoint timeouts.
    pub fn with_default_timeouts(host_url: &str, token: &str) -> Result<Self> {
        use crate::client::{DEFAULT_TIMEOUT_SECS, FORECAST_TIMEOUT_SECS};

        Self::with_transports(
            host_url,
            token,
            crate::UreqClient::with_timeout(DEFAULT_TIMEOUT_SECS),
            crate::UreqClient::with_timeout(FORECAST_TIMEOUT_SECS),
        )
    }
}
