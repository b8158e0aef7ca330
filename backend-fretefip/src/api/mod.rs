#[cfg(feature = "async")]
mod async_client;
#[cfg(feature = "sync")]
mod client;
mod structs;

#[cfg(feature = "async")]
pub use async_client::AsyncFretefipClient;
#[cfg(feature = "sync")]
pub use client::FretefipClient;
pub use structs::*;

use url::Url;

use crate::error::Result;

/// Path of the freight metrics endpoint, relative to the host.
pub const METRICS_PATH: &str = "api/external/metrics";

/// Path of the price forecast endpoint, relative to the host.
pub const FORECAST_PATH: &str = "api/forecast/predict";

/// Resolve both endpoint URLs against `host_url`.
fn endpoints(host_url: &str) -> Result<(String, String)> {
    let mut host_url = Url::parse(host_url)?;

    // we need a trailing slash, if not present we append it
    if !host_url.path().ends_with('/') {
        host_url.set_path(&format!("{}/", host_url.path()));
    }

    let metrics = host_url.join(METRICS_PATH)?;
    let forecast = host_url.join(FORECAST_PATH)?;
    Ok((metrics.into(), forecast.into()))
}
