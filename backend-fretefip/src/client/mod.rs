#[cfg(feature = "reqwest-client")]
mod reqwest_impl;
#[cfg(feature = "ureq-client")]
mod ureq_impl;

#[cfg(feature = "reqwest-client")]
pub use reqwest_impl::ReqwestClient;
#[cfg(feature = "ureq-client")]
pub use ureq_impl::UreqClient;

/// Per-attempt timeout of the bundled clients, matching the metrics API.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The forecast model can take a while to answer.
pub const FORECAST_TIMEOUT_SECS: u64 = 60;

#[cfg(any(feature = "ureq-client", feature = "reqwest-client"))]
const USER_AGENT: &str = concat!("fretefip/", env!("CARGO_PKG_VERSION"));
