#[cfg(not(any(feature = "async", feature = "sync")))]
compile_error!("At least one of the features `async` or `sync` must be enabled.");

mod api;
mod client;
pub mod error;

pub use api::*;
pub use client::*;
pub use error::{Error, Result};

// Re-export core types for convenience
pub use fretefip_core;
pub use fretefip_core::{
    Credential, Outcome, Query, QueryValue, Scalar, TransportError, TransportRequest,
    TransportResponse, Verb,
};

#[cfg(feature = "async")]
pub use fretefip_core::{AsyncNegotiator, AsyncTransport};
#[cfg(feature = "sync")]
pub use fretefip_core::{Negotiator, Transport};
