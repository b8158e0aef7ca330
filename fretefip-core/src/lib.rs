#[cfg(not(any(feature = "async", feature = "sync")))]
compile_error!("At least one of the features `async` or `sync` must be enabled.");

mod classifier;
mod credential;
mod encoder;
pub mod error;
mod negotiator;
mod query;
mod transport;

pub use serde_json;
pub use url;

pub use classifier::{classify, Classification, Outcome, MESSAGE_EXCERPT_CHARS};
pub use credential::Credential;
pub use encoder::{encode, TOKEN_PARAM};
pub use error::{Error, Result};
pub use negotiator::*;
pub use query::{Query, QueryValue, Scalar};
pub use transport::*;
