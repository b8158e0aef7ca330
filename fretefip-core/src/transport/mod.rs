mod structs;

#[cfg(feature = "async")]
mod async_transport;
#[cfg(feature = "sync")]
mod sync_trait;

#[cfg(feature = "async")]
pub use async_transport::AsyncTransport;
pub use structs::*;
#[cfg(feature = "sync")]
pub use sync_trait::Transport;
