mod session;

#[cfg(feature = "async")]
mod async_negotiator;
#[cfg(feature = "sync")]
mod negotiator;

#[cfg(test)]
mod testing;

#[cfg(feature = "async")]
pub use async_negotiator::AsyncNegotiator;
#[cfg(feature = "sync")]
pub use negotiator::Negotiator;
