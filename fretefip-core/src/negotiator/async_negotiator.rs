use url::Url;

use crate::classifier::Outcome;
use crate::credential::Credential;
use crate::error::Result;
use crate::transport::{AsyncTransport, TransportError, TransportResponse, Verb};
use crate::Query;

use super::session::{Session, Step};

/// Async version of [`Negotiator`](crate::Negotiator).
///
/// Same protocol and the same sticky preference, over an [`AsyncTransport`].
/// Queries issued concurrently on one instance may each probe `POST` until
/// the first 405 has been seen; the switch itself still happens once.
#[derive(Debug)]
pub struct AsyncNegotiator<T: AsyncTransport> {
    session: Session,
    transport: T,
}

impl<T: AsyncTransport> AsyncNegotiator<T> {
    /// Create an async negotiator for `endpoint`.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the API endpoint
    /// * `credential` - Bearer token sent with every request
    /// * `transport` - Async HTTP transport implementation
    pub fn new(endpoint: &str, credential: Credential, transport: T) -> Result<Self> {
        Ok(Self {
            session: Session::new(endpoint, credential)?,
            transport,
        })
    }

    pub fn endpoint(&self) -> &Url {
        self.session.endpoint()
    }

    pub fn preferred_verb(&self) -> Verb {
        self.session.preferred_verb()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn query(&self, query: &Query) -> Outcome {
        let verb = self.session.preferred_verb();
        let first = self.send(query, verb).await;
        match self.session.settle(verb, first) {
            Step::Done(outcome) => outcome,
            Step::Retry(alternate) => {
                let second = self.send(query, alternate).await;
                self.session.finish(alternate, second)
            }
        }
    }

    async fn send(
        &self,
        query: &Query,
        verb: Verb,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let request = self.session.request(query, verb);
        self.transport.send(&request).await
    }
}
