use std::sync::atomic::{AtomicU8, Ordering};

use log::{debug, info, warn};
use url::Url;

use crate::classifier::{classify, Classification, Outcome};
use crate::credential::Credential;
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::transport::{TransportError, TransportRequest, TransportResponse, Verb};
use crate::Query;

const PRIMARY: u8 = 0;
const ALTERNATE: u8 = 1;

/// Sticky verb preference. Starts at the primary verb and can only ever move
/// to the alternate one.
#[derive(Debug)]
pub(crate) struct Preference(AtomicU8);

impl Preference {
    fn new() -> Self {
        Self(AtomicU8::new(PRIMARY))
    }

    pub(crate) fn get(&self) -> Verb {
        match self.0.load(Ordering::Acquire) {
            PRIMARY => Verb::PRIMARY,
            _ => Verb::ALTERNATE,
        }
    }

    /// Returns true only for the caller that performed the transition.
    fn switch_to_alternate(&self) -> bool {
        self.0
            .compare_exchange(PRIMARY, ALTERNATE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// What to do after an attempt.
pub(crate) enum Step {
    Done(Outcome),
    Retry(Verb),
}

/// Protocol state shared by the blocking and async negotiators: the endpoint,
/// the credential and the learned verb. Everything here is free of I/O.
#[derive(Debug)]
pub(crate) struct Session {
    endpoint: Url,
    credential: Credential,
    preference: Preference,
}

impl Session {
    pub(crate) fn new(endpoint: &str, credential: Credential) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        match endpoint.scheme() {
            "http" | "https" => {}
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        }

        Ok(Self {
            endpoint,
            credential,
            preference: Preference::new(),
        })
    }

    pub(crate) fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub(crate) fn preferred_verb(&self) -> Verb {
        self.preference.get()
    }

    pub(crate) fn request(&self, query: &Query, verb: Verb) -> TransportRequest {
        debug!("{} {} ({} fields)", verb, self.endpoint, query.len());
        encode(&self.endpoint, query, &self.credential, verb)
    }

    /// Settle an attempt that may still fall back to the alternate verb.
    pub(crate) fn settle(
        &self,
        verb: Verb,
        result: std::result::Result<TransportResponse, TransportError>,
    ) -> Step {
        match self.classify(verb, result) {
            Classification::MethodNotAllowed { .. } if verb == Verb::PRIMARY => {
                if self.preference.switch_to_alternate() {
                    warn!(
                        "{} rejected {} with 405, using {} from now on",
                        self.endpoint,
                        verb,
                        Verb::ALTERNATE
                    );
                }
                Step::Retry(Verb::ALTERNATE)
            }
            classification => Step::Done(self.conclude(classification)),
        }
    }

    /// Settle the last attempt of a query. A 405 here is terminal.
    pub(crate) fn finish(
        &self,
        verb: Verb,
        result: std::result::Result<TransportResponse, TransportError>,
    ) -> Outcome {
        let classification = self.classify(verb, result);
        self.conclude(classification)
    }

    fn classify(
        &self,
        verb: Verb,
        result: std::result::Result<TransportResponse, TransportError>,
    ) -> Classification {
        match result {
            Ok(response) => {
                debug!("{} {} -> {}", verb, self.endpoint, response.status);
                classify(response.status, &response.body)
            }
            Err(cause) => Classification::Final(Outcome::TransportFailure(cause)),
        }
    }

    fn conclude(&self, classification: Classification) -> Outcome {
        let outcome = classification.into_outcome();
        if !outcome.is_success() {
            info!("{}: {}", self.endpoint, outcome);
        }
        outcome
    }
}
