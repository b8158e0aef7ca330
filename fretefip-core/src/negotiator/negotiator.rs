use url::Url;

use crate::classifier::Outcome;
use crate::credential::Credential;
use crate::error::Result;
use crate::transport::{Transport, TransportError, TransportResponse, Verb};
use crate::Query;

use super::session::{Session, Step};

/// Blocking client for one endpoint that learns which verb the server accepts.
///
/// Every query is first sent with the preferred verb, initially `POST`. If the
/// server answers 405 the negotiator switches to `GET` for good and re-sends
/// the same query once in query-string form. Later queries on the same
/// instance go straight to `GET`.
///
/// `query` takes `&self` and the preference is atomic, so one negotiator can
/// be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use fretefip_core::{Credential, Negotiator, Query};
///
/// let negotiator = Negotiator::new(
///     "https://fretefip.up.railway.app/api/external/metrics",
///     Credential::new(token)?,
///     http_client,
/// )?;
/// let outcome = negotiator.query(&Query::new().with("origem", "SINOP"));
/// ```
#[derive(Debug)]
pub struct Negotiator<T: Transport> {
    session: Session,
    transport: T,
}

impl<T: Transport> Negotiator<T> {
    /// Create a negotiator for `endpoint`.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the API endpoint
    /// * `credential` - Bearer token sent with every request
    /// * `transport` - HTTP transport implementation
    pub fn new(endpoint: &str, credential: Credential, transport: T) -> Result<Self> {
        Ok(Self {
            session: Session::new(endpoint, credential)?,
            transport,
        })
    }

    pub fn endpoint(&self) -> &Url {
        self.session.endpoint()
    }

    /// The verb the next query will be sent with.
    pub fn preferred_verb(&self) -> Verb {
        self.session.preferred_verb()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one query. Never fails: every error is an [`Outcome`] variant.
    pub fn query(&self, query: &Query) -> Outcome {
        let verb = self.session.preferred_verb();
        match self.session.settle(verb, self.send(query, verb)) {
            Step::Done(outcome) => outcome,
            Step::Retry(alternate) => self.session.finish(alternate, self.send(query, alternate)),
        }
    }

    fn send(&self, query: &Query, verb: Verb) -> std::result::Result<TransportResponse, TransportError> {
        let request = self.session.request(query, verb);
        self.transport.send(&request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use serde_json::json;

    use super::super::testing::{reply, timeout, GetOnlyServer, ScriptedTransport};
    use super::*;
    use crate::Error;

    const ENDPOINT: &str = "https://fretefip.up.railway.app/api/external/metrics";

    fn negotiator<T: Transport>(transport: T) -> Negotiator<T> {
        Negotiator::new(ENDPOINT, Credential::new("tok").unwrap(), transport).unwrap()
    }

    fn filters() -> Query {
        Query::new()
            .with("tipo_frete", "R$/UND")
            .with("origem", "SINOP")
            .with("produtos", vec!["SOJA"])
            .with("periodo_dias", 30)
    }

    #[test]
    fn success_on_first_attempt() {
        let client = negotiator(ScriptedTransport::new([reply(
            200,
            r#"{"success":true,"data":{"count":5}}"#,
        )]));

        let outcome = client.query(&filters());

        assert_eq!(
            outcome,
            Outcome::Success(json!({"success": true, "data": {"count": 5}}))
        );
        assert_eq!(client.transport().verbs(), vec![Verb::Post]);
        assert_eq!(client.preferred_verb(), Verb::Post);
    }

    #[test]
    fn falls_back_to_get_after_405() {
        let client = negotiator(ScriptedTransport::new([
            reply(405, ""),
            reply(200, r#"{"success":true}"#),
        ]));

        let outcome = client.query(&filters());

        assert_eq!(outcome, Outcome::Success(json!({"success": true})));
        assert_eq!(client.transport().verbs(), vec![Verb::Post, Verb::Get]);
        assert_eq!(client.preferred_verb(), Verb::Get);

        let sent = client.transport().sent();
        let retry = &sent[1];
        assert!(retry.body.is_none());
        assert_eq!(retry.query_pairs()[0], ("token".to_string(), "tok".to_string()));
        assert_eq!(
            retry.query_pairs()[3],
            ("produtos".to_string(), r#"["SOJA"]"#.to_string())
        );
    }

    #[test]
    fn learned_verb_is_sticky() {
        let client = negotiator(ScriptedTransport::new([
            reply(405, ""),
            reply(200, r#"{"success":true}"#),
            reply(200, r#"{"success":true}"#),
            reply(404, r#"{"message":"Nenhum dado"}"#),
        ]));

        client.query(&filters());
        let second = client.query(&filters());
        let third = client.query(&Query::new());

        assert!(second.is_success());
        assert_eq!(
            third,
            Outcome::NotFound {
                message: Some("Nenhum dado".to_string()),
                suggestion: None,
            }
        );
        assert_eq!(
            client.transport().verbs(),
            vec![Verb::Post, Verb::Get, Verb::Get, Verb::Get]
        );
    }

    #[test]
    fn forbidden_is_not_retried() {
        let client = negotiator(ScriptedTransport::new([reply(403, "")]));

        assert_eq!(client.query(&filters()), Outcome::Forbidden);
        assert_eq!(client.transport().verbs(), vec![Verb::Post]);
        assert_eq!(client.preferred_verb(), Verb::Post);
    }

    #[test]
    fn transport_failure_does_not_switch() {
        let client = negotiator(ScriptedTransport::new([timeout()]));

        assert_eq!(
            client.query(&filters()),
            Outcome::TransportFailure(TransportError::Timeout("timed out after 30s".to_string()))
        );
        assert_eq!(client.transport().verbs(), vec![Verb::Post]);
        assert_eq!(client.preferred_verb(), Verb::Post);
    }

    #[test]
    fn second_405_is_terminal() {
        let client = negotiator(ScriptedTransport::new([
            reply(405, ""),
            reply(405, r#"{"message":"nope"}"#),
            reply(405, ""),
        ]));

        assert_eq!(
            client.query(&filters()),
            Outcome::ServerError {
                status: 405,
                message: Some("nope".to_string()),
            }
        );
        assert_eq!(client.transport().verbs(), vec![Verb::Post, Verb::Get]);

        // already on GET: a 405 is surfaced without another switch or probe
        assert_eq!(
            client.query(&filters()),
            Outcome::ServerError {
                status: 405,
                message: None,
            }
        );
        assert_eq!(
            client.transport().verbs(),
            vec![Verb::Post, Verb::Get, Verb::Get]
        );
        assert_eq!(client.preferred_verb(), Verb::Get);
    }

    #[test]
    fn failure_on_the_fallback_attempt_is_returned() {
        let client = negotiator(ScriptedTransport::new([reply(405, ""), timeout()]));

        assert!(matches!(
            client.query(&filters()),
            Outcome::TransportFailure(TransportError::Timeout(_))
        ));
        assert_eq!(client.transport().verbs(), vec![Verb::Post, Verb::Get]);
        assert_eq!(client.preferred_verb(), Verb::Get);
    }

    #[test]
    fn one_attempt_unless_405() {
        for status in [200u16, 201, 204, 301, 400, 401, 403, 404, 408, 429, 500, 502, 503] {
            let client = negotiator(ScriptedTransport::new([reply(status, "{}")]));
            client.query(&filters());
            assert_eq!(client.transport().sent().len(), 1, "status {}", status);
            assert_eq!(client.preferred_verb(), Verb::Post, "status {}", status);
        }
    }

    #[test]
    fn shared_negotiator_switches_once() {
        let server = Arc::new(GetOnlyServer::default());
        let client = Arc::new(negotiator(server.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                thread::spawn(move || client.query(&filters()))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_success());
        }

        let verbs = server.verbs();
        let gets = verbs.iter().filter(|v| **v == Verb::Get).count();
        let posts = verbs.iter().filter(|v| **v == Verb::Post).count();
        assert_eq!(gets, 8);
        assert!((1..=8).contains(&posts));
        assert_eq!(client.preferred_verb(), Verb::Get);
    }

    #[test]
    fn rejects_bad_endpoints() {
        let credential = Credential::new("tok").unwrap();
        assert!(matches!(
            Negotiator::new("not a url", credential.clone(), ScriptedTransport::default()),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(matches!(
            Negotiator::new("ftp://example.com/metrics", credential, ScriptedTransport::default()),
            Err(Error::UnsupportedScheme(_))
        ));
    }
}
