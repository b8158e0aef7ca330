use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::transport::TransportError;

/// Longest raw-body excerpt kept as a server error message.
pub const MESSAGE_EXCERPT_CHARS: usize = 200;

/// Typed result of one query.
///
/// The success payload is a raw JSON value by default; typed clients decode it
/// with [`Outcome::decode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T = Value> {
    Success(T),
    NotFound {
        message: Option<String>,
        suggestion: Option<String>,
    },
    Unauthorized,
    Forbidden,
    InvalidRequest {
        message: Option<String>,
    },
    TransportFailure(TransportError),
    ServerError {
        status: u16,
        message: Option<String>,
    },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self.try_map(|payload| Ok::<U, std::convert::Infallible>(f(payload))) {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Transform the success payload, short-circuiting on the first error.
    pub fn try_map<U, E>(
        self,
        f: impl FnOnce(T) -> std::result::Result<U, E>,
    ) -> std::result::Result<Outcome<U>, E> {
        Ok(match self {
            Outcome::Success(payload) => Outcome::Success(f(payload)?),
            Outcome::NotFound {
                message,
                suggestion,
            } => Outcome::NotFound {
                message,
                suggestion,
            },
            Outcome::Unauthorized => Outcome::Unauthorized,
            Outcome::Forbidden => Outcome::Forbidden,
            Outcome::InvalidRequest { message } => Outcome::InvalidRequest { message },
            Outcome::TransportFailure(cause) => Outcome::TransportFailure(cause),
            Outcome::ServerError { status, message } => Outcome::ServerError { status, message },
        })
    }
}

impl Outcome<Value> {
    /// Decode the success payload into a concrete schema type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Outcome<T>> {
        Ok(self.try_map(serde_json::from_value)?)
    }
}

/// Short description without the payload, for logs and error reports.
impl<T> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(_) => f.write_str("success"),
            Outcome::NotFound { message, .. } => with_message(f, "no data found", message),
            Outcome::Unauthorized => f.write_str("unauthorized: token not provided"),
            Outcome::Forbidden => f.write_str("forbidden: invalid token or quota exceeded"),
            Outcome::InvalidRequest { message } => with_message(f, "invalid request", message),
            Outcome::TransportFailure(cause) => write!(f, "transport failure: {}", cause),
            Outcome::ServerError { status, message } => {
                with_message(f, &format!("server error {}", status), message)
            }
        }
    }
}

fn with_message(f: &mut fmt::Formatter<'_>, what: &str, message: &Option<String>) -> fmt::Result {
    match message {
        Some(message) => write!(f, "{}: {}", what, message),
        None => f.write_str(what),
    }
}

/// Result of classifying a single response.
///
/// `MethodNotAllowed` is a negotiation signal; it is folded into a
/// [`Outcome::ServerError`] by [`Classification::into_outcome`] when no
/// fallback is left.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Final(Outcome),
    MethodNotAllowed { message: Option<String> },
}

impl Classification {
    pub fn into_outcome(self) -> Outcome {
        match self {
            Classification::Final(outcome) => outcome,
            Classification::MethodNotAllowed { message } => Outcome::ServerError {
                status: 405,
                message,
            },
        }
    }
}

/// Map a status code and raw body to a classification.
///
/// The body is only read for the `message` and `suggestion` fields of error
/// documents; a missing or unparseable body never fails classification. The
/// one exception is a 200 whose body is not JSON, which is reported as a
/// server error rather than an empty success.
pub fn classify(status: u16, body: &[u8]) -> Classification {
    let document = || serde_json::from_slice::<Value>(body).ok();

    let outcome = match status {
        200 => match serde_json::from_slice(body) {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => Outcome::ServerError {
                status,
                message: Some(format!("malformed JSON payload: {}", e)),
            },
        },
        400 => Outcome::InvalidRequest {
            message: field(&document(), "message"),
        },
        401 => Outcome::Unauthorized,
        403 => Outcome::Forbidden,
        404 => {
            let document = document();
            Outcome::NotFound {
                message: field(&document, "message"),
                suggestion: field(&document, "suggestion"),
            }
        }
        405 => {
            return Classification::MethodNotAllowed {
                message: field(&document(), "message"),
            }
        }
        _ => Outcome::ServerError {
            status,
            message: field(&document(), "message").or_else(|| excerpt(body)),
        },
    };

    Classification::Final(outcome)
}

fn field(document: &Option<Value>, name: &str) -> Option<String> {
    document
        .as_ref()?
        .get(name)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn excerpt(body: &[u8]) -> Option<String> {
    let text: String = String::from_utf8_lossy(body)
        .chars()
        .take(MESSAGE_EXCERPT_CHARS)
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn outcome(status: u16, body: &str) -> Outcome {
        match classify(status, body.as_bytes()) {
            Classification::Final(outcome) => outcome,
            other => panic!("expected a final outcome, got {:?}", other),
        }
    }

    #[test]
    fn success_carries_parsed_body() {
        assert_eq!(
            outcome(200, r#"{"success":true,"data":{"count":5}}"#),
            Outcome::Success(json!({"success": true, "data": {"count": 5}}))
        );
    }

    #[test]
    fn malformed_success_body_is_a_server_error() {
        match outcome(200, "<html>gateway</html>") {
            Outcome::ServerError { status: 200, message: Some(message) } => {
                assert!(message.starts_with("malformed JSON payload"))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn not_found_picks_message_and_suggestion() {
        assert_eq!(
            outcome(
                404,
                r#"{"message":"Rota não encontrada","suggestion":"Verifique origem/destino"}"#
            ),
            Outcome::NotFound {
                message: Some("Rota não encontrada".to_string()),
                suggestion: Some("Verifique origem/destino".to_string()),
            }
        );
        assert_eq!(
            outcome(404, ""),
            Outcome::NotFound {
                message: None,
                suggestion: None
            }
        );
    }

    #[test]
    fn auth_failures_ignore_the_body() {
        assert_eq!(outcome(401, r#"{"message":"no token"}"#), Outcome::Unauthorized);
        assert_eq!(outcome(403, "not json"), Outcome::Forbidden);
    }

    #[test]
    fn invalid_request_tolerates_any_body() {
        assert_eq!(
            outcome(400, r#"{"message":"months_ahead must be <= 24"}"#),
            Outcome::InvalidRequest {
                message: Some("months_ahead must be <= 24".to_string())
            }
        );
        assert_eq!(outcome(400, "{"), Outcome::InvalidRequest { message: None });
        assert_eq!(
            outcome(400, r#"{"message":42}"#),
            Outcome::InvalidRequest { message: None }
        );
    }

    #[test]
    fn method_not_allowed_is_a_signal() {
        assert_eq!(
            classify(405, br#"{"message":"use GET"}"#),
            Classification::MethodNotAllowed {
                message: Some("use GET".to_string())
            }
        );
        assert_eq!(
            classify(405, b"").into_outcome(),
            Outcome::ServerError {
                status: 405,
                message: None
            }
        );
    }

    #[test]
    fn other_statuses_fall_back_to_a_body_excerpt() {
        assert_eq!(
            outcome(500, r#"{"message":"database unavailable"}"#),
            Outcome::ServerError {
                status: 500,
                message: Some("database unavailable".to_string())
            }
        );

        let long = "é".repeat(300);
        match outcome(502, &long) {
            Outcome::ServerError { status: 502, message: Some(message) } => {
                assert_eq!(message.chars().count(), MESSAGE_EXCERPT_CHARS)
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        assert_eq!(
            outcome(503, "   "),
            Outcome::ServerError {
                status: 503,
                message: None
            }
        );
    }

    #[test]
    fn mapping_is_total_and_deterministic() {
        for status in 0..=999u16 {
            let first = classify(status, b"{}");
            assert_eq!(first, classify(status, b"{}"));

            let expected_405 = status == 405;
            assert_eq!(
                matches!(first, Classification::MethodNotAllowed { .. }),
                expected_405
            );
            if let Classification::Final(outcome) = first {
                match status {
                    200 => assert!(outcome.is_success()),
                    400 => assert!(matches!(outcome, Outcome::InvalidRequest { .. })),
                    401 => assert_eq!(outcome, Outcome::Unauthorized),
                    403 => assert_eq!(outcome, Outcome::Forbidden),
                    404 => assert!(matches!(outcome, Outcome::NotFound { .. })),
                    _ => assert!(
                        matches!(outcome, Outcome::ServerError { status: s, .. } if s == status)
                    ),
                }
            }
        }
    }

    #[test]
    fn decode_into_schema_type() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Count {
            count: u32,
        }

        let decoded = Outcome::Success(json!({"count": 5})).decode::<Count>().unwrap();
        assert_eq!(decoded, Outcome::Success(Count { count: 5 }));

        assert!(Outcome::Success(json!({"count": "five"}))
            .decode::<Count>()
            .is_err());

        let passthrough = Outcome::<Value>::Forbidden.decode::<Count>().unwrap();
        assert_eq!(passthrough, Outcome::Forbidden);
    }
}
