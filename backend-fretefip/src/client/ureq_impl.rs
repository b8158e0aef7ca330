use std::io::{self, Read};
use std::time::Duration;

use fretefip_core::{Transport, TransportError, TransportRequest, TransportResponse};

use super::{DEFAULT_TIMEOUT_SECS, USER_AGENT};

/// Largest response body read into memory.
const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Minimal blocking transport using ureq.
///
/// Error statuses are handed back as responses so the negotiator can
/// classify them; only failures that produce no response become a
/// [`TransportError`].
///
/// # Example
///
/// ```ignore
/// use backend_fretefip::{Credential, Negotiator, UreqClient};
///
/// let negotiator = Negotiator::new(
///     "https://fretefip.up.railway.app/api/external/metrics",
///     Credential::new(token)?,
///     UreqClient::new(),
/// )?;
/// ```
#[derive(Clone, Debug)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a new ureq client with the default 30 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new ureq client with a custom per-request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(timeout_secs))
                .user_agent(USER_AGENT)
                .build(),
        }
    }

    /// Wrap an already configured agent.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqClient {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut call = self
            .agent
            .request(request.verb.as_str(), request.url.as_str());
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let result = match &request.body {
            Some(body) => call.send_bytes(body),
            None => call.call(),
        };

        let response = match result {
            Ok(response) => response,
            // ureq reports 4xx/5xx as errors, they are regular responses here
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                let error = transport_error(transport);
                log::debug!("{} {} failed: {}", request.verb, request.url.path(), error);
                return Err(error);
            }
        };

        let status = response.status();
        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut body)
            .map_err(|e| io_error("failed to read response body", &e))?;

        Ok(TransportResponse { status, body })
    }
}

/// Map a ureq transport failure. The URL is left out of the message since a
/// `GET` carries the token in its query string.
fn transport_error(transport: ureq::Transport) -> TransportError {
    let source = std::error::Error::source(&transport);
    let description = describe(&transport, source);

    if source
        .and_then(|s| s.downcast_ref::<io::Error>())
        .is_some_and(is_timeout)
    {
        return TransportError::Timeout(description);
    }

    match transport.kind() {
        ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => {
            TransportError::Connect(description)
        }
        _ => TransportError::Request(description),
    }
}

fn describe(transport: &ureq::Transport, source: Option<&(dyn std::error::Error + 'static)>) -> String {
    let mut description = transport.kind().to_string();
    if let Some(message) = transport.message() {
        description.push_str(": ");
        description.push_str(message);
    }
    if let Some(source) = source {
        description.push_str(": ");
        description.push_str(&source.to_string());
    }
    description
}

fn io_error(context: &str, e: &io::Error) -> TransportError {
    if is_timeout(e) {
        TransportError::Timeout(format!("{}: {}", context, e))
    } else {
        TransportError::Request(format!("{}: {}", context, e))
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
