use std::fmt;

use thiserror::Error;
use url::Url;

/// HTTP verb used for a query.
///
/// `Post` is the primary verb and carries the query as a JSON body. `Get` is
/// the alternate verb and carries it in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Post,
    Get,
}

impl Verb {
    pub const PRIMARY: Verb = Verb::Post;
    pub const ALTERNATE: Verb = Verb::Get;

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Post => "POST",
            Verb::Get => "GET",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully encoded request, ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub verb: Verb,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query parameters of the request URL, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url.query_pairs().into_owned().collect()
    }
}

/// Whatever the server answered, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure that prevented a response from being received at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}
