use std::fmt;

use crate::error::{Error, Result};

/// Bearer token presented to the API.
///
/// The token travels in the `Authorization` header and, for query-string
/// requests, as the `token` parameter, so it must be a non-empty run of
/// visible ASCII characters. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::InvalidCredential("token is empty"));
        }
        if !token.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(Error::InvalidCredential(
                "token must only contain visible ASCII characters",
            ));
        }
        Ok(Self(token))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl TryFrom<&str> for Credential {
    type Error = Error;

    fn try_from(token: &str) -> Result<Self> {
        Self::new(token)
    }
}

impl TryFrom<String> for Credential {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        Self::new(token)
    }
}
