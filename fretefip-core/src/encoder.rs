use url::Url;

use crate::credential::Credential;
use crate::query::QueryValue;
use crate::transport::{TransportRequest, Verb};
use crate::Query;

/// Query-string parameter carrying the credential on `GET` requests.
pub const TOKEN_PARAM: &str = "token";

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Encode one logical query into the wire shape of `verb`.
///
/// `POST` sends the query as a JSON object body. `GET` sends no body; the
/// credential goes first as `token`, then each field in order, list values
/// as a compact JSON array string. Both shapes carry the bearer header.
pub fn encode(endpoint: &Url, query: &Query, credential: &Credential, verb: Verb) -> TransportRequest {
    let mut url = endpoint.clone();
    let mut headers = vec![(AUTHORIZATION.to_string(), credential.bearer())];

    let body = match verb {
        Verb::Post => {
            headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
            Some(query.to_json().to_string().into_bytes())
        }
        Verb::Get => {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(TOKEN_PARAM, credential.expose());
            for (name, value) in query.iter() {
                let value = match value {
                    QueryValue::Scalar(scalar) => scalar.to_string(),
                    QueryValue::List(_) => value.to_json().to_string(),
                };
                pairs.append_pair(name, &value);
            }
            drop(pairs);
            None
        }
    };

    TransportRequest {
        verb,
        url,
        headers,
        body,
    }
}
