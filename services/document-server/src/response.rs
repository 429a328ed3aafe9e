use bytes::Bytes;
use docsign_core::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// Response returned by a document server.
///
/// The body is kept as received, [`Response::json`] parses it on demand.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl From<http::Response<Bytes>> for Response {
    fn from(resp: http::Response<Bytes>) -> Self {
        let (parts, body) = resp.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

impl Response {
    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::unexpected(format!(
                "response body with status {} is not valid JSON",
                self.status
            ))
            .with_source(e)
        })
    }
}
