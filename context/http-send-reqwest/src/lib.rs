//! [`HttpSend`] implementation backed by [`reqwest`].
//!
//! ```no_run
//! use docsign_core::{Context, Jwt, SigningPolicy};
//! use docsign_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_jwt(SigningPolicy::new(Jwt::new("secret")));
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use docsign_core::{Body, Error, HttpSend, Result};
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};

/// ReqwestHttpSend sends requests with a [`reqwest::Client`].
///
/// The body argument of [`HttpSend::http_send`] is used as the request
/// content when the request itself has none. Supplying both is an
/// [`ArgumentConflict`](docsign_core::ErrorKind::ArgumentConflict).
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(
        &self,
        req: http::Request<Body>,
        body: Option<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        let (parts, content) = req.into_parts();
        let content = match (content, body) {
            (Body::Empty, None) => reqwest::Body::from(Bytes::new()),
            (Body::Empty, Some(bs)) | (Body::Bytes(bs), None) => reqwest::Body::from(bs),
            (Body::Stream(s), None) => reqwest::Body::wrap_stream(s),
            (_, Some(_)) => {
                return Err(Error::argument_conflict(
                    "request has both a body and a body argument",
                ))
            }
        };

        let req = Request::try_from(http::Request::from_parts(parts, content))
            .map_err(|e| Error::request_invalid("failed to build request").with_source(e))?;
        debug!("sending request: {} {}", req.method(), req.url());

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        debug!("got response: {}", parts.status);
        Ok(http::Response::from_parts(parts, bs))
    }
}
