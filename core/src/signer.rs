use bytes::Bytes;
use http::header::{HeaderName, CONTENT_LENGTH};
use http::{HeaderMap, HeaderValue};
use log::debug;
use serde_json::Value;

use crate::{Body, Error, HttpSend, Location, Payload, Result, SigningPolicy};

/// Wrap `inner` so that every request it sends is signed per `policy`.
///
/// Shorthand for [`SignedHttpSend::new`].
pub fn wrap<S: HttpSend>(inner: S, policy: SigningPolicy) -> SignedHttpSend<S> {
    SignedHttpSend::new(inner, policy)
}

/// SignedHttpSend injects tokens into requests before handing them to the
/// wrapped [`HttpSend`].
///
/// Apart from token injection the wrapper is transparent: `inner` is called
/// exactly once per request, its response and errors are returned as is, and
/// it may itself be any layer, including another `SignedHttpSend`.
///
/// | request body | body argument | behavior                                         |
/// |--------------|---------------|--------------------------------------------------|
/// | any          | present       | forwarded untouched, `inner` reports the conflict |
/// | buffered     | absent        | header and/or body of the request are signed     |
/// | streamed     | absent        | forwarded untouched, streams are never signed    |
/// | empty        | present       | header of the request and/or argument are signed |
/// | empty        | absent        | forwarded untouched                               |
#[derive(Debug, Clone)]
pub struct SignedHttpSend<S> {
    inner: S,
    policy: SigningPolicy,
}

impl<S: HttpSend> SignedHttpSend<S> {
    /// Create a new signing layer around `inner`.
    pub fn new(inner: S, policy: SigningPolicy) -> Self {
        Self { inner, policy }
    }

    /// The policy applied by this layer.
    pub fn policy(&self) -> &SigningPolicy {
        &self.policy
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Sign a request without sending it.
    ///
    /// Returns the request and body argument that would be forwarded.
    pub fn sign(
        &self,
        req: http::Request<Body>,
        body: Option<Bytes>,
    ) -> Result<(http::Request<Body>, Option<Bytes>)> {
        let (mut parts, content) = req.into_parts();

        match (content, body) {
            (content @ (Body::Bytes(_) | Body::Stream(_)), Some(arg)) => {
                debug!("request has both a body and a body argument, leaving it to the transport");
                Ok((http::Request::from_parts(parts, content), Some(arg)))
            }
            (Body::Bytes(bs), None) => {
                let bs = self.sign_content(&mut parts.headers, bs)?;
                if parts.headers.contains_key(CONTENT_LENGTH) {
                    parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(bs.len()));
                }
                Ok((http::Request::from_parts(parts, Body::Bytes(bs)), None))
            }
            (content @ Body::Stream(_), None) => {
                debug!("request body is streamed, forwarding without a token");
                Ok((http::Request::from_parts(parts, content), None))
            }
            (Body::Empty, Some(arg)) => {
                let arg = self.sign_content(&mut parts.headers, arg)?;
                if parts.headers.contains_key(CONTENT_LENGTH) {
                    parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(arg.len()));
                }
                Ok((http::Request::from_parts(parts, Body::Empty), Some(arg)))
            }
            (Body::Empty, None) => {
                debug!("request has no content, forwarding without a token");
                Ok((http::Request::from_parts(parts, Body::Empty), None))
            }
        }
    }

    /// Sign a JSON object body, returning the content to forward.
    ///
    /// `headers` receive the header token; the returned bytes carry the body
    /// token. Without any location the content is returned untouched.
    fn sign_content(&self, headers: &mut HeaderMap, content: Bytes) -> Result<Bytes> {
        if self.policy.locations().is_empty() {
            debug!("signing policy has no locations, forwarding without a token");
            return Ok(content);
        }

        let payload: Payload = serde_json::from_slice(&content).map_err(|e| {
            Error::request_invalid("request body to sign must be a JSON object").with_source(e)
        })?;

        if self.policy.signs(Location::Header) {
            let token = self
                .policy
                .jwt()
                .encode_header(&Value::Object(payload.clone()))?;
            let name = HeaderName::from_bytes(self.policy.header().as_bytes())?;
            let mut value =
                HeaderValue::from_str(&format!("{} {}", self.policy.schema(), token))?;
            value.set_sensitive(true);

            debug!("signing request header {name}");
            headers.insert(name, value);
        }

        if !self.policy.signs(Location::Body) {
            return Ok(content);
        }

        debug!("signing request body");
        let body = self.policy.jwt().encode_body(&payload)?;
        Ok(serde_json::to_vec(&body)?.into())
    }
}

#[async_trait::async_trait]
impl<S: HttpSend> HttpSend for SignedHttpSend<S> {
    async fn http_send(
        &self,
        req: http::Request<Body>,
        body: Option<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        let (req, body) = self.sign(req, body)?;
        self.inner.http_send(req, body).await
    }
}
