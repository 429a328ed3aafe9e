use std::fmt::Debug;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Body, Result};

/// HttpSend dispatches a request and returns its response.
///
/// `body` is an explicit body argument supplied next to the request. A
/// transport receiving both a request body and a body argument must reject
/// the call with [`ErrorKind::ArgumentConflict`](crate::ErrorKind::ArgumentConflict).
///
/// Implementations may be layered: [`SignedHttpSend`](crate::SignedHttpSend)
/// is an `HttpSend` wrapping another `HttpSend`.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(
        &self,
        req: http::Request<Body>,
        body: Option<Bytes>,
    ) -> Result<http::Response<Bytes>>;
}

#[async_trait::async_trait]
impl<T: HttpSend + ?Sized> HttpSend for Arc<T> {
    async fn http_send(
        &self,
        req: http::Request<Body>,
        body: Option<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        (**self).http_send(req, body).await
    }
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(
        &self,
        _req: http::Request<Body>,
        _body: Option<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        Err(crate::Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}
