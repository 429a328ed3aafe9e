use std::fmt::{Debug, Formatter};
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;

/// BodyStream is a streamed request body.
pub type BodyStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync>>;

/// Body is the content of a request handed to [`HttpSend`](crate::HttpSend).
///
/// Only buffered bodies can be signed: a streamed body is never read by
/// docsign and passes through untouched.
#[derive(Default)]
pub enum Body {
    /// No content.
    #[default]
    Empty,
    /// Content fully held in memory.
    Bytes(Bytes),
    /// Content produced lazily by a stream.
    Stream(BodyStream),
}

impl Body {
    /// Create a streamed body.
    pub fn from_stream(
        stream: impl Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static,
    ) -> Self {
        Body::Stream(Box::pin(stream))
    }

    /// Returns the buffered content, if any.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Bytes(bs) => Some(bs),
            _ => None,
        }
    }

    /// Check if this body carries no content at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Check if this body is streamed.
    pub fn is_stream(&self) -> bool {
        matches!(self, Body::Stream(_))
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bs) => f.debug_tuple("Bytes").field(&bs.len()).finish(),
            Body::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bs: Bytes) -> Self {
        Body::Bytes(bs)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bs: Vec<u8>) -> Self {
        Body::Bytes(bs.into())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(s.into())
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Bytes(Bytes::from_static(s.as_bytes()))
    }
}
