use std::fmt;
use thiserror::Error;

/// The error type for docsign operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Algorithm identifier is empty, unknown, or differs from the one declared by a token
    UnsupportedAlgorithm,

    /// Token is not three base64url segments of valid JSON
    MalformedToken,

    /// Signature verification failed
    BadSignature,

    /// The `exp` claim has passed, leeway included
    SignatureExpired,

    /// A reserved key (`payload`, `token`, `url`) is absent
    MissingKey,

    /// A reserved key is present but holds the wrong type
    TypeMismatch,

    /// URI decoding was attempted on a URI without a query component
    MissingQueryString,

    /// A request carries a body and an explicit body argument at the same time
    ArgumentConflict,

    /// Request cannot be signed (body is not a JSON object, invalid header, etc.)
    RequestInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (network, I/O, serialization, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this error was raised while verifying a token
    pub fn is_token_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnsupportedAlgorithm
                | ErrorKind::MalformedToken
                | ErrorKind::BadSignature
                | ErrorKind::SignatureExpired
        )
    }
}

// Convenience constructors
impl Error {
    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedAlgorithm, message)
    }

    /// Create a malformed token error
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedToken, message)
    }

    /// Create a bad signature error
    pub fn bad_signature(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadSignature, message)
    }

    /// Create a signature expired error
    pub fn signature_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignatureExpired, message)
    }

    /// Create a missing key error
    pub fn missing_key(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingKey, message)
    }

    /// Create a type mismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    /// Create a missing query string error
    pub fn missing_query_string(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingQueryString, message)
    }

    /// Create an argument conflict error
    pub fn argument_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArgumentConflict, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnsupportedAlgorithm => write!(f, "unsupported algorithm"),
            ErrorKind::MalformedToken => write!(f, "malformed token"),
            ErrorKind::BadSignature => write!(f, "bad signature"),
            ErrorKind::SignatureExpired => write!(f, "signature expired"),
            ErrorKind::MissingKey => write!(f, "missing key"),
            ErrorKind::TypeMismatch => write!(f, "type mismatch"),
            ErrorKind::MissingQueryString => write!(f, "missing query string"),
            ErrorKind::ArgumentConflict => write!(f, "argument conflict"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
