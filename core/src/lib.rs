//! Core components for signing document server API requests.
//!
//! Requests sent to a document server are authorized by a JSON Web Token
//! signed with a secret shared between the server and its integrators. This
//! crate provides the token codec and a transport layer that places such
//! tokens into outgoing requests.
//!
//! ## Overview
//!
//! - **Claim**: `exp`/`iat` metadata added to every token.
//! - **Jwt**: encodes payloads into signed compact tokens and decodes them
//!   back, with helpers for tokens carried in a header, a body field or a URL.
//! - **SigningPolicy**: where a token goes in a request (header and/or body),
//!   plus the header name and the authentication schema.
//! - **SignedHttpSend**: an [`HttpSend`] layer that signs requests according
//!   to a policy before forwarding them to the wrapped transport.
//!
//! ## Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use docsign_core::{Body, Context, HttpSend, Jwt, Result, SigningPolicy};
//!
//! #[derive(Debug)]
//! struct MyTransport;
//!
//! #[async_trait::async_trait]
//! impl HttpSend for MyTransport {
//!     async fn http_send(
//!         &self,
//!         _req: http::Request<Body>,
//!         _body: Option<Bytes>,
//!     ) -> Result<http::Response<Bytes>> {
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_http_send(MyTransport);
//! let ctx = ctx.with_jwt(SigningPolicy::new(Jwt::new("secret")));
//!
//! let req = http::Request::post("http://localhost/converter")
//!     .body(Body::from(r#"{"key":"doc","outputtype":"pdf"}"#))?;
//! ctx.http_send(req, None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod constants;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod claim;
pub use claim::Claim;
mod jwt;
pub use jwt::{Jwt, Payload};
mod policy;
pub use policy::{Location, SigningPolicy};
mod body;
pub use body::{Body, BodyStream};
mod http_send;
pub use http_send::{HttpSend, NoopHttpSend};
mod signer;
pub use signer::{wrap, SignedHttpSend};
mod context;
pub use context::{Context, Env, NoopEnv, OsEnv, StaticEnv};
mod config;
pub use config::Config;
