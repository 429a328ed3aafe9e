//! Document server API client.
//!
//! [`Client`] builds JSON requests against a document server and sends them
//! through a [`Context`](docsign_core::Context). Requests are signed once
//! the client is configured with [`Client::with_jwt`].

mod constants;
pub use constants::USER_AGENT;

mod client;
pub use client::Client;

mod response;
pub use response::Response;
