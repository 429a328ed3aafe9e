use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HEADER, DEFAULT_SCHEMA};
use crate::{Error, Jwt};

/// Location is where a token is placed in an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// `{header}: {schema} {token}`, the token wrapping the whole body.
    Header,
    /// An extra top-level `token` field in the JSON body.
    Body,
}

impl Location {
    /// The string form of this location.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Header => "header",
            Location::Body => "body",
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(Location::Header),
            "body" => Ok(Location::Body),
            v => Err(Error::config_invalid(format!("unknown token location: {v}"))),
        }
    }
}

/// SigningPolicy describes where and how a token is attached to a request.
///
/// An empty location set is valid: requests are forwarded without any token.
#[derive(Debug, Clone)]
pub struct SigningPolicy {
    jwt: Arc<Jwt>,
    locations: Vec<Location>,
    header: String,
    schema: String,
}

impl SigningPolicy {
    /// Create a policy signing both the header and the body with
    /// `Authorization: Bearer {token}`.
    pub fn new(jwt: Jwt) -> Self {
        Self {
            jwt: Arc::new(jwt),
            locations: vec![Location::Header, Location::Body],
            header: DEFAULT_HEADER.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// Replace the locations.
    ///
    /// Duplicates are dropped, and the caller's collection is copied.
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.locations.clear();
        for location in locations {
            if !self.locations.contains(&location) {
                self.locations.push(location);
            }
        }
        self
    }

    /// Set the header name carrying the token.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the authentication schema prefixed to the token.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// The codec producing tokens.
    pub fn jwt(&self) -> &Jwt {
        &self.jwt
    }

    /// The locations receiving a token.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Check if a token must be placed at `location`.
    pub fn signs(&self, location: Location) -> bool {
        self.locations.contains(&location)
    }

    /// The header name.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The authentication schema.
    pub fn schema(&self) -> &str {
        &self.schema
    }
}
