use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::*;
use crate::utils::Redact;
use crate::{Claim, Context, Error, Jwt, Location, Result, SigningPolicy};

/// Config for token signing, usually loaded from the environment.
///
/// Unset fields fall back to the defaults of [`Jwt::new`] and
/// [`SigningPolicy::new`].
#[derive(Clone, Default)]
pub struct Config {
    /// Shared secret. Signing is disabled without it.
    pub secret: Option<String>,
    /// Algorithm identifier, `HS256` by default.
    pub algorithm: Option<String>,
    /// Token lifetime, 300s by default. Zero disables the `exp` claim.
    pub ttl: Option<Duration>,
    /// Expiration leeway, 30s by default.
    pub leeway: Option<Duration>,
    /// Whether to add the `iat` claim, true by default.
    pub iat: Option<bool>,
    /// Header carrying the token, `Authorization` by default.
    pub header: Option<String>,
    /// Schema prefixed to the header token, `Bearer` by default.
    pub schema: Option<String>,
    /// Locations receiving a token, header and body by default.
    pub locations: Option<Vec<Location>>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret", &Redact::from(&self.secret))
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .field("leeway", &self.leeway)
            .field("iat", &self.iat)
            .field("header", &self.header)
            .field("schema", &self.schema)
            .field("locations", &self.locations)
            .finish()
    }
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        Ok(Self {
            secret: ctx.env_var(DOCSIGN_JWT_SECRET),
            algorithm: ctx.env_var(DOCSIGN_JWT_ALGORITHM),
            ttl: parse_env(ctx, DOCSIGN_JWT_TTL)?.map(Duration::from_secs),
            leeway: parse_env(ctx, DOCSIGN_JWT_LEEWAY)?.map(Duration::from_secs),
            iat: parse_env(ctx, DOCSIGN_JWT_IAT)?,
            header: ctx.env_var(DOCSIGN_JWT_HEADER),
            schema: ctx.env_var(DOCSIGN_JWT_SCHEMA),
            locations: ctx
                .env_var(DOCSIGN_JWT_LOCATIONS)
                .map(|v| parse_locations(&v))
                .transpose()?,
        })
    }

    /// Build the codec described by this config.
    ///
    /// Returns `None` if no secret is configured.
    pub fn jwt(&self) -> Option<Jwt> {
        let secret = self.secret.as_ref()?;

        let mut claims = vec![Claim::exp(
            self.ttl.unwrap_or(DEFAULT_TTL),
            self.leeway.unwrap_or(DEFAULT_LEEWAY),
        )];
        if self.iat.unwrap_or(true) {
            claims.push(Claim::iat());
        }

        let mut jwt = Jwt::new(secret.as_str()).with_claims(claims);
        if let Some(algorithm) = &self.algorithm {
            jwt = jwt.with_algorithm(algorithm.as_str());
        }
        Some(jwt)
    }

    /// Build the signing policy described by this config.
    ///
    /// Returns `None` if no secret is configured.
    pub fn signing_policy(&self) -> Option<SigningPolicy> {
        let mut policy = SigningPolicy::new(self.jwt()?);
        if let Some(locations) = &self.locations {
            policy = policy.with_locations(locations.iter().copied());
        }
        if let Some(header) = &self.header {
            policy = policy.with_header(header.as_str());
        }
        if let Some(schema) = &self.schema {
            policy = policy.with_schema(schema.as_str());
        }
        Some(policy)
    }
}

fn parse_env<T>(ctx: &Context, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(v) = ctx.env_var(key) else {
        return Ok(None);
    };

    v.trim()
        .parse()
        .map(Some)
        .map_err(|e| Error::config_invalid(format!("invalid value of {key}: {v:?}")).with_source(e))
}

/// Parse a comma separated location list, an empty string meaning none.
fn parse_locations(v: &str) -> Result<Vec<Location>> {
    v.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(Location::from_str)
        .collect()
}
