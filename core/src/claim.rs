use std::time::Duration;

use crate::constants::{CLAIM_EXP, CLAIM_IAT, DEFAULT_LEEWAY, DEFAULT_TTL};

/// Claim is a piece of reserved metadata added to a token at encode time.
///
/// Every claim owns exactly one top-level payload key, so the order of claims
/// on a codec has no effect on the produced token.
///
/// [RFC 7519 Reference](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Expiration time of the token.
    ///
    /// A zero `ttl` omits the claim from encoded tokens. `leeway` is the clock
    /// skew tolerated while decoding; zero means expiration is enforced to
    /// the exact second.
    Exp {
        /// Time the token stays valid, with second granularity.
        ttl: Duration,
        /// Clock skew allowance, with second granularity.
        leeway: Duration,
    },
    /// Time at which the token was issued.
    Iat,
}

impl Claim {
    /// Create an expiration claim.
    pub fn exp(ttl: Duration, leeway: Duration) -> Self {
        Claim::Exp { ttl, leeway }
    }

    /// Create an expiration claim with a 300s ttl and a 30s leeway.
    pub fn default_exp() -> Self {
        Claim::exp(DEFAULT_TTL, DEFAULT_LEEWAY)
    }

    /// Create an issued-at claim.
    pub fn iat() -> Self {
        Claim::Iat
    }

    /// The payload key owned by this claim.
    pub fn key(&self) -> &'static str {
        match self {
            Claim::Exp { .. } => CLAIM_EXP,
            Claim::Iat => CLAIM_IAT,
        }
    }

    /// Value this claim contributes to a payload encoded at `now` (unix seconds).
    ///
    /// Returns `None` when the claim must not appear in the token at all.
    pub fn on_encode(&self, now: i64) -> Option<i64> {
        match self {
            Claim::Exp { ttl, .. } if ttl.is_zero() => None,
            Claim::Exp { ttl, .. } => Some(now.saturating_add(secs(*ttl))),
            Claim::Iat => Some(now),
        }
    }

    /// Leeway in seconds applied to the `exp` check while decoding.
    ///
    /// Only meaningful for [`Claim::Exp`].
    pub fn leeway_seconds(&self) -> Option<i64> {
        match self {
            Claim::Exp { leeway, .. } => Some(secs(*leeway)),
            Claim::Iat => None,
        }
    }
}

fn secs(d: Duration) -> i64 {
    i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
}
