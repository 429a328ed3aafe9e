//! Env variable names, defaults and reserved keys.

use std::time::Duration;

// Env values used to configure docsign.

/// Shared secret signing tokens.
pub const DOCSIGN_JWT_SECRET: &str = "DOCSIGN_JWT_SECRET";
/// Algorithm identifier, one of `HS256`, `HS384` or `HS512`.
pub const DOCSIGN_JWT_ALGORITHM: &str = "DOCSIGN_JWT_ALGORITHM";
/// Token lifetime in seconds.
pub const DOCSIGN_JWT_TTL: &str = "DOCSIGN_JWT_TTL";
/// Expiration leeway in seconds.
pub const DOCSIGN_JWT_LEEWAY: &str = "DOCSIGN_JWT_LEEWAY";
/// Whether to add the `iat` claim, `true` or `false`.
pub const DOCSIGN_JWT_IAT: &str = "DOCSIGN_JWT_IAT";
/// Header carrying the token.
pub const DOCSIGN_JWT_HEADER: &str = "DOCSIGN_JWT_HEADER";
/// Schema prefixed to the header token.
pub const DOCSIGN_JWT_SCHEMA: &str = "DOCSIGN_JWT_SCHEMA";
/// Comma separated token locations, `header` and/or `body`.
pub const DOCSIGN_JWT_LOCATIONS: &str = "DOCSIGN_JWT_LOCATIONS";

/// Default signing algorithm.
pub const DEFAULT_ALGORITHM: &str = "HS256";
/// Default token lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
/// Default expiration leeway.
pub const DEFAULT_LEEWAY: Duration = Duration::from_secs(30);

/// Default header carrying the token.
pub const DEFAULT_HEADER: &str = "Authorization";
/// Default authentication schema.
pub const DEFAULT_SCHEMA: &str = "Bearer";

/// Expiration claim.
pub const CLAIM_EXP: &str = "exp";
/// Issued-at claim.
pub const CLAIM_IAT: &str = "iat";
/// Key wrapping a header token's value.
pub const KEY_PAYLOAD: &str = "payload";
/// Body field and query parameter holding a token.
pub const KEY_TOKEN: &str = "token";
/// Key holding the signed URL of a URI token.
pub const KEY_URL: &str = "url";
