use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use http::uri::PathAndQuery;
use http::Uri;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde_json::{Map, Value};

use crate::claim::Claim;
use crate::constants::*;
use crate::time::{now, unix_seconds, DateTime};
use crate::utils::Redact;
use crate::{Error, Result};

/// Payload is the JSON object carried by a token.
///
/// Key order is preserved from insertion through serialization.
pub type Payload = Map<String, Value>;

/// Jwt encodes payloads into signed compact tokens and decodes them back.
///
/// Tokens use the standard JSON Web Signature compact form
/// `base64url(header).base64url(payload).base64url(signature)` with a header
/// of exactly `{"alg": <algorithm>}`, so any JWT consumer can verify them.
///
/// The configured [`Claim`]s add `exp`/`iat` while encoding; decoding checks
/// `exp` and strips both keys, so callers never see claim bookkeeping.
///
/// Only the HMAC family (`HS256`, `HS384`, `HS512`) is supported since the
/// codec is keyed by a shared secret.
///
/// [RFC 7519 Reference](https://datatracker.ietf.org/doc/html/rfc7519)
#[derive(Clone)]
pub struct Jwt {
    secret: String,
    algorithm: String,
    claims: Vec<Claim>,
    time: Option<DateTime>,
}

impl Debug for Jwt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwt")
            .field("secret", &Redact::from(&self.secret))
            .field("algorithm", &self.algorithm)
            .field("claims", &self.claims)
            .finish()
    }
}

impl Jwt {
    /// Create a new codec with `HS256` and the default `exp` and `iat` claims.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: DEFAULT_ALGORITHM.to_string(),
            claims: vec![Claim::default_exp(), Claim::iat()],
            time: None,
        }
    }

    /// Set the algorithm identifier, for example `HS512`.
    ///
    /// The identifier is validated on every encode and decode.
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Replace the claims.
    ///
    /// The claims are copied, later changes to the caller's collection never
    /// reach this codec.
    pub fn with_claims(mut self, claims: impl IntoIterator<Item = Claim>) -> Self {
        self.claims = claims.into_iter().collect();
        self
    }

    /// Freeze the clock used by encode and decode.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// The secret key.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The algorithm identifier.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The configured claims.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Encode a payload into a token.
    ///
    /// Existing `exp`/`iat` keys of the payload are overwritten by the
    /// configured claims. The caller's payload is left untouched.
    pub fn encode(&self, payload: &Payload) -> Result<String> {
        let algorithm = self.parse_algorithm()?;
        let now = unix_seconds(self.time.unwrap_or_else(now));

        let mut claims = payload.clone();
        for claim in &self.claims {
            if let Some(v) = claim.on_encode(now) {
                claims.insert(claim.key().to_string(), Value::from(v));
            }
        }

        let mut header = Header::new(algorithm);
        header.typ = None;

        jsonwebtoken::encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(map_jwt_error)
    }

    /// Decode a token into its payload.
    ///
    /// The token must be signed with this codec's secret and declare this
    /// codec's algorithm. A present `exp` must not be older than now minus
    /// the leeway of the configured `exp` claim (zero without one).
    pub fn decode(&self, token: &str) -> Result<Payload> {
        let algorithm = self.parse_algorithm()?;
        let now = unix_seconds(self.time.unwrap_or_else(now));

        // Expiration is checked below against our own clock.
        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Payload>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(map_jwt_error)?;
        let mut payload = data.claims;

        if let Some(exp) = payload.get(CLAIM_EXP) {
            let exp = numeric_date(exp).ok_or_else(|| {
                Error::malformed_token(format!("expected the 'exp' claim to be a number, got {exp}"))
            })?;
            let leeway = self.leeway_seconds();
            if now > exp.saturating_add(leeway) {
                return Err(Error::signature_expired(format!(
                    "signature has expired at {exp}, now is {now} with a leeway of {leeway}s"
                )));
            }
        }

        payload.remove(CLAIM_EXP);
        payload.remove(CLAIM_IAT);
        Ok(payload)
    }

    /// Encode an arbitrary JSON value for use in a request header.
    ///
    /// The value is wrapped under the `payload` key, so scalars and arrays
    /// are representable too.
    ///
    /// ```
    /// use docsign_core::Jwt;
    /// use serde_json::json;
    ///
    /// let jwt = Jwt::new("secret");
    /// let token = jwt.encode_header(&json!({"key": "doc"}))?;
    /// let value = format!("Bearer {token}");
    /// # assert!(value.starts_with("Bearer ey"));
    /// # Ok::<(), docsign_core::Error>(())
    /// ```
    pub fn encode_header(&self, payload: &Value) -> Result<String> {
        let mut wrapped = Payload::new();
        wrapped.insert(KEY_PAYLOAD.to_string(), payload.clone());
        self.encode(&wrapped)
    }

    /// Decode a token produced by [`Jwt::encode_header`].
    ///
    /// The token is the header value without its schema prefix.
    pub fn decode_header(&self, token: &str) -> Result<Value> {
        let mut payload = self.decode(token)?;
        payload.remove(KEY_PAYLOAD).ok_or_else(|| {
            Error::missing_key("expected the decoded header to have a 'payload' key")
        })
    }

    /// Return a copy of `body` with a `token` field that signs the whole body.
    pub fn encode_body(&self, body: &Payload) -> Result<Payload> {
        let token = self.encode(body)?;
        let mut body = body.clone();
        body.insert(KEY_TOKEN.to_string(), Value::String(token));
        Ok(body)
    }

    /// Decode the `token` field of a body.
    pub fn decode_body(&self, body: &Payload) -> Result<Payload> {
        let token = body
            .get(KEY_TOKEN)
            .ok_or_else(|| Error::missing_key("expected the body to have a 'token' key"))?;
        let token = token.as_str().ok_or_else(|| {
            Error::type_mismatch(format!(
                "expected the 'token' key to be a string, got {}",
                type_name(token)
            ))
        })?;

        self.decode(token)
    }

    /// Return a copy of `uri` with a `token` query parameter appended.
    ///
    /// The token signs `{"url": <uri as given>}`. Existing query parameters
    /// are kept in their original order ahead of `token`.
    pub fn encode_uri(&self, uri: &Uri) -> Result<Uri> {
        let mut payload = Payload::new();
        payload.insert(KEY_URL.to_string(), Value::String(uri.to_string()));
        let token = self.encode(&payload)?;

        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(q) = uri.query() {
            query.extend_pairs(form_urlencoded::parse(q.as_bytes()));
        }
        query.append_pair(KEY_TOKEN, &token);

        let paq = format!("{}?{}", uri.path(), query.finish());
        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
        Ok(Uri::from_parts(parts)?)
    }

    /// Decode the `token` query parameter of a URI produced by [`Jwt::encode_uri`].
    ///
    /// Returns the URI that was signed, which must be an absolute HTTP(S) URI.
    pub fn decode_uri(&self, uri: &Uri) -> Result<Uri> {
        let query = uri.query().ok_or_else(|| {
            Error::missing_query_string("expected the URI to have a query string")
        })?;

        let (_, token) = form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == KEY_TOKEN)
            .ok_or_else(|| {
                Error::missing_key("expected the query string to have a 'token' key")
            })?;

        let payload = self.decode(&token)?;
        let url = payload
            .get(KEY_URL)
            .ok_or_else(|| Error::missing_key("expected the decoded token to have a 'url' key"))?;
        let url = url.as_str().ok_or_else(|| {
            Error::type_mismatch(format!(
                "expected the 'url' key to be a string, got {}",
                type_name(url)
            ))
        })?;

        let target = Uri::from_str(url).map_err(|e| {
            Error::type_mismatch(format!("expected the 'url' key to be a URI, got {url}"))
                .with_source(e)
        })?;
        match (target.scheme_str(), target.authority()) {
            (Some("http" | "https"), Some(_)) => Ok(target),
            _ => Err(Error::type_mismatch(format!(
                "expected the 'url' key to be an absolute HTTP URI, got {url}"
            ))),
        }
    }

    fn parse_algorithm(&self) -> Result<Algorithm> {
        match Algorithm::from_str(&self.algorithm) {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
            _ => Err(Error::unsupported_algorithm(format!(
                "unsupported signing method: {:?}",
                self.algorithm
            ))),
        }
    }

    /// Leeway of the last configured `exp` claim.
    fn leeway_seconds(&self) -> i64 {
        self.claims
            .iter()
            .filter_map(Claim::leeway_seconds)
            .next_back()
            .unwrap_or(0)
    }
}

fn numeric_date(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> Error {
    debug!("token rejected: {err}");
    let e = match err.kind() {
        JwtErrorKind::InvalidAlgorithm
        | JwtErrorKind::InvalidAlgorithmName
        | JwtErrorKind::MissingAlgorithm => {
            Error::unsupported_algorithm("expected a different algorithm")
        }
        JwtErrorKind::InvalidSignature => Error::bad_signature("signature verification failed"),
        JwtErrorKind::ExpiredSignature => Error::signature_expired("signature has expired"),
        JwtErrorKind::InvalidToken => {
            Error::malformed_token("not enough or too many segments")
        }
        JwtErrorKind::Base64(_) | JwtErrorKind::Json(_) | JwtErrorKind::Utf8(_) => {
            Error::malformed_token("token segment is not valid base64url JSON")
        }
        _ => Error::unexpected("failed to process token"),
    };
    e.with_source(err)
}
