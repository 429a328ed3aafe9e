use std::str::FromStr;

use bytes::Bytes;
use docsign_core::{Body, Context, Error, Result, SigningPolicy};
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Method, Uri};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::constants;
use crate::Response;

/// Client talks to a document server rooted at a base URI.
///
/// Cloning is cheap and clones share the same transport.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    base_uri: Uri,
    user_agent: String,
}

impl Client {
    /// Create a client sending requests through `ctx`.
    ///
    /// `base_uri` must be an absolute `http` or `https` URI.
    pub fn new(ctx: Context, base_uri: Uri) -> Result<Self> {
        match (base_uri.scheme_str(), base_uri.authority()) {
            (Some("http" | "https"), Some(_)) => Ok(Self {
                ctx,
                base_uri,
                user_agent: constants::USER_AGENT.to_string(),
            }),
            _ => Err(Error::config_invalid(format!(
                "base URI must be an absolute HTTP URI, got {base_uri}"
            ))),
        }
    }

    /// Set the `User-Agent` of every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Return a new client whose requests are signed per `policy`.
    ///
    /// `self` keeps sending unsigned requests.
    pub fn with_jwt(&self, policy: SigningPolicy) -> Self {
        Self {
            ctx: self.ctx.with_jwt(policy),
            base_uri: self.base_uri.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    /// The context requests are sent through.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The base URI.
    pub fn base_uri(&self) -> &Uri {
        &self.base_uri
    }

    /// The `User-Agent` of every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Resolve `path` against the base URI.
    ///
    /// Follows RFC 3986 reference resolution: `healthcheck` against
    /// `http://h/ds/` is `http://h/ds/healthcheck`, but against `http://h/ds`
    /// it is `http://h/healthcheck`.
    pub fn uri(&self, path: &str) -> Result<Uri> {
        join(&self.base_uri, path)
    }

    /// Build a JSON request.
    ///
    /// A present `body` is serialized as the buffered request content.
    pub fn request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        uri: Uri,
        body: Option<&T>,
    ) -> Result<http::Request<Body>> {
        let mut req = http::Request::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);

        let content = match body {
            Some(body) => {
                req = req.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Body::Bytes(Bytes::from(serde_json::to_vec(body)?))
            }
            None => Body::Empty,
        };

        Ok(req.body(content)?)
    }

    /// Send a request and collect its response.
    pub async fn send(&self, req: http::Request<Body>) -> Result<Response> {
        debug!("sending {} {}", req.method(), req.uri());
        let resp = self.ctx.http_send(req, None).await?;
        debug!("got response with status {}", resp.status());
        Ok(resp.into())
    }

    /// Send a `GET` request to `path`.
    pub async fn get(&self, path: &str) -> Result<Response> {
        let req = self.request::<Value>(Method::GET, self.uri(path)?, None)?;
        self.send(req).await
    }

    /// Send a `POST` request with a JSON `body` to `path`.
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let req = self.request(Method::POST, self.uri(path)?, Some(body))?;
        self.send(req).await
    }
}

/// Resolve `reference` against `base` as described by RFC 3986 section 5.2.
fn join(base: &Uri, reference: &str) -> Result<Uri> {
    let mut url = Url::parse(&base.to_string())
        .and_then(|base| base.join(reference))
        .map_err(|e| {
            Error::request_invalid(format!("failed to resolve {reference:?} against {base}"))
                .with_source(e)
        })?;
    url.set_fragment(None);

    Ok(Uri::from_str(url.as_str())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("http://h/", "healthcheck", "http://h/healthcheck"; "root")]
    #[test_case("http://h:8080/ds/", "converter", "http://h:8080/ds/converter"; "directory")]
    #[test_case("http://h/ds", "converter", "http://h/converter"; "file")]
    #[test_case("http://h/ds/", "/converter", "http://h/converter"; "absolute path")]
    #[test_case("http://h/a/b/", "../c", "http://h/a/c"; "parent")]
    #[test_case("http://h/a/", "../../c", "http://h/c"; "parent above root")]
    #[test_case("http://h/a/", "./c/.", "http://h/a/c/"; "current")]
    #[test_case("http://h/a?x=1", "", "http://h/a?x=1"; "empty")]
    #[test_case("http://h/a?x=1", "?y=2", "http://h/a?y=2"; "query only")]
    #[test_case("http://h/a", "b?c=d#e", "http://h/b?c=d"; "fragment")]
    #[test_case("https://h/a", "//o/b", "https://o/b"; "network path")]
    #[test_case("http://h/a", "https://o/b", "https://o/b"; "absolute")]
    fn test_join(base: &str, reference: &str, expected: &str) {
        let base = Uri::from_str(base).unwrap();
        assert_eq!(join(&base, reference).unwrap().to_string(), expected);
    }

    #[test]
    fn test_join_encodes_path() {
        let base = Uri::from_static("http://h/");
        assert_eq!(join(&base, "a b").unwrap().to_string(), "http://h/a%20b");
    }

    #[test]
    fn test_join_rejects_invalid_reference() {
        let base = Uri::from_static("http://h/");
        let err = join(&base, "http://h:99999/").unwrap_err();
        assert_eq!(err.kind(), docsign_core::ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_new_requires_absolute_http_uri() {
        for uri in ["/healthcheck", "ftp://h/"] {
            let err = Client::new(Context::new(), Uri::from_str(uri).unwrap()).unwrap_err();
            assert_eq!(err.kind(), docsign_core::ErrorKind::ConfigInvalid, "{uri}");
        }
    }

    #[test]
    fn test_request() -> anyhow::Result<()> {
        let client = Client::new(Context::new(), Uri::from_static("http://h/"))?
            .with_user_agent("test/1.0");

        let req = client.request::<Value>(Method::GET, client.uri("healthcheck")?, None)?;
        assert_eq!(req.headers()[ACCEPT], "application/json");
        assert_eq!(req.headers()[USER_AGENT], "test/1.0");
        assert!(!req.headers().contains_key(CONTENT_TYPE));
        assert!(req.body().is_empty());

        let req = client.request(
            Method::POST,
            client.uri("converter")?,
            Some(&serde_json::json!({"key": "doc"})),
        )?;
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.uri(), "http://h/converter");
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.body().as_bytes().unwrap(), r#"{"key":"doc"}"#);
        Ok(())
    }
}
