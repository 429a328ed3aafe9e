use bytes::Bytes;
use docsign_core::{wrap, Body, Context, ErrorKind, HttpSend, Jwt, Location, Payload, SigningPolicy};
use futures::stream;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{init, Recorder};

fn policy() -> SigningPolicy {
    SigningPolicy::new(Jwt::new("s").with_claims([]))
}

fn request(body: Body) -> http::Request<Body> {
    http::Request::post("http://localhost:8080/coauthoring/CommandService.ashx")
        .header(CONTENT_TYPE, "application/json")
        .header("X-Request-Id", "42")
        .body(body)
        .unwrap()
}

fn stream_body() -> Body {
    Body::from_stream(stream::iter([Ok::<_, std::io::Error>(Bytes::from_static(b"{\"v\":1}"))]))
}

#[tokio::test]
async fn test_end_to_end() -> anyhow::Result<()> {
    init();

    let recorder = Recorder::with_reply(r#"{"error":0}"#);
    let signer = wrap(recorder.clone(), policy());

    let resp = signer.http_send(request(Body::from(r#"{"v":1}"#)), None).await?;
    assert_eq!(resp.body(), r#"{"error":0}"#);

    let sent = recorder.take();
    assert_eq!(sent.len(), 1);

    let auth = sent[0].parts.headers[AUTHORIZATION].to_str()?;
    let token = auth.strip_prefix("Bearer ").expect("schema must prefix the token");
    assert_eq!(policy().jwt().decode_header(token)?, json!({"v": 1}));

    let body: Payload = serde_json::from_slice(sent[0].content.as_ref().unwrap())?;
    assert_eq!(body["v"], json!(1));
    assert_eq!(policy().jwt().decode_body(&body)?, json!({"v": 1}).as_object().unwrap().clone());
    assert_eq!(sent[0].parts.headers["x-request-id"], "42");
    assert!(sent[0].body.is_none());
    Ok(())
}

#[tokio::test]
async fn test_empty_locations_are_transparent() -> anyhow::Result<()> {
    init();

    let plain = Recorder::new();
    let recorder = Recorder::new();
    let signer = wrap(recorder.clone(), policy().with_locations([]));

    let calls = || -> http::Result<Vec<(http::Request<Body>, Option<Bytes>)>> {
        Ok(vec![
            (request(Body::from(r#"{"v":1}"#)), None),
            (request(Body::Empty), Some(Bytes::from_static(b"not json"))),
            (request(Body::Empty), Some(Bytes::from_static(br#"{"v":1}"#))),
            (
                http::Request::get("http://localhost:8080/healthcheck").body(Body::Empty)?,
                None,
            ),
        ])
    };
    for (req, body) in calls()? {
        plain.http_send(req, body).await?;
    }
    for (req, body) in calls()? {
        signer.http_send(req, body).await?;
    }

    let expected = plain.take();
    let sent = recorder.take();
    assert_eq!(sent.len(), expected.len());
    for (sent, expected) in sent.iter().zip(&expected) {
        assert_eq!(sent.parts.method, expected.parts.method);
        assert_eq!(sent.parts.uri, expected.parts.uri);
        assert_eq!(sent.parts.version, expected.parts.version);
        assert_eq!(sent.parts.headers, expected.parts.headers);
        assert_eq!(sent.content, expected.content);
        assert_eq!(sent.streamed, expected.streamed);
        assert_eq!(sent.body, expected.body);
    }
    Ok(())
}

#[tokio::test]
async fn test_argument_body_is_signed() -> anyhow::Result<()> {
    init();

    let recorder = Recorder::new();
    let signer = wrap(recorder.clone(), policy());

    signer
        .http_send(request(Body::Empty), Some(Bytes::from_static(br#"{"c":"info"}"#)))
        .await?;

    let sent = recorder.take();
    assert!(sent[0].content.is_none());
    assert!(sent[0].parts.headers.contains_key(AUTHORIZATION));

    let body: Payload = serde_json::from_slice(sent[0].body.as_ref().unwrap())?;
    assert_eq!(
        policy().jwt().decode_body(&body)?,
        json!({"c": "info"}).as_object().unwrap().clone()
    );
    Ok(())
}

#[tokio::test]
async fn test_header_only_leaves_body_untouched() -> anyhow::Result<()> {
    init();

    let recorder = Recorder::new();
    let signer = wrap(
        recorder.clone(),
        policy()
            .with_locations([Location::Header])
            .with_header("AuthorizationJwt")
            .with_schema("Token"),
    );

    signer.http_send(request(Body::from(r#"{"v":1}"#)), None).await?;

    let sent = recorder.take();
    assert_eq!(sent[0].content.as_deref(), Some(&b"{\"v\":1}"[..]));
    assert!(sent[0].parts.headers["authorizationjwt"]
        .to_str()?
        .starts_with("Token "));
    assert!(!sent[0].parts.headers.contains_key(AUTHORIZATION));
    Ok(())
}

#[tokio::test]
async fn test_streamed_body_is_forwarded_unsigned() -> anyhow::Result<()> {
    init();

    let recorder = Recorder::new();
    let signer = wrap(recorder.clone(), policy());

    signer.http_send(request(stream_body()), None).await?;

    let sent = recorder.take();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].streamed);
    assert!(!sent[0].parts.headers.contains_key(AUTHORIZATION));
    Ok(())
}

#[tokio::test]
async fn test_request_without_content_is_forwarded_unsigned() -> anyhow::Result<()> {
    init();

    let recorder = Recorder::new();
    let signer = wrap(recorder.clone(), policy());

    signer
        .http_send(
            http::Request::get("http://localhost:8080/healthcheck").body(Body::Empty)?,
            None,
        )
        .await?;

    let sent = recorder.take();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].parts.headers.is_empty());
    assert!(sent[0].content.is_none());
    assert!(sent[0].body.is_none());
    Ok(())
}

#[tokio::test]
async fn test_conflict_is_reported_by_the_transport() {
    init();

    let recorder = Recorder::new();
    let signer = wrap(recorder.clone(), policy());

    for content in [Body::from(r#"{"v":1}"#), stream_body()] {
        let err = signer
            .http_send(request(content), Some(Bytes::from_static(br#"{"v":2}"#)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    let sent = recorder.take();
    assert_eq!(sent.len(), 2);
    for s in sent {
        assert!(!s.parts.headers.contains_key(AUTHORIZATION));
        assert_eq!(s.body.as_deref(), Some(&br#"{"v":2}"#[..]));
    }
}

#[tokio::test]
async fn test_token_errors_do_not_reach_the_transport() {
    init();

    let recorder = Recorder::new();
    let signer = wrap(
        recorder.clone(),
        SigningPolicy::new(Jwt::new("s").with_algorithm("RS256")),
    );

    let err = signer
        .http_send(request(Body::from(r#"{"v":1}"#)), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
    assert!(recorder.take().is_empty());
}

#[tokio::test]
async fn test_context_with_jwt() -> anyhow::Result<()> {
    init();

    let recorder = Recorder::new();
    let ctx = Context::new().with_http_send(recorder.clone());

    ctx.with_jwt(policy().with_locations([Location::Body]))
        .with_jwt(policy().with_locations([Location::Header]))
        .http_send(request(Body::from(r#"{"v":1}"#)), None)
        .await?;

    let sent = recorder.take();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].parts.headers.contains_key(AUTHORIZATION));
    let body: Payload = serde_json::from_slice(sent[0].content.as_ref().unwrap())?;
    assert!(body.contains_key("token"));
    Ok(())
}
