use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use docsign_core::time::from_unix_seconds;
use docsign_core::{Claim, ErrorKind, Jwt, Payload};
use hmac::{Hmac, Mac};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sha2::{Sha256, Sha512};

use super::init;

const NOW: i64 = 1_700_000_000;

fn object(v: Value) -> Payload {
    v.as_object().unwrap().clone()
}

/// Build a compact HS256 token by hand.
fn forge_hs256(secret: &str, header: &Value, claims: &Value) -> String {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(header).unwrap()),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap())
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signing_input.as_bytes());
    let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{signing_input}.{sig}")
}

#[test]
fn test_decode_token_from_another_implementation() {
    init();

    let jwt = Jwt::new("s").with_claims([]);
    let token = forge_hs256(
        "s",
        &json!({"alg": "HS256", "typ": "JWT"}),
        &json!({"key": "doc", "v": 1}),
    );

    assert_eq!(
        jwt.decode(&token).unwrap(),
        object(json!({"key": "doc", "v": 1}))
    );
}

#[test]
fn test_encoded_token_verifies_elsewhere() {
    init();

    let jwt = Jwt::new("s").with_claims([]);
    let token = jwt.encode(&object(json!({"v": 1}))).unwrap();

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);

    let header: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
    assert_eq!(header, json!({"alg": "HS256"}));
    let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
    assert_eq!(claims, json!({"v": 1}));

    let mut mac = Hmac::<Sha256>::new_from_slice(b"s").unwrap();
    mac.update(format!("{}.{}", segments[0], segments[1]).as_bytes());
    mac.verify_slice(&URL_SAFE_NO_PAD.decode(segments[2]).unwrap())
        .expect("signature must verify with the shared secret");
}

#[test]
fn test_hs512_signature() {
    init();

    let jwt = Jwt::new("s").with_algorithm("HS512").with_claims([]);
    let token = jwt.encode(&object(json!({"v": 1}))).unwrap();
    let segments: Vec<&str> = token.split('.').collect();

    let mut mac = Hmac::<Sha512>::new_from_slice(b"s").unwrap();
    mac.update(format!("{}.{}", segments[0], segments[1]).as_bytes());
    assert_eq!(
        URL_SAFE_NO_PAD.decode(segments[2]).unwrap(),
        mac.finalize().into_bytes().to_vec()
    );
}

#[test]
fn test_tampered_payload_is_rejected() {
    init();

    let jwt = Jwt::new("s").with_claims([]);
    let token = jwt.encode(&object(json!({"v": 1}))).unwrap();
    let segments: Vec<&str> = token.split('.').collect();
    let tampered = format!(
        "{}.{}.{}",
        segments[0],
        URL_SAFE_NO_PAD.encode(br#"{"v":2}"#),
        segments[2]
    );

    let err = jwt.decode(&tampered).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadSignature);
    assert!(err.is_token_error());
}

#[test]
fn test_forged_expired_token() {
    init();

    let jwt = Jwt::new("s")
        .with_claims([Claim::default_exp()])
        .with_time(from_unix_seconds(NOW).unwrap());

    let fresh = forge_hs256("s", &json!({"alg": "HS256"}), &json!({"exp": NOW - 30}));
    assert_eq!(jwt.decode(&fresh).unwrap(), Payload::new());

    let stale = forge_hs256("s", &json!({"alg": "HS256"}), &json!({"exp": NOW - 31}));
    assert_eq!(
        jwt.decode(&stale).unwrap_err().kind(),
        ErrorKind::SignatureExpired
    );
}

#[test]
fn test_signed_url_round_trip() {
    init();

    let jwt = Jwt::new("s");
    let uri = "http://docs.example.com/cache/files/doc.docx?filename=a%20b"
        .parse()
        .unwrap();

    let signed = jwt.encode_uri(&uri).unwrap();
    assert!(signed.query().unwrap().starts_with("filename=a+b&token="));
    assert_eq!(jwt.decode_uri(&signed).unwrap(), uri);
}
