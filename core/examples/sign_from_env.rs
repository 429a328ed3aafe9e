//! Sign a request with a policy loaded from `DOCSIGN_JWT_*` variables.
//!
//! ```shell
//! DOCSIGN_JWT_SECRET=secret cargo run --example sign_from_env
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use docsign_core::{Body, Config, Context, Error, HttpSend, OsEnv, Result};

/// Prints requests instead of sending them.
#[derive(Debug)]
struct PrintHttpSend;

#[async_trait]
impl HttpSend for PrintHttpSend {
    async fn http_send(
        &self,
        req: http::Request<Body>,
        body: Option<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        println!("{} {}", req.method(), req.uri());
        for (name, value) in req.headers() {
            println!("{name}: {}", value.to_str().unwrap_or("<binary>"));
        }
        if let Some(bs) = req.body().as_bytes().or(body.as_ref()) {
            println!("\n{}", String::from_utf8_lossy(bs));
        }
        Ok(http::Response::new(Bytes::from_static(b"{\"error\":0}")))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(PrintHttpSend);
    let policy = Config::from_env(&ctx)?
        .signing_policy()
        .ok_or_else(|| Error::config_invalid("DOCSIGN_JWT_SECRET is not set"))?;
    println!("Signing with {policy:?}\n");

    let req = http::Request::post("http://localhost:8080/converter")
        .header("Content-Type", "application/json")
        .body(Body::from(
            r#"{"async":false,"filetype":"docx","key":"doc","outputtype":"pdf"}"#,
        ))?;
    ctx.with_jwt(policy).http_send(req, None).await?;
    Ok(())
}
