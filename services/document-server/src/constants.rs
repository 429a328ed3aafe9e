/// Default `User-Agent` sent by [`Client`](crate::Client).
pub const USER_AGENT: &str = concat!("docsign/", env!("CARGO_PKG_VERSION"));
