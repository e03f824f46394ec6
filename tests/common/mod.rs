//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use xwt::{BoxError, Claims, Key, NumericDate, Token, VerificationKey};

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "xwt=debug".into()))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

pub const SECRET: &[u8] = b"integration-test-secret";

pub fn hmac_key() -> Key {
    Key::symmetric(SECRET.to_vec())
}

/// Keyfunc handing out the shared HMAC secret
pub fn hmac_keyfunc<C>(_: &Token<C>) -> Result<VerificationKey, BoxError> {
    Ok(hmac_key().into())
}

pub fn in_an_hour() -> NumericDate {
    NumericDate::now()
        .checked_add(Duration::from_secs(3600))
        .expect("in range")
}

pub fn seconds_ago(seconds: u64) -> NumericDate {
    NumericDate::now()
        .checked_sub(Duration::from_secs(seconds))
        .expect("in range")
}

/// Sign `claims` with `alg` and `key`
pub fn sign<C: Claims>(alg: &str, claims: C, key: &Key) -> String {
    Token::with_alg(alg, claims)
        .expect("registered algorithm")
        .signed_string(key)
        .expect("signing succeeds")
}

/// Assemble a compact token from raw segments, signing with HMAC-SHA256
pub fn forge_hs256(header: &str, payload: &str, secret: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let signing_input = format!(
        "{}.{}",
        xwt::utils::base64url::encode(header),
        xwt::utils::base64url::encode(payload)
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("any key length");
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();
    format!(
        "{signing_input}.{}",
        xwt::utils::base64url::encode_bytes(&signature)
    )
}
