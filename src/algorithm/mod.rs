//! Signing methods and the process-wide registry
//!
//! The registry maps the header `alg` to a [`SigningMethod`]. It starts out
//! holding every built-in method enabled by crate features. Further methods
//! are added with [`register_signing_method`] during start-up, before tokens
//! are parsed concurrently; lookups never block and always see a consistent
//! table.

pub mod hmac;

#[cfg(feature = "ecdsa")]
pub mod ecdsa;

#[cfg(feature = "eddsa")]
pub mod eddsa;

use crate::error::{Error, Result};
use crate::keys::Key;
use crate::limits::MAX_ALG_LENGTH;
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// A named algorithm that signs and verifies a signing input
///
/// The signing input is the undecoded `header.payload` text; signatures are
/// raw bytes (already base64url-decoded).
pub trait SigningMethod: Send + Sync {
    /// Name written to and matched against the header `alg`
    fn alg(&self) -> &str;

    /// Check `signature` over `signing_input` with `key`
    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()>;

    /// Sign `signing_input` with `key`
    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>>;
}

impl std::fmt::Debug for dyn SigningMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningMethod({})", self.alg())
    }
}

type Registry = HashMap<String, Arc<dyn SigningMethod>>;

static REGISTRY: Lazy<ArcSwap<Registry>> = Lazy::new(|| ArcSwap::from_pointee(builtin()));

fn builtin() -> Registry {
    let mut methods: Vec<Arc<dyn SigningMethod>> =
        vec![Arc::new(hmac::HS256), Arc::new(hmac::HS384), Arc::new(hmac::HS512)];

    #[cfg(feature = "ecdsa")]
    methods.extend([
        Arc::new(ecdsa::ES256) as Arc<dyn SigningMethod>,
        Arc::new(ecdsa::ES384),
    ]);

    #[cfg(feature = "eddsa")]
    methods.push(Arc::new(eddsa::EdDSA));

    methods
        .into_iter()
        .map(|method| (method.alg().to_string(), method))
        .collect()
}

/// Add or replace a signing method under its [`SigningMethod::alg`] name
///
/// Meant for initialization; the `none` algorithm is refused in any spelling
/// (RFC 8725).
pub fn register_signing_method(method: Arc<dyn SigningMethod>) -> Result<()> {
    let alg = method.alg().to_string();
    if alg.eq_ignore_ascii_case("none") {
        return Err(Error::AlgorithmNoneRejected);
    }
    if alg.is_empty() || alg.len() > MAX_ALG_LENGTH {
        return Err(Error::AlgorithmUnavailable(alg));
    }

    REGISTRY.rcu(|current| {
        let mut next = Registry::clone(current);
        next.insert(alg.clone(), Arc::clone(&method));
        next
    });
    tracing::debug!(alg = %alg, "registered signing method");
    Ok(())
}

/// Look up a signing method by exact `alg` name
pub fn signing_method(alg: &str) -> Option<Arc<dyn SigningMethod>> {
    if alg.len() > MAX_ALG_LENGTH {
        return None;
    }
    REGISTRY.load().get(alg).cloned()
}

/// Names of every registered method, sorted
pub fn registered_algorithms() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.load().keys().cloned().collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reversed;

    impl SigningMethod for Reversed {
        fn alg(&self) -> &str {
            "XREV"
        }

        fn verify(&self, signing_input: &str, signature: &[u8], _key: &Key) -> Result<()> {
            let expected: Vec<u8> = signing_input.bytes().rev().collect();
            if expected == signature {
                Ok(())
            } else {
                Err(Error::SignatureMismatch)
            }
        }

        fn sign(&self, signing_input: &str, _key: &Key) -> Result<Vec<u8>> {
            Ok(signing_input.bytes().rev().collect())
        }
    }

    struct NamedNone(&'static str);

    impl SigningMethod for NamedNone {
        fn alg(&self) -> &str {
            self.0
        }

        fn verify(&self, _: &str, _: &[u8], _: &Key) -> Result<()> {
            Ok(())
        }

        fn sign(&self, _: &str, _: &Key) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_builtin_methods() {
        assert!(signing_method("HS256").is_some());
        assert!(signing_method("HS512").is_some());
        #[cfg(feature = "ecdsa")]
        assert!(signing_method("ES384").is_some());
        #[cfg(feature = "eddsa")]
        assert!(signing_method("EdDSA").is_some());
        assert!(signing_method("hs256").is_none());
        assert!(signing_method("none").is_none());
    }

    #[test]
    fn test_register_custom_method() {
        register_signing_method(Arc::new(Reversed)).unwrap();
        let method = signing_method("XREV").unwrap();
        let key = Key::symmetric(b"unused".to_vec());
        let signature = method.sign("abc", &key).unwrap();
        assert_eq!(signature, b"cba");
        assert!(method.verify("abc", &signature, &key).is_ok());
        assert!(registered_algorithms().contains(&"XREV".to_string()));
    }

    #[test]
    fn test_none_is_refused() {
        for name in ["none", "None", "NONE", "nOnE"] {
            assert!(matches!(
                register_signing_method(Arc::new(NamedNone(name))),
                Err(Error::AlgorithmNoneRejected)
            ));
        }
        assert!(signing_method("None").is_none());
    }

    #[test]
    fn test_oversized_name() {
        assert!(signing_method(&"A".repeat(MAX_ALG_LENGTH + 1)).is_none());
    }
}
