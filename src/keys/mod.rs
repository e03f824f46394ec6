//! Key material for signing and verification
//!
//! Keys are opaque to the parser: the keyfunc hands back a [`VerificationKey`]
//! and each [`SigningMethod`](crate::SigningMethod) checks that it got the key
//! type it can use.
use crate::error::{Error, Result};
use std::fmt;
use zeroize::Zeroizing;

/// ECDSA curve identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1) curve
    P256,
    /// P-384 (secp384r1) curve
    P384,
}

/// A key usable by one family of signing methods
#[derive(Clone)]
pub enum Key {
    /// Shared secret for HMAC methods
    Symmetric(Zeroizing<Vec<u8>>),

    /// Uncompressed SEC1 public point (`0x04 || X || Y`)
    EcdsaPublic { curve: EcdsaCurve, point: Vec<u8> },

    /// PKCS#8 v1 private key document
    EcdsaPrivate {
        curve: EcdsaCurve,
        pkcs8: Zeroizing<Vec<u8>>,
    },

    /// Raw 32 byte Ed25519 public key
    Ed25519Public(Vec<u8>),

    /// PKCS#8 Ed25519 private key document
    Ed25519Private(Zeroizing<Vec<u8>>),
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(Zeroizing::new(secret.into()))
    }

    pub fn ecdsa_public(point: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::EcdsaPublic {
            curve,
            point: point.into(),
        }
    }

    pub fn ecdsa_private(pkcs8: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::EcdsaPrivate {
            curve,
            pkcs8: Zeroizing::new(pkcs8.into()),
        }
    }

    pub fn ed25519_public(public_key: impl Into<Vec<u8>>) -> Self {
        Key::Ed25519Public(public_key.into())
    }

    pub fn ed25519_private(pkcs8: impl Into<Vec<u8>>) -> Self {
        Key::Ed25519Private(Zeroizing::new(pkcs8.into()))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "Symmetric",
            Key::EcdsaPublic { .. } => "ECDSA public",
            Key::EcdsaPrivate { .. } => "ECDSA private",
            Key::Ed25519Public(_) => "Ed25519 public",
            Key::Ed25519Private(_) => "Ed25519 private",
        }
    }

    /// Get the shared secret or return a key type error for `algorithm`
    pub fn as_symmetric(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            Key::Symmetric(secret) => Ok(secret.as_slice()),
            _ => Err(self.mismatch(algorithm, "Symmetric")),
        }
    }

    pub(crate) fn mismatch(&self, algorithm: &str, expected: &'static str) -> Error {
        Error::KeyTypeMismatch {
            algorithm: algorithm.to_string(),
            expected,
            actual: self.key_type(),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Symmetric(_) => f.write_str("Key::Symmetric(<redacted>)"),
            Key::EcdsaPublic { curve, point } => f
                .debug_struct("Key::EcdsaPublic")
                .field("curve", curve)
                .field("len", &point.len())
                .finish(),
            Key::EcdsaPrivate { curve, .. } => f
                .debug_struct("Key::EcdsaPrivate")
                .field("curve", curve)
                .finish_non_exhaustive(),
            Key::Ed25519Public(key) => f
                .debug_struct("Key::Ed25519Public")
                .field("len", &key.len())
                .finish(),
            Key::Ed25519Private(_) => f.write_str("Key::Ed25519Private(<redacted>)"),
        }
    }
}

impl From<&[u8]> for Key {
    fn from(secret: &[u8]) -> Self {
        Key::symmetric(secret)
    }
}

impl From<&str> for Key {
    fn from(secret: &str) -> Self {
        Key::symmetric(secret.as_bytes())
    }
}

/// Ordered candidate keys, tried first to last
#[derive(Debug, Clone, Default)]
pub struct VerificationKeySet {
    keys: Vec<Key>,
}

impl VerificationKeySet {
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// Chainable push
    pub fn with(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<Key> for VerificationKeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// What a keyfunc returns: one key, or a set of candidates
#[derive(Debug, Clone)]
pub enum VerificationKey {
    Single(Key),
    Set(VerificationKeySet),
}

impl From<Key> for VerificationKey {
    fn from(key: Key) -> Self {
        VerificationKey::Single(key)
    }
}

impl From<VerificationKeySet> for VerificationKey {
    fn from(set: VerificationKeySet) -> Self {
        VerificationKey::Set(set)
    }
}

impl From<Vec<Key>> for VerificationKey {
    fn from(keys: Vec<Key>) -> Self {
        VerificationKey::Set(VerificationKeySet::new(keys))
    }
}
