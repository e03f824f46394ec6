use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HS256 algorithm (HMAC with SHA-256)
pub struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub struct HS512;

macro_rules! hmac_method {
    ($method:ident, $digest:ty) => {
        impl SigningMethod for $method {
            fn alg(&self) -> &str {
                stringify!($method)
            }

            fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
                let expected = self.sign(signing_input, key)?;
                compare(signature, &expected)
            }

            fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
                let secret = key.as_symmetric(self.alg())?;
                let mut mac = Hmac::<$digest>::new_from_slice(secret)
                    .map_err(|e| Error::KeyRejected(e.to_string()))?;
                mac.update(signing_input.as_bytes());
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    };
}

hmac_method!(HS256, Sha256);
hmac_method!(HS384, Sha384);
hmac_method!(HS512, Sha512);

/// Constant-time comparison of the provided and recomputed signature
fn compare(provided: &[u8], expected: &[u8]) -> Result<()> {
    if provided.len() != expected.len() {
        return Err(Error::SignatureMismatch);
    }

    if constant_time_eq(provided, expected) {
        Ok(())
    } else {
        Err(Error::SignatureMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_INPUT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    #[test]
    fn test_hs256_valid_signature() {
        let key = Key::symmetric(b"your-256-bit-secret".to_vec());
        let signature = HS256.sign(SIGNING_INPUT, &key).unwrap();
        assert_eq!(signature.len(), 32);
        assert!(HS256.verify(SIGNING_INPUT, &signature, &key).is_ok());
    }

    #[test]
    fn test_hs256_invalid_signature() {
        let key = Key::symmetric(b"your-256-bit-secret".to_vec());
        let result = HS256.verify(SIGNING_INPUT, b"wrong", &key);
        assert!(matches!(result, Err(Error::SignatureMismatch)));
    }

    #[test]
    fn test_hs256_wrong_secret() {
        let key = Key::symmetric(b"your-256-bit-secret".to_vec());
        let wrong = Key::symmetric(b"wrong-secret".to_vec());
        let signature = HS256.sign(SIGNING_INPUT, &key).unwrap();
        let result = HS256.verify(SIGNING_INPUT, &signature, &wrong);
        assert!(matches!(result, Err(Error::SignatureMismatch)));
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let key = Key::symmetric(b"Jefe".to_vec());
        let signature = HS256
            .sign("what do ya want for nothing?", &key)
            .unwrap();
        let hex: String = signature.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_hs384_and_hs512_lengths() {
        let key = Key::symmetric(b"your-512-bit-secret-needs-to-be-even-longer".to_vec());
        let s384 = HS384.sign(SIGNING_INPUT, &key).unwrap();
        let s512 = HS512.sign(SIGNING_INPUT, &key).unwrap();
        assert_eq!(s384.len(), 48);
        assert_eq!(s512.len(), 64);
        assert!(HS384.verify(SIGNING_INPUT, &s384, &key).is_ok());
        assert!(HS512.verify(SIGNING_INPUT, &s384, &key).is_err());
    }

    #[test]
    fn test_wrong_key_type() {
        let key = Key::ed25519_public(vec![0u8; 32]);
        let result = HS256.verify(SIGNING_INPUT, b"signature", &key);
        assert!(matches!(result, Err(Error::KeyTypeMismatch { .. })));
    }
}
