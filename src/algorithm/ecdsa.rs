use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::{EcdsaCurve, Key};

use ring::rand::SystemRandom;
use ring::signature::{self, EcdsaKeyPair, UnparsedPublicKey};

/// ES256 algorithm (ECDSA with P-256 and SHA-256)
pub struct ES256;

/// ES384 algorithm (ECDSA with P-384 and SHA-384)
pub struct ES384;

/// Per-algorithm ring parameters; signatures use the fixed `R || S` layout
struct Params {
    alg: &'static str,
    curve: EcdsaCurve,
    public: &'static str,
    private: &'static str,
    verification: &'static signature::EcdsaVerificationAlgorithm,
    signing: &'static signature::EcdsaSigningAlgorithm,
}

static ES256_PARAMS: Params = Params {
    alg: "ES256",
    curve: EcdsaCurve::P256,
    public: "ECDSA P-256 public",
    private: "ECDSA P-256 private",
    verification: &signature::ECDSA_P256_SHA256_FIXED,
    signing: &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
};

static ES384_PARAMS: Params = Params {
    alg: "ES384",
    curve: EcdsaCurve::P384,
    public: "ECDSA P-384 public",
    private: "ECDSA P-384 private",
    verification: &signature::ECDSA_P384_SHA384_FIXED,
    signing: &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
};

impl SigningMethod for ES256 {
    fn alg(&self) -> &str {
        ES256_PARAMS.alg
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_ecdsa(&ES256_PARAMS, signing_input, signature, key)
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_ecdsa(&ES256_PARAMS, signing_input, key)
    }
}

impl SigningMethod for ES384 {
    fn alg(&self) -> &str {
        ES384_PARAMS.alg
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_ecdsa(&ES384_PARAMS, signing_input, signature, key)
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_ecdsa(&ES384_PARAMS, signing_input, key)
    }
}

/// Generic ECDSA signature verification
fn verify_ecdsa(params: &Params, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
    let point = match key {
        // Verify curve matches algorithm
        Key::EcdsaPublic { curve, point } if *curve == params.curve => point,
        _ => return Err(key.mismatch(params.alg, params.public)),
    };

    UnparsedPublicKey::new(params.verification, point)
        .verify(signing_input.as_bytes(), signature)
        .map_err(|_| Error::SignatureMismatch)
}

fn sign_ecdsa(params: &Params, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
    let pkcs8 = match key {
        Key::EcdsaPrivate { curve, pkcs8 } if *curve == params.curve => pkcs8,
        _ => return Err(key.mismatch(params.alg, params.private)),
    };

    let rng = SystemRandom::new();
    let key_pair = EcdsaKeyPair::from_pkcs8(params.signing, pkcs8, &rng)
        .map_err(|e| Error::KeyRejected(e.to_string()))?;
    let signature = key_pair
        .sign(&rng, signing_input.as_bytes())
        .map_err(|_| Error::SigningFailed(params.alg.to_string()))?;
    Ok(signature.as_ref().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::signature::KeyPair;

    const SIGNING_INPUT: &str = "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    fn generate_ecdsa_keypair(curve: EcdsaCurve) -> (Key, Key) {
        let rng = SystemRandom::new();
        let params = match curve {
            EcdsaCurve::P256 => &ES256_PARAMS,
            EcdsaCurve::P384 => &ES384_PARAMS,
        };

        let pkcs8 = EcdsaKeyPair::generate_pkcs8(params.signing, &rng).unwrap();
        let key_pair = EcdsaKeyPair::from_pkcs8(params.signing, pkcs8.as_ref(), &rng).unwrap();
        (
            Key::ecdsa_public(key_pair.public_key().as_ref(), curve),
            Key::ecdsa_private(pkcs8.as_ref(), curve),
        )
    }

    #[test]
    fn test_es256_valid_signature() {
        let (public, private) = generate_ecdsa_keypair(EcdsaCurve::P256);
        let signature = ES256.sign(SIGNING_INPUT, &private).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(ES256.verify(SIGNING_INPUT, &signature, &public).is_ok());
    }

    #[test]
    fn test_es256_invalid_signature() {
        let (public, _) = generate_ecdsa_keypair(EcdsaCurve::P256);
        let result = ES256.verify(SIGNING_INPUT, b"wrong_signature", &public);
        assert!(matches!(result, Err(Error::SignatureMismatch)));
    }

    #[test]
    fn test_es256_wrong_key() {
        let (_, private) = generate_ecdsa_keypair(EcdsaCurve::P256);
        let (wrong_public, _) = generate_ecdsa_keypair(EcdsaCurve::P256);
        let signature = ES256.sign(SIGNING_INPUT, &private).unwrap();
        let result = ES256.verify(SIGNING_INPUT, &signature, &wrong_public);
        assert!(matches!(result, Err(Error::SignatureMismatch)));
    }

    #[test]
    fn test_es256_wrong_curve() {
        let (public, private) = generate_ecdsa_keypair(EcdsaCurve::P384);
        assert!(matches!(
            ES256.verify(SIGNING_INPUT, b"signature", &public),
            Err(Error::KeyTypeMismatch { .. })
        ));
        assert!(matches!(
            ES256.sign(SIGNING_INPUT, &private),
            Err(Error::KeyTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_es384_valid_signature() {
        let (public, private) = generate_ecdsa_keypair(EcdsaCurve::P384);
        let signature = ES384.sign(SIGNING_INPUT, &private).unwrap();
        assert_eq!(signature.len(), 96);
        assert!(ES384.verify(SIGNING_INPUT, &signature, &public).is_ok());
    }

    #[test]
    fn test_wrong_key_type() {
        let sym_key = Key::symmetric(b"secret".to_vec());
        let result = ES256.verify(SIGNING_INPUT, b"signature", &sym_key);
        assert!(matches!(result, Err(Error::KeyTypeMismatch { .. })));
    }
}
