use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::Key;

use ring::signature::{ED25519, Ed25519KeyPair, UnparsedPublicKey};

/// EdDSA algorithm over Ed25519 (RFC 8037)
pub struct EdDSA;

impl SigningMethod for EdDSA {
    fn alg(&self) -> &str {
        "EdDSA"
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let Key::Ed25519Public(public_key) = key else {
            return Err(key.mismatch(self.alg(), "Ed25519 public"));
        };

        UnparsedPublicKey::new(&ED25519, public_key)
            .verify(signing_input.as_bytes(), signature)
            .map_err(|_| Error::SignatureMismatch)
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        let Key::Ed25519Private(pkcs8) = key else {
            return Err(key.mismatch(self.alg(), "Ed25519 private"));
        };

        // Accepts PKCS#8 v1 documents as well as v2 with the embedded public key
        let key_pair = Ed25519KeyPair::from_pkcs8_maybe_unchecked(pkcs8)
            .map_err(|e| Error::KeyRejected(e.to_string()))?;
        Ok(key_pair.sign(signing_input.as_bytes()).as_ref().to_vec())
    }
}
