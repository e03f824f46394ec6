//! Token: the parse result and the signing entry point
//!
//! A `Token` produced by the [`Parser`](crate::Parser) is trusted only when
//! [`Token::is_valid`] is true. Tokens returned inside a
//! [`ParseError`](crate::ParseError), or by
//! [`Parser::parse_unverified`](crate::Parser::parse_unverified), are
//! diagnostics and their claims are attacker controlled.

use crate::algorithm::{self, SigningMethod};
use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::keys::Key;
use crate::token::Header;
use crate::utils::base64url;
use std::sync::Arc;

/// A parsed or to-be-signed token
///
/// # Examples
///
/// Signing a token:
///
/// ```ignore
/// use xwt::*;
///
/// let claims = RegisteredClaims {
///     subject: Some("user123".into()),
///     expires_at: NumericDate::now().checked_add(Duration::from_secs(3600)),
///     ..Default::default()
/// };
/// let token = Token::with_alg("HS256", claims)?;
/// let compact = token.signed_string(&Key::symmetric(b"secret".to_vec()))?;
/// ```
#[derive(Debug)]
pub struct Token<C> {
    pub(crate) raw: String,
    pub(crate) header: Header,
    pub(crate) claims: C,
    pub(crate) signature: Vec<u8>,
    pub(crate) method: Option<Arc<dyn SigningMethod>>,
    pub(crate) valid: bool,
}

impl<C> Token<C> {
    /// Empty shell for the parser to populate
    pub(crate) fn unparsed(raw: &str, claims: C) -> Self {
        Self {
            raw: raw.to_string(),
            header: Header::default(),
            claims,
            signature: Vec::new(),
            method: None,
            valid: false,
        }
    }

    /// The original compact string; empty for tokens built for signing
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Header access for adding fields such as `kid` before signing
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn claims(&self) -> &C {
        &self.claims
    }

    pub fn claims_mut(&mut self) -> &mut C {
        &mut self.claims
    }

    /// Hand the claims back to the caller
    pub fn into_claims(self) -> C {
        self.claims
    }

    /// Decoded signature bytes; empty until the signature segment is decoded
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Signing method resolved from `alg`
    pub fn method(&self) -> Option<&Arc<dyn SigningMethod>> {
        self.method.as_ref()
    }

    /// True only after every verification and validation step succeeded
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Undecoded `header.payload` part of the raw string
    pub(crate) fn signing_input(&self) -> &str {
        self.raw.rsplit_once('.').map_or("", |(input, _)| input)
    }

    /// Undecoded signature segment of the raw string
    pub(crate) fn signature_segment(&self) -> &str {
        self.raw.rsplit_once('.').map_or("", |(_, segment)| segment)
    }
}

impl<C: Claims> Token<C> {
    /// New unsigned token with header `{"alg": method, "typ": claims type}`
    pub fn new_with_claims(method: Arc<dyn SigningMethod>, claims: C) -> Self {
        let header = Header::new(method.alg(), claims.claims_type());
        Self {
            raw: String::new(),
            header,
            claims,
            signature: Vec::new(),
            method: Some(method),
            valid: false,
        }
    }

    /// Like [`Token::new_with_claims`], resolving the method from the registry
    pub fn with_alg(alg: &str, claims: C) -> Result<Self> {
        let method = algorithm::signing_method(alg)
            .ok_or_else(|| Error::AlgorithmUnavailable(alg.to_string()))?;
        Ok(Self::new_with_claims(method, claims))
    }

    /// `base64url(header JSON) "." base64url(marshaled claims)`
    pub fn signing_string(&self) -> Result<String> {
        let header = serde_json::to_vec(&self.header).map_err(Error::Json)?;
        let claims = self.claims.marshal()?;
        Ok(format!(
            "{}.{}",
            base64url::encode_bytes(&header),
            base64url::encode_bytes(&claims)
        ))
    }

    /// Sign with `key` and return the compact serialization
    pub fn signed_string(&self, key: &Key) -> Result<String> {
        let method = self.method.as_ref().ok_or(Error::AlgorithmUnspecified)?;
        let signing_string = self.signing_string()?;
        let signature = method.sign(&signing_string, key)?;
        Ok(format!(
            "{signing_string}.{}",
            base64url::encode_bytes(&signature)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{ClaimsType, MapClaims, PwtClaims};
    use serde_json::json;

    #[test]
    fn test_header_follows_claims_type() {
        let jwt = Token::with_alg("HS256", MapClaims::new()).unwrap();
        assert_eq!(jwt.header().token_type(), Some("JWT"));

        let pwt = Token::with_alg("HS256", PwtClaims::default()).unwrap();
        assert_eq!(pwt.header().token_type(), Some(ClaimsType::Pwt.as_str()));
        assert_eq!(pwt.header().algorithm(), Some("HS256"));
    }

    #[test]
    fn test_signing_string_layout() {
        let token = Token::with_alg("HS256", MapClaims::new().with("sub", "user")).unwrap();
        let signing_string = token.signing_string().unwrap();
        let (header, claims) = signing_string.split_once('.').unwrap();
        assert_eq!(
            base64url::decode_segment(header, false, true).unwrap(),
            br#"{"alg":"HS256","typ":"JWT"}"#
        );
        assert_eq!(
            base64url::decode_segment(claims, false, true).unwrap(),
            br#"{"sub":"user"}"#
        );
    }

    #[test]
    fn test_signed_string_has_three_segments() {
        let token = Token::with_alg("HS384", MapClaims::new().with("n", json!(1))).unwrap();
        let compact = token
            .signed_string(&Key::symmetric(b"secret".to_vec()))
            .unwrap();
        assert_eq!(compact.split('.').count(), 3);
        assert!(!compact.contains('='));
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(matches!(
            Token::with_alg("XX999", MapClaims::new()),
            Err(Error::AlgorithmUnavailable(_))
        ));
    }

    #[test]
    fn test_wrong_key_type_fails_signing() {
        let token = Token::with_alg("HS256", MapClaims::new()).unwrap();
        let key = Key::ed25519_public(vec![0u8; 32]);
        assert!(matches!(
            token.signed_string(&key),
            Err(Error::KeyTypeMismatch { .. })
        ));
    }
}
