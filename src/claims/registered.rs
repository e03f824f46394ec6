use super::{ClaimStrings, Claims, ClaimsType, NumericDate, non_empty};
use crate::codec;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Registered claim names (RFC 7519 Section 4.1) as a fixed JSON structure
///
/// Empty fields are omitted on the wire. Embed it with `#[serde(flatten)]` to
/// add private claims, and derive `Claims` on the outer struct with
/// `#[claims(registered)]` on this field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Issuer (`iss`)
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Subject (`sub`)
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Audience (`aud`), a string or a list on the wire
    #[serde(rename = "aud", default, skip_serializing_if = "ClaimStrings::is_empty")]
    pub audience: ClaimStrings,

    /// Expiration time (`exp`)
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NumericDate>,

    /// Not before (`nbf`)
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<NumericDate>,

    /// Issued at (`iat`)
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<NumericDate>,

    /// JWT ID (`jti`)
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Claims for RegisteredClaims {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        Ok(self.expires_at)
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        Ok(self.not_before)
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        Ok(self.issued_at)
    }

    fn issuer(&self) -> Result<Option<&str>> {
        Ok(non_empty(self.issuer.as_deref()))
    }

    fn subject(&self) -> Result<Option<&str>> {
        Ok(non_empty(self.subject.as_deref()))
    }

    fn audience(&self) -> Result<ClaimStrings> {
        Ok(self.audience.clone())
    }

    fn jwt_id(&self) -> Result<Option<&str>> {
        Ok(non_empty(self.id.as_deref()))
    }

    fn claims_type(&self) -> ClaimsType {
        ClaimsType::Jwt
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        codec::json::marshal(self)
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        *self = codec::json::unmarshal(data)?;
        Ok(())
    }
}
