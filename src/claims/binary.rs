use super::{ClaimStrings, Claims, ClaimsType, NumericDate, RegisteredClaims, non_empty};
use crate::codec;
use crate::error::Result;

/// Registered claims as a protobuf message (PWT)
///
/// Temporal fields are proto3 `optional int64` seconds, so absence travels on
/// the wire. Empty strings read as absent.
///
/// ```proto
/// message PwtClaims {
///   string issuer = 1;
///   string subject = 2;
///   repeated string audience = 3;
///   optional int64 expires_at = 4;
///   optional int64 not_before = 5;
///   optional int64 issued_at = 6;
///   string id = 7;
/// }
/// ```
#[derive(Clone, PartialEq, prost::Message)]
pub struct PwtClaims {
    #[prost(string, tag = "1")]
    pub issuer: String,

    #[prost(string, tag = "2")]
    pub subject: String,

    #[prost(string, repeated, tag = "3")]
    pub audience: Vec<String>,

    #[prost(int64, optional, tag = "4")]
    pub expires_at: Option<i64>,

    #[prost(int64, optional, tag = "5")]
    pub not_before: Option<i64>,

    #[prost(int64, optional, tag = "6")]
    pub issued_at: Option<i64>,

    #[prost(string, tag = "7")]
    pub id: String,
}

impl Claims for PwtClaims {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        Ok(self.expires_at.map(NumericDate::from_unix))
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        Ok(self.not_before.map(NumericDate::from_unix))
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        Ok(self.issued_at.map(NumericDate::from_unix))
    }

    fn issuer(&self) -> Result<Option<&str>> {
        Ok(non_empty(Some(self.issuer.as_str())))
    }

    fn subject(&self) -> Result<Option<&str>> {
        Ok(non_empty(Some(self.subject.as_str())))
    }

    fn audience(&self) -> Result<ClaimStrings> {
        Ok(ClaimStrings::from(self.audience.clone()))
    }

    fn jwt_id(&self) -> Result<Option<&str>> {
        Ok(non_empty(Some(self.id.as_str())))
    }

    fn claims_type(&self) -> ClaimsType {
        ClaimsType::Pwt
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        codec::protobuf::marshal(self)
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        codec::protobuf::unmarshal_into(self, data)
    }
}

/// Carry JSON registered claims over to PWT; fractional seconds are dropped
impl From<RegisteredClaims> for PwtClaims {
    fn from(claims: RegisteredClaims) -> Self {
        Self {
            issuer: claims.issuer.unwrap_or_default(),
            subject: claims.subject.unwrap_or_default(),
            audience: claims.audience.into_vec(),
            expires_at: claims.expires_at.map(|d| d.timestamp()),
            not_before: claims.not_before.map(|d| d.timestamp()),
            issued_at: claims.issued_at.map(|d| d.timestamp()),
            id: claims.id.unwrap_or_default(),
        }
    }
}
