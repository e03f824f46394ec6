//! Errors for xwt
//!
//! Every failure is a variant of [`Error`], and every variant belongs to exactly
//! one [`ErrorKind`]. Callers branch on the kind: an expired token asks for a
//! new one, a bad signature gets rejected outright.

use crate::claims::{ClaimStrings, NumericDate};
use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by caller-supplied callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structurally broken input: segment count, base64, JSON or protobuf decode
    Malformed,
    /// Verification could not proceed: unknown algorithm, no key, resolver failure
    Unverifiable,
    /// Cryptographic verification failed, including allow-list rejection
    SignatureInvalid,
    /// The validator rejected the claims
    InvalidClaims,
    /// A claim had an incompatible shape
    InvalidType,
}

/// Which compact segment failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Claims,
    Signature,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Segment::Header => "header",
            Segment::Claims => "claims",
            Segment::Signature => "signature",
        })
    }
}

/// xwt Errors
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("token contains an invalid number of segments: {0}")]
    SegmentCount(usize),

    #[error("token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("could not base64 decode {segment}")]
    Base64 {
        segment: Segment,
        #[source]
        source: base64::DecodeError,
    },

    #[error("could not JSON decode header")]
    HeaderJson(#[source] serde_json::Error),

    #[error("could not unmarshal claims")]
    ClaimsDecode(#[source] Box<Error>),

    #[error("JSON codec failed")]
    Json(#[source] serde_json::Error),

    #[error("protobuf decode failed")]
    ProtobufDecode(#[from] prost::DecodeError),

    #[error("protobuf encode failed")]
    ProtobufEncode(#[from] prost::EncodeError),

    #[error("invalid type: {0}")]
    InvalidType(String),

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("signing method (alg) is unspecified")]
    AlgorithmUnspecified,

    #[error("signing method (alg) '{0}' is unavailable")]
    AlgorithmUnavailable(String),

    #[error("the 'none' algorithm is rejected for security reasons (RFC 8725)")]
    AlgorithmNoneRejected,

    #[error("signing method {found} is invalid (allowed: {allowed:?})")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("no keyfunc was provided")]
    MissingKeyFunc,

    #[error("error while executing keyfunc")]
    KeyFunc(#[source] BoxError),

    #[error("keyfunc returned empty verification key set")]
    EmptyKeySet,

    #[error("key type mismatch for '{algorithm}': expected {expected}, got {actual}")]
    KeyTypeMismatch {
        algorithm: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("key rejected: {0}")]
    KeyRejected(String),

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("signature is invalid")]
    SignatureMismatch,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("token signature is invalid")]
    Signature(#[source] Box<Error>),

    // ============================================================================
    // Claims Errors
    // ============================================================================
    #[error("token has invalid claims")]
    InvalidClaims(#[from] ClaimError),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SegmentCount(_)
            | Error::TokenTooLarge { .. }
            | Error::Base64 { .. }
            | Error::HeaderJson(_)
            | Error::Json(_)
            | Error::ProtobufDecode(_)
            | Error::ProtobufEncode(_) => ErrorKind::Malformed,

            // A shape mismatch inside the claims stays visible through the wrapper
            Error::ClaimsDecode(inner) => match inner.kind() {
                ErrorKind::InvalidType => ErrorKind::InvalidType,
                _ => ErrorKind::Malformed,
            },

            Error::InvalidType(_) => ErrorKind::InvalidType,

            Error::AlgorithmUnspecified
            | Error::AlgorithmUnavailable(_)
            | Error::AlgorithmNoneRejected
            | Error::MissingKeyFunc
            | Error::KeyFunc(_)
            | Error::EmptyKeySet => ErrorKind::Unverifiable,

            Error::AlgorithmNotAllowed { .. }
            | Error::KeyTypeMismatch { .. }
            | Error::KeyRejected(_)
            | Error::SignatureMismatch
            | Error::SigningFailed(_)
            | Error::Signature(_) => ErrorKind::SignatureInvalid,

            Error::InvalidClaims(_) => ErrorKind::InvalidClaims,
        }
    }

    /// Shorthand for `self.kind() == kind`
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// The validator violation behind an [`ErrorKind::InvalidClaims`] error
    pub fn claim_error(&self) -> Option<&ClaimError> {
        match self {
            Error::InvalidClaims(claim) => Some(claim),
            _ => None,
        }
    }
}

/// Claim violations reported by the [`Validator`](crate::Validator)
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("token is expired: exp {expired_at} (now: {now}, leeway: {leeway:?})")]
    Expired {
        expired_at: NumericDate,
        now: NumericDate,
        leeway: Duration,
    },

    #[error("token is not valid yet: nbf {not_before} (now: {now}, leeway: {leeway:?})")]
    NotYetValid {
        not_before: NumericDate,
        now: NumericDate,
        leeway: Duration,
    },

    #[error("token used before issued: iat {issued_at} (now: {now}, leeway: {leeway:?})")]
    IssuedInFuture {
        issued_at: NumericDate,
        now: NumericDate,
        leeway: Duration,
    },

    #[error("required claim '{0}' is missing")]
    MissingClaim(String),

    #[error("audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: ClaimStrings,
    },

    #[error("issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("subject mismatch: expected '{expected}', found {found:?}")]
    SubjectMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("claim '{claim}' could not be read")]
    Unreadable {
        claim: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl ClaimError {
    /// True when the token only failed because it ran out of time
    pub fn is_expired(&self) -> bool {
        matches!(self, ClaimError::Expired { .. })
    }
}

/// Result type alias for xwt operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::SegmentCount(2).kind(), ErrorKind::Malformed);
        assert_eq!(Error::EmptyKeySet.kind(), ErrorKind::Unverifiable);
        assert_eq!(
            Error::AlgorithmNotAllowed {
                found: "HS256".into(),
                allowed: vec!["ES256".into()],
            }
            .kind(),
            ErrorKind::SignatureInvalid
        );
        assert_eq!(
            Error::InvalidClaims(ClaimError::MissingClaim("exp".into())).kind(),
            ErrorKind::InvalidClaims
        );
    }

    #[test]
    fn test_claims_decode_keeps_invalid_type() {
        let shape = Error::ClaimsDecode(Box::new(Error::InvalidType("aud is invalid".into())));
        assert_eq!(shape.kind(), ErrorKind::InvalidType);

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let syntax = Error::ClaimsDecode(Box::new(Error::Json(json)));
        assert_eq!(syntax.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_allow_list_message() {
        let err = Error::AlgorithmNotAllowed {
            found: "HS256".into(),
            allowed: vec!["ES256".into()],
        };
        assert!(err.to_string().contains("signing method HS256 is invalid"));
    }

    #[test]
    fn test_claim_error_accessor() {
        let err = Error::InvalidClaims(ClaimError::Expired {
            expired_at: NumericDate::from_seconds(10.0),
            now: NumericDate::from_seconds(20.0),
            leeway: Duration::ZERO,
        });
        assert!(err.claim_error().is_some_and(ClaimError::is_expired));
        assert!(Error::SignatureMismatch.claim_error().is_none());
    }
}
