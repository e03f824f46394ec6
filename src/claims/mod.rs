mod binary;
mod claim_strings;
mod map;
mod numeric_date;
mod registered;
mod validator;

pub use binary::PwtClaims;
pub use claim_strings::ClaimStrings;
pub use map::MapClaims;
pub use numeric_date::NumericDate;
pub use registered::RegisteredClaims;
pub use validator::{TimeFn, Validator, ValidatorConfig};

pub(crate) use numeric_date::parse_textual;

use crate::error::Result;

/// An empty `iss`, `sub` or `jti` reads as absent in every representation
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Whether [`MapClaims`] reports a native numeric `0` in `exp`, `nbf` or `iat`
/// as absent rather than as the epoch
///
/// A textual `"0"` is still the epoch. Structured representations never apply
/// this rule.
pub const MAP_CLAIMS_ZERO_IS_ABSENT: bool = true;

/// Wire family of a claims representation, written to the header `typ`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimsType {
    /// JSON encoded claims
    Jwt,
    /// Protobuf encoded claims
    Pwt,
}

impl ClaimsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimsType::Jwt => "JWT",
            ClaimsType::Pwt => "PWT",
        }
    }
}

impl std::fmt::Display for ClaimsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoder switches passed from the parser configuration to [`Claims`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Keep JSON numbers exact instead of rounding them through `f64`
    pub use_json_number: bool,
}

/// Registered claims contract shared by every representation
///
/// Accessors return `Ok(None)` for an absent claim and an
/// [`Error::InvalidType`](crate::Error::InvalidType) when the claim is present
/// with an incompatible shape. An empty string claim is absent. The parser and validator only ever see claims
/// through this trait.
///
/// A claims value handed to the parser is populated in place; do not share one
/// value between concurrent parse calls.
pub trait Claims {
    /// `exp`
    fn expiration_time(&self) -> Result<Option<NumericDate>>;

    /// `nbf`
    fn not_before(&self) -> Result<Option<NumericDate>>;

    /// `iat`
    fn issued_at(&self) -> Result<Option<NumericDate>>;

    /// `iss`
    fn issuer(&self) -> Result<Option<&str>>;

    /// `sub`
    fn subject(&self) -> Result<Option<&str>>;

    /// `aud`, normalized to a list
    fn audience(&self) -> Result<ClaimStrings>;

    /// `jti`
    fn jwt_id(&self) -> Result<Option<&str>> {
        Ok(None)
    }

    fn claims_type(&self) -> ClaimsType;

    /// Encode with the representation's native codec
    fn marshal(&self) -> Result<Vec<u8>>;

    /// Decode the payload bytes into `self`
    fn unmarshal(&mut self, data: &[u8]) -> Result<()>;

    /// Decode honoring the parser's [`DecodeOptions`]
    fn unmarshal_with_options(&mut self, data: &[u8], options: &DecodeOptions) -> Result<()> {
        let _ = options;
        self.unmarshal(data)
    }
}

impl<C: Claims + ?Sized> Claims for Box<C> {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        (**self).expiration_time()
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        (**self).not_before()
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        (**self).issued_at()
    }

    fn issuer(&self) -> Result<Option<&str>> {
        (**self).issuer()
    }

    fn subject(&self) -> Result<Option<&str>> {
        (**self).subject()
    }

    fn audience(&self) -> Result<ClaimStrings> {
        (**self).audience()
    }

    fn jwt_id(&self) -> Result<Option<&str>> {
        (**self).jwt_id()
    }

    fn claims_type(&self) -> ClaimsType {
        (**self).claims_type()
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        (**self).marshal()
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        (**self).unmarshal(data)
    }

    fn unmarshal_with_options(&mut self, data: &[u8], options: &DecodeOptions) -> Result<()> {
        (**self).unmarshal_with_options(data, options)
    }
}
