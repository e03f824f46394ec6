use super::{
    ClaimStrings, Claims, ClaimsType, DecodeOptions, MAP_CLAIMS_ZERO_IS_ABSENT, NumericDate,
    non_empty, parse_textual,
};
use crate::codec;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::ops::{Deref, DerefMut};

/// Claims as a free-form JSON object, with no schema declared up front
///
/// Registered claims are read lazily from the map. A native numeric `0` in a
/// temporal claim reads as absent (see [`MAP_CLAIMS_ZERO_IS_ABSENT`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapClaims(Map<String, Value>);

impl MapClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn date(&self, key: &str) -> Result<Option<NumericDate>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => {
                let seconds = n
                    .as_f64()
                    .ok_or_else(|| Error::InvalidType(format!("{key} is invalid")))?;
                if MAP_CLAIMS_ZERO_IS_ABSENT && seconds == 0.0 {
                    return Ok(None);
                }
                Ok(Some(match n.as_i64() {
                    Some(whole) => NumericDate::from_unix(whole),
                    None => NumericDate::from_seconds(seconds),
                }))
            }
            Some(Value::String(text)) => parse_textual(text)
                .map(Some)
                .ok_or_else(|| Error::InvalidType(format!("{key} is invalid"))),
            Some(_) => Err(Error::InvalidType(format!("{key} is invalid"))),
        }
    }

    fn string(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(non_empty(Some(s.as_str()))),
            Some(_) => Err(Error::InvalidType(format!("{key} is invalid"))),
        }
    }
}

impl Deref for MapClaims {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MapClaims {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for MapClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl Claims for MapClaims {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        self.date("exp")
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        self.date("nbf")
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        self.date("iat")
    }

    fn issuer(&self) -> Result<Option<&str>> {
        self.string("iss")
    }

    fn subject(&self) -> Result<Option<&str>> {
        self.string("sub")
    }

    fn audience(&self) -> Result<ClaimStrings> {
        match self.0.get("aud") {
            None => Ok(ClaimStrings::default()),
            Some(value) => ClaimStrings::parse(value)
                .map_err(|_| Error::InvalidType("aud is invalid".to_string())),
        }
    }

    fn jwt_id(&self) -> Result<Option<&str>> {
        self.string("jti")
    }

    fn claims_type(&self) -> ClaimsType {
        ClaimsType::Jwt
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        codec::json::marshal(&self.0)
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        self.unmarshal_with_options(data, &DecodeOptions::default())
    }

    fn unmarshal_with_options(&mut self, data: &[u8], options: &DecodeOptions) -> Result<()> {
        let mut map: Map<String, Value> = codec::json::unmarshal(data)?;
        if !options.use_json_number {
            map.values_mut().for_each(round_numbers);
        }
        self.0 = map;
        Ok(())
    }
}

/// Round every number through `f64`, the way an untyped decoder would
fn round_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(rounded) = n.as_f64().and_then(Number::from_f64) {
                *n = rounded;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(round_numbers),
        Value::Object(map) => map.values_mut().for_each(round_numbers),
        _ => {}
    }
}
