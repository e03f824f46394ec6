use crate::claims::ClaimsType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token header: a string-keyed JSON object that must carry `alg`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Header with `alg` and `typ` set, as written when signing
    pub fn new(algorithm: &str, claims_type: ClaimsType) -> Self {
        let mut fields = Map::new();
        fields.insert("alg".into(), Value::from(algorithm));
        fields.insert("typ".into(), Value::from(claims_type.as_str()));
        Self(fields)
    }

    /// `alg`, when present as a string
    pub fn algorithm(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    /// `typ`, when present as a string
    pub fn token_type(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// `kid`, when present as a string
    pub fn key_id(&self) -> Option<&str> {
        self.0.get("kid").and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Header {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
