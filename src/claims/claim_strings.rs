use crate::error::{Error, Result};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;

/// Ordered list form of a claim that may appear as a string or a list (`aud`)
///
/// A bare string becomes a one-element list; a list is kept as given, in
/// order, without de-duplication. `null` is an empty list. Any other shape is
/// an `invalid type` error. Always serializes as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClaimStrings(Vec<String>);

impl ClaimStrings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize an untyped JSON value
    pub fn parse(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(s) => Ok(Self(vec![s.clone()])),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(Error::InvalidType(format!(
                        "expected a string list element, found {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self),
            other => Err(Error::InvalidType(format!(
                "expected a string or an array of strings, found {other}"
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|s| s == value)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for ClaimStrings {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for ClaimStrings {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<&str> for ClaimStrings {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl<const N: usize> From<[&str; N]> for ClaimStrings {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|s| s.to_string()).collect())
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for ClaimStrings {
    fn eq(&self, other: &[S]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl IntoIterator for ClaimStrings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

struct ClaimStringsVisitor;

impl<'de> Visitor<'de> for ClaimStringsVisitor {
    type Value = ClaimStrings;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or an array of strings")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(ClaimStrings(vec![v.to_string()]))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
        Ok(ClaimStrings(vec![v]))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(ClaimStrings::default())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(ClaimStrings::default())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<String>()? {
            values.push(value);
        }
        Ok(ClaimStrings(values))
    }
}

impl<'de> Deserialize<'de> for ClaimStrings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ClaimStringsVisitor)
    }
}
