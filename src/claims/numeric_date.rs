use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Seconds since the Unix epoch, as used by `exp`, `nbf` and `iat`
///
/// Fractional seconds are kept down to the millisecond and truncated below
/// that, so equality and ordering always operate on the truncated value.
/// Serializes as a JSON integer when the value is a whole second, and as a
/// JSON float otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericDate {
    millis: i64,
}

impl NumericDate {
    /// Build from (possibly fractional) seconds since the epoch
    pub fn from_seconds(seconds: f64) -> Self {
        let whole = seconds.trunc();
        let frac_millis = ((seconds - whole) * 1000.0).trunc() as i64;
        Self {
            millis: (whole as i64).saturating_mul(1000).saturating_add(frac_millis),
        }
    }

    /// Build from whole seconds since the epoch
    pub fn from_unix(seconds: i64) -> Self {
        Self {
            millis: seconds.saturating_mul(1000),
        }
    }

    /// Current time, truncated to the millisecond
    pub fn now() -> Self {
        Utc::now().into()
    }

    /// Whole seconds since the epoch (truncated toward negative infinity)
    pub fn timestamp(&self) -> i64 {
        self.millis.div_euclid(1000)
    }

    /// Milliseconds since the epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.millis
    }

    /// Seconds since the epoch, including the millisecond fraction
    pub fn as_seconds_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// Convert to a chrono timestamp, `None` when out of chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.millis)
    }

    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let millis = i64::try_from(duration.as_millis()).ok()?;
        self.millis
            .checked_add(millis)
            .map(|millis| Self { millis })
    }

    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        let millis = i64::try_from(duration.as_millis()).ok()?;
        self.millis
            .checked_sub(millis)
            .map(|millis| Self { millis })
    }

    pub(crate) fn saturating_add(&self, duration: Duration) -> Self {
        self.checked_add(duration).unwrap_or(Self { millis: i64::MAX })
    }

    pub(crate) fn saturating_sub(&self, duration: Duration) -> Self {
        self.checked_sub(duration).unwrap_or(Self { millis: i64::MIN })
    }
}

impl From<DateTime<Utc>> for NumericDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            millis: value.timestamp_millis(),
        }
    }
}

impl fmt::Display for NumericDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis % 1000 == 0 {
            write!(f, "{}", self.millis / 1000)
        } else {
            write!(f, "{}", self.as_seconds_f64())
        }
    }
}

impl Serialize for NumericDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.millis % 1000 == 0 {
            serializer.serialize_i64(self.millis / 1000)
        } else {
            serializer.serialize_f64(self.as_seconds_f64())
        }
    }
}

struct NumericDateVisitor;

impl Visitor<'_> for NumericDateVisitor {
    type Value = NumericDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric date in seconds since the epoch")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NumericDate::from_unix(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(NumericDate::from_unix(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(NumericDate::from_seconds(v))
    }

    // Lossless textual form, e.g. a number carried as a JSON string
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_textual(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericDateVisitor)
    }
}

/// Parse a textual number, keeping integers exact
pub(crate) fn parse_textual(text: &str) -> Option<NumericDate> {
    let text = text.trim();
    if let Ok(seconds) = text.parse::<i64>() {
        return Some(NumericDate::from_unix(seconds));
    }
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(NumericDate::from_seconds)
}
