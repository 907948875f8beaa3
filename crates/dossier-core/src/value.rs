//! Field reads over provider entries.
//!
//! Providers mark unknown fields with placeholders instead of omitting them.
//! Everything here treats those placeholders exactly like a missing key, so
//! no record built downstream can carry one.

use serde_json::{Map, Value};

/// One provider record: field name to raw JSON value.
pub type Entry = Map<String, Value>;

const SENTINELS: &[&str] = &["", "N/A", "U"];

#[must_use]
pub fn is_sentinel(raw: &str) -> bool {
    SENTINELS.contains(&raw.trim())
}

/// Result of reading one field from an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Key absent, null, or not a scalar.
    Missing,
    /// Key present but holding a placeholder.
    Sentinel,
    /// Trimmed text of a string or number value.
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub fn read(entry: &Entry, field: &str) -> Self {
        entry.get(field).map_or(Self::Missing, Self::from_value)
    }

    /// Like [`FieldValue::read`] but only strings count; numbers are missing.
    #[must_use]
    pub fn read_text(entry: &Entry, field: &str) -> Self {
        match entry.get(field) {
            Some(value @ Value::String(_)) => Self::from_value(value),
            _ => Self::Missing,
        }
    }

    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return Self::Missing,
        };

        if is_sentinel(&text) {
            Self::Sentinel
        } else {
            Self::Text(text)
        }
    }

    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Missing | Self::Sentinel => None,
        }
    }

    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }
}

/// Parses the leading integer of `raw`: optional sign, then digits, ignoring
/// whatever follows. `"3 kids"` is 3, `"2.5"` is 2, `"kids"` is `None`.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
