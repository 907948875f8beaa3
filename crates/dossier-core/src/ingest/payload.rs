use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Where the lookup service nests the provider map, paired with the flag
/// that reports whether that lookup succeeded.
const ENVELOPE_POINTERS: &[(&str, &str)] = &[
    (
        "/results/osint_name/data/data/List",
        "/results/osint_name/success",
    ),
    (
        "/data/results/osint_name/data/data/List",
        "/data/results/osint_name/success",
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub name: String,
    /// `None` when the provider object has no `Data` sequence.
    pub entries: Option<Vec<Value>>,
}

impl ProviderResult {
    #[must_use]
    pub fn from_value(name: &str, value: &Value) -> Self {
        Self {
            name: name.to_string(),
            entries: value.get("Data").and_then(Value::as_array).cloned(),
        }
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }
}

/// Provider name to that provider's result, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProviderPayload {
    providers: Vec<ProviderResult>,
}

impl RawProviderPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_provider(mut self, provider: ProviderResult) -> Self {
        self.providers.push(provider);
        self
    }

    /// Reads a bare provider map. Only a non-object root is an error; a
    /// provider without `Data` is kept and skipped during aggregation.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            Error::InvalidPayload("expected an object keyed by provider name".into())
        })?;

        let providers = map
            .iter()
            .map(|(name, result)| ProviderResult::from_value(name, result))
            .collect();

        Ok(Self { providers })
    }

    /// Reads either a full lookup response or a bare provider map. A lookup
    /// that reports `success: false` yields an empty payload.
    pub fn from_lookup(value: &Value) -> Result<Self> {
        for (list_pointer, success_pointer) in ENVELOPE_POINTERS {
            if value.pointer(success_pointer) == Some(&Value::Bool(false)) {
                tracing::debug!(pointer = success_pointer, "Lookup reported failure");
                return Ok(Self::new());
            }
            if let Some(list) = value.pointer(list_pointer) {
                return Self::from_value(list);
            }
        }

        Self::from_value(value)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_lookup(&value)
    }

    pub fn providers(&self) -> &[ProviderResult] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
