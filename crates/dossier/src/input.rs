use serde_json::Value;

use dossier_core::RawProviderPayload;

/// One lookup result file: the provider payload plus the phones and names
/// gathered elsewhere in the lookup.
///
/// Accepted shapes: `{ "providers": ..., "phones": [...], "names": [...] }`,
/// or a lookup response / bare provider map with optional top-level
/// `phones` and `names` arrays.
#[derive(Debug)]
pub struct LookupInput {
    pub payload: RawProviderPayload,
    pub phones: Vec<String>,
    pub names: Vec<String>,
}

impl LookupInput {
    pub fn from_value(mut value: Value) -> dossier_core::Result<Self> {
        let phones = take_strings(&mut value, "phones");
        let names = take_strings(&mut value, "names");

        let payload = match value.get("providers") {
            Some(providers) => RawProviderPayload::from_lookup(providers)?,
            None => RawProviderPayload::from_lookup(&value)?,
        };

        Ok(Self {
            payload,
            phones,
            names,
        })
    }
}

fn take_strings(value: &mut Value, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = value.as_object_mut().and_then(|map| map.remove(key)) else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}
