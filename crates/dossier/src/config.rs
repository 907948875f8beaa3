use std::path::Path;

use anyhow::{Context, Result};
use dossier_core::FieldSchema;

/// Built-in field names, optionally overridden section by section from a
/// JSON document.
pub fn load_schema(path: Option<&Path>) -> Result<FieldSchema> {
    let Some(path) = path else {
        return Ok(FieldSchema::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading schema {}", path.display()))?;
    let schema = FieldSchema::from_json(&json)
        .with_context(|| format!("loading schema {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Loaded field schema override");
    Ok(schema)
}
