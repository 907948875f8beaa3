use anyhow::Result;
use dossier_core::{NameNormalizer, TracingObserver};

pub fn run(names: &[String], compact: bool) -> Result<()> {
    let clusters = NameNormalizer::new().normalize_observed(names, &TracingObserver);
    tracing::info!(raw = names.len(), distinct = clusters.len(), "Clustered names");
    println!("{}", super::render(&clusters, compact)?);
    Ok(())
}
