use anyhow::Result;
use dossier_core::{PhoneNormalizer, TracingObserver};

pub fn run(phones: &[String], compact: bool) -> Result<()> {
    let classification = PhoneNormalizer::new().normalize_observed(phones, &TracingObserver);
    tracing::info!(
        raw = phones.len(),
        distinct = classification.len(),
        "Normalized phone numbers"
    );
    println!("{}", super::render(&classification, compact)?);
    Ok(())
}
