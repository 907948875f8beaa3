use std::path::Path;

use anyhow::Result;

use crate::config;

pub fn run(schema: Option<&Path>) -> Result<()> {
    let schema = config::load_schema(schema)?;
    println!("{}", super::render(&schema, false)?);
    Ok(())
}
