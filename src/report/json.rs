//! JSON findings export
//!
//! Writes the findings collection as a JSON array, one object per finding,
//! for downstream tooling.

use crate::error::Result;
use crate::models::Finding;
use std::path::Path;
use tracing::info;

/// Exports the findings collection as a JSON array
pub fn export(findings: &[Finding], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(findings)?;
    std::fs::write(output_path, json)?;
    info!("Findings written to {}", output_path.display());
    Ok(())
}

/// Loads a findings collection from a previously exported JSON file
pub fn load(input_path: &Path) -> Result<Vec<Finding>> {
    let content = std::fs::read_to_string(input_path)?;
    let findings: Vec<Finding> = serde_json::from_str(&content)?;
    Ok(findings)
}
