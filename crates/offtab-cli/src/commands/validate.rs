//! Validate command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use offtab::load_table;
use owo_colors::OwoColorize;

/// Run the validate command
pub fn run(table_path: &Path) -> Result<()> {
    let table = load_table(table_path)?;
    let findings = table.validate();

    if findings.is_empty() {
        println!(
            "{} {} ({} fields)",
            "OK".green(),
            table_path.display(),
            table.entries.len()
        );
        return Ok(());
    }

    for finding in &findings {
        println!("{} {}", "OVERLAP".red(), finding);
    }
    bail!(
        "{} overlapping range pair(s) in {}",
        findings.len(),
        table_path.display()
    );
}
