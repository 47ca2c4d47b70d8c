//! Merge command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use offtab::{OffsetTable, load_table, save_table};
use tracing::info;

/// Run the merge command
pub fn run(output: &Path, inputs: &[PathBuf]) -> Result<()> {
    let mut merged = OffsetTable::new();

    for input in inputs {
        let table =
            load_table(input).with_context(|| format!("loading {}", input.display()))?;
        info!(table = %input.display(), fields = table.entries.len(), "merging");
        merged.merge(table);
    }

    merged.sort();
    merged.coalesce();
    merged.ensure_valid()?;
    merged.generated_at = Some(Utc::now());

    save_table(output, &merged)?;
    println!("Wrote {} ({} fields)", output.display(), merged.entries.len());
    Ok(())
}
