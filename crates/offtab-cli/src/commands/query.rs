//! Query command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use offtab::{FieldId, OffsetCache, parse_version};
use owo_colors::OwoColorize;

/// Format an offset as decimal with its hex form, e.g. "24 (0x18)"
pub fn format_offset(offset: u64) -> String {
    format!("{} (0x{:X})", offset, offset)
}

/// Run the query command
pub fn run(table: &Path, field: &str, version: &str, json: bool) -> Result<()> {
    let id = FieldId::parse(field)?;
    let version = parse_version(version)?;
    let cache = OffsetCache::load(table)?;

    let offset = cache.get(&id, &version);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "field": id.to_string(),
                "version": version.to_string(),
                "offset": offset,
            })
        );
    } else if let Some(offset) = offset {
        println!(
            "{} @ {}: {}",
            id,
            version,
            format_offset(offset).green()
        );
    }

    if offset.is_none() {
        bail!("no offset known for {} at {}", id, version);
    }

    Ok(())
}
