//! List command implementation.

use std::path::Path;

use anyhow::Result;
use offtab::load_table;
use owo_colors::OwoColorize;

use super::query::format_offset;

/// Run the list command
pub fn run(table_path: &Path, module: Option<&str>) -> Result<()> {
    let mut table = load_table(table_path)?;
    table.sort();

    let mut fields = 0usize;
    for record in &table.entries {
        if module.is_some_and(|m| record.id.module != m) {
            continue;
        }
        fields += 1;

        println!("{}", record.id.bold());
        for entry in &record.offsets {
            println!("  {:<20} {}", entry.range.to_string(), format_offset(entry.offset));
        }
    }

    println!();
    println!("{} fields", fields);
    Ok(())
}
