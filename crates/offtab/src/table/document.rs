//! On-disk offset table format.
//!
//! A table is a JSON document listing, per field identifier, the ordered
//! version-range entries produced by the offline generator. Decoding is
//! atomic: a malformed document yields an error and no partial data.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::FieldId;

use super::range::VersionRange;

/// Current table schema version.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema() -> u32 {
    SCHEMA_VERSION
}

/// One version-scoped offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetEntry {
    #[serde(flatten)]
    pub range: VersionRange,
    /// Byte offset of the field within its containing struct
    pub offset: u64,
}

/// All known offsets for one field identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOffsets {
    #[serde(flatten)]
    pub id: FieldId,
    pub offsets: Vec<OffsetEntry>,
}

/// The persisted offset table document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetTable {
    #[serde(default = "default_schema")]
    pub schema: u32,
    /// When the generation run that produced this table finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entries: Vec<FieldOffsets>,
}

impl Default for OffsetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetTable {
    pub fn new() -> Self {
        Self {
            schema: SCHEMA_VERSION,
            generated_at: None,
            entries: Vec::new(),
        }
    }

    /// Append an entry for `id`, extending its record if one exists.
    pub fn insert(&mut self, id: FieldId, range: VersionRange, offset: u64) {
        let entry = OffsetEntry { range, offset };
        match self.entries.iter_mut().find(|record| record.id == id) {
            Some(record) => record.offsets.push(entry),
            None => self.entries.push(FieldOffsets {
                id,
                offsets: vec![entry],
            }),
        }
    }

    /// Fold another table's records into this one.
    pub fn merge(&mut self, other: OffsetTable) {
        for record in other.entries {
            for entry in record.offsets {
                self.insert(record.id.clone(), entry.range, entry.offset);
            }
        }
    }

    /// Deterministic order: records by identifier, entries by lower bound.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.id.cmp(&b.id));
        for record in &mut self.entries {
            record.offsets.sort_by(|a, b| a.range.since.cmp(&b.range.since));
        }
    }

    /// Collapse adjacent entries whose ranges abut and whose offsets are
    /// equal into a single range. Entries must be sorted first.
    pub fn coalesce(&mut self) {
        for record in &mut self.entries {
            let mut merged: Vec<OffsetEntry> = Vec::with_capacity(record.offsets.len());
            for entry in record.offsets.drain(..) {
                match merged.last_mut() {
                    Some(last)
                        if last.offset == entry.offset
                            && last.range.until.as_ref() == Some(&entry.range.since) =>
                    {
                        last.range.until = entry.range.until;
                    }
                    _ => merged.push(entry),
                }
            }
            record.offsets = merged;
        }
    }

    /// Report every pair of entries for one identifier whose version
    /// ranges intersect. An empty result means the non-overlap invariant
    /// holds for the whole table.
    pub fn validate(&self) -> Vec<RangeOverlap> {
        let mut by_id: HashMap<&FieldId, Vec<&OffsetEntry>> = HashMap::new();
        for record in &self.entries {
            by_id.entry(&record.id).or_default().extend(record.offsets.iter());
        }

        let mut findings = Vec::new();
        for (id, entries) in by_id {
            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    if a.range.overlaps(&b.range) {
                        findings.push(RangeOverlap {
                            id: id.clone(),
                            first: a.range.clone(),
                            second: b.range.clone(),
                        });
                    }
                }
            }
        }

        findings.sort_by(|a, b| (&a.id, &a.first.since).cmp(&(&b.id, &b.first.since)));
        findings
    }

    /// Fail on the first overlap finding, if any.
    pub fn ensure_valid(&self) -> Result<()> {
        match self.validate().into_iter().next() {
            Some(overlap) => Err(Error::DataIntegrity(overlap)),
            None => Ok(()),
        }
    }
}

/// A data-integrity finding: two entries for the same identifier whose
/// version ranges intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeOverlap {
    pub id: FieldId,
    pub first: VersionRange,
    pub second: VersionRange,
}

impl fmt::Display for RangeOverlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} overlaps {}", self.id, self.first, self.second)
    }
}

pub fn load_table<P: AsRef<Path>>(path: P) -> Result<OffsetTable> {
    let content = fs::read_to_string(&path)?;
    let table: OffsetTable = serde_json::from_str(&content)?;
    if table.schema > SCHEMA_VERSION {
        return Err(Error::UnsupportedSchema(table.schema));
    }
    Ok(table)
}

pub fn save_table<P: AsRef<Path>>(path: P, table: &OffsetTable) -> Result<()> {
    let content = serde_json::to_string_pretty(table)?;
    fs::write(path, content)?;
    Ok(())
}
