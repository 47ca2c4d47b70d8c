//! Immutable lookup index over a loaded offset table.

use std::collections::HashMap;

use semver::Version;
use tracing::warn;

use crate::field::FieldId;

use super::document::{OffsetEntry, OffsetTable};

/// Point-lookup index: field identifier -> ordered version-range entries.
///
/// Built from an [`OffsetTable`] in one pass and immutable afterwards, so
/// concurrent lookups need no locking.
#[derive(Debug, Default)]
pub struct OffsetIndex {
    fields: HashMap<FieldId, FieldEntries>,
}

#[derive(Debug)]
struct FieldEntries {
    /// Sorted by range lower bound.
    offsets: Vec<OffsetEntry>,
    /// Set when the source data violated the non-overlap invariant;
    /// switches lookup to the first-match scan.
    overlapping: bool,
}

impl OffsetIndex {
    /// Build the index, consuming the decoded table.
    ///
    /// Records sharing one identifier are merged. Overlapping ranges are
    /// logged at warn level per affected identifier and resolved at query
    /// time by the lowest lower bound.
    pub fn from_table(table: OffsetTable) -> Self {
        let mut grouped: HashMap<FieldId, Vec<OffsetEntry>> = HashMap::new();
        for record in table.entries {
            grouped.entry(record.id).or_default().extend(record.offsets);
        }

        let fields = grouped
            .into_iter()
            .map(|(id, mut offsets)| {
                offsets.sort_by(|a, b| a.range.since.cmp(&b.range.since));
                // With entries sorted by lower bound, any overlap shows up
                // between an adjacent pair.
                let overlapping = offsets
                    .windows(2)
                    .any(|pair| pair[0].range.overlaps(&pair[1].range));
                if overlapping {
                    warn!(field = %id, "overlapping version ranges in offset table");
                }
                (id, FieldEntries { offsets, overlapping })
            })
            .collect();

        Self { fields }
    }

    /// Number of distinct field identifiers.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Offset valid for `id` at `version`, or `None` when the identifier
    /// is unknown or the version falls outside every known range. An
    /// out-of-range version is always a miss, never an approximation.
    pub fn get(&self, id: &FieldId, version: &Version) -> Option<u64> {
        let entries = self.fields.get(id)?;

        if entries.overlapping {
            // lowest lower bound wins on corrupted data
            return entries
                .offsets
                .iter()
                .find(|entry| entry.range.contains(version))
                .map(|entry| entry.offset);
        }

        // Only the entry with the greatest lower bound <= version can
        // contain it once the non-overlap invariant holds.
        let idx = entries
            .offsets
            .partition_point(|entry| entry.range.since <= *version);
        let candidate = entries.offsets.get(idx.checked_sub(1)?)?;
        candidate.range.contains(version).then_some(candidate.offset)
    }
}
