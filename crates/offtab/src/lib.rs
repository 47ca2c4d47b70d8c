//! # offtab
//!
//! Version-aware struct field offset resolution.
//!
//! This crate provides:
//! - Field identifiers naming "this field, in this struct, in this module"
//! - A persisted offset table format with version-range entries
//! - An immutable lookup index answering (field, version) -> byte offset
//! - A session-scoped cache with hit/miss diagnostics
//!
//! Offsets are precomputed offline per library version and shipped as a
//! static table. An instrumentation agent loads the table once and issues
//! point queries on its hot path; an unresolved offset is a normal outcome
//! (unsupported version) and maps to `None`, never an error.

pub mod cache;
pub mod error;
pub mod field;
pub mod table;

pub use cache::OffsetCache;
pub use error::{Error, Result};
pub use field::FieldId;
pub use table::{
    FieldOffsets, OffsetEntry, OffsetIndex, OffsetTable, RangeOverlap, VersionRange, load_table,
    parse_version, save_table,
};
