use thiserror::Error;

use crate::table::RangeOverlap;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Offset table unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed offset table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid version: {0}")]
    Version(#[from] semver::Error),

    #[error("Invalid field identifier: {0}")]
    InvalidFieldId(String),

    #[error("Unsupported table schema version: {0}")]
    UnsupportedSchema(u32),

    #[error("Data integrity violation: {0}")]
    DataIntegrity(RangeOverlap),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
