//! Error types for catalog construction.

use thiserror::Error;

/// Catalog construction errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A label produced an invalid matcher pattern
    #[error("Invalid matcher pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The catalog must contain at least one label
    #[error("Field catalog is empty")]
    Empty,

    /// The same label appeared twice
    #[error("Duplicate catalog label: {0}")]
    DuplicateLabel(String),
}
