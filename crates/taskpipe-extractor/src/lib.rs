//! Taskpipe Field Extraction
//!
//! Recovers structured key/value pairs from the free-text description blocks
//! of upstream tasks. The description format is delimiter-ambiguous: fields
//! are written as `LABEL : value` runs with no terminator, so a value only
//! ends where the next known label begins. The [`FieldCatalog`] holds the
//! fixed label list with one precompiled matcher per label, built once at
//! process start and passed by reference into [`extract_fields`].
//!
//! The production label list is data inherited from the upstream datasets
//! and contains pairs where one label is a substring of another; the catalog
//! surfaces those pairs via [`FieldCatalog::ambiguous_pairs`] instead of
//! assuming the invariant holds.

#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod extract;
pub mod text;

pub use catalog::FieldCatalog;
pub use error::CatalogError;
pub use extract::extract_fields;
pub use text::{normalize_text, strip_emoji};
