//! Taskpipe Filter/Normalizer
//!
//! Turns raw upstream tasks into the flat [`NormalizedRecord`] rows the
//! cache, store and exporters consume: timestamps converted into the target
//! timezone, pictographs stripped from status labels, the first assignee
//! flattened out, the extracted free-text fields merged in, and the optional
//! status-duration sub-records converted into human strings and day counts.
//!
//! Normalization is deterministic: the status-history generation timestamp
//! is an explicit argument, never sampled from the wall clock here.

#![warn(missing_docs)]

pub mod datetime;
pub mod normalize;

pub use datetime::{parse_timestamp_millis, parse_timezone, DATE_FORMAT};
pub use normalize::{normalize_tasks, NormalizedBatch};

use thiserror::Error;

/// Normalization errors
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A timestamp field was not a millisecond count
    #[error("Invalid millisecond timestamp: {0:?}")]
    BadTimestamp(String),

    /// The configured timezone name is not in the tz database
    #[error("Unknown timezone: {0:?}")]
    UnknownTimezone(String),
}
