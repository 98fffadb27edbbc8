//! Taskpipe Domain Layer
//!
//! This crate contains the data model shared by every other layer: the wire
//! shapes of upstream task records, the flat normalized output record, and
//! the pure duration conversions. It deliberately carries no I/O, no async
//! and no knowledge of the upstream HTTP API beyond the JSON field names.
//!
//! ## Key Concepts
//!
//! - **Task**: one upstream work record, immutable once fetched
//! - **Normalized Record**: the flat per-task output row (core attributes +
//!   extracted fields + optional status-duration summary)
//! - **Status History Row**: one per-status-visit duration, as a day count
//! - **Duration conversion**: minutes → human string → day-count float

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod duration;
pub mod record;
pub mod task;

// Re-exports for convenience
pub use duration::{convert_time, convert_time_to_days};
pub use record::{NormalizedRecord, StatusHistoryRow};
pub use task::{Assignee, StatusSpan, Task, TaskPriority, TaskStatus, TimeInStatus, TotalTime};
