//! Normalized output records - the flat rows the pipeline emits

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One flat output row per task.
///
/// Combines the core task attributes, the extracted free-text fields and,
/// when the status-duration sub-fetch ran, a summary of the current status.
/// Field names mirror the downstream BI datasets, which is why some of them
/// are Portuguese display labels rather than snake_case identifiers.
///
/// Every catalog label is always present in [`NormalizedRecord::fields`],
/// mapped to an empty string when the task text never mentioned it, so the
/// serialized rows of one batch all share the same column set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// 1-based sequence number within the current batch
    #[serde(rename = "Projeto")]
    pub seq: usize,

    /// Upstream task identifier
    #[serde(rename = "ID")]
    pub id: String,

    /// Status label with pictographic characters stripped
    #[serde(rename = "Status")]
    pub status: String,

    /// Task name
    #[serde(rename = "Name")]
    pub name: String,

    /// Priority label, if the task has one
    #[serde(rename = "Priority")]
    pub priority: Option<String>,

    /// Username of the first assignee
    #[serde(rename = "Líder")]
    pub leader: Option<String>,

    /// E-mail of the first assignee
    #[serde(rename = "Email líder")]
    pub leader_email: Option<String>,

    /// Creation timestamp formatted in the target timezone
    pub date_created: String,

    /// Last-update timestamp formatted in the target timezone
    pub date_updated: String,

    /// Current status label, when the status-duration sub-fetch ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,

    /// Human-readable time in the current status ("1.5 horas")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_current_status: Option<String>,

    /// Extracted free-text fields, keyed by catalog label
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

/// One per-status-visit duration row, written to its own dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryRow {
    /// Upstream task identifier
    pub task_id: String,

    /// Status label with pictographic characters stripped
    pub status: String,

    /// Time spent in the status, normalized to days
    pub time_in_status: f64,

    /// When this row was generated, formatted in the target timezone
    pub timestamp: String,
}
