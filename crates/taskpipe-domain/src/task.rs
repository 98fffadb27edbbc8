//! Task module - the upstream work record as the collection endpoint returns it

use serde::{Deserialize, Serialize};

/// One task record from the upstream project-management API.
///
/// Tasks are immutable once fetched; a request cycle owns its batch and
/// nothing mutates a task after deserialization, except for
/// [`Task::time_in_status`] which the client fills in when the optional
/// status-duration sub-fetch runs.
///
/// Only the fields the pipeline consumes are modeled. Unknown upstream
/// fields are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Upstream task identifier
    pub id: String,

    /// Task name
    #[serde(default)]
    pub name: String,

    /// Current workflow status
    pub status: TaskStatus,

    /// Free-text description (the extraction input)
    #[serde(default)]
    pub text_content: Option<String>,

    /// Creation timestamp, milliseconds since epoch as a decimal string
    /// (upstream sends numeric strings, not numbers)
    pub date_created: String,

    /// Last-update timestamp, same encoding as `date_created`
    pub date_updated: String,

    /// Assigned users; the first entry is the task leader
    #[serde(default)]
    pub assignees: Vec<Assignee>,

    /// Priority, absent for unprioritized tasks
    #[serde(default)]
    pub priority: Option<TaskPriority>,

    /// Per-status durations, present only after the sub-fetch merge
    #[serde(default)]
    pub time_in_status: Option<TimeInStatus>,
}

/// Workflow status wrapper as the upstream nests it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Status label, may carry pictographic prefixes
    #[serde(default)]
    pub status: String,
}

/// Priority wrapper as the upstream nests it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPriority {
    /// Priority label ("urgent", "high", ...)
    #[serde(default)]
    pub priority: Option<String>,
}

/// One assigned user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    /// Display username
    #[serde(default)]
    pub username: Option<String>,

    /// E-mail address
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload of the per-task status-duration sub-resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeInStatus {
    /// The status the task currently sits in
    #[serde(default)]
    pub current_status: Option<StatusSpan>,

    /// Every past status visit, oldest first
    #[serde(default)]
    pub status_history: Vec<StatusSpan>,
}

/// Time spent in one workflow status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSpan {
    /// Status label
    pub status: String,

    /// Accumulated time; absent for statuses the upstream never timed
    #[serde(default)]
    pub total_time: Option<TotalTime>,
}

/// Duration encoding used by the status-duration sub-resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalTime {
    /// Whole minutes spent in the status
    pub by_minute: i64,
}
