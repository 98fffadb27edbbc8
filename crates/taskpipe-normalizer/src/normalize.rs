//! Batch normalization of fetched tasks.

use crate::datetime::{parse_timestamp_millis, DATE_FORMAT};
use chrono::DateTime;
use chrono_tz::Tz;
use taskpipe_domain::{
    convert_time, convert_time_to_days, NormalizedRecord, StatusHistoryRow, Task, TimeInStatus,
};
use taskpipe_extractor::{extract_fields, normalize_text, strip_emoji, FieldCatalog};
use tracing::{info, warn};

/// Output of one normalization pass.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// One flat row per surviving task, sequence-numbered from 1
    pub records: Vec<NormalizedRecord>,

    /// Per-status-visit duration rows for tasks that carried sub-records
    pub status_history: Vec<StatusHistoryRow>,
}

/// Normalize a fetched batch.
///
/// Tasks with unparseable timestamps are logged and dropped; the batch
/// continues. Given identical tasks, catalog, timezone and `generated_at`,
/// the output is identical - `generated_at` only stamps the status-history
/// rows and is supplied by the caller precisely so this function stays
/// deterministic.
pub fn normalize_tasks(
    tasks: &[Task],
    catalog: &FieldCatalog,
    tz: Tz,
    generated_at: DateTime<Tz>,
) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    let generated_stamp = generated_at.format(DATE_FORMAT).to_string();

    for task in tasks {
        let (date_created, date_updated) = match (
            parse_timestamp_millis(&task.date_created, tz),
            parse_timestamp_millis(&task.date_updated, tz),
        ) {
            (Ok(created), Ok(updated)) => (created, updated),
            (Err(e), _) | (_, Err(e)) => {
                warn!(task_id = %task.id, error = %e, "skipping task with bad timestamp");
                continue;
            }
        };

        let fields = extract_fields(catalog, &normalize_text(task.text_content.as_deref()));

        let (current_status, time_in_current_status) = task
            .time_in_status
            .as_ref()
            .map(current_status_summary)
            .unwrap_or((None, None));

        if let Some(time_in_status) = &task.time_in_status {
            batch
                .status_history
                .extend(status_history_rows(task, time_in_status, &generated_stamp));
        }

        let leader = task.assignees.first();
        batch.records.push(NormalizedRecord {
            seq: batch.records.len() + 1,
            id: task.id.clone(),
            status: strip_emoji(&task.status.status).trim().to_string(),
            name: task.name.clone(),
            priority: task.priority.as_ref().and_then(|p| p.priority.clone()),
            leader: leader.and_then(|a| a.username.clone()),
            leader_email: leader.and_then(|a| a.email.clone()),
            date_created,
            date_updated,
            current_status,
            time_in_current_status,
            fields,
        });
    }

    info!(
        records = batch.records.len(),
        status_rows = batch.status_history.len(),
        skipped = tasks.len() - batch.records.len(),
        "normalization complete"
    );
    batch
}

/// Human summary of the status the task currently sits in.
fn current_status_summary(time_in_status: &TimeInStatus) -> (Option<String>, Option<String>) {
    let Some(current) = &time_in_status.current_status else {
        return (None, None);
    };
    let Some(total) = &current.total_time else {
        return (None, None);
    };
    (
        Some(strip_emoji(&current.status).trim().to_string()),
        Some(convert_time(total.by_minute)),
    )
}

/// Day-count rows for every timed status visit of one task.
fn status_history_rows(
    task: &Task,
    time_in_status: &TimeInStatus,
    generated_stamp: &str,
) -> Vec<StatusHistoryRow> {
    time_in_status
        .status_history
        .iter()
        .filter_map(|span| {
            let total = span.total_time.as_ref()?;
            Some(StatusHistoryRow {
                task_id: task.id.clone(),
                status: strip_emoji(&span.status).trim().to_string(),
                time_in_status: convert_time_to_days(&convert_time(total.by_minute)),
                timestamp: generated_stamp.to_string(),
            })
        })
        .collect()
}
