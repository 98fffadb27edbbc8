//! Page walking and the status-duration sub-fetch.

use crate::config::{ClientConfig, ListQuery};
use crate::error::ApiError;
use crate::transport::Transport;
use futures::future;
use serde_json::Value;
use std::ops::Range;
use taskpipe_domain::{Task, TimeInStatus};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Fetch one page of the task collection endpoint.
///
/// The request runs under a permit from `gate` and is retry-wrapped by the
/// configured policy. Individual malformed task records in the page are
/// logged and skipped; the page itself survives.
pub async fn fetch_page(
    transport: &dyn Transport,
    config: &ClientConfig,
    gate: &Semaphore,
    list_id: &str,
    query: &ListQuery,
    page: u32,
) -> Result<Vec<Task>, ApiError> {
    let path = format!("list/{}/task", list_id);
    let pairs = query.to_pairs(page, config.page_size);

    let payload = config
        .retry
        .run(|| {
            let path = path.as_str();
            let pairs = pairs.as_slice();
            async move {
                let _permit = gate
                    .acquire()
                    .await
                    .map_err(|_| ApiError::Transport("concurrency gate closed".to_string()))?;
                transport.get_json(path, pairs).await
            }
        })
        .await?;

    Ok(parse_tasks(&payload))
}

/// Walk every page of a list, starting at page 0, until a page comes back
/// empty.
///
/// Pages are requested strictly in sequence - page N+1 is only asked for
/// once page N proved non-empty - so the result holds each page exactly
/// once. A courtesy delay separates page requests to stay inside the
/// upstream rate limit.
pub async fn fetch_list_tasks(
    transport: &dyn Transport,
    config: &ClientConfig,
    list_id: &str,
    query: &ListQuery,
) -> Result<Vec<Task>, ApiError> {
    let gate = Semaphore::new(config.max_in_flight);
    let mut tasks = Vec::new();
    let mut page = 0u32;

    loop {
        let batch = fetch_page(transport, config, &gate, list_id, query, page).await?;
        if batch.is_empty() {
            break;
        }
        debug!(list_id, page, count = batch.len(), "fetched task page");
        tasks.extend(batch);
        page += 1;
        if !config.page_delay.is_zero() {
            sleep(config.page_delay).await;
        }
    }

    info!(list_id, pages = page, total = tasks.len(), "task fetch complete");
    Ok(tasks)
}

/// Fetch a fixed page range concurrently through a gathered join.
///
/// Useful when the page count is already known; the concurrency gate bounds
/// the fan-out to the configured in-flight limit. Page indices are disjoint,
/// so the flattened result contains no duplicates.
pub async fn fetch_page_range(
    transport: &dyn Transport,
    config: &ClientConfig,
    list_id: &str,
    query: &ListQuery,
    pages: Range<u32>,
) -> Result<Vec<Task>, ApiError> {
    let gate = Semaphore::new(config.max_in_flight);
    let fetches = pages
        .map(|page| fetch_page(transport, config, &gate, list_id, query, page))
        .collect::<Vec<_>>();

    let batches = future::try_join_all(fetches).await?;
    Ok(batches.into_iter().flatten().collect())
}

/// Fetch the status-duration sub-resource for one task.
pub async fn fetch_time_in_status(
    transport: &dyn Transport,
    config: &ClientConfig,
    gate: &Semaphore,
    task_id: &str,
) -> Result<TimeInStatus, ApiError> {
    let path = format!("task/{}/time_in_status", task_id);

    let payload = config
        .retry
        .run(|| {
            let path = path.as_str();
            async move {
                let _permit = gate
                    .acquire()
                    .await
                    .map_err(|_| ApiError::Transport("concurrency gate closed".to_string()))?;
                transport.get_json(path, &[]).await
            }
        })
        .await?;

    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Run the status-duration sub-fetch for a whole batch and merge the results
/// into the tasks.
///
/// The sub-fetches are gathered concurrently under one gate rather than
/// issued one by one; failures propagate exactly like page-fetch failures.
pub async fn attach_time_in_status(
    transport: &dyn Transport,
    config: &ClientConfig,
    tasks: &mut [Task],
) -> Result<(), ApiError> {
    if tasks.is_empty() {
        return Ok(());
    }

    let gate = Semaphore::new(config.max_in_flight);
    let fetches = tasks
        .iter()
        .map(|task| fetch_time_in_status(transport, config, &gate, &task.id))
        .collect::<Vec<_>>();

    let results = future::try_join_all(fetches).await?;
    for (task, time_in_status) in tasks.iter_mut().zip(results) {
        task.time_in_status = Some(time_in_status);
    }

    info!(count = tasks.len(), "status-duration sub-fetch complete");
    Ok(())
}

/// Decode the `tasks` array of a page payload, skipping malformed records.
///
/// A record missing its identifier or status is an upstream data bug, not a
/// reason to fail the batch; it is logged and dropped.
fn parse_tasks(payload: &Value) -> Vec<Task> {
    let Some(items) = payload.get("tasks").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut tasks = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Task>(item.clone()) {
            Ok(task) => tasks.push(task),
            Err(e) => {
                let id = item.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
                warn!(task_id = id, error = %e, "skipping malformed task record");
            }
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Transport that pops scripted responses and records every request.
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<Value, ApiError>>>,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<Value, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get_json(
            &self,
            path: &str,
            query: &[(String, String)],
        ) -> Result<Value, ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), query.to_vec()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("script exhausted".to_string())))
        }
    }

    fn test_config() -> ClientConfig {
        let mut config = ClientConfig::new("pk_test");
        config.page_delay = Duration::ZERO;
        config.retry.base_delay = Duration::from_millis(1);
        config
    }

    fn task_json(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("task {id}"),
            "status": {"status": "em aberto"},
            "date_created": "1704067200000",
            "date_updated": "1704153600000"
        })
    }

    #[tokio::test]
    async fn test_pagination_stops_at_first_empty_page() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"tasks": [task_json("t1"), task_json("t2")]})),
            Ok(json!({"tasks": []})),
        ]);
        let config = test_config();

        let tasks = fetch_list_tasks(&transport, &config, "900100", &ListQuery::default())
            .await
            .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "t1");
        assert_eq!(tasks[1].id, "t2");

        // Exactly two requests: page 0 and the terminating page 1
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "list/900100/task");
        assert!(requests[0].1.contains(&("page".to_string(), "0".to_string())));
        assert!(requests[1].1.contains(&("page".to_string(), "1".to_string())));
    }

    #[tokio::test]
    async fn test_upstream_403_fails_fast_without_retry() {
        let transport = ScriptedTransport::new(vec![Err(ApiError::UpstreamStatus {
            status: 403,
            message: "Team not authorized".to_string(),
        })]);
        let config = test_config();

        let result = fetch_list_tasks(&transport, &config, "900100", &ListQuery::default()).await;

        assert!(matches!(
            result,
            Err(ApiError::UpstreamStatus { status: 403, .. })
        ));
        // One request, no partial data, no retry
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_then_succeeds() {
        let transport = ScriptedTransport::new(vec![
            Err(ApiError::Transport("connection reset".to_string())),
            Ok(json!({"tasks": [task_json("t1")]})),
            Ok(json!({"tasks": []})),
        ]);
        let config = test_config();

        let tasks = fetch_list_tasks(&transport, &config, "900100", &ListQuery::default())
            .await
            .unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_surfaces_cause() {
        let transport = ScriptedTransport::new(vec![
            Err(ApiError::Transport("reset".to_string())),
            Err(ApiError::Transport("reset".to_string())),
            Err(ApiError::Transport("reset".to_string())),
        ]);
        let config = test_config();

        let result = fetch_list_tasks(&transport, &config, "900100", &ListQuery::default()).await;

        assert!(matches!(
            result,
            Err(ApiError::RetriesExhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped_not_fatal() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"tasks": [
                task_json("good"),
                {"name": "no id or status"},
            ]})),
            Ok(json!({"tasks": []})),
        ]);
        let config = test_config();

        let tasks = fetch_list_tasks(&transport, &config, "900100", &ListQuery::default())
            .await
            .unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "good");
    }

    #[tokio::test]
    async fn test_payload_without_tasks_key_ends_the_walk() {
        let transport = ScriptedTransport::new(vec![Ok(json!({"err": "unexpected shape"}))]);
        let config = test_config();

        let tasks = fetch_list_tasks(&transport, &config, "900100", &ListQuery::default())
            .await
            .unwrap();

        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_page_range_gathers_disjoint_pages() {
        // Scripted responses are consumed in request order; with a range of
        // three pages every page lands exactly once in the flattened result.
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"tasks": [task_json("a")]})),
            Ok(json!({"tasks": [task_json("b")]})),
            Ok(json!({"tasks": [task_json("c")]})),
        ]);
        let config = test_config();

        let tasks = fetch_page_range(&transport, &config, "900100", &ListQuery::default(), 0..3)
            .await
            .unwrap();

        assert_eq!(tasks.len(), 3);
        let mut ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_attach_time_in_status_merges_per_task() {
        let mut tasks = vec![
            serde_json::from_value::<Task>(task_json("t1")).unwrap(),
            serde_json::from_value::<Task>(task_json("t2")).unwrap(),
        ];
        let transport = ScriptedTransport::new(vec![
            Ok(json!({
                "current_status": {"status": "review", "total_time": {"by_minute": 90}},
                "status_history": [
                    {"status": "open", "total_time": {"by_minute": 30}}
                ]
            })),
            Ok(json!({"status_history": []})),
        ]);
        let config = test_config();

        attach_time_in_status(&transport, &config, &mut tasks)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .any(|(path, _)| path == "task/t1/time_in_status"));
        assert!(requests
            .iter()
            .any(|(path, _)| path == "task/t2/time_in_status"));
        assert!(tasks.iter().all(|t| t.time_in_status.is_some()));
    }

    #[tokio::test]
    async fn test_attach_time_in_status_propagates_failures() {
        let mut tasks = vec![serde_json::from_value::<Task>(task_json("t1")).unwrap()];
        let transport = ScriptedTransport::new(vec![Err(ApiError::UpstreamStatus {
            status: 500,
            message: "boom".to_string(),
        })]);
        let config = test_config();

        let result = attach_time_in_status(&transport, &config, &mut tasks).await;
        assert!(matches!(
            result,
            Err(ApiError::UpstreamStatus { status: 500, .. })
        ));
        assert!(tasks[0].time_in_status.is_none());
    }
}
