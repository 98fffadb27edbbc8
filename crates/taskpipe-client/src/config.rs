//! Client configuration values.
//!
//! A [`ClientConfig`] is a plain value passed by reference into the fetch
//! functions; it owns no connections and no shared state.

use crate::retry::RetryPolicy;
use std::time::Duration;

/// Default upstream API root
pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

/// Default records per page
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default per-request timeout; the upstream is slow on large pages
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Default bound on simultaneous in-flight requests
const DEFAULT_MAX_IN_FLIGHT: usize = 10;

/// Default courtesy delay between sequential page requests
const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Upstream client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root URL
    pub base_url: String,

    /// Static bearer-style token sent in the Authorization header
    pub api_token: String,

    /// Records per page unless the query overrides it
    pub page_size: u32,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Bound on simultaneous in-flight requests (rate-limit protection)
    pub max_in_flight: usize,

    /// Delay between sequential page requests
    pub page_delay: Duration,

    /// Retry policy for transient transport failures
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Configuration with production defaults for the given token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            page_delay: DEFAULT_PAGE_DELAY,
            retry: RetryPolicy::default(),
        }
    }
}

/// Query parameters for the task collection endpoint.
///
/// The defaults mirror the production pipeline: open tasks only, markdown
/// descriptions on. Closed-task inclusion and the due-date window are the
/// per-list variations the upstream datasets need.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Include archived tasks
    pub archived: bool,

    /// Ask the upstream to render descriptions as markdown
    pub include_markdown_description: bool,

    /// Per-query page size override
    pub page_size: Option<u32>,

    /// Include closed tasks
    pub include_closed: bool,

    /// Due-date lower bound, milliseconds since epoch
    pub due_date_gt: Option<i64>,

    /// Due-date upper bound, milliseconds since epoch
    pub due_date_lt: Option<i64>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            archived: false,
            include_markdown_description: true,
            page_size: None,
            include_closed: false,
            due_date_gt: None,
            due_date_lt: None,
        }
    }
}

impl ListQuery {
    /// Render the query string pairs for one page request.
    pub fn to_pairs(&self, page: u32, default_page_size: u32) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("archived".to_string(), self.archived.to_string()),
            (
                "include_markdown_description".to_string(),
                self.include_markdown_description.to_string(),
            ),
            ("page".to_string(), page.to_string()),
            (
                "page_size".to_string(),
                self.page_size.unwrap_or(default_page_size).to_string(),
            ),
        ];
        if self.include_closed {
            pairs.push(("include_closed".to_string(), "true".to_string()));
        }
        if let Some(gt) = self.due_date_gt {
            pairs.push(("due_date_gt".to_string(), gt.to_string()));
        }
        if let Some(lt) = self.due_date_lt {
            pairs.push(("due_date_lt".to_string(), lt.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_pairs() {
        let query = ListQuery::default();
        let pairs = query.to_pairs(0, 100);

        assert!(pairs.contains(&("archived".to_string(), "false".to_string())));
        assert!(pairs.contains(&("include_markdown_description".to_string(), "true".to_string())));
        assert!(pairs.contains(&("page".to_string(), "0".to_string())));
        assert!(pairs.contains(&("page_size".to_string(), "100".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "include_closed"));
        assert!(!pairs.iter().any(|(k, _)| k == "due_date_gt"));
    }

    #[test]
    fn test_closed_window_query_pairs() {
        let query = ListQuery {
            include_closed: true,
            page_size: Some(1000),
            due_date_gt: Some(1704067200000),
            due_date_lt: Some(1735689599000),
            ..ListQuery::default()
        };
        let pairs = query.to_pairs(3, 100);

        assert!(pairs.contains(&("page".to_string(), "3".to_string())));
        assert!(pairs.contains(&("page_size".to_string(), "1000".to_string())));
        assert!(pairs.contains(&("include_closed".to_string(), "true".to_string())));
        assert!(pairs.contains(&("due_date_gt".to_string(), "1704067200000".to_string())));
        assert!(pairs.contains(&("due_date_lt".to_string(), "1735689599000".to_string())));
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("pk_token");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_in_flight, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(180));
    }
}
