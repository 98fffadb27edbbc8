//! Taskpipe upstream client
//!
//! Retrieves task records from the upstream project-management API: a
//! page-walking fetcher over the rate-limited collection endpoint, a retry
//! policy for transient transport failures, and the optional per-task
//! status-duration sub-fetch.
//!
//! The client is deliberately not an object: a [`ClientConfig`] value plus
//! free async functions, with the HTTP layer behind the [`Transport`] trait
//! so the pagination and retry logic are testable without a network.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fetch;
pub mod retry;
pub mod transport;

pub use config::{ClientConfig, ListQuery};
pub use error::ApiError;
pub use fetch::{
    attach_time_in_status, fetch_list_tasks, fetch_page, fetch_page_range, fetch_time_in_status,
};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport};
