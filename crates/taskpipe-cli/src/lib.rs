//! Taskpipe CLI - one-shot fetch-and-export for task lists.
//!
//! The command-line counterpart of the HTTP service: fetch one list, run
//! extraction and normalization, and write the records to a CSV or XLSX
//! file for the BI datasets.

#![warn(missing_docs)]

pub mod cli;
pub mod export;

pub use cli::{Cli, ExportFormat};
