//! CLI argument definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Fetch a task list, extract its description fields and export the
/// normalized records.
#[derive(Debug, Parser)]
#[command(name = "taskpipe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// List identifier to fetch (alphanumeric)
    pub list_id: String,

    /// Output file path
    #[arg(short, long, default_value = "data/tasks.xlsx")]
    pub out: PathBuf,

    /// Output format; inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Upstream API token
    #[arg(long, env = "CLICKUP_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// tz-database timezone for output timestamps
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Include closed tasks
    #[arg(long)]
    pub include_closed: bool,

    /// Also fetch per-task status durations
    #[arg(long)]
    pub time_in_status: bool,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// Excel workbook
    Xlsx,
}

impl Cli {
    /// The format to export: the explicit flag, else the file extension,
    /// else XLSX.
    pub fn resolved_format(&self) -> ExportFormat {
        if let Some(format) = self.format {
            return format;
        }
        match self.out.extension().and_then(|e| e.to_str()) {
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::Xlsx,
        }
    }
}
