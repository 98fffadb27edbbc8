//! Taskpipe CLI - fetch one task list and export it as a spreadsheet.

use anyhow::{bail, Context};
use clap::Parser;
use taskpipe_cli::export::{write_csv, write_xlsx};
use taskpipe_cli::{Cli, ExportFormat};
use taskpipe_client::{
    attach_time_in_status, fetch_list_tasks, ClientConfig, HttpTransport, ListQuery,
};
use taskpipe_extractor::FieldCatalog;
use taskpipe_normalizer::{normalize_tasks, parse_timezone};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.list_id.is_empty() || !cli.list_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!("invalid list id {:?}: must be alphanumeric", cli.list_id);
    }

    let timezone = parse_timezone(&cli.timezone)?;

    let mut config = ClientConfig::new(cli.api_token.clone());
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    let transport = HttpTransport::new(&config)?;

    let query = ListQuery {
        include_closed: cli.include_closed,
        page_size: cli.page_size,
        ..ListQuery::default()
    };

    let mut tasks = fetch_list_tasks(&transport, &config, &cli.list_id, &query)
        .await
        .context("fetching task list")?;

    if cli.time_in_status {
        attach_time_in_status(&transport, &config, &mut tasks)
            .await
            .context("fetching status durations")?;
    }

    let catalog = FieldCatalog::production();
    let generated_at = chrono::Utc::now().with_timezone(&timezone);
    let batch = normalize_tasks(&tasks, &catalog, timezone, generated_at);

    if let Some(parent) = cli.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    match cli.resolved_format() {
        ExportFormat::Csv => write_csv(&cli.out, &catalog, &batch.records)?,
        ExportFormat::Xlsx => write_xlsx(&cli.out, &catalog, &batch.records)?,
    }

    println!(
        "Saved {} records to {}",
        batch.records.len(),
        cli.out.display()
    );
    Ok(())
}
