//! Taskpipe Server CLI
//!
//! Starts the HTTP server for the fetch → extract → normalize pipeline.

use std::env;
use std::process;
use taskpipe_server::{config::AppConfig, start_server, ServerError};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        AppConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: taskpipe-server --config <path-to-config.toml>");
        eprintln!();
        AppConfig::default_test_config()
    };

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Taskpipe Server - Task Fetch and Normalization Service");
    println!();
    println!("USAGE:");
    println!("    taskpipe-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    taskpipe-server --config config/taskpipe.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8000)");
    println!("    - api_token: Upstream API token (or TASKPIPE_API_TOKEN env)");
    println!("    - timezone: tz-database name for output timestamps");
    println!("    - fetch_time_in_status: Run the status-duration sub-fetch");
    println!("    - [cache]: Redis url + ttl_secs");
    println!("    - [database]: SQLite path");
    println!("    - [lists.<id>]: Per-list query overrides and dataset names");
    println!();
}
