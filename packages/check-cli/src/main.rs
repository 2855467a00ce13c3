//! Command-line harness around the Check export client.
//!
//! Stands in for the hosting analysis tool: reads connection parameters,
//! runs fetch → flatten → redact, and prints the table to stdout. On any
//! failure the error sentinel goes to stderr and the process exits
//! non-zero, so callers never mistake an error for a table.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use check_client::{fetch, FetchParams};

/// Export a Check project as a flat table.
#[derive(Debug, Parser)]
#[command(name = "check-export", version, about)]
struct Cli {
    /// Project path; only the last segment names the project.
    #[arg(long)]
    project: String,

    /// API access token.
    #[arg(long, env = "CHECK_KEY", hide_env_values = true)]
    key: String,

    /// API base address, e.g. https://check-api.example.org
    #[arg(long, env = "CHECK_HOST")]
    host: String,

    /// Replace contributor names with a placeholder.
    #[arg(long)]
    anonymize: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    // Logs go to stderr so stdout stays a clean table.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let params = FetchParams {
        project: cli.project,
        key: cli.key,
        host: cli.host,
        anonymize: cli.anonymize,
    };

    let table = fetch(&params).await?;
    match cli.format {
        Format::Csv => print!("{}", table.to_csv()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&table)?),
    }
    Ok(())
}
