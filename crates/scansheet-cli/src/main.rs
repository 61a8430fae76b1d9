//! ScanSheet CLI: submit form photos for digitization and manage exports.
//!
//! Set SCANSHEET_API_URL, SCANSHEET_AUTH_TOKEN, and SCANSHEET_ENCRYPTION_KEY
//! (base64 of a 32-byte AES key). Exports land under SCANSHEET_EXPORT_ROOT.

use anyhow::Context;
use clap::{Parser, Subcommand};
use scansheet_cli::{format_size, init_tracing};
use scansheet_client::ApiClient;
use scansheet_core::{Config, UploadOutcome};
use scansheet_storage::{create_catalog, create_store};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "scansheet", about = "ScanSheet form digitization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit two photos of a paper form for processing
    Submit {
        /// Photo of the front of the form
        front: std::path::PathBuf,
        /// Photo of the back of the form
        back: std::path::PathBuf,
        /// Form template tag sent to the server
        #[arg(long, default_value = "outros")]
        form_tag: String,
    },
    /// Operations on previously exported CSV files
    Exports {
        #[command(subcommand)]
        sub: ExportCommands,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// List exported CSV files, newest first
    List {
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Delete exports by handle (best effort, per item)
    Delete {
        /// Handles as printed by `exports list`
        handles: Vec<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = Config::from_env().context(
        "Failed to load configuration. Set SCANSHEET_API_URL, SCANSHEET_AUTH_TOKEN, and SCANSHEET_ENCRYPTION_KEY",
    )?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            front,
            back,
            form_tag,
        } => {
            let client = ApiClient::from_config(&config)
                .map_err(|e| anyhow::anyhow!(e.client_message()))?;
            let store = create_store(&config).await?;

            let front_bytes = tokio::fs::read(&front)
                .await
                .with_context(|| format!("Failed to read {}", front.display()))?;
            let back_bytes = tokio::fs::read(&back)
                .await
                .with_context(|| format!("Failed to read {}", back.display()))?;

            let outcome = client
                .submit(vec![front_bytes, back_bytes], &form_tag, store.as_ref())
                .await;

            match &outcome {
                UploadOutcome::Succeeded(info) => {
                    println!("Export saved: {} ({})", info.name, info.handle);
                }
                UploadOutcome::Failed(message) => {
                    eprintln!("Upload failed: {}", message);
                    std::process::exit(1);
                }
                UploadOutcome::Pending => unreachable!("submit returns a terminal outcome"),
            }
        }
        Commands::Exports { sub } => match sub {
            ExportCommands::List { format } => {
                let catalog = create_catalog(&config);
                let files = catalog.list().await?;

                if format == "json" {
                    print_json(&files)?;
                } else {
                    println!("{:<40} {:>10}  {:<20}  handle", "name", "size", "created");
                    for file in &files {
                        println!(
                            "{:<40} {:>10}  {:<20}  {}",
                            file.name,
                            format_size(file.size_bytes),
                            file.created_at.format("%Y-%m-%d %H:%M:%S"),
                            file.handle
                        );
                    }
                    println!("{} file(s)", files.len());
                }
            }
            ExportCommands::Delete { handles } => {
                if handles.is_empty() {
                    anyhow::bail!("No handles given");
                }
                let catalog = create_catalog(&config);
                let report = catalog.delete(&handles).await;

                println!("Deleted {} file(s)", report.deleted);
                for failure in &report.failures {
                    eprintln!("Failed to delete {}: {}", failure.handle, failure.reason);
                }
                if !report.failures.is_empty() {
                    std::process::exit(1);
                }
            }
        },
    }

    Ok(())
}
