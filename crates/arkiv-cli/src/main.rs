//! Arkiv CLI: deposit metadata and staged files into the local dataset store.
//!
//! Configure via ARKIV_STORAGE_PATH and friends, or a .env file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use arkiv_cli::init_tracing;
use arkiv_core::models::{DepositRequest, Principal};
use arkiv_core::{DepositConfig, DepositError};
use arkiv_deposit::{DepositOutcome, DepositPipeline};
use arkiv_storage::{DatasetStore, LocalDatasetStore};

#[derive(Parser)]
#[command(name = "arkiv", about = "Arkiv deposit service CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deposit a metadata document plus staged files as a new dataset
    Deposit {
        /// Path to the metadata JSON document
        #[arg(long)]
        metadata: PathBuf,
        /// Staging directory holding the files to ingest
        #[arg(long)]
        staging: PathBuf,
        /// User id of the depositor
        #[arg(long)]
        user: String,
        /// Depositor display name
        #[arg(long)]
        name: Option<String>,
        /// Depositor email
        #[arg(long)]
        email: Option<String>,
        /// Files to ingest, relative to the staging directory
        /// (default: every regular file under it)
        files: Vec<PathBuf>,
    },
    /// Show a single dataset by id
    Show {
        /// Dataset UUID
        id: Uuid,
    },
    /// List datasets in the store
    List,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Every regular file under the staging directory, as sorted relative paths
async fn collect_staged_files(staging: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![staging.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Read staging directory {}", dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                let relative = entry
                    .path()
                    .strip_prefix(staging)
                    .context("Staged file outside staging directory")?
                    .to_path_buf();
                files.push(relative);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = DepositConfig::from_env();
    let store = Arc::new(
        LocalDatasetStore::new(&config.storage_path)
            .await
            .with_context(|| {
                format!("Open dataset store at {}", config.storage_path.display())
            })?,
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Deposit {
            metadata,
            staging,
            user,
            name,
            email,
            files,
        } => {
            let payload = tokio::fs::read(&metadata)
                .await
                .with_context(|| format!("Read metadata document {}", metadata.display()))?;
            let files = if files.is_empty() {
                collect_staged_files(&staging).await?
            } else {
                files
            };

            let mut principal = Principal::new(user);
            if let Some(name) = name {
                principal = principal.with_display_name(name);
            }
            if let Some(email) = email {
                principal = principal.with_email(email);
            }

            let pipeline = DepositPipeline::new(store.clone(), store, config);
            let request = DepositRequest::new(principal, payload, staging, files);
            let outcome = pipeline.execute(request).await;

            match outcome {
                DepositOutcome::Success(dataset) => {
                    print_json(&json!({ "outcome": "success", "dataset": dataset }))?;
                }
                DepositOutcome::RejectedInput(error) => {
                    let mut body = json!({
                        "outcome": "rejected_input",
                        "error": error.to_string(),
                        "client_message": error.client_message(),
                    });
                    if let DepositError::SchemaValidation { diagnostics } = &error {
                        body["diagnostics"] = serde_json::to_value(diagnostics)?;
                    }
                    print_json(&body)?;
                    std::process::exit(1);
                }
                DepositOutcome::CreatedButIncomplete { dataset, reason } => {
                    print_json(&json!({
                        "outcome": "created_but_incomplete",
                        "dataset_id": dataset.id,
                        "error": reason.to_string(),
                        "client_message": reason.client_message(),
                    }))?;
                    std::process::exit(1);
                }
                DepositOutcome::Failed(error) => {
                    print_json(&json!({
                        "outcome": "failed",
                        "error": error.to_string(),
                        "client_message": error.client_message(),
                    }))?;
                    std::process::exit(1);
                }
            }
        }
        Commands::Show { id } => {
            let dataset = store.load_dataset(id).await?;
            print_json(&dataset)?;
        }
        Commands::List => {
            let datasets = store.list_datasets().await?;
            print_json(&datasets)?;
        }
    }

    Ok(())
}
