//! Attachments CLI: operator tooling for the media storage tree.
//!
//! Reads ATTACHMENTS_UPLOADS_DIR, ATTACHMENTS_UPLOADS_URL,
//! ATTACHMENTS_MAX_UPLOAD_SIZE_MB and ATTACHMENTS_ALLOWED_TYPES (or a .env file).

use std::path::PathBuf;

use anyhow::Context;
use attachments_cli::{init_tracing, print_json, scan_media};
use attachments_core::models::{UploadCandidate, UploadRequestParams};
use attachments_core::{AttachmentsConfig, ErrorMetadata};
use attachments_processing::UploadValidator;
use attachments_storage::{MediaRoots, StaticOwnerDirectory, StoragePathResolver};
use clap::{Parser, Subcommand};
use validator::Validate;

#[derive(Parser)]
#[command(name = "attachments", about = "Member and group media storage tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the public and private storage roots
    Roots,
    /// Resolve the directory an upload would be written to
    Resolve {
        /// Owner kind: members or groups
        #[arg(long, default_value = "members")]
        object: String,
        /// Owner id (0 = the acting member)
        #[arg(long, default_value = "0")]
        object_id: u64,
        /// Requested visibility
        #[arg(long, default_value = "private")]
        status: String,
        /// Existing sub-directory of the upload base, bypassing ownership
        #[arg(long, default_value = "")]
        parent_dir: String,
        /// JSON file describing known members and groups
        #[arg(long, value_name = "FILE")]
        owners: Option<PathBuf>,
        /// Id of the acting member
        #[arg(long, value_name = "ID")]
        as_user: Option<u64>,
    },
    /// Check a file against the upload policy
    Validate {
        /// Path to the file to check
        file: PathBuf,
        /// Declared file name (defaults to the file's own name)
        #[arg(long)]
        name: Option<String>,
    },
    /// List the media catalogued below a directory
    List {
        /// Directory to scan
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AttachmentsConfig::from_env().context("Invalid attachments configuration")?;
    let roots = MediaRoots::from_config(&config);
    let cli = Cli::parse();

    match cli.command {
        Commands::Roots => {
            print_json(&serde_json::json!({
                "public": roots.public_root(),
                "private": roots.private_root(),
            }))?;
        }
        Commands::Resolve {
            object,
            object_id,
            status,
            parent_dir,
            owners,
            as_user,
        } => {
            let mut directory = match owners {
                Some(path) => StaticOwnerDirectory::from_json_file(&path)
                    .with_context(|| format!("Failed to load owners from {}", path.display()))?,
                None => StaticOwnerDirectory::new(),
            };
            if let Some(user_id) = as_user {
                directory = directory.acting_as(user_id);
            }

            let params = UploadRequestParams {
                status,
                object,
                object_id,
                parent_dir,
            };
            params.validate().context("Invalid upload parameters")?;

            let resolver = StoragePathResolver::new(roots, directory);
            print_json(&resolver.resolve_params(params))?;
        }
        Commands::Validate { file, name } => {
            let metadata = std::fs::metadata(&file)
                .with_context(|| format!("Cannot read {}", file.display()))?;
            let declared_name = name.unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

            let upload_validator = UploadValidator::new(config.upload_policy());
            let candidate = UploadCandidate::new(&file, declared_name, metadata.len());
            match upload_validator.check(candidate) {
                Ok(candidate) => print_json(&serde_json::json!({
                    "accepted": true,
                    "candidate": candidate,
                }))?,
                Err(e) => print_json(&serde_json::json!({
                    "accepted": false,
                    "error_code": e.error_code(),
                    "message": e.client_message(),
                }))?,
            }
        }
        Commands::List { dir } => {
            let records = scan_media(dir).await?;
            print_json(&records)?;
        }
    }

    Ok(())
}
