use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use attachments_cli::{init_tracing, media_table, print_json, scan_media};

#[derive(Parser, Debug)]
#[command(name = "list_media")]
#[command(about = "List catalogued media below a directory")]
struct Args {
    /// Directory to scan (defaults to ATTACHMENTS_UPLOADS_DIR)
    dir: Option<PathBuf>,

    /// Only list media whose MIME type starts with this prefix, e.g. "image/"
    #[arg(long, value_name = "PREFIX")]
    mime: Option<String>,

    /// Output format: json or table (default: table)
    #[arg(long, default_value = "table")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let dir = match args.dir {
        Some(dir) => dir,
        None => std::env::var("ATTACHMENTS_UPLOADS_DIR")
            .map(PathBuf::from)
            .map_err(|_| anyhow::anyhow!("No directory given and ATTACHMENTS_UPLOADS_DIR is not set"))?,
    };

    let mut records = scan_media(dir).await?;
    if let Some(prefix) = args.mime.as_deref() {
        records.retain(|record| record.mime_type.starts_with(prefix));
    }
    records.sort_by(|a, b| a.path.cmp(&b.path));

    match args.format.as_str() {
        "json" => print_json(&records)?,
        "table" => print!("{}", media_table(&records)),
        other => {
            return Err(anyhow::anyhow!(
                "Invalid format '{}'. Must be: json or table",
                other
            ))
        }
    }

    Ok(())
}
