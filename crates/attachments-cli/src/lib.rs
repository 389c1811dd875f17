use std::path::PathBuf;

use anyhow::Context;
use attachments_core::format_size;
use attachments_core::models::MediaRecord;
use serde::Serialize;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Walk `dir` on the blocking pool and collect its media.
pub async fn scan_media(dir: PathBuf) -> anyhow::Result<Vec<MediaRecord>> {
    let started = std::time::Instant::now();
    let dir_label = dir.display().to_string();

    let records = tokio::task::spawn_blocking(move || attachments_storage::collect_media(dir))
        .await
        .context("Media scan task failed")?;

    tracing::info!(
        dir = %dir_label,
        count = records.len(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Media scan complete"
    );
    Ok(records)
}

/// Render records as a fixed-width table.
pub fn media_table(records: &[MediaRecord]) -> String {
    let mut out = format!(
        "{:<32}  {:<30}  {:<24}  {:>8}  {}\n",
        "ID", "NAME", "MIME TYPE", "SIZE", "MODIFIED"
    );
    for record in records {
        out.push_str(&format!(
            "{:<32}  {:<30}  {:<24}  {:>8}  {}\n",
            record.id,
            truncate_string(&record.name, 30),
            truncate_string(&record.mime_type, 24),
            format_size(record.size_bytes),
            record.modified_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    out.push_str(&format!("{} media item(s)\n", records.len()));
    out
}
