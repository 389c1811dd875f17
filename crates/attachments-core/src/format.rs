//! Human-readable byte sizes for client-facing messages.

const UNITS: [(&str, u64); 5] = [
    ("TB", 1024 * 1024 * 1024 * 1024),
    ("GB", 1024 * 1024 * 1024),
    ("MB", 1024 * 1024),
    ("KB", 1024),
    ("B", 1),
];

/// Format a byte count using binary units and no decimals (`52428800` -> `50 MB`).
pub fn format_size(bytes: u64) -> String {
    for (unit, magnitude) in UNITS {
        if bytes >= magnitude {
            let value = bytes as f64 / magnitude as f64;
            return format!("{:.0} {}", value, unit);
        }
    }
    "0 B".to_string()
}
