//! CLI command implementations

pub mod extract;
pub mod info;
pub mod layers;

use anyhow::{Context, Result};
use exrio_io::{Compression, ExrInputFile};
use std::path::Path;

/// Open an EXR file
pub fn open_file(path: &Path) -> Result<ExrInputFile> {
    exrio_io::open(path).with_context(|| format!("Failed to open: {}", path.display()))
}

/// Parse a compression name
pub fn parse_compression(name: &str) -> Result<Compression> {
    Compression::from_name(name).with_context(|| {
        format!("Unknown compression '{}' (expected none, rle, zip or piz)", name)
    })
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
