//! Output file writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Default buffer size for the output file.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// What a write produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteMetrics {
    /// Number of URLs written.
    pub lines_written: usize,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

/// Write one URL per line, replacing any existing file.
pub fn write_urls<P: AsRef<Path>>(path: P, urls: &[String]) -> std::io::Result<WriteMetrics> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
    for url in urls {
        writeln!(writer, "{url}")?;
    }
    writer.flush()?;
    drop(writer);

    let metrics = WriteMetrics {
        lines_written: urls.len(),
        file_size_bytes: std::fs::metadata(path)?.len(),
    };
    info!(
        "Wrote {} URLs ({} bytes) to {}",
        metrics.lines_written,
        metrics.file_size_bytes,
        path.display()
    );
    Ok(metrics)
}

/// Echo URLs to `out`, one per line.
pub fn echo_urls<W: Write>(out: &mut W, urls: &[String]) -> std::io::Result<()> {
    for url in urls {
        writeln!(out, "{url}")?;
    }
    Ok(())
}
