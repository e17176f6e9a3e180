//! In-memory assembly of batch result archives
//!
//! Batch processing collects one PNG per successfully processed input and
//! bundles them into a zip held entirely in memory. Entry order matches the
//! order images are added, which the batch processor guarantees matches
//! input order.

use crate::error::Result;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Accumulates processed images into a zip archive
pub struct BatchArchive {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entry_count: usize,
}

impl BatchArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entry_count: 0,
        }
    }

    /// Append a processed image under a name derived from its source file
    pub fn add_image(&mut self, original_file_name: &str, png: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(processed_entry_name(original_file_name), options)?;
        self.writer.write_all(png)?;
        self.entry_count += 1;
        Ok(())
    }

    /// Number of entries added so far
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Serialize the archive into its final byte buffer
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for BatchArchive {
    fn default() -> Self {
        Self::new()
    }
}

/// Archive entry name for a processed input: `<stem>_processed.png`
///
/// The original extension is stripped; any directory components are dropped.
pub fn processed_entry_name(original_file_name: &str) -> String {
    let stem = Path::new(original_file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    format!("{stem}_processed.png")
}

/// Suggested filename for a batch archive: `FabBanana_Batch_<unixtime-ms>.zip`
pub fn archive_filename(timestamp_ms: u128) -> String {
    format!("FabBanana_Batch_{timestamp_ms}.zip")
}
