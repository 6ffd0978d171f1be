//! Bundle captured screenshots into one zip

use crate::acquirer::SavedImage;
use crate::error::CaptureError;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Archive file name inside a run directory
pub const ARCHIVE_NAME: &str = "screenshots.zip";

/// Write `run_dir/screenshots.zip` holding every saved image by file name
///
/// Images are stored in capture order. If two images share a file name
/// (the second overwrote the first on disk), the name is stored once.
pub fn write_archive(images: &[SavedImage], run_dir: &Path) -> Result<PathBuf, CaptureError> {
    let archive_path = run_dir.join(ARCHIVE_NAME);
    let mut writer = ZipWriter::new(BufWriter::new(File::create(&archive_path)?));
    let options = SimpleFileOptions::default();

    let mut stored = HashSet::new();
    for image in images {
        let name = image.file_name();
        if !stored.insert(name.clone()) {
            continue;
        }
        let bytes = std::fs::read(&image.path)?;
        writer.start_file(name.as_str(), options)?;
        writer.write_all(&bytes)?;
    }

    writer.finish()?.flush()?;
    debug!("Wrote {} with {} file(s)", archive_path.display(), stored.len());
    Ok(archive_path)
}
