//! Load screenshots from disk into an ImageBatch

use crate::error::ExtractorError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use inkprint_domain::{EncodedImage, ImageBatch};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Read image files and zip archives of images
///
/// Plain images are keyed by their file name. Images inside a `.zip` are
/// keyed `archive.zip/member`, in archive order; non-image members and
/// directories are skipped.
///
/// # Errors
///
/// `Validation` for an unsupported extension, `Io` for unreadable files and
/// `Archive` for corrupt zips.
pub fn load_images<P: AsRef<Path>>(paths: &[P]) -> Result<ImageBatch, ExtractorError> {
    let mut batch = ImageBatch::new();

    for path in paths {
        let path = path.as_ref();
        let name = file_name(path);

        match extension(path).as_deref() {
            Some("zip") => load_archive(path, &name, &mut batch)?,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => {
                let bytes = std::fs::read(path)?;
                batch.push(name, encode(&bytes));
            }
            _ => {
                return Err(ExtractorError::Validation(format!(
                    "unsupported file type: {}",
                    path.display()
                )))
            }
        }
    }

    debug!(
        "Loaded {} image(s) from {} source(s)",
        batch.total_images(),
        batch.source_count()
    );
    Ok(batch)
}

fn load_archive(path: &Path, name: &str, batch: &mut ImageBatch) -> Result<(), ExtractorError> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;

    for i in 0..archive.len() {
        let mut member = archive.by_index(i)?;
        if member.is_dir() {
            continue;
        }

        let member_name = member.name().to_string();
        let is_image = extension(Path::new(&member_name))
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
        if !is_image || member_name.starts_with("__MACOSX/") {
            continue;
        }

        // Declared sizes are untrusted; the buffer grows with what is read
        let mut bytes = Vec::new();
        member.read_to_end(&mut bytes)?;
        batch.push(format!("{}/{}", name, member_name), encode(&bytes));
    }

    Ok(())
}

fn encode(bytes: &[u8]) -> EncodedImage {
    EncodedImage::new(STANDARD.encode(bytes))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
