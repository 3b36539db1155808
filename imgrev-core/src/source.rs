//! Image source: turns a directory or a TOML manifest into the fixed
//! `(id, uri)` set a session is built from.

use std::path::Path;

use serde::Deserialize;

use crate::error::SourceError;
use crate::types::ImageRef;

/// File extensions recognised when scanning a directory (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    images: Vec<ImageRef>,
}

/// Loads the image set at `path`.
///
/// A directory is scanned with [`scan_directory`]; anything else is read as a
/// manifest with [`load_manifest`].
///
/// # Errors
///
/// Returns `SourceError` if the path cannot be read or the manifest is invalid.
pub fn discover(path: &Path) -> Result<Vec<ImageRef>, SourceError> {
    let meta = std::fs::metadata(path).map_err(|source| SourceError::Io {
        path: path.to_owned(),
        source,
    })?;
    if meta.is_dir() {
        scan_directory(path)
    } else {
        load_manifest(path)
    }
}

/// Lists the image files directly inside `dir`, sorted by file name.
///
/// Each image's id is its file name and its uri the full path. Subdirectories,
/// files with other extensions, and paths that are not valid UTF-8 are skipped.
///
/// # Errors
///
/// Returns `SourceError::Io` if the directory or one of its entries cannot be
/// read.
pub fn scan_directory(dir: &Path) -> Result<Vec<ImageRef>, SourceError> {
    let io_err = |source| SourceError::Io {
        path: dir.to_owned(),
        source,
    };

    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !entry.file_type().map_err(io_err)?.is_file() || !has_image_extension(&path) {
            continue;
        }
        let file_name = entry.file_name();
        let (Some(id), Some(uri)) = (file_name.to_str(), path.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping image with a non-UTF-8 path");
            continue;
        };
        images.push(ImageRef::new(id, uri));
    }
    images.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!(dir = %dir.display(), images = images.len(), "scanned image directory");
    Ok(images)
}

/// Reads a TOML manifest of `[[images]]` tables with `id` and `uri` keys.
///
/// Entry order is preserved. Duplicate ids are not rejected here; the session
/// constructor does that.
///
/// # Errors
///
/// Returns `SourceError::Io` if the file cannot be read, `Manifest` if it is
/// not valid TOML of the expected shape, and `EmptyId` if an entry has a
/// blank id.
pub fn load_manifest(path: &Path) -> Result<Vec<ImageRef>, SourceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_owned(),
        source,
    })?;
    let manifest: Manifest = toml::from_str(&raw).map_err(|source| SourceError::Manifest {
        path: path.to_owned(),
        source,
    })?;
    if let Some(index) = manifest.images.iter().position(|i| i.id.trim().is_empty()) {
        return Err(SourceError::EmptyId {
            path: path.to_owned(),
            index,
        });
    }
    Ok(manifest.images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
