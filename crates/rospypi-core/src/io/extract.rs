//! Archive extraction module
//!
//! Snapshot archives from code hosts wrap the whole tree in one synthetic
//! top-level folder (`<repo>-<version>/`). Extraction strips that folder and
//! can narrow the output to one subtree, rebased to the destination root.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::FetchError;

/// Information about an extracted file
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Path relative to extraction root
    pub relative_path: PathBuf,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Whether this is an executable
    pub is_executable: bool,
}

/// Extract a snapshot archive into `dest_dir`.
///
/// The first path component of every entry is dropped. With `subdir`, only
/// entries below `subdir` are extracted, with `subdir` removed from their
/// path; everything else is skipped. Directories are created idempotently
/// and files always overwrite whatever is on disk.
///
/// # Errors
///
/// Returns [`FetchError::Archive`] if the archive cannot be read or contains
/// a path that escapes the destination, and [`FetchError::Io`] on write
/// failures.
pub fn extract(
    archive_path: &Path,
    dest_dir: &Path,
    subdir: Option<&Path>,
) -> Result<Vec<ExtractedFile>, FetchError> {
    let archive_error = |e: zip::result::ZipError| FetchError::Archive {
        path: archive_path.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(archive_error)?;
    let mut extracted_files = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_error)?;
        let Some(enclosed) = entry.enclosed_name() else {
            return Err(FetchError::Archive {
                path: archive_path.to_path_buf(),
                message: format!("Invalid path in archive: {}", entry.name()),
            });
        };

        // Drop the synthetic "<repo>-<version>/" folder
        let stripped: PathBuf = enclosed.components().skip(1).collect();

        let relative_path = match subdir {
            Some(sub) => match stripped.strip_prefix(sub) {
                Ok(rest) => rest.to_path_buf(),
                Err(_) => continue,
            },
            None => stripped,
        };

        let absolute_path = dest_dir.join(&relative_path);

        if entry.is_dir() {
            fs::create_dir_all(&absolute_path)?;
            continue;
        }

        // A file standing exactly where the selected subtree should be
        if relative_path.as_os_str().is_empty() {
            continue;
        }

        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut outfile = File::create(&absolute_path)?;
        io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        let is_executable = if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&absolute_path, fs::Permissions::from_mode(mode & 0o7777))?;
            mode & 0o111 != 0
        } else {
            false
        };
        #[cfg(not(unix))]
        let is_executable = false;

        extracted_files.push(ExtractedFile {
            relative_path,
            absolute_path,
            is_executable,
        });
    }

    tracing::debug!(
        archive = %archive_path.display(),
        dest = %dest_dir.display(),
        files = extracted_files.len(),
        "extracted"
    );

    Ok(extracted_files)
}
