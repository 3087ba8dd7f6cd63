//! Case archive extraction and directory listing.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{IngestionError, Result};

/// Extract every entry of the zip `archive` below `dest`.
///
/// Directories are created as needed and existing files are overwritten,
/// so extracting the same archive twice leaves the same tree. Returns the
/// number of files written.
pub fn unzip(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;
    std::fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| IngestionError::UnsafeEntry(entry.name().to_string()))?;
        let target = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        let bytes = io::copy(&mut entry, &mut out)?;
        debug!(entry = %target.display(), bytes = bytes, "Extracted archive entry");
        written += 1;
    }

    info!(
        archive = %archive.display(),
        dest = %dest.display(),
        files = written,
        "Extracted case archive"
    );
    Ok(written)
}

/// Names of the entries directly inside `dir`, files and directories alike,
/// sorted by byte order.
///
/// A name that is not valid UTF-8 fails with [`IngestionError::NonUtf8Name`]
/// rather than being listed under a lossy spelling.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| IngestionError::NonUtf8Name(entry.path().display().to_string()))?;
        names.push(name.to_string());
    }
    names.sort();

    debug!(dir = %dir.display(), count = names.len(), "Listed case directory");
    Ok(names)
}

/// First entry of a sorted listing: the genesis step of the case.
pub fn genesis_step<'a>(dir: &Path, files: &'a [String]) -> Result<&'a str> {
    files
        .first()
        .map(String::as_str)
        .ok_or_else(|| IngestionError::EmptyCase(dir.display().to_string()))
}
