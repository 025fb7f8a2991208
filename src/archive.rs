//! Package archive extraction

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::error::{PublishError, Result};

/// Extract the gzip tarball `archive` into `target_dir`, dropping each
/// entry's top-level directory. The archive file is removed whether or not
/// extraction succeeds.
pub fn extract_and_remove(archive: &Path, target_dir: &Path) -> Result<()> {
    let extracted = extract_stripped(archive, target_dir);

    let removed = match fs::remove_file(archive) {
        Ok(()) => {
            debug!(archive = %archive.display(), "archive removed");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    };

    extracted?;
    removed?;
    Ok(())
}

fn extract_stripped(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let file = File::open(archive_path).map_err(|e| {
        PublishError::package(format!("cannot open {}: {}", archive_path.display(), e))
    })?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let entries = archive
        .entries()
        .map_err(|e| invalid_archive(archive_path, e))?;

    let mut unpacked = 0usize;
    for entry in entries {
        let mut entry = entry.map_err(|e| invalid_archive(archive_path, e))?;
        let entry_path = entry
            .path()
            .map_err(|e| invalid_archive(archive_path, e))?
            .into_owned();

        let Some(relative) = strip_first_component(&entry_path)? else {
            continue;
        };

        let destination = target_dir.join(&relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        entry
            .unpack(&destination)
            .map_err(|e| invalid_archive(archive_path, e))?;
        unpacked += 1;
    }

    debug!(
        archive = %archive_path.display(),
        target = %target_dir.display(),
        entries = unpacked,
        "archive extracted"
    );
    Ok(())
}

/// Entry path below its top-level directory; `None` for the directory itself.
///
/// Absolute paths and `..` components are rejected so nothing lands outside
/// the target directory.
fn strip_first_component(path: &Path) -> Result<Option<PathBuf>> {
    let mut normal = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normal.push(part),
            Component::CurDir => {}
            _ => {
                return Err(PublishError::package(format!(
                    "archive entry escapes the target directory: {}",
                    path.display()
                )))
            }
        }
    }

    if normal.len() < 2 {
        return Ok(None);
    }

    Ok(Some(normal[1..].iter().collect()))
}

fn invalid_archive(archive: &Path, e: io::Error) -> PublishError {
    PublishError::package(format!("cannot extract {}: {}", archive.display(), e))
}
