//! Zip archive extraction with path-traversal protection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Extract every entry of the `src` archive into `dest`, returning the
/// created paths in archive order.
///
/// Entry paths are resolved against `dest`; an entry that would land outside
/// it (a zip-slip entry) fails extraction immediately with
/// [`Error::IllegalArchivePath`], before any of that entry's content is
/// written. Entries already extracted by the same call are left on disk.
/// Directory entries create directories, file entries create their parents
/// as needed, and declared unix permission bits are preserved where the
/// platform supports them.
pub fn extract_zip(src: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = fs::File::open(src)?;
    let mut archive = ZipArchive::new(file)?;

    let mut extracted = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        let out_path = match entry.enclosed_name() {
            Some(relative) => dest.join(relative),
            None => return Err(Error::IllegalArchivePath(dest.join(entry.name()))),
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out_file = fs::File::create(&out_path)?;
            io::copy(&mut entry, &mut out_file)?;
            set_unix_mode(&out_path, entry.unix_mode())?;
        }

        debug!("extracted {}", out_path.display());
        extracted.push(out_path);
    }
    Ok(extracted)
}

#[cfg(unix)]
fn set_unix_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_unix_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}
