//! Locating and bootstrapping the ffmpeg binary.
//!
//! Resolution does the minimum work necessary: a binary already answering on
//! PATH wins, then a previously bootstrapped copy in the per-user cache
//! directory, and only then the platform package download. The cache
//! directory is shared between processes without locking; two processes
//! bootstrapping at the same time may race on the download and extraction
//! (acceptable for a one-at-a-time command-line tool).

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::time::Instant;
use std::{env, fs, io};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::archive::extract_zip;
use crate::download::download_to_file;
use crate::error::{Error, Result};

/// Substring expected in the output of `ffmpeg -version`.
const VERSION_MARKER: &str = "ffmpeg version";

/// Base name of the binary being resolved.
const BINARY_NAME: &str = "ffmpeg";

/// Archive URL for the single supported download platform.
const WINDOWS_PACKAGE_URL: &str =
    "https://ffmpeg.zeranoe.com/builds/win64/static/ffmpeg-4.1-win64-static.zip";

/// Name of the downloaded archive inside the cache directory.
const PACKAGE_FILENAME: &str = "ffmpeg.zip";

/// Per-user cache directory holding the bootstrapped binary.
///
/// # Errors
///
/// Fails when no home directory can be determined for the current user.
pub fn default_cache_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".songfetch"))
        .ok_or_else(|| Error::Io(io::Error::other("no home directory for current user")))
}

/// Resolves a runnable ffmpeg, bootstrapping it on demand.
///
/// The result is memoized per resolver; callers keep one resolver alive for
/// the process so the resolution work runs at most once. The on-disk cache
/// directory persists across processes and is consulted before any download.
#[derive(Debug)]
pub struct FfmpegResolver {
    cache_dir: PathBuf,
    show_progress: bool,
    resolved: OnceLock<PathBuf>,
}

impl FfmpegResolver {
    /// Resolver over the given cache directory.
    #[must_use]
    pub const fn new(cache_dir: PathBuf, show_progress: bool) -> Self {
        Self {
            cache_dir,
            show_progress,
            resolved: OnceLock::new(),
        }
    }

    /// Resolve the binary, downloading and unpacking the platform package
    /// when neither PATH nor the cache has one.
    ///
    /// # Errors
    ///
    /// Transport and archive failures abort resolution; an unsupported
    /// platform yields the unrecoverable [`Error::UnsupportedPlatform`].
    /// Nothing is retried — a fresh call starts the whole chain over.
    pub fn resolve(&self) -> Result<PathBuf> {
        if let Some(found) = self.resolved.get() {
            return Ok(found.clone());
        }

        let started = Instant::now();
        let location = self.resolve_uncached()?;
        debug!("ffmpeg resolution took {:?}", started.elapsed());

        Ok(self.resolved.get_or_init(|| location).clone())
    }

    fn resolve_uncached(&self) -> Result<PathBuf> {
        if probe_path_binary() {
            debug!("found ffmpeg on PATH");
            return Ok(PathBuf::from(BINARY_NAME));
        }

        fs::create_dir_all(&self.cache_dir)?;
        if let Some(cached) = find_in_cache(&self.cache_dir) {
            debug!("found cached ffmpeg at {}", cached.display());
            return Ok(cached);
        }

        self.bootstrap()?;
        find_in_cache(&self.cache_dir)
            .ok_or_else(|| Error::FfmpegNotFound(self.cache_dir.clone()))
    }

    /// Download and unpack the platform package into the cache directory.
    fn bootstrap(&self) -> Result<()> {
        let url = platform_package_url()?;
        let archive_path = self.cache_dir.join(PACKAGE_FILENAME);

        info!("downloading ffmpeg from {url}");
        let client = reqwest::blocking::Client::new();
        download_to_file(&client, url, &archive_path, self.show_progress)?;

        extract_zip(&archive_path, &self.cache_dir)?;
        // On extraction failure the archive stays behind for diagnosis.
        fs::remove_file(&archive_path)?;
        Ok(())
    }
}

/// `true` when a PATH-resolvable `ffmpeg` answers the version query.
fn probe_path_binary() -> bool {
    Command::new(BINARY_NAME)
        .arg("-version")
        .output()
        .map(|output| {
            let mut combined = output.stdout;
            combined.extend_from_slice(&output.stderr);
            String::from_utf8_lossy(&combined).contains(VERSION_MARKER)
        })
        .unwrap_or(false)
}

/// Walk the cache directory for a file whose extension-stripped base name is
/// the binary name and whose extension is empty or a platform-executable
/// one.
fn find_in_cache(cache_dir: &Path) -> Option<PathBuf> {
    WalkDir::new(cache_dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            let path = entry.path();
            let stem = path.file_stem().and_then(|s| s.to_str());
            let extension = path.extension().and_then(|s| s.to_str());
            stem == Some(BINARY_NAME) && matches!(extension, None | Some("exe"))
        })
        .map(walkdir::DirEntry::into_path)
}

/// Archive URL for the running platform.
///
/// # Errors
///
/// Returns [`Error::UnsupportedPlatform`] when no download source exists;
/// there is no retry or fallback for this condition.
fn platform_package_url() -> Result<&'static str> {
    if cfg!(target_os = "windows") {
        Ok(WINDOWS_PACKAGE_URL)
    } else {
        Err(Error::UnsupportedPlatform {
            os: env::consts::OS,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_find_in_cache_matches_bare_and_exe_names() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("ffmpeg-4.1-win64-static/bin");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("ffmpeg.exe"), b"").unwrap();

        let found = find_in_cache(dir.path()).unwrap();
        assert_eq!(found, nested.join("ffmpeg.exe"));
    }

    #[test]
    fn test_find_in_cache_matches_extensionless() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ffmpeg"), b"").unwrap();
        assert!(find_in_cache(dir.path()).is_some());
    }

    #[test]
    fn test_find_in_cache_rejects_other_names_and_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ffmpeg.txt"), b"").unwrap();
        fs::write(dir.path().join("ffprobe.exe"), b"").unwrap();
        fs::write(dir.path().join("ffmpeg2"), b"").unwrap();
        assert!(find_in_cache(dir.path()).is_none());
    }

    #[test]
    fn test_find_in_cache_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(find_in_cache(dir.path()).is_none());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_platform_package_url_unsupported_elsewhere() {
        let err = platform_package_url().err().unwrap();
        assert!(matches!(err, Error::UnsupportedPlatform { .. }));
        assert!(err.is_unrecoverable());
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_platform_package_url_windows() {
        assert!(platform_package_url().is_ok());
    }
}
