//! Error types for Songfetch core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Songfetch core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A search title is required.
    #[error("a search title is required")]
    MissingTitle,

    /// No scraped result survived duration filtering and selection.
    #[error("could not find any videos that matched")]
    NoMatchingVideos,

    /// The chosen video exposes no audio-only format.
    #[error("no audio available for video {0}")]
    NoAudioAvailable(String),

    /// The stream resolution collaborator could not fetch video metadata.
    #[error("unable to fetch video info: {0}")]
    VideoInfo(String),

    /// The stream resolution collaborator could not produce a download URL.
    #[error("unable to get download url: {0}")]
    DownloadUrl(String),

    /// An HTTP response carried a non-success status.
    #[error("received status code {status} from {url}")]
    HttpStatus {
        /// Status code of the response.
        status: u16,
        /// URL the request was sent to.
        url: String,
    },

    /// Transport-level HTTP failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An archive entry would extract outside the destination directory.
    #[error("{0}: illegal file path")]
    IllegalArchivePath(PathBuf),

    /// The archive itself is unreadable or corrupt.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// No ffmpeg download source exists for the running platform.
    ///
    /// There is no retry or fallback for this condition; see
    /// [`Error::is_unrecoverable`].
    #[error("no ffmpeg download available for platform {os}")]
    UnsupportedPlatform {
        /// Operating system name reported by the toolchain.
        os: &'static str,
    },

    /// ffmpeg was bootstrapped but the binary is still not discoverable.
    #[error("ffmpeg not found under {0} after extraction")]
    FfmpegNotFound(PathBuf),

    /// ffmpeg exited unsuccessfully while transcoding.
    #[error("could not convert {path}: {stderr}")]
    ConversionFailed {
        /// Input file that was being converted.
        path: PathBuf,
        /// The encoder's stderr, verbatim.
        stderr: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// `true` for conditions that have no recovery path at all, as opposed
    /// to ordinary failures a caller might handle by picking different
    /// inputs. Callers decide whether these abort the process.
    #[must_use]
    pub const fn is_unrecoverable(&self) -> bool {
        matches!(self, Self::UnsupportedPlatform { .. })
    }
}
