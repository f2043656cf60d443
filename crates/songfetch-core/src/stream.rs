//! Stream resolution: turning a video id into downloadable audio formats.
//!
//! The resolver is a trait so selection and retrieval can be exercised
//! without network access; the production implementation wraps `rusty_ytdl`,
//! which exposes an async API, behind the crate's synchronous surface.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// One downloadable format advertised for a video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioFormat {
    /// Audio bitrate in kbit/s; 0 when the format carries no usable audio.
    pub audio_bitrate: u32,
    /// Whether the format also carries a video encoding.
    pub has_video: bool,
    /// Container extension for the saved file.
    pub extension: String,
    /// Direct, time-limited retrieval URL.
    pub url: String,
}

/// Resolves a video id to its available formats and their download URLs.
#[cfg_attr(test, mockall::automock)]
pub trait StreamResolver {
    /// List the formats available for `video_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VideoInfo`] when the video's metadata cannot be
    /// fetched.
    fn available_formats(&self, video_id: &str) -> Result<Vec<AudioFormat>>;

    /// Direct download URL for a chosen format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DownloadUrl`] when no URL can be produced.
    fn download_url(&self, video_id: &str, format: &AudioFormat) -> Result<String>;
}

/// Production resolver backed by `rusty_ytdl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustyYtdlResolver;

impl RustyYtdlResolver {
    /// Create a new resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run an async resolution future to completion from sync code.
    ///
    /// Reuses the ambient tokio runtime when one exists, otherwise spins up
    /// a dedicated one for the call.
    fn block_on<F, T>(video_id: &str, future: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(future))
        } else {
            let runtime = tokio::runtime::Runtime::new().map_err(|e| {
                Error::VideoInfo(format!("{video_id}: failed to create tokio runtime: {e}"))
            })?;
            runtime.block_on(future)
        }
    }

    async fn fetch_formats(video_id: &str) -> Result<Vec<AudioFormat>> {
        let video_url = format!("https://www.youtube.com/watch?v={video_id}");
        let video = rusty_ytdl::Video::new(&video_url)
            .map_err(|e| Error::VideoInfo(format!("{video_id}: {e}")))?;
        let info = video
            .get_info()
            .await
            .map_err(|e| Error::VideoInfo(format!("{video_id}: {e}")))?;
        debug!("{} formats available for {video_id}", info.formats.len());
        Ok(info.formats.iter().map(convert_format).collect())
    }
}

/// Map a `rusty_ytdl` format onto the fields this crate selects on.
fn convert_format(format: &rusty_ytdl::VideoFormat) -> AudioFormat {
    AudioFormat {
        audio_bitrate: format.audio_bitrate.unwrap_or(0) as u32,
        has_video: format.has_video,
        extension: format.mime_type.mime.subtype().as_str().to_string(),
        url: format.url.clone(),
    }
}

impl StreamResolver for RustyYtdlResolver {
    fn available_formats(&self, video_id: &str) -> Result<Vec<AudioFormat>> {
        Self::block_on(video_id, Self::fetch_formats(video_id))
    }

    fn download_url(&self, video_id: &str, format: &AudioFormat) -> Result<String> {
        if format.url.is_empty() {
            return Err(Error::DownloadUrl(format!(
                "no direct url for {video_id} ({} kbit/s {})",
                format.audio_bitrate, format.extension
            )));
        }
        Ok(format.url.clone())
    }
}
