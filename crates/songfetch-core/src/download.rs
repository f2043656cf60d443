//! Streaming byte retrieval with optional progress mirroring.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::stream::{AudioFormat, StreamResolver};

/// Copy buffer size for the download loop.
const COPY_BUF_SIZE: usize = 64 * 1024;

/// Download the best audio-only stream of `video_id` to `<stem>.<ext>`,
/// returning the written path.
///
/// The stem is used exactly as supplied; sanitizing it is the caller's
/// concern.
///
/// # Errors
///
/// Returns [`Error::NoAudioAvailable`] when no video-free format exists,
/// and transport or status errors from the retrieval itself. A partially
/// written file is left on disk for the caller to see.
pub fn download_audio<R: StreamResolver>(
    resolver: &R,
    client: &Client,
    video_id: &str,
    stem: &str,
    show_progress: bool,
) -> Result<PathBuf> {
    let formats = resolver.available_formats(video_id)?;
    let best = pick_best_audio(&formats)
        .ok_or_else(|| Error::NoAudioAvailable(video_id.to_string()))?;
    let url = resolver.download_url(video_id, best)?;
    debug!("downloading {url}");

    let path = PathBuf::from(format!("{stem}.{}", best.extension));
    debug!("downloading {video_id} to {}", path.display());
    download_to_file(client, &url, &path, show_progress)?;
    Ok(path)
}

/// The format with the highest audio bitrate among those carrying no video
/// encoding, if any. A first-seen format keeps its place on bitrate ties.
#[must_use]
pub fn pick_best_audio(formats: &[AudioFormat]) -> Option<&AudioFormat> {
    let mut best: Option<&AudioFormat> = None;
    let mut best_bitrate = 0;
    for format in formats {
        if !format.has_video && format.audio_bitrate > best_bitrate {
            best_bitrate = format.audio_bitrate;
            best = Some(format);
        }
    }
    best
}

/// Stream `url` into `path`, mirroring bytes to a progress bar when enabled.
///
/// Returns the number of bytes written. A non-success status aborts with
/// [`Error::HttpStatus`]; whatever was already written stays on disk.
pub fn download_to_file(
    client: &Client,
    url: &str,
    path: &Path,
    show_progress: bool,
) -> Result<u64> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let progress = show_progress.then(|| byte_progress_bar(response.content_length()));

    let mut reader = response;
    let mut file = fs::File::create(path)?;
    let mut buf = [0_u8; COPY_BUF_SIZE];
    let mut written = 0_u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])?;
        written += n as u64;
        if let Some(pb) = &progress {
            pb.inc(n as u64);
        }
    }
    if let Some(pb) = &progress {
        pb.finish();
    }

    debug!("wrote {written} bytes to {}", path.display());
    Ok(written)
}

/// A byte-sized progress bar, degrading to a plain byte counter when the
/// response declares no usable content length.
fn byte_progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) if len > 0 => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {bytes}/{total_bytes} {bytes_per_sec} eta {eta}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        }
        _ => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} {bytes} {bytes_per_sec}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MockStreamResolver;

    fn format(bitrate: u32, has_video: bool, extension: &str) -> AudioFormat {
        AudioFormat {
            audio_bitrate: bitrate,
            has_video,
            extension: extension.to_string(),
            url: format!("https://cdn.example/{bitrate}"),
        }
    }

    #[test]
    fn test_pick_best_audio_highest_bitrate_without_video() {
        let formats = vec![
            format(128, false, "webm"),
            format(256, true, "mp4"),
            format(160, false, "m4a"),
        ];
        let best = pick_best_audio(&formats);
        assert_eq!(best.map(|f| f.audio_bitrate), Some(160));
    }

    #[test]
    fn test_pick_best_audio_ignores_zero_bitrate() {
        let formats = vec![format(0, false, "webm")];
        assert!(pick_best_audio(&formats).is_none());
    }

    #[test]
    fn test_pick_best_audio_first_wins_ties() {
        let mut a = format(128, false, "webm");
        a.url = "first".to_string();
        let mut b = format(128, false, "m4a");
        b.url = "second".to_string();
        let formats = [a, b];
        let best = pick_best_audio(&formats);
        assert_eq!(best.map(|f| f.url.as_str()), Some("first"));
    }

    #[test]
    fn test_download_audio_fails_without_audio_only_format() {
        let mut resolver = MockStreamResolver::new();
        resolver
            .expect_available_formats()
            .returning(|_| Ok(vec![format(256, true, "mp4")]));
        resolver.expect_download_url().never();

        let client = Client::new();
        let result = download_audio(&resolver, &client, "vid123", "stem", false);
        assert!(matches!(result, Err(Error::NoAudioAvailable(id)) if id == "vid123"));
    }

    #[test]
    fn test_download_audio_propagates_resolver_failure() {
        let mut resolver = MockStreamResolver::new();
        resolver
            .expect_available_formats()
            .returning(|id| Err(Error::VideoInfo(format!("{id}: gone"))));

        let client = Client::new();
        let result = download_audio(&resolver, &client, "vid123", "stem", false);
        assert!(matches!(result, Err(Error::VideoInfo(_))));
    }
}
