//! End-to-end fetch orchestration.

use std::path::PathBuf;

use regex::Regex;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::FetchOptions;
use crate::convert::convert_to_mp3;
use crate::download::download_audio;
use crate::error::Result;
use crate::ffmpeg::{FfmpegResolver, default_cache_dir};
use crate::scrape::scrape_results;
use crate::search::{SearchQuery, fetch_results};
use crate::select::select_best_match;
use crate::stream::{RustyYtdlResolver, StreamResolver};

/// Orchestrates search, selection, retrieval, and conversion.
///
/// Keep one fetcher alive for the process: the ffmpeg resolution it owns is
/// memoized, so repeated fetches pay the bootstrap cost at most once.
pub struct SongFetcher<R: StreamResolver = RustyYtdlResolver> {
    client: Client,
    resolver: R,
    ffmpeg: FfmpegResolver,
}

impl SongFetcher<RustyYtdlResolver> {
    /// Fetcher with the production stream resolver and the default per-user
    /// cache directory.
    ///
    /// # Errors
    ///
    /// Fails when the cache directory cannot be determined.
    pub fn new(show_progress: bool) -> Result<Self> {
        Ok(Self::with_resolver(
            RustyYtdlResolver::new(),
            default_cache_dir()?,
            show_progress,
        ))
    }
}

impl<R: StreamResolver> SongFetcher<R> {
    /// Fetcher with a custom stream resolver and cache directory.
    #[must_use]
    pub fn with_resolver(resolver: R, cache_dir: PathBuf, show_progress: bool) -> Self {
        Self {
            client: Client::new(),
            resolver,
            ffmpeg: FfmpegResolver::new(cache_dir, show_progress),
        }
    }

    /// Fetch one song and return the path of the saved mp3.
    ///
    /// The saved name is `Artist - Title.mp3` (bare title without an
    /// artist), each part sanitized by [`sanitize_stem_part`]. With
    /// `skip_download` set, the name is resolved and returned without
    /// retrieving or converting anything.
    ///
    /// # Errors
    ///
    /// Every stage reports its own failure: title validation, the search
    /// transport, empty selection, stream resolution, retrieval, ffmpeg
    /// bootstrap, and conversion. Nothing is retried.
    pub fn fetch(&self, options: &FetchOptions) -> Result<PathBuf> {
        let query = SearchQuery::new(
            &options.title,
            options.artist.as_deref(),
            options.expected_duration_secs,
        )?;
        let stem = output_stem(&options.title, options.artist.as_deref());

        let video_id = self.find_video_id(&query)?;
        info!("best match for {}: {video_id}", query.title_and_artist);

        if !options.skip_download {
            let ffmpeg = self.ffmpeg.resolve()?;
            let downloaded = download_audio(
                &self.resolver,
                &self.client,
                &video_id,
                &stem,
                options.show_progress,
            )?;
            convert_to_mp3(&ffmpeg, &downloaded)?;
        }

        Ok(PathBuf::from(format!("{stem}.mp3")))
    }

    /// Scrape the search results for a query and pick the winning video id.
    fn find_video_id(&self, query: &SearchQuery) -> Result<String> {
        let body = fetch_results(&self.client, query)?;
        let candidates = scrape_results(&body);
        debug!("{} candidate tracks scraped", candidates.len());
        select_best_match(
            &candidates,
            &query.title,
            &query.title_and_artist,
            query.expected_duration_secs,
        )
    }
}

/// Strip characters that commonly break filenames from one stem part:
/// `/` becomes `-`, anything else outside `[A-Za-z0-9_-]` is dropped.
#[must_use]
pub fn sanitize_stem_part(part: &str) -> String {
    let part = part.replace('/', "-");
    match Regex::new("[^A-Za-z0-9_-]") {
        Ok(illegal) => illegal.replace_all(&part, "").into_owned(),
        Err(_) => part,
    }
}

/// `Artist - Title` stem with each part sanitized; the bare sanitized title
/// when no artist was given.
fn output_stem(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(artist) if !artist.is_empty() => {
            format!(
                "{} - {}",
                sanitize_stem_part(artist),
                sanitize_stem_part(title)
            )
        }
        _ => sanitize_stem_part(title),
    }
}
