//! Songfetch Core Library
//!
//! This crate finds a song on YouTube from a title (and optionally an artist
//! and expected duration), picks the best-matching search result, downloads
//! the best audio-only stream, and converts it to mp3:
//! - Line-oriented scraping of search-result markup into track candidates
//! - Duration filtering and fuzzy-title selection of the best match
//! - Audio stream resolution and streaming download with progress display
//! - ffmpeg bootstrap (PATH probe, local cache, platform package download)
//! - Safe zip unpacking for the downloaded encoder package
//!
//! The pipeline is synchronous and sequential; a long-running host keeps one
//! [`SongFetcher`] alive and calls [`SongFetcher::fetch`] per song.

pub mod archive;
pub mod config;
pub mod convert;
pub mod download;
pub mod error;
pub mod ffmpeg;
pub mod fetch;
pub mod scrape;
pub mod search;
pub mod select;
pub mod stream;

pub use archive::extract_zip;
pub use config::FetchOptions;
pub use convert::convert_to_mp3;
pub use download::{download_audio, download_to_file, pick_best_audio};
pub use error::{Error, Result};
pub use ffmpeg::{FfmpegResolver, default_cache_dir};
pub use fetch::{SongFetcher, sanitize_stem_part};
pub use scrape::{Candidate, scrape_results, text_between};
pub use search::{SearchQuery, fetch_results};
pub use select::{DURATION_TOLERANCE_SECS, select_best_match};
pub use stream::{AudioFormat, RustyYtdlResolver, StreamResolver};
