//! Search query construction and execution.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Search endpoint returning result markup.
const SEARCH_ENDPOINT: &str = "https://www.youtube.com/results";

/// Phrase embedded (quoted) in every query to bias results toward
/// label-provided uploads.
const PROVIDED_PHRASE: &str = "\"Provided+to+YouTube\"";

/// A validated search query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    /// Bare song title.
    pub title: String,
    /// Title and artist joined by whitespace; equals `title` when no artist
    /// was given.
    pub title_and_artist: String,
    /// Expected track length enabling the result duration filter.
    pub expected_duration_secs: Option<u32>,
}

impl SearchQuery {
    /// Build a query. The title is required; an absent or empty artist
    /// leaves `title_and_artist` equal to the title.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTitle`] for an empty title.
    pub fn new(
        title: &str,
        artist: Option<&str>,
        expected_duration_secs: Option<u32>,
    ) -> Result<Self> {
        if title.is_empty() {
            return Err(Error::MissingTitle);
        }
        let title_and_artist = match artist {
            Some(artist) if !artist.is_empty() => format!("{title} {artist}"),
            _ => title.to_string(),
        };
        Ok(Self {
            title: title.to_string(),
            title_and_artist,
            expected_duration_secs,
        })
    }

    /// The fixed-template search URL: the quoted bias phrase followed by the
    /// whitespace-split, `+`-joined search terms.
    #[must_use]
    pub fn search_url(&self) -> String {
        let terms = self
            .title_and_artist
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("+");
        format!("{SEARCH_ENDPOINT}?search_query={PROVIDED_PHRASE}+{terms}")
    }
}

/// Fetch the raw search-result markup for a query.
///
/// The body is returned as text for line-oriented scraping; it is never
/// parsed as a document tree.
///
/// # Errors
///
/// Returns [`Error::HttpStatus`] on a non-success status and transport
/// errors otherwise.
pub fn fetch_results(client: &Client, query: &SearchQuery) -> Result<String> {
    let url = query.search_url();
    debug!("searching url: {url}");

    let response = client
        .get(&url)
        .header(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            url,
        });
    }
    Ok(response.text()?)
}
