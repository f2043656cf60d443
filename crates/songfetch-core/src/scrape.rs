//! Line-oriented scraping of search-result markup.
//!
//! The search endpoint returns presentation markup, not a stable schema, so
//! this stays a line-scan heuristic. It lives behind this module boundary so
//! it can be swapped for a structured parser without touching selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker carried by machine-submitted (label-provided) uploads.
const PROVIDED_MARKER: &str = "Provided to YouTube";

/// Marker for the title-link container of a result line.
const TITLE_LINK_MARKER: &str = "yt-lockup-title";

/// A single scraped search result.
///
/// Candidates are transient: created per scrape, discarded after selection.
/// Their only identity is the order in which they were discovered, which
/// selection depends on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    /// Display title exactly as scraped, unsanitized.
    pub title: String,
    /// Opaque video id used to resolve a downloadable stream.
    pub id: String,
    /// Track length parsed from an `MM:SS` duration field.
    pub duration_secs: u32,
}

/// The substring strictly between the first occurrence of `start` and the
/// next occurrence of `end` after it.
///
/// A missing delimiter (either one) yields `""`; callers treat that as an
/// ordinary rejected window, not an error.
#[must_use]
pub fn text_between<'a>(line: &'a str, start: &str, end: &str) -> &'a str {
    let Some(s) = line.find(start) else {
        return "";
    };
    let after = &line[s + start.len()..];
    match after.find(end) {
        Some(e) => &after[..e],
        None => "",
    }
}

/// Parse an `MM:SS` duration field into seconds.
///
/// Anything other than exactly two numeric groups is rejected.
fn parse_duration_field(field: &str) -> Option<u32> {
    let mut parts = field.split(':');
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(minutes * 60 + seconds)
}

/// Scrape raw search-result markup into ordered candidates.
///
/// A trimmed line is considered only when it carries both
/// [`PROVIDED_MARKER`] and [`TITLE_LINK_MARKER`]; the rest of the line is
/// free-form markup and is not otherwise validated. A line without a
/// well-formed duration field is skipped whole — no partial candidate.
/// Output order matches source-line order. An empty result is not an error
/// at this layer; the selector decides what that means.
#[must_use]
pub fn scrape_results(body: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if !line.contains(PROVIDED_MARKER) || !line.contains(TITLE_LINK_MARKER) {
            continue;
        }

        let Some(duration_secs) = parse_duration_field(text_between(line, "Duration: ", "."))
        else {
            continue;
        };

        let id = text_between(line, "/watch?v=", "\"").to_string();
        let title = text_between(line, "title=\"", "\"").to_string();
        debug!("possible track: {title} ({id}): {duration_secs}s");

        candidates.push(Candidate {
            title,
            id,
            duration_secs,
        });
    }
    candidates
}
