//! Best-candidate selection among scraped search results.

use strsim::jaro_winkler;
use tracing::debug;

use crate::error::{Error, Result};
use crate::scrape::Candidate;

/// Maximum deviation, in seconds, between a candidate's duration and the
/// expected duration before the candidate is discarded. The cutoff is
/// strict: a deviation of exactly this many seconds is still accepted.
pub const DURATION_TOLERANCE_SECS: u32 = 20;

/// Pick the winning video id.
///
/// When an expected duration is given, candidates outside
/// [`DURATION_TOLERANCE_SECS`] are dropped first; the winner is always drawn
/// from the filtered set. Survivors are scored by Jaro-Winkler similarity
/// between their title and each of `title` and `title_and_artist`, keeping
/// the better of the two.
///
/// Ties on the maximum score go to the candidate discovered latest: the scan
/// runs from the end of the sequence and only a strictly greater score
/// displaces the current winner. Downstream behavior depends on this exact
/// rule; do not replace it with a first-match scan.
///
/// # Errors
///
/// Returns [`Error::NoMatchingVideos`] when no candidate survives, whether
/// the scrape produced nothing or the duration filter removed everything.
pub fn select_best_match(
    candidates: &[Candidate],
    title: &str,
    title_and_artist: &str,
    expected_duration_secs: Option<u32>,
) -> Result<String> {
    let filtered: Vec<&Candidate> = match expected_duration_secs {
        Some(expected) => candidates
            .iter()
            .filter(|candidate| {
                let keep =
                    candidate.duration_secs.abs_diff(expected) <= DURATION_TOLERANCE_SECS;
                if !keep {
                    debug!(
                        "'{}' duration ({}s) is different than expected ({}s)",
                        candidate.title, candidate.duration_secs, expected
                    );
                }
                keep
            })
            .collect(),
        None => candidates.iter().collect(),
    };

    if filtered.is_empty() {
        return Err(Error::NoMatchingVideos);
    }

    let mut best_score = 0.0_f64;
    let mut best_index = 0_usize;
    for (index, candidate) in filtered.iter().enumerate().rev() {
        let score = jaro_winkler(title, &candidate.title)
            .max(jaro_winkler(title_and_artist, &candidate.title));
        debug!("{} | {} : {:.3}", title, candidate.title, score);
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }

    debug!(
        "best track for {}: {} ({})",
        title_and_artist, filtered[best_index].title, filtered[best_index].id
    );
    Ok(filtered[best_index].id.clone())
}
