//! Fetch configuration.
//!
//! All settings are passed explicitly through each entry point; there is no
//! process-wide mutable state. Log verbosity is the host application's
//! concern and is not configured here.

use serde::{Deserialize, Serialize};

/// Options controlling a single song fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FetchOptions {
    /// Song title to search for. Required.
    pub title: String,

    /// Artist name; when present it biases matching and prefixes the saved
    /// filename (`Artist - Title.mp3`).
    #[serde(default)]
    pub artist: Option<String>,

    /// Expected track length in seconds; enables the search-result duration
    /// filter. Absent means no filtering at all, not a wider tolerance.
    #[serde(default)]
    pub expected_duration_secs: Option<u32>,

    /// Mirror download bytes to a progress bar on stderr.
    #[serde(default)]
    pub show_progress: bool,

    /// Resolve the output filename without downloading or converting.
    #[serde(default)]
    pub skip_download: bool,
}

impl FetchOptions {
    /// Options for a bare title search with everything else defaulted.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let options = FetchOptions::new("Paranoid Android");
        assert_eq!(options.title, "Paranoid Android");
        assert_eq!(options.artist, None);
        assert_eq!(options.expected_duration_secs, None);
        assert!(!options.show_progress);
        assert!(!options.skip_download);
    }

    #[test]
    fn test_default_title_is_empty() {
        assert!(FetchOptions::default().title.is_empty());
    }
}
