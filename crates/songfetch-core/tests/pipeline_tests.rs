//! End-to-end discovery pipeline tests: raw search markup through scraping
//! and selection, without any network access.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use songfetch_core::{Error, SearchQuery, scrape_results, select_best_match};

/// A markup line shaped like a machine-submitted search result.
fn result_line(title: &str, id: &str, duration: &str) -> String {
    format!(
        r#"<div class="yt-lockup-title"><span>Provided to YouTube</span><a href="/watch?v={id}" title="{title}">{title}</a> - Duration: {duration}.</div>"#
    )
}

/// A markup line missing the machine-submitted marker.
fn plain_line(title: &str, id: &str, duration: &str) -> String {
    format!(
        r#"<div class="yt-lockup-title"><a href="/watch?v={id}" title="{title}">{title}</a> - Duration: {duration}.</div>"#
    )
}

fn select_for(
    body: &str,
    query: &SearchQuery,
) -> std::result::Result<String, Error> {
    let candidates = scrape_results(body);
    select_best_match(
        &candidates,
        &query.title,
        &query.title_and_artist,
        query.expected_duration_secs,
    )
}

#[test]
fn duration_filter_overrides_similarity() {
    // The second candidate matches the query verbatim but sits outside the
    // 20-second tolerance (251s vs 230s expected); the in-tolerance first
    // candidate must win whatever the scores say.
    let query = SearchQuery::new("Y", None, Some(230)).unwrap();
    let body = [
        "<div>unrelated noise line</div>".to_string(),
        result_line("X", "id_x", "03:45"),
        result_line("Y", "id_y", "04:11"),
    ]
    .join("\n");

    let winner = select_for(&body, &query).unwrap();
    assert_eq!(winner, "id_x");
}

#[test]
fn deviation_of_exactly_twenty_is_retained() {
    let query = SearchQuery::new("Y", None, Some(230)).unwrap();
    let body = result_line("Y", "id_y", "04:10"); // 250s, |250-230| = 20
    let winner = select_for(&body, &query).unwrap();
    assert_eq!(winner, "id_y");
}

#[test]
fn tied_similarity_selects_later_discovery() {
    // No duration filter; identical titles tie on score, so the candidate
    // scraped later must win.
    let query = SearchQuery::new("Creep", Some("Radiohead"), None).unwrap();
    let body = [
        result_line("Creep", "first", "03:58"),
        result_line("Creep", "second", "03:59"),
    ]
    .join("\n");

    let winner = select_for(&body, &query).unwrap();
    assert_eq!(winner, "second");
}

#[test]
fn no_marker_lines_fail_with_no_matching_videos() {
    let query = SearchQuery::new("Anything", None, None).unwrap();
    let body = [
        plain_line("Anything", "id1", "03:00"),
        "<div>Provided to YouTube but no title container</div>".to_string(),
    ]
    .join("\n");

    let err = select_for(&body, &query).err().unwrap();
    assert!(matches!(err, Error::NoMatchingVideos));
    assert_eq!(err.to_string(), "could not find any videos that matched");
}

#[test]
fn filter_that_empties_the_list_fails_the_same_way() {
    let query = SearchQuery::new("Song", None, Some(600)).unwrap();
    let body = result_line("Song", "id1", "03:00");
    assert!(matches!(
        select_for(&body, &query),
        Err(Error::NoMatchingVideos)
    ));
}

#[test]
fn scrape_then_select_uses_both_query_forms() {
    // The candidate title carries the artist, so only the title+artist form
    // scores it well; selection must still find it from the scraped markup.
    let query = SearchQuery::new("No Surprises", Some("Radiohead"), None).unwrap();
    let body = [
        result_line("No Surprises Radiohead", "wanted", "03:49"),
        result_line("interview about recording gear", "noise", "03:50"),
    ]
    .join("\n");

    let winner = select_for(&body, &query).unwrap();
    assert_eq!(winner, "wanted");
}
