use crate::extract::{has_no_results_banner, has_results_container, is_block_page};

const RESULTS_URL: &str = "https://www.linkedin.com/jobs/search/?keywords=Sales&start=0";

#[test]
fn test_challenge_text_marks_page_blocked() {
    let html = "<html><body><h1>Let us know you're not a robot</h1></body></html>";
    assert!(is_block_page(RESULTS_URL, html));
}

#[test]
fn test_captcha_redirect_marks_page_blocked() {
    let html = "<html><body></body></html>";
    assert!(is_block_page(
        "https://www.linkedin.com/checkpoint/challenge/AgFy",
        html
    ));
    assert!(is_block_page("https://site.example/captcha?next=x", html));
}

#[test]
fn test_normal_results_page_not_blocked() {
    let html = r#"<ul class="jobs-search__results-list"><li>card</li></ul>"#;
    assert!(!is_block_page(RESULTS_URL, html));
    assert!(has_results_container(html));
}

#[test]
fn test_empty_page_distinguished_from_blocked() {
    // A legitimate zero-result page has the banner and no challenge marker.
    let html = r#"<div class="jobs-search-no-results-banner">No matching jobs found.</div>"#;
    assert!(!is_block_page(RESULTS_URL, html));
    assert!(has_no_results_banner(html));
    assert!(!has_results_container(html));
}

#[test]
fn test_no_results_text_fallback() {
    let html = "<html><body><p>No matching jobs found</p></body></html>";
    assert!(has_no_results_banner(html));
}
