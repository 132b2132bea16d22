pub mod card;
pub mod detail;

#[cfg(test)]
mod tests;

use scraper::{Html, Selector};

pub use card::extract_jobs;
pub use detail::{JobDetail, extract_detail};

/// Page features that indicate the request was challenged rather than served
/// normal content.
const BLOCK_TEXT_MARKERS: [&str; 3] = [
    "Let us know you're not a robot",
    "unusual activity from your network",
    "Verify to continue",
];

const BLOCK_URL_MARKERS: [&str; 3] = ["captcha", "checkpoint/challenge", "/authwall"];

/// Selectors for the search results container. The site serves different
/// markup to public and authenticated sessions.
pub const RESULTS_CONTAINER: &str = "ul.jobs-search__results-list, .jobs-search-results-list";

/// Selectors for the "no matching jobs" banner on a legitimately empty page.
const NO_RESULTS_BANNER: &str =
    ".jobs-search-no-results-banner, .no-results, section.core-section-container--no-results";

/// Returns true when the loaded page is an anti-bot challenge rather than
/// search results. Checked on both the landing URL and the page body, since
/// the challenge sometimes renders in place without a redirect.
pub fn is_block_page(current_url: &str, html: &str) -> bool {
    let url_lower = current_url.to_lowercase();
    if BLOCK_URL_MARKERS.iter().any(|m| url_lower.contains(m)) {
        return true;
    }
    BLOCK_TEXT_MARKERS.iter().any(|m| html.contains(m))
}

/// Returns true when the page contains the search results container.
pub fn has_results_container(html: &str) -> bool {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(RESULTS_CONTAINER).unwrap();
    doc.select(&selector).next().is_some()
}

/// Returns true when the page explicitly reports zero matching jobs.
pub fn has_no_results_banner(html: &str) -> bool {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(NO_RESULTS_BANNER).unwrap();
    if doc.select(&selector).next().is_some() {
        return true;
    }
    html.contains("No matching jobs found")
}

/// Joins an element's text nodes into a single whitespace-normalized string.
pub(crate) fn collapse_text(element: &scraper::ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
