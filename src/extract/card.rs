use scraper::{ElementRef, Html, Selector};

use crate::dedupe::{SITE_BASE, normalize_listing_url};
use crate::extract::collapse_text;
use crate::records::JobRecord;

/// Card container selectors, tried in order. The leading selector matches the
/// public (logged-out) results list; the rest cover the authenticated layout.
const CARD_SELECTORS: [&str; 3] = [
    "ul.jobs-search__results-list > li",
    ".job-search-card",
    ".base-card",
];

const TITLE_SELECTOR: &str = "h3.base-search-card__title, .job-card-list__title, h3";
const COMPANY_SELECTOR: &str = "h4.base-search-card__subtitle, .job-card-container__company-name, h4";
const LOCATION_SELECTOR: &str = ".job-search-card__location, .job-card-container__metadata-item";
const POSTED_SELECTOR: &str = "time, .job-search-card__listdate";
const LINK_SELECTOR: &str = "a.base-card__full-link, a[href*='/jobs/view/']";
const SENIORITY_BADGE: &str = ".job-search-card__seniority, .base-search-card__seniority";
const EMPLOYMENT_BADGE: &str = ".job-search-card__employment-type, .base-search-card__employment-type";

/// Parses job cards out of a search results page.
///
/// Every field read is tolerant: absent markup yields an empty string, never
/// a card failure. A card producing neither a title nor a URL is skipped as
/// extraction noise. A page with no cards yields an empty Vec; whether that
/// is a legitimate empty result or a block is decided by the caller from the
/// page classifiers, not here.
pub fn extract_jobs(html: &str) -> Vec<JobRecord> {
    let doc = Html::parse_document(html);

    let cards = select_cards(&doc);
    ::log::debug!("Found {} cards on page", cards.len());

    let mut jobs = Vec::with_capacity(cards.len());
    for card in cards {
        let record = JobRecord {
            title: first_text(&card, TITLE_SELECTOR),
            company: first_text(&card, COMPANY_SELECTOR),
            location: first_text(&card, LOCATION_SELECTOR),
            posted: first_text(&card, POSTED_SELECTOR),
            url: listing_url(&card),
            seniority: first_text(&card, SENIORITY_BADGE),
            employment_type: first_text(&card, EMPLOYMENT_BADGE),
            description: String::new(),
        };

        if record.is_noise() {
            ::log::trace!("Skipping unparsable card");
            continue;
        }
        jobs.push(record);
    }

    jobs
}

/// Picks the first card selector that matches anything on the page.
fn select_cards<'a>(doc: &'a Html) -> Vec<ElementRef<'a>> {
    for raw in CARD_SELECTORS {
        let selector = Selector::parse(raw).unwrap();
        let cards: Vec<ElementRef<'a>> = doc.select(&selector).collect();
        if !cards.is_empty() {
            return cards;
        }
    }
    Vec::new()
}

/// Text of the first element matching `selector`, or empty.
fn first_text(card: &ElementRef, selector: &str) -> String {
    let selector = Selector::parse(selector).unwrap();
    card.select(&selector)
        .next()
        .map(|el| collapse_text(&el))
        .unwrap_or_default()
}

/// The card's listing URL, normalized to an absolute URL without tracking
/// parameters. Empty when the card carries no usable link.
fn listing_url(card: &ElementRef) -> String {
    let selector = Selector::parse(LINK_SELECTOR).unwrap();
    let href = card
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .unwrap_or_default();

    normalize_listing_url(href, SITE_BASE)
}
