use scraper::{Html, Selector};

use crate::extract::collapse_text;

pub const DESCRIPTION_SELECTOR: &str = ".description__text, .show-more-less-html__markup";
const CRITERIA_ITEM_SELECTOR: &str = ".description__job-criteria-item";

/// Button labels and chrome that leak into the description container's text.
const BOILERPLATE_LINES: [&str; 6] = [
    "Show more",
    "Show less",
    "Apply",
    "Easy Apply",
    "Save",
    "Share",
];

/// Descriptions are capped so one verbose listing cannot bloat the export.
const MAX_DESCRIPTION_CHARS: usize = 3000;

/// Fields extracted from a single listing's own page.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JobDetail {
    pub description: String,
    pub seniority: String,
    pub employment_type: String,
}

/// Parses the listing detail page.
///
/// Everything is optional: a page missing the description container or the
/// criteria list yields empty strings for those fields, never an error.
pub fn extract_detail(html: &str) -> JobDetail {
    let doc = Html::parse_document(html);

    let mut detail = JobDetail {
        description: extract_description(&doc),
        ..JobDetail::default()
    };

    let criteria = Selector::parse(CRITERIA_ITEM_SELECTOR).unwrap();
    let label_sel = Selector::parse("h3").unwrap();
    let value_sel = Selector::parse("span").unwrap();

    for item in doc.select(&criteria) {
        let label = item
            .select(&label_sel)
            .next()
            .map(|el| collapse_text(&el).to_lowercase())
            .unwrap_or_default();
        let value = item
            .select(&value_sel)
            .next()
            .map(|el| collapse_text(&el))
            .unwrap_or_default();

        if label.contains("seniority") {
            detail.seniority = value;
        } else if label.contains("employment") {
            detail.employment_type = value;
        }
    }

    detail
}

fn extract_description(doc: &Html) -> String {
    let selector = Selector::parse(DESCRIPTION_SELECTOR).unwrap();
    let Some(container) = doc.select(&selector).next() else {
        return String::new();
    };

    // Drop button chrome line by line, then normalize whitespace per line
    let raw = container.text().collect::<Vec<_>>().join("\n");
    let cleaned = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !BOILERPLATE_LINES.contains(line))
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&cleaned, MAX_DESCRIPTION_CHARS)
}

/// Truncates on a char boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
