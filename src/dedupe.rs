use url::Url;

use crate::records::{JobRecord, RunState};

/// Base used to resolve relative listing hrefs.
pub const SITE_BASE: &str = "https://www.linkedin.com";

/// Identity used to collapse duplicate listings across pages.
///
/// Anonymous searches serve an overlapping top-N window for every offset, so
/// the same listing arrives many times; this key is what makes that quirk
/// harmless.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Normalized listing URL
    Url(String),
    /// Fallback when the card carried no URL: (title, company, location)
    Fields(String, String, String),
}

impl DedupKey {
    pub fn for_record(record: &JobRecord) -> Self {
        let normalized = normalize_listing_url(&record.url, SITE_BASE);
        if normalized.is_empty() {
            DedupKey::Fields(
                record.title.clone(),
                record.company.clone(),
                record.location.clone(),
            )
        } else {
            DedupKey::Url(normalized)
        }
    }
}

/// Normalizes a listing URL for identity comparison: resolves relative hrefs
/// against the site base and strips the query (tracking parameters) and
/// fragment.
pub fn normalize_listing_url(raw: &str, base: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let resolved = match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(base).and_then(|b| b.join(raw))
        }
        Err(e) => Err(e),
    };

    match resolved {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => {
            // Not parseable as a URL at all; use the raw text as identity
            // rather than dropping the record
            raw.to_string()
        }
    }
}

/// Merges one page's records into the run state, keyed by [`DedupKey`].
///
/// First occurrence wins and is kept verbatim; later duplicates are dropped
/// without any field merging. Returns the number of net-new records, which
/// feeds the anonymous-mode early-stop heuristic.
pub fn merge(state: &mut RunState, batch: Vec<JobRecord>) -> usize {
    let mut added = 0;

    for record in batch {
        if record.is_noise() {
            ::log::debug!("Dropping noise record (no title, no URL)");
            continue;
        }

        let key = DedupKey::for_record(&record);
        if state.seen.contains(&key) {
            ::log::trace!("Duplicate listing skipped: {:?}", key);
            continue;
        }

        state.seen.insert(key);
        state.records.push(record);
        added += 1;
    }

    added
}
