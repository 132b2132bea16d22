use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dedupe::DedupKey;

/// One job listing as extracted from a search results card (and optionally
/// enriched from the listing's own page).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Listing title
    pub title: String,

    /// Hiring company name
    pub company: String,

    /// Listing location as displayed
    pub location: String,

    /// Free-text relative posting date, e.g. "2 days ago"
    pub posted: String,

    /// Listing URL; may be relative or absolute as found in the markup
    pub url: String,

    /// Seniority level, filled from the detail page when enrichment runs
    pub seniority: String,

    /// Employment type, filled from the detail page when enrichment runs
    pub employment_type: String,

    /// Full description, filled only when enrichment runs
    pub description: String,
}

impl JobRecord {
    /// A record with neither a title nor a URL is extraction noise.
    pub fn is_noise(&self) -> bool {
        self.title.is_empty() && self.url.is_empty()
    }
}

/// Status of one fetched search results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// Page loaded and produced at least one card
    Ok,
    /// Page loaded but legitimately showed no cards
    Empty,
    /// Page showed an anti-bot challenge
    Blocked,
    /// Page failed to load within the retry budget
    TimedOut,
}

/// Records extracted from a single search results page.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub records: Vec<JobRecord>,
    pub status: PageStatus,
}

/// Accumulated state for one scrape run. Owned exclusively by the
/// orchestrator; created at run start and dropped when the run completes.
#[derive(Debug, Default)]
pub struct RunState {
    /// Deduplicated records in first-seen order
    pub records: Vec<JobRecord>,

    /// Dedup keys already accepted into `records`
    pub seen: HashSet<DedupKey>,

    /// Index of the page currently being processed
    pub page_index: usize,

    /// Whether an authenticated session is active for this run
    pub authenticated: bool,

    pub pages_attempted: u32,
    pub pages_succeeded: u32,
    pub captcha_hits: u32,
}

impl RunState {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            ..Self::default()
        }
    }
}
