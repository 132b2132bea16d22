use thiserror::Error;

/// Failures that can surface from a scrape run.
///
/// Per-page and per-record problems are absorbed inside the retry governor
/// and the extractor; only session-level and export-level failures reach the
/// caller as errors.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to open WebDriver session at {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("navigation failed: {0}")]
    Navigation(#[from] fantoccini::error::CmdError),

    #[error("invalid search parameters: {0}")]
    BadQuery(#[from] url::ParseError),

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Classification of a single failed network attempt, used by the retry
/// governor to pick between the bounded-retry and cooldown-retry paths.
#[derive(Debug)]
pub enum AttemptError {
    /// The page showed a verification challenge instead of content
    Blocked,

    /// Timeout or transient navigation failure; retryable cheaply
    Transient(ScrapeError),
}
