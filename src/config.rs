use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What to search for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search keyword, e.g. "Sales"
    pub keyword: String,

    /// Location, e.g. "Singapore"
    pub location: String,

    /// Experience level filter codes, comma separated, e.g. "2,3,4"
    #[serde(default)]
    pub exp_levels: String,

    /// Industry filter codes, comma separated, e.g. "4,6,96"
    #[serde(default)]
    pub industries: String,

    /// Minimum salary band code (site-specific, "1".."9")
    #[serde(default)]
    pub min_salary: String,
}

impl SearchQuery {
    pub fn new(keyword: &str, location: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            location: location.to_string(),
            exp_levels: String::new(),
            industries: String::new(),
            min_salary: String::new(),
        }
    }
}

/// Login credentials, injected as an opaque capability. Inner components
/// never read the environment themselves.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Retry and pacing knobs. The site's anti-bot behavior shifts over time, so
/// none of these are hard constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum attempts per network operation, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Lower bound of the randomized inter-attempt delay, in milliseconds
    #[serde(default = "default_backoff_min_ms")]
    pub backoff_min_ms: u64,

    /// Upper bound (exclusive) of the randomized inter-attempt delay
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// Cooldown before the single post-block retry, in milliseconds
    #[serde(default = "default_block_cooldown_ms")]
    pub block_cooldown_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_min_ms: default_backoff_min_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            block_cooldown_ms: default_block_cooldown_ms(),
        }
    }
}

impl RetryPolicy {
    pub fn block_cooldown(&self) -> Duration {
        Duration::from_millis(self.block_cooldown_ms)
    }

    /// Zero-delay policy for tests.
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_min_ms: 0,
            backoff_max_ms: 1,
            block_cooldown_ms: 0,
        }
    }
}

/// Full configuration for one scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub query: SearchQuery,

    /// Number of result pages to request
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Visit each listing page for description/seniority/employment type
    #[serde(default)]
    pub fetch_details: bool,

    /// Directory the export artifact is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window. Headless rendering is more
    /// readily fingerprinted by the target site, so visible is the default.
    #[serde(default)]
    pub headless: bool,

    /// Results per page as served by the site
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Ceiling for waiting on a page's results container, in seconds
    #[serde(default = "default_page_wait_secs")]
    pub page_wait_secs: u64,

    /// In anonymous mode, stop after this many consecutive pages that add
    /// zero new unique records
    #[serde(default = "default_stale_page_limit")]
    pub stale_page_limit: usize,

    #[serde(default)]
    pub retry: RetryPolicy,

    /// Login credentials; present only when the caller supplied them
    #[serde(skip)]
    pub credentials: Option<Credentials>,
}

impl ScrapeConfig {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            max_pages: default_max_pages(),
            fetch_details: false,
            output_dir: default_output_dir(),
            webdriver_url: default_webdriver_url(),
            headless: false,
            page_size: default_page_size(),
            page_wait_secs: default_page_wait_secs(),
            stale_page_limit: default_stale_page_limit(),
            retry: RetryPolicy::default(),
            credentials: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn page_wait(&self) -> Duration {
        Duration::from_secs(self.page_wait_secs)
    }
}

fn default_max_pages() -> usize {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_page_size() -> usize {
    25
}

fn default_page_wait_secs() -> u64 {
    20
}

fn default_stale_page_limit() -> usize {
    2
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_min_ms() -> u64 {
    2000
}

fn default_backoff_max_ms() -> u64 {
    5000
}

fn default_block_cooldown_ms() -> u64 {
    30_000
}
