pub mod config;
pub mod dedupe;
pub mod error;
pub mod export;
pub mod extract;
pub mod paginate;
pub mod records;
pub mod retry;
pub mod run;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{Credentials, ScrapeConfig, SearchQuery};
pub use error::ScrapeError;
pub use records::JobRecord;
pub use run::{RunOutcome, RunReport, run_scrape};
