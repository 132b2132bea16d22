use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "job-harvest")]
#[command(about = "Scrape public job listings into a CSV table")]
#[command(version)]
pub struct Args {
    /// Job search keyword
    #[arg(short, long, default_value = "Sales")]
    pub keyword: String,

    /// Job location
    #[arg(short, long, default_value = "Singapore")]
    pub location: String,

    /// Max result pages to request (25 jobs each; ~58 unique without login)
    #[arg(short, long, default_value_t = 5)]
    pub max_pages: usize,

    /// Visit each job page for the full description
    #[arg(long)]
    pub fetch_details: bool,

    /// Directory the CSV is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Run the browser without a visible window
    #[arg(long)]
    pub headless: bool,

    /// URL of the WebDriver server
    #[arg(long, default_value = "http://localhost:4444")]
    pub webdriver_url: String,

    /// Experience level filter codes, e.g. "2,3,4"
    #[arg(long, default_value = "")]
    pub exp_levels: String,

    /// Industry filter codes, e.g. "4,6,96"
    #[arg(long, default_value = "")]
    pub industries: String,

    /// Minimum salary band code (1-9)
    #[arg(long, default_value = "")]
    pub min_salary: String,

    /// JSON config file; command-line flags are ignored when set
    #[arg(long)]
    pub config: Option<PathBuf>,
}
