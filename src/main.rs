use clap::Parser;
use job_harvest::config::{Credentials, ScrapeConfig, SearchQuery};
use job_harvest::run::RunOutcome;
use job_harvest::{export, run_scrape};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Bad configuration: {}", e);
            std::process::exit(2);
        }
    };

    ::log::info!(
        "Scraping '{}' in '{}' ({} pages{})",
        config.query.keyword,
        config.query.location,
        config.max_pages,
        if config.fetch_details { ", with details" } else { "" }
    );
    println!("Note: a WebDriver server (e.g. chromedriver) must be running at {}.", config.webdriver_url);

    let report = match run_scrape(&config).await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    };

    ::log::info!(
        "Pages: {} attempted, {} succeeded; CAPTCHA hits: {}",
        report.pages_attempted,
        report.pages_succeeded,
        report.captcha_hits
    );

    // The run always produces an artifact, even when empty or partial
    match export::write_csv(&report.records, &config.query, &config.output_dir) {
        Ok(path) => println!("Saved {} jobs to {}", report.records.len(), path.display()),
        Err(e) => {
            ::log::error!("Export failed: {}", e);
            std::process::exit(1);
        }
    }

    match report.outcome {
        RunOutcome::Completed => {}
        RunOutcome::NoJobsFound => {
            println!("Warning: no jobs found for this search.");
        }
        RunOutcome::AbortedByBlock => {
            println!(
                "Warning: aborted after repeated blocking; results are partial ({} jobs).",
                report.records.len()
            );
        }
    }
}

/// Builds the run configuration from the CLI, or from a JSON file when
/// --config is given. Credentials come only from the environment; inner
/// components receive them as an injected capability.
fn build_config(args: &Args) -> Result<ScrapeConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ScrapeConfig::from_file(path)?,
        None => {
            let mut query = SearchQuery::new(&args.keyword, &args.location);
            query.exp_levels = args.exp_levels.clone();
            query.industries = args.industries.clone();
            query.min_salary = args.min_salary.clone();

            let mut config = ScrapeConfig::new(query);
            config.max_pages = args.max_pages;
            config.fetch_details = args.fetch_details;
            config.output_dir = args.output_dir.clone();
            config.headless = args.headless;
            config.webdriver_url = args.webdriver_url.clone();
            config
        }
    };

    config.credentials = credentials_from_env();
    Ok(config)
}

fn credentials_from_env() -> Option<Credentials> {
    let email = std::env::var("LINKEDIN_EMAIL").ok()?;
    let password = std::env::var("LINKEDIN_PASSWORD").ok()?;
    if email.is_empty() || password.is_empty() {
        return None;
    }
    Some(Credentials { email, password })
}
