use std::future::Future;
use url::Url;

use crate::config::ScrapeConfig;
use crate::dedupe;
use crate::error::ScrapeError;
use crate::extract;
use crate::paginate::{self, PageRequest};
use crate::records::{JobRecord, PageResult, PageStatus, RunState};
use crate::retry::{self, AttemptReport, FetchOutcome};
use crate::session::Session;

/// Terminal outcome of a run, surfaced to the caller alongside the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Normal completion with a non-empty record set
    Completed,
    /// Completed but the search matched nothing
    NoJobsFound,
    /// Run stopped early after repeated blocking; the record set is partial
    AbortedByBlock,
}

/// Everything a run hands to the export collaborator and the caller.
#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<JobRecord>,
    pub outcome: RunOutcome,
    pub pages_attempted: u32,
    pub pages_succeeded: u32,
    pub captcha_hits: u32,
}

/// Drives one full scrape: open session, page loop, optional enrichment,
/// close session. The session is released on every path, including abort.
pub async fn run_scrape(config: &ScrapeConfig) -> Result<RunReport, ScrapeError> {
    let session = Session::open(config).await?;
    let report = drive(&session, config).await;
    session.close().await;
    report
}

async fn drive(session: &Session, config: &ScrapeConfig) -> Result<RunReport, ScrapeError> {
    let authenticated = match &config.credentials {
        Some(creds) => session.login(creds).await,
        None => false,
    };
    if !authenticated {
        ::log::info!("Running in anonymous mode (bounded overlapping result window)");
    }

    let mut state = RunState::new(authenticated);
    let plan = paginate::plan(config.max_pages, config.page_size, authenticated);
    let urls: Vec<Url> = plan
        .iter()
        .map(|request| paginate::build_search_url(&config.query, request.offset))
        .collect::<Result<_, _>>()?;

    let stale_limit = if authenticated {
        // Authenticated offsets yield non-overlapping windows; never stop early
        usize::MAX
    } else {
        config.stale_page_limit
    };

    let aborted = collect_pages(&mut state, &plan, stale_limit, |request| {
        let url = urls[request.index].clone();
        async move {
            if request.index > 0 {
                tokio::time::sleep(retry::jitter_delay(&config.retry)).await;
            }
            retry::govern(&config.retry, || {
                let url = url.clone();
                async move { session.fetch_results_page(&url).await }
            })
            .await
        }
    })
    .await;

    // An aborted run stops everything; enriching would just hit the same wall
    if config.fetch_details && !aborted {
        ::log::info!("Fetching details for {} unique jobs", state.records.len());
        enrich_records(&mut state, |url| async move {
            tokio::time::sleep(retry::jitter_delay(&config.retry)).await;
            retry::govern(&config.retry, || {
                let url = url.clone();
                async move { session.fetch_detail_page(&url).await }
            })
            .await
        })
        .await;
    }

    let outcome = classify_outcome(aborted, state.records.len());
    match outcome {
        RunOutcome::Completed => {
            ::log::info!(
                "Collected {} unique jobs across {} pages",
                state.records.len(),
                state.pages_succeeded
            );
        }
        RunOutcome::NoJobsFound => ::log::warn!("No jobs found for this search"),
        RunOutcome::AbortedByBlock => ::log::warn!(
            "Aborted after blocking; returning partial set of {} jobs",
            state.records.len()
        ),
    }

    Ok(RunReport {
        records: state.records,
        outcome,
        pages_attempted: state.pages_attempted,
        pages_succeeded: state.pages_succeeded,
        captcha_hits: state.captcha_hits,
    })
}

/// Runs the page loop over an already-planned request sequence.
///
/// Generic over the fetch step so fixtures can drive it. Returns true when
/// the run was aborted by repeated blocking; remaining pages are then never
/// attempted.
async fn collect_pages<F, Fut>(
    state: &mut RunState,
    plan: &[PageRequest],
    stale_page_limit: usize,
    mut fetch: F,
) -> bool
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = (FetchOutcome<String>, AttemptReport)>,
{
    let total = plan.len();
    let mut stale_streak = 0;

    for request in plan {
        state.page_index = request.index;
        state.pages_attempted += 1;
        ::log::info!("Page {}/{} (start={})", request.index + 1, total, request.offset);

        let (outcome, report) = fetch(*request).await;
        state.captcha_hits += report.block_hits;

        let page = match outcome {
            FetchOutcome::Done(html) => {
                let records = extract::extract_jobs(&html);
                let status = if records.is_empty() {
                    PageStatus::Empty
                } else {
                    PageStatus::Ok
                };
                PageResult { records, status }
            }
            FetchOutcome::Failed => PageResult {
                records: Vec::new(),
                status: PageStatus::TimedOut,
            },
            FetchOutcome::Aborted => PageResult {
                records: Vec::new(),
                status: PageStatus::Blocked,
            },
        };

        match page.status {
            PageStatus::Ok => {
                state.pages_succeeded += 1;
                let added = dedupe::merge(state, page.records);
                ::log::info!("  {} new unique jobs (total {})", added, state.records.len());

                if added == 0 {
                    stale_streak += 1;
                    if stale_streak >= stale_page_limit {
                        ::log::info!(
                            "No new unique jobs for {} consecutive pages, stopping early",
                            stale_streak
                        );
                        break;
                    }
                } else {
                    stale_streak = 0;
                }
            }
            PageStatus::Empty => {
                state.pages_succeeded += 1;
                ::log::info!("  No jobs on page, stopping pagination");
                break;
            }
            PageStatus::TimedOut => {
                ::log::warn!("  Page {} failed and was skipped", request.index + 1);
            }
            PageStatus::Blocked => {
                return true;
            }
        }
    }

    false
}

/// Visits each aggregated record's listing page and fills in description,
/// seniority and employment type. A failed fetch leaves the record's
/// description empty; an abort stops enrichment but keeps all records.
async fn enrich_records<F, Fut>(state: &mut RunState, mut fetch: F)
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = (FetchOutcome<String>, AttemptReport)>,
{
    let total = state.records.len();

    for i in 0..total {
        let url = state.records[i].url.clone();
        if url.is_empty() {
            continue;
        }
        ::log::info!(
            "  [{}/{}] {} @ {}",
            i + 1,
            total,
            state.records[i].title,
            state.records[i].company
        );

        let (outcome, report) = fetch(url).await;
        state.captcha_hits += report.block_hits;

        match outcome {
            FetchOutcome::Done(html) => {
                let detail = extract::extract_detail(&html);
                let record = &mut state.records[i];
                record.description = detail.description;
                if record.seniority.is_empty() {
                    record.seniority = detail.seniority;
                }
                if record.employment_type.is_empty() {
                    record.employment_type = detail.employment_type;
                }
            }
            FetchOutcome::Failed => {
                ::log::warn!("  Detail fetch failed, leaving description empty");
            }
            FetchOutcome::Aborted => {
                ::log::warn!("  Blocked during enrichment, keeping records as-is");
                return;
            }
        }
    }
}

fn classify_outcome(aborted: bool, record_count: usize) -> RunOutcome {
    if aborted {
        RunOutcome::AbortedByBlock
    } else if record_count == 0 {
        RunOutcome::NoJobsFound
    } else {
        RunOutcome::Completed
    }
}
