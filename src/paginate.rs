use url::Url;

use crate::config::SearchQuery;

/// Search endpoint for public job listings.
const SEARCH_URL: &str = "https://www.linkedin.com/jobs/search/";

/// One planned results-page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub index: usize,
    /// Result offset passed as the `start` parameter
    pub offset: usize,
}

/// Plans the page requests for a run.
///
/// Anonymous sessions are served a bounded, overlapping top-N result window
/// regardless of offset, so the plan is the same in both modes: all
/// `max_pages` offsets are issued and deduplication collapses the overlap.
/// Only the orchestrator's early-stop heuristic differs between modes.
pub fn plan(max_pages: usize, page_size: usize, authenticated: bool) -> Vec<PageRequest> {
    let requests: Vec<PageRequest> = (0..max_pages)
        .map(|index| PageRequest {
            index,
            offset: index * page_size,
        })
        .collect();

    ::log::debug!(
        "Planned {} page requests ({} mode)",
        requests.len(),
        if authenticated { "authenticated" } else { "anonymous" }
    );

    requests
}

/// Builds the search URL for one page request.
pub fn build_search_url(query: &SearchQuery, offset: usize) -> Result<Url, url::ParseError> {
    let offset = offset.to_string();
    let mut params: Vec<(&str, &str)> = vec![
        ("keywords", query.keyword.as_str()),
        ("location", query.location.as_str()),
        ("f_TPR", ""), // time filter, empty = all time
        ("position", "1"),
        ("pageNum", "0"),
        ("start", offset.as_str()),
    ];

    if !query.exp_levels.is_empty() {
        params.push(("f_E", query.exp_levels.as_str()));
    }
    if !query.industries.is_empty() {
        params.push(("f_I", query.industries.as_str()));
    }
    if !query.min_salary.is_empty() {
        params.push(("f_SB2", query.min_salary.as_str()));
    }

    Url::parse_with_params(SEARCH_URL, &params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_offsets() {
        let requests = plan(3, 25, false);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].offset, 0);
        assert_eq!(requests[1].offset, 25);
        assert_eq!(requests[2].offset, 50);
    }

    #[test]
    fn test_plan_identical_offsets_in_both_modes() {
        // The controller does not special-case anonymous mode; dedup absorbs
        // the overlapping window.
        assert_eq!(plan(4, 25, false), plan(4, 25, true));
    }

    #[test]
    fn test_search_url_carries_query_and_offset() {
        let query = SearchQuery::new("Data Engineer", "Singapore");
        let url = build_search_url(&query, 50).unwrap();

        assert!(url.as_str().starts_with(SEARCH_URL));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("keywords".to_string(), "Data Engineer".to_string())));
        assert!(pairs.contains(&("location".to_string(), "Singapore".to_string())));
        assert!(pairs.contains(&("start".to_string(), "50".to_string())));
    }

    #[test]
    fn test_search_url_filter_codes() {
        let mut query = SearchQuery::new("Sales", "Singapore");
        query.exp_levels = "2,3,4".to_string();
        query.min_salary = "3".to_string();

        let url = build_search_url(&query, 0).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("f_E".to_string(), "2,3,4".to_string())));
        assert!(pairs.contains(&("f_SB2".to_string(), "3".to_string())));
        // Industry filter was not set and must not appear
        assert!(!pairs.iter().any(|(k, _)| k == "f_I"));
    }
}
