use chrono::Local;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::SearchQuery;
use crate::error::ScrapeError;
use crate::records::JobRecord;

/// Column order of the exported table. Description stays as a (blank) column
/// when enrichment was not requested.
const COLUMNS: [&str; 8] = [
    "Job Title",
    "Company",
    "Location",
    "Posted",
    "Job URL",
    "Seniority",
    "Employment Type",
    "Description",
];

/// Writes the record table as CSV under `dir`, named deterministically from
/// the query and the run timestamp. Returns the written path.
pub fn write_csv(
    records: &[JobRecord],
    query: &SearchQuery,
    dir: &Path,
) -> Result<PathBuf, ScrapeError> {
    std::fs::create_dir_all(dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!(
        "jobs_{}_{}_{}.csv",
        sanitize(&query.keyword),
        sanitize(&query.location),
        timestamp
    );
    let path = dir.join(filename);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record([
            record.title.as_str(),
            record.company.as_str(),
            record.location.as_str(),
            record.posted.as_str(),
            record.url.as_str(),
            record.seniority.as_str(),
            record.employment_type.as_str(),
            record.description.as_str(),
        ])?;
    }
    writer.flush()?;

    ::log::info!("Saved {} rows to {}", records.len(), path.display());
    Ok(path)
}

/// Collapses anything that is not a word character, for use in filenames.
fn sanitize(segment: &str) -> String {
    let re = Regex::new(r"[^\w]+").expect("static pattern is valid");
    re.replace_all(segment, "_").trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_record() -> JobRecord {
        JobRecord {
            title: "Sales Manager".to_string(),
            company: "Acme, Inc.".to_string(),
            location: "Singapore".to_string(),
            posted: "2 days ago".to_string(),
            url: "https://www.linkedin.com/jobs/view/1".to_string(),
            ..JobRecord::default()
        }
    }

    #[test]
    fn test_sanitize_filename_segments() {
        assert_eq!(sanitize("Data Engineer"), "Data_Engineer");
        assert_eq!(sanitize("São Paulo, Brazil"), "São_Paulo_Brazil");
        assert_eq!(sanitize("AI/ML"), "AI_ML");
    }

    #[test]
    fn test_csv_has_exact_header_and_rows() {
        let dir = std::env::temp_dir().join("job_harvest_export_test");
        let _ = fs::remove_dir_all(&dir);

        let query = SearchQuery::new("Sales", "Singapore");
        let path = write_csv(&[sample_record()], &query, &dir).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Job Title,Company,Location,Posted,Job URL,Seniority,Employment Type,Description"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("Sales Manager"));
        assert!(row.contains("\"Acme, Inc.\""));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_record_set_still_produces_artifact() {
        let dir = std::env::temp_dir().join("job_harvest_export_empty_test");
        let _ = fs::remove_dir_all(&dir);

        let query = SearchQuery::new("Nothing", "Nowhere");
        let path = write_csv(&[], &query, &dir).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1); // header only

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_filename_carries_query() {
        let dir = std::env::temp_dir().join("job_harvest_export_name_test");
        let _ = fs::remove_dir_all(&dir);

        let query = SearchQuery::new("Data Engineer", "New York");
        let path = write_csv(&[], &query, &dir).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        assert!(name.starts_with("jobs_Data_Engineer_New_York_"));
        assert!(name.ends_with(".csv"));

        let _ = fs::remove_dir_all(&dir);
    }
}
