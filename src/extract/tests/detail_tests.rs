use crate::extract::extract_detail;

const DETAIL_PAGE: &str = r#"
<html><body>
<div class="description__text">
  <p>We are hiring a Sales Manager to lead our APAC team.</p>
  <p>You will own the full sales cycle.</p>
  <button>Show more</button>
  <button>Show less</button>
</div>
<ul>
  <li class="description__job-criteria-item">
    <h3>Seniority level</h3>
    <span>Mid-Senior level</span>
  </li>
  <li class="description__job-criteria-item">
    <h3>Employment type</h3>
    <span>Full-time</span>
  </li>
  <li class="description__job-criteria-item">
    <h3>Job function</h3>
    <span>Sales</span>
  </li>
</ul>
</body></html>
"#;

#[test]
fn test_description_extracted_without_button_chrome() {
    let detail = extract_detail(DETAIL_PAGE);
    assert!(detail.description.contains("lead our APAC team"));
    assert!(detail.description.contains("full sales cycle"));
    assert!(!detail.description.contains("Show more"));
    assert!(!detail.description.contains("Show less"));
}

#[test]
fn test_criteria_fields_extracted() {
    let detail = extract_detail(DETAIL_PAGE);
    assert_eq!(detail.seniority, "Mid-Senior level");
    assert_eq!(detail.employment_type, "Full-time");
}

#[test]
fn test_missing_description_container_yields_empty_detail() {
    let detail = extract_detail("<html><body><p>Login required</p></body></html>");
    assert_eq!(detail.description, "");
    assert_eq!(detail.seniority, "");
    assert_eq!(detail.employment_type, "");
}

#[test]
fn test_description_capped_at_limit() {
    let long_text = "word ".repeat(2000);
    let html = format!(
        r#"<div class="show-more-less-html__markup"><p>{}</p></div>"#,
        long_text
    );

    let detail = extract_detail(&html);
    assert!(detail.description.chars().count() <= 3000);
    assert!(!detail.description.is_empty());
}

#[test]
fn test_criteria_without_description() {
    let html = r#"
    <li class="description__job-criteria-item">
      <h3>Seniority level</h3>
      <span>Director</span>
    </li>
    "#;

    let detail = extract_detail(html);
    assert_eq!(detail.seniority, "Director");
    assert_eq!(detail.description, "");
}
