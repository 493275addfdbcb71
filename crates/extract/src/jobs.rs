//! Job listing extraction for the job cards collection.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::index::LookupIndex;
use crate::records::{JobExtractionResult, JobListing, PagingInfo, WorkModel};
use crate::text::last_segment;

static LOCATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*) \((.*)\)").expect("location pattern is valid"));

pub fn extract_company_jobs(response: &Value) -> Option<JobExtractionResult> {
    let Some(index) = LookupIndex::from_response(response) else {
        warn!("Jobs response has no 'included' array");
        return None;
    };

    let Some(elements) = response.pointer("/data/elements").and_then(Value::as_array) else {
        warn!("Jobs response is missing 'data.elements'");
        return None;
    };

    let job_listings = elements
        .iter()
        .filter_map(|element| build_listing(element, &index))
        .collect();

    Some(JobExtractionResult {
        job_listings,
        paging: PagingInfo::from_value(response.pointer("/data/paging")),
    })
}

fn build_listing(element: &Value, index: &LookupIndex) -> Option<JobListing> {
    let card_urn = element
        .pointer("/jobCardUnion/*jobPostingCard")
        .and_then(Value::as_str)?;

    let Some(card) = index.resolve(card_urn, |e| e.as_job_posting_card()) else {
        debug!(urn = card_urn, "Skipping element that is not a job posting card");
        return None;
    };

    let Some(job_id) = card.job_posting_urn.as_deref().and_then(last_segment) else {
        debug!(urn = card_urn, "Skipping job card without a job id");
        return None;
    };

    let (location, work_model) = parse_location_and_work_model(
        card.secondary_description
            .as_ref()
            .and_then(|d| d.text.as_deref()),
    );

    Some(JobListing {
        job_id: job_id.to_string(),
        title: card
            .title
            .as_ref()
            .and_then(|t| t.text.clone())
            .unwrap_or_else(|| "Unknown Title".to_string()),
        company_name: card
            .primary_description
            .as_ref()
            .and_then(|d| d.text.clone())
            .unwrap_or_else(|| "Unknown Company".to_string()),
        location,
        work_model,
        job_url: format!("https://www.linkedin.com/jobs/view/{job_id}/"),
    })
}

/// `"Bethesda, MD (Hybrid)"` -> `("Bethesda, MD", Hybrid)`.
///
/// Text without a recognised mode in parentheses becomes the location as-is
/// with an `Unknown` mode; missing text is unknown on both counts.
pub fn parse_location_and_work_model(description: Option<&str>) -> (String, WorkModel) {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return ("Unknown".to_string(), WorkModel::Unknown);
    };

    if let Some(captures) = LOCATION_PATTERN.captures(description) {
        let location = captures[1].trim();
        if let Some(work_model) = WorkModel::from_label(captures[2].trim()) {
            return (location.to_string(), work_model);
        }
    }

    (description.to_string(), WorkModel::Unknown)
}
