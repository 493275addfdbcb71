use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use extract::{
    CompanyProfile, EmployeeExtractionResult, JobExtractionResult, PostExtractionResult,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::upstream::PageRequest;

const DEFAULT_START: u32 = 0;
const DEFAULT_COUNT: u32 = 10;
const DEFAULT_JOBS_COUNT: u32 = 25;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Success envelope: `status`, the extracted fields, and optionally the
/// untouched upstream document.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    status: &'static str,
    #[serde(flatten)]
    body: T,
    #[serde(rename = "rawData", skip_serializing_if = "Option::is_none")]
    raw_data: Option<Value>,
}

impl<T> ApiResponse<T> {
    fn ok(body: T, raw: Value, include_raw: bool) -> Json<Self> {
        Json(Self {
            status: "ok",
            body,
            raw_data: include_raw.then_some(raw),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    company_info: CompanyProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyQuery {
    company_uni_name: Option<String>,
    include_raw_data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFeedQuery {
    company_urn: Option<String>,
    start: Option<String>,
    count: Option<String>,
    pagination_token: Option<String>,
    include_raw_data: Option<String>,
}

impl CompanyFeedQuery {
    fn company_id(&self) -> ApiResult<&str> {
        company_id(required(self.company_urn.as_deref(), "companyUrn")?)
    }

    fn page(&self, default_count: u32) -> ApiResult<PageRequest> {
        Ok(PageRequest {
            start: parse_number(self.start.as_deref(), "start", DEFAULT_START)?,
            count: parse_number(self.count.as_deref(), "count", default_count)?,
        })
    }

    fn include_raw(&self) -> bool {
        flag(self.include_raw_data.as_deref())
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<Json<ApiResponse<CompanyInfo>>> {
    let universal_name = required(query.company_uni_name.as_deref(), "companyUniName")?;
    info!(company = universal_name, "Fetching company profile");

    let raw = state
        .upstream
        .fetch(&state.upstream.company_url(universal_name))
        .await?;
    let company_info =
        extract::extract_company_profile(&raw).ok_or(ApiError::Extraction("company profile"))?;

    Ok(ApiResponse::ok(
        CompanyInfo { company_info },
        raw,
        flag(query.include_raw_data.as_deref()),
    ))
}

pub async fn get_company_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyFeedQuery>,
) -> ApiResult<Json<ApiResponse<PostExtractionResult>>> {
    let company_id = query.company_id()?;
    let page = query.page(DEFAULT_COUNT)?;
    let token = query
        .pagination_token
        .as_deref()
        .filter(|token| !token.is_empty());
    info!(company_id, start = page.start, count = page.count, "Fetching company posts");

    let raw = state
        .upstream
        .fetch(&state.upstream.posts_url(company_id, page, token))
        .await?;
    let posts = extract::extract_company_posts(&raw).ok_or(ApiError::Extraction("posts"))?;
    info!(company_id, posts = posts.posts.len(), "Extracted company posts");

    Ok(ApiResponse::ok(posts, raw, query.include_raw()))
}

pub async fn get_company_jobs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyFeedQuery>,
) -> ApiResult<Json<ApiResponse<JobExtractionResult>>> {
    let company_id = query.company_id()?;
    let page = query.page(DEFAULT_JOBS_COUNT)?;
    info!(company_id, start = page.start, count = page.count, "Fetching company jobs");

    let raw = state
        .upstream
        .fetch(&state.upstream.jobs_url(company_id, page))
        .await?;
    let jobs = extract::extract_company_jobs(&raw).ok_or(ApiError::Extraction("job listings"))?;
    info!(company_id, jobs = jobs.job_listings.len(), "Extracted job listings");

    Ok(ApiResponse::ok(jobs, raw, query.include_raw()))
}

pub async fn get_company_people(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanyFeedQuery>,
) -> ApiResult<Json<ApiResponse<EmployeeExtractionResult>>> {
    let company_id = query.company_id()?;
    let page = query.page(DEFAULT_COUNT)?;
    info!(company_id, start = page.start, count = page.count, "Fetching company people");

    let raw = state
        .upstream
        .fetch(&state.upstream.people_url(company_id, page))
        .await?;
    let people = extract::extract_company_people(&raw).ok_or(ApiError::Extraction("employees"))?;
    info!(company_id, employees = people.employees.len(), "Extracted employees");

    Ok(ApiResponse::ok(people, raw, query.include_raw()))
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> ApiResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(name))
}

/// Accepts `urn:li:fsd_company:1035` or plain `1035`.
fn company_id(company_urn: &str) -> ApiResult<&str> {
    let id = company_urn.rsplit(':').next().unwrap_or_default();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidParameter {
            name: "companyUrn",
            reason: format!("expected a numeric company id, got '{company_urn}'"),
        });
    }
    Ok(id)
}

fn parse_number(value: Option<&str>, name: &'static str, default: u32) -> ApiResult<u32> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ApiError::InvalidParameter {
            name,
            reason: format!("expected a non-negative integer, got '{raw}'"),
        }),
    }
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_id() {
        assert_eq!(company_id("urn:li:fsd_company:1035").unwrap(), "1035");
        assert_eq!(company_id("1035").unwrap(), "1035");
        assert!(company_id("urn:li:fsd_company:").is_err());
        assert!(company_id("acme").is_err());
        assert!(company_id("10)35").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(None, "start", 0).unwrap(), 0);
        assert_eq!(parse_number(Some(" 40 "), "start", 0).unwrap(), 40);
        assert!(parse_number(Some("-1"), "start", 0).is_err());
        assert!(parse_number(Some("ten"), "count", 10).is_err());
    }

    #[test]
    fn test_flag() {
        assert!(flag(Some("true")));
        assert!(flag(Some("TRUE")));
        assert!(flag(Some("1")));
        assert!(!flag(Some("false")));
        assert!(!flag(None));
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required(Some(" acme "), "companyUniName").unwrap(), "acme");
        assert!(required(Some("  "), "companyUniName").is_err());
        assert!(required(None, "companyUniName").is_err());
    }
}
