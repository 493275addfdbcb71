use serde::Serialize;
use serde_json::{Map, Value};

// ---- company profile ----

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub linkedin_urn: String,
    pub linkedin_url: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub industry: Option<String>,
    pub all_industries: Vec<String>,
    pub company_type: Option<String>,
    pub founded_year: Option<i64>,
    pub specialties: Vec<String>,
    pub follower_count: Option<i64>,
    pub employee_count: Option<i64>,
    pub employee_count_range: Option<String>,
    pub headquarters: Option<CompanyLocation>,
    pub locations: Vec<CompanyLocation>,
    pub logo_url: Option<String>,
    pub associated_hashtags: Vec<String>,
}

/// An address with its source fields carried through, tagged with whether
/// it is the headquarters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLocation {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarter: Option<bool>,
    pub is_headquarters: bool,
    pub description: Option<String>,
}

// ---- posts ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaType {
    Image,
    Video,
    Reshare,
    Text,
    Promo,
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SocialCounts {
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentionedCompanyRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPost {
    pub urn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    pub author_name: String,
    pub posted_at: String,
    pub post_text: String,
    pub media_type: MediaType,
    pub social_counts: SocialCounts,
    pub hashtags: Vec<String>,
    pub mentioned_companies: Vec<MentionedCompanyRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPagingInfo {
    pub start: i64,
    pub count: i64,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostExtractionResult {
    pub posts: Vec<CompanyPost>,
    pub paging: PostsPagingInfo,
}

// ---- jobs ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkModel {
    #[serde(rename = "On-site")]
    OnSite,
    Hybrid,
    Remote,
    Unknown,
}

impl WorkModel {
    /// Exact upstream label, or `None` for anything unrecognised.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "On-site" => Some(Self::OnSite),
            "Hybrid" => Some(Self::Hybrid),
            "Remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub job_id: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub work_model: WorkModel,
    pub job_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobExtractionResult {
    pub job_listings: Vec<JobListing>,
    pub paging: PagingInfo,
}

// ---- people ----

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyEmployee {
    pub urn: String,
    pub full_name: String,
    pub headline: String,
    pub location: String,
    pub profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_degree: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeExtractionResult {
    pub employees: Vec<CompanyEmployee>,
    pub paging: PagingInfo,
}

// ---- paging ----

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PagingInfo {
    pub start: i64,
    pub count: i64,
    pub total: i64,
}

impl PagingInfo {
    /// Copy a `paging` block verbatim; absent numbers read as zero.
    pub fn from_value(paging: Option<&Value>) -> Self {
        let field = |key: &str| {
            paging
                .and_then(|p| p.get(key))
                .and_then(Value::as_i64)
                .unwrap_or(0)
        };
        Self {
            start: field("start"),
            count: field("count"),
            total: field("total"),
        }
    }
}
