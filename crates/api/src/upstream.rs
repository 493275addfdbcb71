use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;

const NORMALIZED_JSON: &str = "application/vnd.linkedin.normalized+json+2.1";
const COMPANY_DECORATION: &str =
    "com.linkedin.voyager.deco.organization.web.WebFullCompanyMain-28";
const JOB_CARDS_DECORATION: &str =
    "com.linkedin.voyager.dash.deco.jobs.search.JobSearchCardsCollection-220";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned {0}")]
    Status(StatusCode),

    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),

    #[error("upstream body is not JSON: {0}")]
    Decode(reqwest::Error),
}

impl UpstreamError {
    /// Short reason echoed back to the caller as `statusText`.
    pub fn status_text(&self) -> String {
        match self {
            UpstreamError::Status(status) => status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
            UpstreamError::Transport(err) if err.is_timeout() => "Gateway Timeout".to_string(),
            UpstreamError::Transport(_) => "Bad Gateway".to_string(),
            UpstreamError::Decode(_) => "Invalid Response Body".to_string(),
        }
    }
}

/// Page window passed through to the upstream query untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub start: u32,
    pub count: u32,
}

/// Client for the Voyager internal API, authenticated with a browser session.
#[derive(Clone)]
pub struct VoyagerClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl VoyagerClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn company_url(&self, universal_name: &str) -> String {
        format!(
            "{}/voyager/api/organization/companies?decorationId={}&q=universalName&universalName={}",
            self.config.base_url,
            COMPANY_DECORATION,
            urlencoding::encode(universal_name)
        )
    }

    pub fn posts_url(
        &self,
        company_id: &str,
        page: PageRequest,
        pagination_token: Option<&str>,
    ) -> String {
        let page_urn = format!("urn:li:fsd_organizationalPage:{company_id}");
        let mut variables = format!(
            "count:{},start:{},organizationalPageUrn:{}",
            page.count,
            page.start,
            urlencoding::encode(&page_urn)
        );
        if let Some(token) = pagination_token {
            variables.push_str(",paginationToken:");
            variables.push_str(&urlencoding::encode(token));
        }

        format!(
            "{}/voyager/api/graphql?variables=({variables})&queryId={}",
            self.config.base_url, self.config.posts_query_id
        )
    }

    pub fn jobs_url(&self, company_id: &str, page: PageRequest) -> String {
        format!(
            "{}/voyager/api/voyagerJobsDashJobCards?decorationId={}&count={}&q=jobSearch\
             &query=(origin:COMPANY_PAGE_JOBS_CLUSTER_EXPANSION,locationUnion:(geoId:92000000),\
             selectedFilters:(company:List({company_id})),spellCorrectionEnabled:true)&start={}",
            self.config.base_url, JOB_CARDS_DECORATION, page.count, page.start
        )
    }

    pub fn people_url(&self, company_id: &str, page: PageRequest) -> String {
        format!(
            "{}/voyager/api/graphql?variables=(start:{},origin:COMPANY_PAGE_CANNED_SEARCH,\
             query:(flagshipSearchIntent:SEARCH_SRP,queryParameters:List(\
             (key:currentCompany,value:List({company_id})),(key:resultType,value:List(PEOPLE))),\
             includeFiltersInResponse:false),count:{})&queryId={}",
            self.config.base_url, page.start, page.count, self.config.people_query_id
        )
    }

    /// GET `url` with the session headers and decode the whole body as JSON.
    pub async fn fetch(&self, url: &str) -> Result<Value, UpstreamError> {
        debug!(url, "Sending upstream request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, NORMALIZED_JSON)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header("csrf-token", self.config.csrf_token.expose())
            .header("x-li-lang", "en_US")
            .header("x-restli-protocol-version", "2.0.0")
            .header(COOKIE, self.config.cookie.expose())
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "Upstream request could not be completed");
                UpstreamError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Upstream request failed");
            return Err(UpstreamError::Status(status));
        }

        response.json::<Value>().await.map_err(|err| {
            warn!(error = %err, "Upstream response is not valid JSON");
            UpstreamError::Decode(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secret;

    fn client() -> VoyagerClient {
        VoyagerClient::new(UpstreamConfig {
            base_url: "https://voyager.test".to_string(),
            cookie: Secret::new("li_at=abc"),
            csrf_token: Secret::new("ajax:1"),
            timeout_secs: 5,
            posts_query_id: "posts.q".to_string(),
            people_query_id: "people.q".to_string(),
        })
        .unwrap()
    }

    const PAGE: PageRequest = PageRequest { start: 20, count: 10 };

    #[test]
    fn test_company_url_encodes_name() {
        let url = client().company_url("acme corp&co");
        assert!(url.starts_with("https://voyager.test/voyager/api/organization/companies?"));
        assert!(url.ends_with("&universalName=acme%20corp%26co"));
    }

    #[test]
    fn test_posts_url() {
        let url = client().posts_url("1035", PAGE, Some("a b"));
        assert_eq!(
            url,
            "https://voyager.test/voyager/api/graphql?variables=(count:10,start:20,\
             organizationalPageUrn:urn%3Ali%3Afsd_organizationalPage%3A1035,paginationToken:a%20b)\
             &queryId=posts.q"
        );
        assert!(!client().posts_url("1035", PAGE, None).contains("paginationToken"));
    }

    #[test]
    fn test_jobs_and_people_urls_carry_paging() {
        let jobs = client().jobs_url("1035", PAGE);
        assert!(jobs.contains("company:List(1035)"));
        assert!(jobs.contains("&count=10&"));
        assert!(jobs.ends_with("&start=20"));

        let people = client().people_url("1035", PAGE);
        assert!(people.contains("key:currentCompany,value:List(1035)"));
        assert!(people.contains("(start:20,"));
        assert!(people.contains("count:10)"));
        assert!(people.ends_with("&queryId=people.q"));
    }

    #[test]
    fn test_status_text() {
        assert_eq!(
            UpstreamError::Status(StatusCode::FORBIDDEN).status_text(),
            "Forbidden"
        );
    }
}
