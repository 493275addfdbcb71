//! Employee extraction for the people search clusters.
//!
//! Only the first cluster of the search result is read.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::index::LookupIndex;
use crate::records::{CompanyEmployee, EmployeeExtractionResult, PagingInfo};
use crate::schema::{EntityResult, ImageViewModel, TextViewModel};

const SEARCH_POINTER: &str = "/data/data/searchDashClustersByAll";

/// Badge text arrives with a UTF-8 bullet decoded as Latin-1.
const MISENCODED_BULLET: &str = "â€¢";

static PROFILE_URN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(urn:li:fsd_profile:[^,)]+").expect("profile urn pattern is valid")
});

const PREFERRED_PICTURE_WIDTHS: [i64; 2] = [200, 100];

pub fn extract_company_people(response: &Value) -> Option<EmployeeExtractionResult> {
    let Some(index) = LookupIndex::from_response(response) else {
        warn!("People response has no 'included' array");
        return None;
    };

    let Some(search) = response.pointer(SEARCH_POINTER) else {
        warn!("People response is missing 'searchDashClustersByAll'");
        return None;
    };

    let items = search
        .pointer("/elements/0/items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let employees = items
        .iter()
        .filter_map(|item| build_employee(item, &index))
        .collect();

    Some(EmployeeExtractionResult {
        employees,
        paging: PagingInfo::from_value(search.get("paging")),
    })
}

fn build_employee(item: &Value, index: &LookupIndex) -> Option<CompanyEmployee> {
    let result_urn = item.pointer("/item/*entityResult").and_then(Value::as_str)?;

    let Some((entity, result)) = index
        .get(result_urn)
        .and_then(|entity| entity.as_entity_result().map(|result| (entity, result)))
    else {
        debug!(urn = result_urn, "Skipping item that is not an entity result");
        return None;
    };

    // Private profiles ("LinkedIn Member") have no page to link to.
    let Some(profile_url) = result.navigation_url.as_deref().filter(|u| !u.is_empty()) else {
        debug!(urn = result_urn, "Skipping restricted profile");
        return None;
    };

    Some(CompanyEmployee {
        urn: profile_urn(&entity.urn),
        full_name: text_or(result.title.as_ref(), "Unknown Name"),
        headline: text_or(result.primary_subtitle.as_ref(), ""),
        location: text_or(result.secondary_subtitle.as_ref(), "Unknown Location"),
        profile_url: profile_url.to_string(),
        profile_picture_url: select_profile_picture(result.image.as_ref()),
        connection_degree: connection_degree(result),
    })
}

fn text_or(text: Option<&TextViewModel>, default: &str) -> String {
    text.and_then(|t| t.text.clone())
        .unwrap_or_else(|| default.to_string())
}

/// `urn:li:fsd_entityResultViewModel:(urn:li:fsd_profile:ACoAA...,SEARCH_SRP,DEFAULT)`
/// -> `urn:li:fsd_profile:ACoAA...`
pub fn profile_urn(entity_urn: &str) -> String {
    PROFILE_URN_PATTERN
        .find(entity_urn)
        .map(|m| m.as_str()[1..].to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn connection_degree(result: &EntityResult) -> Option<String> {
    let badge = result.badge_text.as_ref()?.text.as_deref()?;
    Some(badge.replacen(MISENCODED_BULLET, "", 1).trim().to_string())
}

/// Width 200, then 100, then whatever comes first.
pub fn select_profile_picture(image: Option<&ImageViewModel>) -> Option<String> {
    let vector_image = image?
        .attributes
        .as_deref()?
        .iter()
        .find_map(|attribute| {
            attribute
                .detail_data
                .as_ref()?
                .non_entity_profile_picture
                .as_ref()
        })?
        .vector_image
        .as_ref()?;
    let artifacts = vector_image.artifacts.as_deref()?;

    let segment = PREFERRED_PICTURE_WIDTHS
        .iter()
        .find_map(|width| {
            artifacts
                .iter()
                .find(|artifact| artifact.width == Some(*width))
                .and_then(|artifact| artifact.path_segment())
        })
        .or_else(|| artifacts.first().and_then(|artifact| artifact.path_segment()))?;

    if segment.starts_with("https://") {
        Some(segment.to_string())
    } else {
        let root_url = vector_image.root_url.as_deref().unwrap_or_default();
        Some(format!("{root_url}{segment}"))
    }
}
