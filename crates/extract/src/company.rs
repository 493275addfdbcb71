//! Company profile extraction for the organization `companies` endpoint.
//!
//! The envelope names the queried company in `data.*elements[0]`; everything
//! else (industries, follower info, hashtag topics) hangs off that entity by
//! URN.

use serde_json::Value;
use tracing::warn;

use crate::index::LookupIndex;
use crate::records::{CompanyLocation, CompanyProfile};
use crate::schema::{Address, Company, Entity, StaffCountRange, VectorImage};
use crate::text::non_empty;

/// Flatten a company response into a [`CompanyProfile`].
///
/// Returns `None` when the envelope has no root URN, the `included` array is
/// missing, or the root doesn't resolve to a company. Gaps in secondary data
/// only null out the affected field.
pub fn extract_company_profile(response: &Value) -> Option<CompanyProfile> {
    let Some(index) = LookupIndex::from_response(response) else {
        warn!("Company response has no 'included' array");
        return None;
    };

    let Some(root_urn) = response
        .pointer("/data/*elements/0")
        .and_then(Value::as_str)
        .filter(|urn| !urn.is_empty())
    else {
        warn!("Company response is missing the target URN in 'data.*elements'");
        return None;
    };

    let Some((entity, company)) = index
        .get(root_urn)
        .and_then(|entity| entity.as_company().map(|company| (entity, company)))
    else {
        warn!(urn = root_urn, "Target company entity not found in response");
        return None;
    };

    let industries = resolve_industries(company, &index);
    let (headquarters, locations) = collect_locations(company);

    Some(CompanyProfile {
        linkedin_urn: entity.urn.clone(),
        linkedin_url: company.url.clone(),
        name: non_empty(company.name.as_deref()),
        tagline: non_empty(company.tagline.as_deref()),
        description: non_empty(company.description.as_deref()),
        website: non_empty(company.company_page_url.as_deref()),
        phone: non_empty(company.phone.as_ref().and_then(|p| p.number.as_deref())),
        industry: industries.first().cloned(),
        all_industries: industries,
        company_type: non_empty(
            company
                .company_type
                .as_ref()
                .and_then(|t| t.localized_name.as_deref()),
        ),
        founded_year: company
            .founded_on
            .as_ref()
            .and_then(|f| f.year)
            .filter(|year| *year != 0),
        specialties: company.specialities.clone().unwrap_or_default(),
        follower_count: resolve_follower_count(company, &index),
        employee_count: company.staff_count.filter(|count| *count != 0),
        employee_count_range: format_staff_count_range(company.staff_count_range.as_ref()),
        headquarters,
        locations,
        logo_url: company
            .logo
            .as_ref()
            .and_then(|logo| logo.image.as_ref())
            .and_then(select_logo_url),
        associated_hashtags: resolve_associated_hashtags(company, &index),
    })
}

fn resolve_industries(company: &Company, index: &LookupIndex) -> Vec<String> {
    company
        .company_industries
        .iter()
        .flatten()
        .filter_map(|urn| index.resolve(urn, |e| e.attr_str("localizedName")))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve_follower_count(company: &Company, index: &LookupIndex) -> Option<i64> {
    let urn = company.following_info.as_deref().filter(|u| !u.is_empty())?;
    index.resolve(urn, |e| e.attr("followerCount").and_then(Value::as_i64))
}

/// Content topic -> feed topic -> topic name.
fn resolve_associated_hashtags(company: &Company, index: &LookupIndex) -> Vec<String> {
    company
        .associated_hashtags
        .iter()
        .flatten()
        .filter_map(|topic_urn| {
            let feed_topic_urn = index.resolve(topic_urn, |e| e.attr_str("*feedTopic"))?;
            index.resolve(feed_topic_urn, topic_name)
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn topic_name(entity: &Entity) -> Option<&str> {
    entity.attr("topic")?.get("name")?.as_str()
}

/// Headquarters first, then every confirmed location not flagged as
/// headquarters, in source order.
fn collect_locations(company: &Company) -> (Option<CompanyLocation>, Vec<CompanyLocation>) {
    let headquarters = company
        .headquarter
        .as_ref()
        .map(|address| tag_location(address, true));

    let mut locations: Vec<CompanyLocation> = headquarters.iter().cloned().collect();
    locations.extend(
        company
            .confirmed_locations
            .iter()
            .flatten()
            .filter(|address| address.headquarter != Some(true))
            .map(|address| tag_location(address, false)),
    );

    (headquarters, locations)
}

fn tag_location(address: &Address, is_headquarters: bool) -> CompanyLocation {
    CompanyLocation {
        fields: address.fields.clone(),
        headquarter: address.headquarter,
        is_headquarters,
        description: non_empty(address.description.as_deref()),
    }
}

/// Widest artifact wins; on equal widths the later artifact is kept.
pub fn select_logo_url(image: &VectorImage) -> Option<String> {
    let largest = image
        .artifacts
        .as_deref()?
        .iter()
        .max_by_key(|artifact| artifact.width)?;
    let root_url = image.root_url.as_deref()?;
    let segment = largest.file_identifying_url_path_segment.as_deref()?;
    Some(format!("{root_url}{segment}"))
}

/// `501-1000` for closed ranges, `10001+` when the end is missing.
pub fn format_staff_count_range(range: Option<&StaffCountRange>) -> Option<String> {
    let range = range?;
    let start = range.start?;
    match range.end {
        Some(end) if end != 0 => Some(format!("{start}-{end}")),
        _ => Some(format!("{start}+")),
    }
}
