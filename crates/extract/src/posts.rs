//! Company posts extraction for the organizational page updates feed.

use serde_json::Value;
use tracing::{debug, warn};

use crate::index::LookupIndex;
use crate::records::{
    CompanyPost, MediaType, MentionedCompanyRef, PagingInfo, PostExtractionResult,
    PostsPagingInfo, SocialCounts,
};
use crate::schema::{AttributeDetail, FeedUpdate, RichText};
use crate::text::last_segment;

const FEED_POINTER: &str =
    "/data/data/feedDashOrganizationalPageUpdatesByOrganizationalPageRelevanceFeed";

const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNKNOWN_DATE: &str = "Unknown Date";

/// Flatten a posts feed response. Promotional updates are dropped entirely.
pub fn extract_company_posts(response: &Value) -> Option<PostExtractionResult> {
    let Some(index) = LookupIndex::from_response(response) else {
        warn!("Posts response has no 'included' array");
        return None;
    };

    let Some(feed) = response.pointer(FEED_POINTER) else {
        warn!("Posts response is missing the updates feed");
        return None;
    };

    let Some(post_urns) = feed.get("*elements").and_then(Value::as_array) else {
        warn!("Posts feed is missing '*elements'");
        return None;
    };

    let paging = PagingInfo::from_value(feed.get("paging"));
    let paging = PostsPagingInfo {
        start: paging.start,
        count: paging.count,
        total: paging.total,
        pagination_token: feed
            .pointer("/metadata/paginationToken")
            .and_then(Value::as_str)
            .map(str::to_string),
    };

    let posts = post_urns
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|urn| build_post(urn, &index))
        .collect();

    Some(PostExtractionResult { posts, paging })
}

fn build_post(urn: &str, index: &LookupIndex) -> Option<CompanyPost> {
    let Some((entity, update)) = index
        .get(urn)
        .and_then(|entity| entity.as_feed_update().map(|update| (entity, update)))
    else {
        debug!(urn, "Skipping element that is not a feed update");
        return None;
    };

    let media_type = classify_media(update);
    if media_type == MediaType::Promo {
        debug!(urn, "Skipping promotional update");
        return None;
    }

    let actor = update.actor.as_ref();
    let rich_text = update.commentary.as_ref().and_then(|c| c.text.as_ref());

    Some(CompanyPost {
        urn: entity.urn.clone(),
        post_url: update
            .social_content
            .as_ref()
            .and_then(|c| c.share_url.clone()),
        author_name: actor
            .and_then(|a| a.name.as_ref())
            .and_then(|n| n.text.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        posted_at: actor
            .and_then(|a| a.sub_description.as_ref())
            .and_then(|d| d.text.as_deref())
            .map(posted_at)
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        post_text: rich_text.and_then(|t| t.text.clone()).unwrap_or_default(),
        media_type,
        social_counts: resolve_social_counts(update, index),
        hashtags: resolve_hashtags(rich_text, index),
        mentioned_companies: resolve_mentioned_companies(rich_text, index),
    })
}

/// First matching rule wins: promo, reshare, video, image, text, unknown.
pub fn classify_media(update: &FeedUpdate) -> MediaType {
    let content = update.content.as_ref();
    let has = |component: Option<&Value>| component.is_some_and(truthy);

    if has(content.and_then(|c| c.promo_component.as_ref())) {
        return MediaType::Promo;
    }
    if update.reshared_update.as_deref().is_some_and(|u| !u.is_empty()) {
        return MediaType::Reshare;
    }
    if has(content.and_then(|c| c.linked_in_video_component.as_ref())) {
        return MediaType::Video;
    }
    if has(content.and_then(|c| c.image_component.as_ref())) {
        return MediaType::Image;
    }
    let commentary_text = update
        .commentary
        .as_ref()
        .and_then(|c| c.text.as_ref())
        .and_then(|t| t.text.as_deref());
    if commentary_text.is_some_and(|text| !text.is_empty()) {
        return MediaType::Text;
    }
    MediaType::Unknown
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// "3d • Edited • " -> "3d"
fn posted_at(sub_description: &str) -> String {
    sub_description
        .split('•')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Update -> social detail -> activity counts; zeros on any missing hop.
fn resolve_social_counts(update: &FeedUpdate, index: &LookupIndex) -> SocialCounts {
    update
        .social_detail
        .as_deref()
        .and_then(|urn| index.resolve(urn, |e| e.attr_str("*totalSocialActivityCounts")))
        .and_then(|urn| index.resolve(urn, |e| e.as_social_activity_counts()))
        .map(|counts| SocialCounts {
            likes: counts.num_likes.unwrap_or(0),
            comments: counts.num_comments.unwrap_or(0),
            shares: counts.num_shares.unwrap_or(0),
        })
        .unwrap_or_default()
}

fn span_details(rich_text: Option<&RichText>) -> impl Iterator<Item = &AttributeDetail> {
    rich_text
        .and_then(|t| t.attributes.as_deref())
        .unwrap_or_default()
        .iter()
        .filter_map(|attribute| attribute.detail_data.as_ref())
}

fn resolve_hashtags(rich_text: Option<&RichText>, index: &LookupIndex) -> Vec<String> {
    span_details(rich_text)
        .filter_map(|detail| detail.hashtag.as_deref())
        .filter_map(|urn| index.resolve(urn, |e| e.as_hashtag()?.tracking_urn.as_deref()))
        .filter_map(last_segment)
        .map(str::to_string)
        .collect()
}

fn resolve_mentioned_companies(
    rich_text: Option<&RichText>,
    index: &LookupIndex,
) -> Vec<MentionedCompanyRef> {
    span_details(rich_text)
        .filter_map(|detail| detail.company_name.as_deref())
        .filter_map(|urn| index.resolve(urn, |e| e.as_mentioned_company()))
        .map(|company| MentionedCompanyRef {
            name: company.name.clone(),
            url: company.url.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        FEED_UPDATE_TYPE, HASHTAG_TYPE, MENTIONED_COMPANY_TYPE, SOCIAL_ACTIVITY_COUNTS_TYPE,
        UpdateContent,
    };
    use serde_json::json;

    fn feed(elements: Value, included: Value) -> Value {
        json!({
            "data": {"data": {
                "feedDashOrganizationalPageUpdatesByOrganizationalPageRelevanceFeed": {
                    "metadata": {"paginationToken": "dXJuOmxpOmFjdGl2aXR5"},
                    "paging": {"start": 0, "count": 10, "total": 57},
                    "*elements": elements
                }
            }},
            "included": included
        })
    }

    fn text_post(urn: &str) -> Value {
        json!({
            "entityUrn": urn,
            "$type": FEED_UPDATE_TYPE,
            "commentary": {"text": {"text": "Hello"}}
        })
    }

    #[test]
    fn test_full_post() {
        let response = feed(
            json!(["urn:li:fsd_update:1"]),
            json!([
                {
                    "entityUrn": "urn:li:fsd_update:1",
                    "$type": FEED_UPDATE_TYPE,
                    "actor": {
                        "name": {"text": "Acme Corp"},
                        "subDescription": {"text": "3d • Edited • "}
                    },
                    "commentary": {"text": {
                        "text": "We're #hiring with @Partner",
                        "attributesV2": [
                            {"detailData": {"*hashtag": "urn:li:fsd_hashtag:hiring"}},
                            {"detailData": {"*hashtag": "urn:li:fsd_hashtag:missing"}},
                            {"detailData": {"*companyName": "urn:li:fsd_company:42"}},
                            {"detailData": {"*companyName": "urn:li:fsd_hashtag:hiring"}},
                            {"start": 3}
                        ]
                    }},
                    "content": {"imageComponent": {"images": []}},
                    "*socialDetail": "urn:li:fsd_socialDetail:1",
                    "socialContent": {"shareUrl": "https://www.linkedin.com/feed/update/1"}
                },
                {"entityUrn": "urn:li:fsd_socialDetail:1", "*totalSocialActivityCounts": "urn:li:fsd_counts:1"},
                {
                    "entityUrn": "urn:li:fsd_counts:1",
                    "$type": SOCIAL_ACTIVITY_COUNTS_TYPE,
                    "numLikes": 120,
                    "numComments": 7
                },
                {
                    "entityUrn": "urn:li:fsd_hashtag:hiring",
                    "$type": HASHTAG_TYPE,
                    "trackingUrn": "urn:li:hashtag:hiring"
                },
                {
                    "entityUrn": "urn:li:fsd_company:42",
                    "$type": MENTIONED_COMPANY_TYPE,
                    "name": "Partner Inc",
                    "url": "https://www.linkedin.com/company/partner/"
                }
            ]),
        );

        let result = extract_company_posts(&response).unwrap();
        assert_eq!(result.posts.len(), 1);
        let post = &result.posts[0];

        assert_eq!(post.urn, "urn:li:fsd_update:1");
        assert_eq!(post.author_name, "Acme Corp");
        assert_eq!(post.posted_at, "3d");
        assert_eq!(post.post_text, "We're #hiring with @Partner");
        assert_eq!(post.media_type, MediaType::Image);
        assert_eq!(
            post.social_counts,
            SocialCounts {
                likes: 120,
                comments: 7,
                shares: 0
            }
        );
        assert_eq!(post.hashtags, vec!["hiring"]);
        assert_eq!(post.mentioned_companies.len(), 1);
        assert_eq!(post.mentioned_companies[0].name.as_deref(), Some("Partner Inc"));
        assert_eq!(
            post.post_url.as_deref(),
            Some("https://www.linkedin.com/feed/update/1")
        );

        assert_eq!(result.paging.total, 57);
        assert_eq!(
            result.paging.pagination_token.as_deref(),
            Some("dXJuOmxpOmFjdGl2aXR5")
        );
    }

    #[test]
    fn test_defaults_for_bare_update() {
        let response = feed(
            json!(["urn:li:fsd_update:2"]),
            json!([{"entityUrn": "urn:li:fsd_update:2", "$type": FEED_UPDATE_TYPE}]),
        );
        let post = &extract_company_posts(&response).unwrap().posts[0];

        assert_eq!(post.author_name, "Unknown Author");
        assert_eq!(post.posted_at, "Unknown Date");
        assert_eq!(post.post_text, "");
        assert_eq!(post.media_type, MediaType::Unknown);
        assert_eq!(post.social_counts, SocialCounts::default());
        assert!(post.hashtags.is_empty());
        assert!(post.mentioned_companies.is_empty());
        assert_eq!(post.post_url, None);
    }

    #[test]
    fn test_social_counts_need_typed_counts_entity() {
        let response = feed(
            json!(["urn:li:fsd_update:3"]),
            json!([
                {"entityUrn": "urn:li:fsd_update:3", "$type": FEED_UPDATE_TYPE, "*socialDetail": "sd"},
                {"entityUrn": "sd", "*totalSocialActivityCounts": "counts"},
                {"entityUrn": "counts", "$type": "com.linkedin.voyager.dash.feed.Other", "numLikes": 5}
            ]),
        );
        let post = &extract_company_posts(&response).unwrap().posts[0];
        assert_eq!(post.social_counts, SocialCounts::default());
    }

    #[test]
    fn test_media_priority() {
        let promo_and_image = FeedUpdate {
            content: Some(UpdateContent {
                promo_component: Some(json!({})),
                image_component: Some(json!({})),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(classify_media(&promo_and_image), MediaType::Promo);

        let reshare_and_video = FeedUpdate {
            reshared_update: Some("urn:li:fsd_update:9".to_string()),
            content: Some(UpdateContent {
                linked_in_video_component: Some(json!({})),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(classify_media(&reshare_and_video), MediaType::Reshare);

        let video_and_image = FeedUpdate {
            content: Some(UpdateContent {
                linked_in_video_component: Some(json!({})),
                image_component: Some(json!({})),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(classify_media(&video_and_image), MediaType::Video);
    }

    #[test]
    fn test_skips_promos_and_unresolved() {
        let response = feed(
            json!([
                "urn:li:fsd_update:1",
                "urn:li:fsd_update:promo",
                "urn:li:fsd_update:missing",
                "urn:li:fsd_update:wrongtype",
                "urn:li:fsd_update:4"
            ]),
            json!([
                text_post("urn:li:fsd_update:1"),
                {
                    "entityUrn": "urn:li:fsd_update:promo",
                    "$type": FEED_UPDATE_TYPE,
                    "content": {"promoComponent": {"text": "Follow us"}, "imageComponent": {}}
                },
                {"entityUrn": "urn:li:fsd_update:wrongtype", "$type": "com.linkedin.voyager.dash.feed.Other"},
                text_post("urn:li:fsd_update:4")
            ]),
        );

        let urns: Vec<String> = extract_company_posts(&response)
            .unwrap()
            .posts
            .into_iter()
            .map(|p| p.urn)
            .collect();
        assert_eq!(urns, vec!["urn:li:fsd_update:1", "urn:li:fsd_update:4"]);
    }

    #[test]
    fn test_missing_envelope() {
        assert!(extract_company_posts(&json!({"data": {}, "included": []})).is_none());
        assert!(extract_company_posts(&json!({"included": []})).is_none());

        let no_included = feed(json!([]), json!(null));
        assert!(extract_company_posts(&no_included).is_none());
    }

    #[test]
    fn test_malformed_optional_field_keeps_post() {
        let mut post = text_post("urn:li:fsd_update:5");
        post["socialContent"] = json!({"shareUrl": 5});
        post["actor"] = json!({"name": "Acme Corp"});
        let response = feed(json!(["urn:li:fsd_update:5"]), json!([post]));

        let result = extract_company_posts(&response).unwrap();
        assert_eq!(result.posts.len(), 1);
        let post = &result.posts[0];
        assert_eq!(post.post_text, "Hello");
        assert_eq!(post.author_name, "Unknown Author");
        assert_eq!(post.post_url, None);
        assert_eq!(post.media_type, MediaType::Text);
    }

    #[test]
    fn test_idempotent_output() {
        let response = feed(
            json!(["a", "b"]),
            json!([text_post("a"), text_post("b")]),
        );
        let first = serde_json::to_string(&extract_company_posts(&response)).unwrap();
        let second = serde_json::to_string(&extract_company_posts(&response)).unwrap();
        assert_eq!(first, second);
    }
}
