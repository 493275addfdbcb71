use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

pub const COMPANY_TYPE: &str = "com.linkedin.voyager.organization.Company";
pub const FEED_UPDATE_TYPE: &str = "com.linkedin.voyager.dash.feed.Update";
pub const SOCIAL_ACTIVITY_COUNTS_TYPE: &str = "com.linkedin.voyager.dash.feed.SocialActivityCounts";
pub const HASHTAG_TYPE: &str = "com.linkedin.voyager.dash.feed.Hashtag";
pub const MENTIONED_COMPANY_TYPE: &str = "com.linkedin.voyager.dash.organization.Company";
pub const JOB_POSTING_CARD_TYPE: &str = "com.linkedin.voyager.dash.jobs.JobPostingCard";
pub const ENTITY_RESULT_TYPE: &str = "com.linkedin.voyager.dash.search.EntityResultViewModel";

/// One node of the `included` array, addressed by its `entityUrn`.
#[derive(Debug, Clone)]
pub struct Entity {
    pub urn: String,
    pub type_tag: String,
    pub kind: EntityKind,
}

/// Typed payload selected by the `$type` tag alone.
///
/// Tags the extractors never type-check land in `Other` with their raw
/// fields. Typed fields of the wrong shape read as absent; they never move
/// the entity out of its variant.
#[derive(Debug, Clone)]
pub enum EntityKind {
    Company(Box<Company>),
    FeedUpdate(Box<FeedUpdate>),
    SocialActivityCounts(SocialActivityCounts),
    Hashtag(Hashtag),
    MentionedCompany(MentionedCompany),
    JobPostingCard(Box<JobPostingCard>),
    EntityResult(Box<EntityResult>),
    Other(Map<String, Value>),
}

impl Entity {
    /// Parse a raw `included` item. Items without a string `entityUrn`
    /// can't be referenced and yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let urn = object.get("entityUrn")?.as_str()?.to_string();
        let type_tag = object
            .get("$type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let kind = match type_tag.as_str() {
            COMPANY_TYPE => EntityKind::Company(Box::new(typed(value))),
            FEED_UPDATE_TYPE => EntityKind::FeedUpdate(Box::new(typed(value))),
            SOCIAL_ACTIVITY_COUNTS_TYPE => EntityKind::SocialActivityCounts(typed(value)),
            HASHTAG_TYPE => EntityKind::Hashtag(typed(value)),
            MENTIONED_COMPANY_TYPE => EntityKind::MentionedCompany(typed(value)),
            JOB_POSTING_CARD_TYPE => EntityKind::JobPostingCard(Box::new(typed(value))),
            ENTITY_RESULT_TYPE => EntityKind::EntityResult(Box::new(typed(value))),
            _ => EntityKind::Other(object.clone()),
        };

        Some(Self {
            urn,
            type_tag,
            kind,
        })
    }

    /// Raw field of an untyped entity.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        match &self.kind {
            EntityKind::Other(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }

    pub fn as_company(&self) -> Option<&Company> {
        match &self.kind {
            EntityKind::Company(company) => Some(company),
            _ => None,
        }
    }

    pub fn as_feed_update(&self) -> Option<&FeedUpdate> {
        match &self.kind {
            EntityKind::FeedUpdate(update) => Some(update),
            _ => None,
        }
    }

    pub fn as_social_activity_counts(&self) -> Option<&SocialActivityCounts> {
        match &self.kind {
            EntityKind::SocialActivityCounts(counts) => Some(counts),
            _ => None,
        }
    }

    pub fn as_hashtag(&self) -> Option<&Hashtag> {
        match &self.kind {
            EntityKind::Hashtag(hashtag) => Some(hashtag),
            _ => None,
        }
    }

    pub fn as_mentioned_company(&self) -> Option<&MentionedCompany> {
        match &self.kind {
            EntityKind::MentionedCompany(company) => Some(company),
            _ => None,
        }
    }

    pub fn as_job_posting_card(&self) -> Option<&JobPostingCard> {
        match &self.kind {
            EntityKind::JobPostingCard(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_entity_result(&self) -> Option<&EntityResult> {
        match &self.kind {
            EntityKind::EntityResult(result) => Some(result),
            _ => None,
        }
    }
}

// Every field below is lenient, so this only fails for a non-object body.
fn typed<T: DeserializeOwned + Default>(value: &Value) -> T {
    T::deserialize(value).unwrap_or_else(|err| {
        debug!(error = %err, "Entity body does not match its declared type");
        T::default()
    })
}

/// A value of the wrong shape reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Integers may arrive as `742.0`; anything non-integral reads as absent.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .map(|n| n as i64)
    }))
}

/// Drops malformed elements instead of the whole list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect()
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextViewModel {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

// ---- company profile ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub company_page_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: Option<Phone>,
    #[serde(rename = "*companyIndustries", default, deserialize_with = "lenient_vec")]
    pub company_industries: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub company_type: Option<LocalizedName>,
    #[serde(default, deserialize_with = "lenient")]
    pub founded_on: Option<FoundedOn>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub specialities: Option<Vec<String>>,
    #[serde(rename = "*followingInfo", default, deserialize_with = "lenient")]
    pub following_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub staff_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub staff_count_range: Option<StaffCountRange>,
    #[serde(default, deserialize_with = "lenient")]
    pub headquarter: Option<Address>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub confirmed_locations: Option<Vec<Address>>,
    #[serde(default, deserialize_with = "lenient")]
    pub logo: Option<Logo>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub associated_hashtags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Phone {
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedName {
    #[serde(default, deserialize_with = "lenient")]
    pub localized_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoundedOn {
    #[serde(default, deserialize_with = "lenient_int")]
    pub year: Option<i64>,
}

/// `end` is missing for open-ended ranges such as "10,001+".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffCountRange {
    #[serde(default, deserialize_with = "lenient_int")]
    pub start: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub end: Option<i64>,
}

/// A postal address. Fields the extractors don't inspect are kept verbatim
/// in `fields` and passed through to the output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "lenient")]
    pub headquarter: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Logo {
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<VectorImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorImage {
    #[serde(default, deserialize_with = "lenient")]
    pub root_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub artifacts: Option<Vec<ImageArtifact>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageArtifact {
    #[serde(default, deserialize_with = "lenient_int")]
    pub width: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub file_identifying_url_path_segment: Option<String>,
}

impl ImageArtifact {
    pub fn path_segment(&self) -> Option<&str> {
        self.file_identifying_url_path_segment
            .as_deref()
            .filter(|segment| !segment.is_empty())
    }
}

// ---- posts feed ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedUpdate {
    #[serde(default, deserialize_with = "lenient")]
    pub actor: Option<Actor>,
    #[serde(default, deserialize_with = "lenient")]
    pub commentary: Option<Commentary>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<UpdateContent>,
    #[serde(rename = "*resharedUpdate", default, deserialize_with = "lenient")]
    pub reshared_update: Option<String>,
    #[serde(rename = "*socialDetail", default, deserialize_with = "lenient")]
    pub social_detail: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub social_content: Option<SocialContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<TextViewModel>,
    #[serde(default, deserialize_with = "lenient")]
    pub sub_description: Option<TextViewModel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commentary {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<RichText>,
}

/// Commentary text with its attributed spans.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichText {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(rename = "attributesV2", default, deserialize_with = "lenient_vec")]
    pub attributes: Option<Vec<TextAttribute>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttribute {
    #[serde(default, deserialize_with = "lenient")]
    pub detail_data: Option<AttributeDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeDetail {
    #[serde(rename = "*hashtag", default, deserialize_with = "lenient")]
    pub hashtag: Option<String>,
    #[serde(rename = "*companyName", default, deserialize_with = "lenient")]
    pub company_name: Option<String>,
}

/// Embedded components; only their presence matters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContent {
    pub promo_component: Option<Value>,
    pub linked_in_video_component: Option<Value>,
    pub image_component: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialContent {
    #[serde(default, deserialize_with = "lenient")]
    pub share_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialActivityCounts {
    #[serde(default, deserialize_with = "lenient_int")]
    pub num_likes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub num_comments: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub num_shares: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hashtag {
    #[serde(default, deserialize_with = "lenient")]
    pub tracking_urn: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentionedCompany {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

// ---- jobs ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingCard {
    #[serde(default, deserialize_with = "lenient")]
    pub job_posting_urn: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<TextViewModel>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_description: Option<TextViewModel>,
    #[serde(default, deserialize_with = "lenient")]
    pub secondary_description: Option<TextViewModel>,
}

// ---- people search ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityResult {
    #[serde(default, deserialize_with = "lenient")]
    pub navigation_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<TextViewModel>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_subtitle: Option<TextViewModel>,
    #[serde(default, deserialize_with = "lenient")]
    pub secondary_subtitle: Option<TextViewModel>,
    #[serde(default, deserialize_with = "lenient")]
    pub badge_text: Option<TextViewModel>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageViewModel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageViewModel {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub attributes: Option<Vec<ImageAttribute>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttribute {
    #[serde(default, deserialize_with = "lenient")]
    pub detail_data: Option<ImageDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub non_entity_profile_picture: Option<ProfilePicture>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    #[serde(default, deserialize_with = "lenient")]
    pub vector_image: Option<VectorImage>,
}
