//! Flattens normalized Voyager responses into plain records.
//!
//! Every response pairs an envelope (`data`) holding root URNs with a flat
//! `included` array of typed entities that reference each other by URN. Each
//! extractor indexes `included`, starts at its root pointer(s) and resolves
//! references into a denormalized record. Structural problems yield `None`;
//! missing secondary data falls back to per-field defaults.

pub mod company;
pub mod index;
pub mod jobs;
pub mod people;
pub mod posts;
pub mod records;
pub mod schema;
mod text;

pub use company::extract_company_profile;
pub use index::LookupIndex;
pub use jobs::extract_company_jobs;
pub use people::extract_company_people;
pub use posts::extract_company_posts;
pub use records::{
    CompanyEmployee, CompanyLocation, CompanyPost, CompanyProfile, EmployeeExtractionResult,
    JobExtractionResult, JobListing, MediaType, MentionedCompanyRef, PagingInfo,
    PostExtractionResult, PostsPagingInfo, SocialCounts, WorkModel,
};
pub use schema::{Entity, EntityKind};
