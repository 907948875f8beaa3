//! Deduplication of contact identifiers gathered across providers.

mod name;
mod phone;

pub use name::{
    comparison_key, MatchRule, NameNormalizer, NameSource, NormalizedName, DEFAULT_JOB_TITLES,
};
pub use phone::{
    dedup_key, digits_of, NormalizedPhone, PhoneCategory, PhoneClassification, PhoneNormalizer,
};
