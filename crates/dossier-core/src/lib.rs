#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_self)]

pub mod error;
pub mod ingest;
pub mod normalize;
pub mod observer;
pub mod record;
pub mod value;

pub use error::{Error, Result};
pub use ingest::{
    AggregationStats, Aggregator, ConsolidatedReport, ExtractedRecords, FieldChain, FieldSchema,
    ProviderResult, RawProviderPayload, SchemaFieldExtractor,
};
pub use normalize::{
    MatchRule, NameNormalizer, NameSource, NormalizedName, NormalizedPhone, PhoneCategory,
    PhoneClassification, PhoneNormalizer,
};
pub use observer::{
    ExtractionEvent, ExtractionObserver, NoopObserver, RecordKind, RecordingObserver, SkipReason,
    TracingObserver,
};
pub use record::{
    FamilyMember, IncomeEntry, IncomeKind, RealEstateProperty, Relationship, VehicleRecord,
};
