mod aggregator;
mod extractor;
mod payload;
mod schema;

pub use aggregator::{AggregationStats, Aggregator, ConsolidatedReport};
pub use extractor::{ExtractedRecords, SchemaFieldExtractor};
pub use payload::{ProviderResult, RawProviderPayload};
pub use schema::{
    FamilyFields, FieldChain, FieldSchema, IncomeField, RealEstateFields, VehicleFields,
};
