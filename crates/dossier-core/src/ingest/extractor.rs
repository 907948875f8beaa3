use serde::{Deserialize, Serialize};

use super::schema::{FieldChain, FieldSchema};
use crate::observer::{ExtractionEvent, ExtractionObserver, NoopObserver, RecordKind, SkipReason};
use crate::record::{
    FamilyMember, IncomeEntry, RealEstateProperty, Relationship, VehicleRecord,
};
use crate::value::{is_sentinel, parse_leading_int, Entry, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecords {
    pub vehicles: Vec<VehicleRecord>,
    pub family: Vec<FamilyMember>,
    pub real_estate: Vec<RealEstateProperty>,
    pub income: Vec<IncomeEntry>,
}

impl ExtractedRecords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: Self) {
        self.vehicles.extend(other.vehicles);
        self.family.extend(other.family);
        self.real_estate.extend(other.real_estate);
        self.income.extend(other.income);
    }

    pub fn len(&self) -> usize {
        self.vehicles.len() + self.family.len() + self.real_estate.len() + self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry being read, with somewhere to report what was ignored.
struct EntryScope<'a> {
    provider: &'a str,
    entry: &'a Entry,
    observer: &'a dyn ExtractionObserver,
}

impl EntryScope<'_> {
    fn resolve(&self, chain: &FieldChain) -> Option<String> {
        chain.lookup(self.entry, FieldValue::read, |field| {
            self.skip_field(field, SkipReason::SentinelValue);
        })
    }

    fn resolve_text(&self, chain: &FieldChain) -> Option<String> {
        chain.lookup(self.entry, FieldValue::read_text, |field| {
            self.skip_field(field, SkipReason::SentinelValue);
        })
    }

    fn skip_field(&self, field: &str, reason: SkipReason) {
        self.observer.on_event(&ExtractionEvent::FieldSkipped {
            provider: self.provider.to_string(),
            field: field.to_string(),
            reason,
        });
    }

    fn extracted(&self, kind: RecordKind) {
        self.observer.on_event(&ExtractionEvent::RecordExtracted {
            provider: self.provider.to_string(),
            kind,
        });
    }
}

/// Pulls typed records out of one provider entry. Every rule runs against
/// every entry; an entry can feed several record kinds at once.
#[derive(Debug, Clone, Default)]
pub struct SchemaFieldExtractor {
    schema: FieldSchema,
}

impl SchemaFieldExtractor {
    #[must_use]
    pub const fn new(schema: FieldSchema) -> Self {
        Self { schema }
    }

    pub const fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn extract(&self, provider: &str, entry: &Entry) -> ExtractedRecords {
        self.extract_observed(provider, entry, &NoopObserver)
    }

    pub fn extract_observed(
        &self,
        provider: &str,
        entry: &Entry,
        observer: &dyn ExtractionObserver,
    ) -> ExtractedRecords {
        let scope = EntryScope {
            provider,
            entry,
            observer,
        };
        let mut records = ExtractedRecords::new();

        if let Some(vehicle) = self.vehicle(&scope) {
            scope.extracted(RecordKind::Vehicle);
            records.vehicles.push(vehicle);
        }

        let family = self
            .relatives(&scope)
            .into_iter()
            .chain(self.household(&scope))
            .chain(self.alias(&scope));
        for member in family {
            scope.extracted(RecordKind::Family);
            records.family.push(member);
        }

        if let Some(property) = self.real_estate(&scope) {
            scope.extracted(RecordKind::RealEstate);
            records.real_estate.push(property);
        }

        for income in self.income(&scope) {
            scope.extracted(RecordKind::Income);
            records.income.push(income);
        }

        records
    }

    fn vehicle(&self, scope: &EntryScope<'_>) -> Option<VehicleRecord> {
        let fields = &self.schema.vehicle;
        let make = scope.resolve(&fields.make);
        let model = scope.resolve(&fields.model);
        let vin = scope.resolve(&fields.vin);

        if make.is_none() && model.is_none() && vin.is_none() {
            return None;
        }

        Some(VehicleRecord {
            make: make.unwrap_or_default(),
            model: model.unwrap_or_default(),
            year: scope.resolve(&fields.year).unwrap_or_default(),
            vin: vin.unwrap_or_default(),
            license: scope.resolve(&fields.license).unwrap_or_default(),
        })
    }

    /// Segments look like `First Last <age> <phone>`; the phone position is
    /// positional and unchecked.
    fn relatives(&self, scope: &EntryScope<'_>) -> Vec<FamilyMember> {
        let Some(text) = scope.resolve_text(&self.schema.family.relatives) else {
            return Vec::new();
        };

        text.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty() && !segment.contains("N/A"))
            .filter_map(|segment| {
                let tokens: Vec<&str> = segment.split_whitespace().collect();
                if tokens.len() < 2 {
                    return None;
                }
                let phone = tokens
                    .get(3)
                    .filter(|token| !is_sentinel(token))
                    .map(ToString::to_string)
                    .unwrap_or_default();
                Some(
                    FamilyMember::new(tokens[..2].join(" "), Relationship::Relative)
                        .with_phone(phone),
                )
            })
            .collect()
    }

    /// First child-count field holding a positive leading integer decides;
    /// zero or negative counts fall through to the next field.
    fn household(&self, scope: &EntryScope<'_>) -> Option<FamilyMember> {
        for field in self.schema.family.child_count.names() {
            match FieldValue::read(scope.entry, field) {
                FieldValue::Missing => {}
                FieldValue::Sentinel => scope.skip_field(field, SkipReason::SentinelValue),
                FieldValue::Text(text) => {
                    let Some(count) = parse_leading_int(&text) else {
                        scope.skip_field(field, SkipReason::UnparseableNumber);
                        continue;
                    };
                    if count <= 0 {
                        continue;
                    }
                    let description = match count {
                        1 => "1 child".to_string(),
                        c => format!("{c} children"),
                    };
                    return Some(FamilyMember::new(description, Relationship::HouseholdInfo));
                }
            }
        }
        None
    }

    fn alias(&self, scope: &EntryScope<'_>) -> Option<FamilyMember> {
        scope
            .resolve(&self.schema.family.alias)
            .map(|nickname| FamilyMember::new(nickname, Relationship::Alias))
    }

    fn real_estate(&self, scope: &EntryScope<'_>) -> Option<RealEstateProperty> {
        let fields = &self.schema.real_estate;
        let address = scope.resolve(&fields.address)?;

        Some(RealEstateProperty {
            address,
            city: scope.resolve(&fields.city).unwrap_or_default(),
            state: scope.resolve(&fields.state).unwrap_or_default(),
            zip_code: scope.resolve(&fields.zip_code).unwrap_or_default(),
            value: scope.resolve(&fields.value).unwrap_or_default(),
            year_built: scope.resolve(&fields.year_built).unwrap_or_default(),
            mortgage_lender: scope.resolve(&fields.mortgage_lender).unwrap_or_default(),
            property_type: scope.resolve(&fields.property_type).unwrap_or_default(),
        })
    }

    fn income(&self, scope: &EntryScope<'_>) -> Vec<IncomeEntry> {
        self.schema
            .income
            .iter()
            .filter_map(|field| {
                scope.resolve(&field.fields).map(|amount| IncomeEntry {
                    amount,
                    source: scope.provider.to_string(),
                    kind: field.kind,
                })
            })
            .collect()
    }
}
