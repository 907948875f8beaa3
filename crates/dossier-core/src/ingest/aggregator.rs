use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::extractor::{ExtractedRecords, SchemaFieldExtractor};
use super::payload::RawProviderPayload;
use super::schema::FieldSchema;
use crate::error::Result;
use crate::normalize::{NameNormalizer, NormalizedName, PhoneClassification, PhoneNormalizer};
use crate::observer::{ExtractionEvent, ExtractionObserver, NoopObserver, RecordKind, SkipReason};
use crate::record::{FamilyMember, IncomeEntry, RealEstateProperty, VehicleRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationStats {
    pub providers: usize,
    pub providers_skipped: usize,
    pub entries: usize,
    pub entries_skipped: usize,
    pub duplicates_removed: usize,
    pub non_specific_addresses: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedReport {
    pub phones: PhoneClassification,
    pub names: Vec<NormalizedName>,
    pub vehicles: Vec<VehicleRecord>,
    pub family: Vec<FamilyMember>,
    pub real_estate: Vec<RealEstateProperty>,
    pub income: Vec<IncomeEntry>,
    pub stats: AggregationStats,
}

impl ConsolidatedReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn record_count(&self) -> usize {
        self.vehicles.len() + self.family.len() + self.real_estate.len() + self.income.len()
    }
}

/// Keeps the first item per key, in input order. `label` names a dropped
/// item in the merge event.
fn first_wins<T, K>(
    items: Vec<T>,
    kind: RecordKind,
    key: impl Fn(&T) -> K,
    label: impl Fn(&T) -> String,
    observer: &dyn ExtractionObserver,
) -> (Vec<T>, usize)
where
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut removed = 0;

    for item in items {
        if !seen.insert(key(&item)) {
            let value = label(&item);
            observer.on_event(&ExtractionEvent::DuplicateMerged {
                kind,
                key: value.clone(),
                value,
            });
            removed += 1;
            continue;
        }
        kept.push(item);
    }

    (kept, removed)
}

/// Runs every provider entry through the extractor and folds the results,
/// together with separately gathered phones and names, into one report.
///
/// Holds no state between runs; one instance can serve any number of
/// payloads from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    extractor: SchemaFieldExtractor,
    phones: PhoneNormalizer,
    names: NameNormalizer,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.extractor = SchemaFieldExtractor::new(schema);
        self
    }

    #[must_use]
    pub fn with_name_normalizer(mut self, names: NameNormalizer) -> Self {
        self.names = names;
        self
    }

    pub const fn extractor(&self) -> &SchemaFieldExtractor {
        &self.extractor
    }

    pub fn aggregate<P, N, SP, SN>(
        &self,
        payload: &RawProviderPayload,
        phones: P,
        names: N,
    ) -> ConsolidatedReport
    where
        P: IntoIterator<Item = SP>,
        SP: AsRef<str>,
        N: IntoIterator<Item = SN>,
        SN: AsRef<str>,
    {
        self.aggregate_observed(payload, phones, names, &NoopObserver)
    }

    pub fn aggregate_observed<P, N, SP, SN>(
        &self,
        payload: &RawProviderPayload,
        phones: P,
        names: N,
        observer: &dyn ExtractionObserver,
    ) -> ConsolidatedReport
    where
        P: IntoIterator<Item = SP>,
        SP: AsRef<str>,
        N: IntoIterator<Item = SN>,
        SN: AsRef<str>,
    {
        let (records, mut stats) = self.extract_all(payload, observer);

        let (vehicles, removed) = first_wins(
            records.vehicles,
            RecordKind::Vehicle,
            VehicleRecord::dedup_key,
            VehicleRecord::dedup_key,
            observer,
        );
        stats.duplicates_removed += removed;

        let (family, removed) = first_wins(
            records.family,
            RecordKind::Family,
            |member| (member.name.clone(), member.relationship),
            |member| format!("{} ({})", member.name, member.relationship),
            observer,
        );
        stats.duplicates_removed += removed;

        let (specific, vague): (Vec<_>, Vec<_>) = records
            .real_estate
            .into_iter()
            .partition(|property| !property.is_non_specific());
        for property in &vague {
            observer.on_event(&ExtractionEvent::RecordDropped {
                kind: RecordKind::RealEstate,
                value: property.address.clone(),
                reason: SkipReason::NonSpecificAddress,
            });
        }
        stats.non_specific_addresses = vague.len();

        let (real_estate, removed) = first_wins(
            specific,
            RecordKind::RealEstate,
            RealEstateProperty::address_key,
            |property| property.address.clone(),
            observer,
        );
        stats.duplicates_removed += removed;

        ConsolidatedReport {
            phones: self.phones.normalize_observed(phones, observer),
            names: self.names.normalize_observed(names, observer),
            vehicles,
            family,
            real_estate,
            income: records.income,
            stats,
        }
    }

    /// Extraction pass only: every record found, before any dedup.
    pub fn extract_all(
        &self,
        payload: &RawProviderPayload,
        observer: &dyn ExtractionObserver,
    ) -> (ExtractedRecords, AggregationStats) {
        let mut records = ExtractedRecords::new();
        let mut stats = AggregationStats {
            providers: payload.len(),
            ..AggregationStats::default()
        };

        for provider in payload.providers() {
            let Some(entries) = &provider.entries else {
                observer.on_event(&ExtractionEvent::ProviderSkipped {
                    provider: provider.name.clone(),
                    reason: SkipReason::MissingData,
                });
                stats.providers_skipped += 1;
                continue;
            };

            observer.on_event(&ExtractionEvent::ProviderStarted {
                provider: provider.name.clone(),
                entries: entries.len(),
            });

            for (index, entry) in entries.iter().enumerate() {
                stats.entries += 1;
                let Some(entry) = entry.as_object() else {
                    observer.on_event(&ExtractionEvent::EntrySkipped {
                        provider: provider.name.clone(),
                        index,
                        reason: SkipReason::MissingData,
                    });
                    stats.entries_skipped += 1;
                    continue;
                };
                records.merge(
                    self.extractor
                        .extract_observed(&provider.name, entry, observer),
                );
            }
        }

        (records, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use crate::record::Relationship;
    use serde_json::json;

    const NO_STRINGS: [&str; 0] = [];

    fn payload(value: serde_json::Value) -> RawProviderPayload {
        RawProviderPayload::from_value(&value).unwrap()
    }

    #[test]
    fn test_real_estate_dedup_and_vague_addresses() {
        let p = payload(json!({
            "Alpha": { "Data": [
                { "Address": "4410 Pearl Rd.", "City": "Cleveland" },
                { "Address": "United States" },
            ] },
            "Beta": { "Data": [
                { "Address": "4410 PEARL RD", "City": "Parma" },
                { "Address": "OH" },
            ] },
        }));

        let report = Aggregator::new().aggregate(&p, NO_STRINGS, NO_STRINGS);

        assert_eq!(report.real_estate.len(), 1);
        assert_eq!(report.real_estate[0].city, "Cleveland");
        assert_eq!(report.stats.non_specific_addresses, 2);
        assert_eq!(report.stats.duplicates_removed, 1);
    }

    #[test]
    fn test_family_dedup_by_name_and_relationship() {
        let p = payload(json!({
            "Alpha": { "Data": [
                { "Relatives": "Mary Smith 54 4405551234", "NickName": "Mary Smith" },
            ] },
            "Beta": { "Data": [
                { "Relatives": "Mary Smith 55" },
            ] },
        }));

        let report = Aggregator::new().aggregate(&p, NO_STRINGS, NO_STRINGS);

        assert_eq!(report.family.len(), 2);
        assert_eq!(report.family[0].relationship, Relationship::Relative);
        assert_eq!(report.family[0].phone, "4405551234");
        assert_eq!(report.family[1].relationship, Relationship::Alias);
    }

    #[test]
    fn test_same_name_different_relationship_kept() {
        let observer = RecordingObserver::new();
        let p = payload(json!({
            "Alpha": { "Data": [
                { "Relatives": "Pat Lee 40", "NickName": "Pat Lee" },
                { "NickName": "Pat Lee" },
            ] },
        }));

        let report = Aggregator::new().aggregate_observed(&p, NO_STRINGS, NO_STRINGS, &observer);

        assert_eq!(report.family.len(), 2);
        assert_eq!(report.stats.duplicates_removed, 1);
        assert!(observer.events().iter().any(|e| matches!(
            e,
            ExtractionEvent::DuplicateMerged { kind: RecordKind::Family, value, .. }
                if value == "Pat Lee (alias)"
        )));
    }

    #[test]
    fn test_vehicle_dedup_by_vin() {
        let p = payload(json!({
            "Alpha": { "Data": [ { "AutoBrand": "Toyota", "VIN": "1HGCM82633A004352" } ] },
            "Beta": { "Data": [ { "AutoBrand": "TOYOTA", "AutoModel": "Camry", "VIN": "1hgcm82633a004352" } ] },
        }));

        let report = Aggregator::new().aggregate(&p, NO_STRINGS, NO_STRINGS);

        assert_eq!(report.vehicles.len(), 1);
        assert_eq!(report.vehicles[0].model, "");
    }

    #[test]
    fn test_malformed_providers_and_entries_are_skipped() {
        let observer = RecordingObserver::new();
        let p = payload(json!({
            "Alpha": { "NumOfResults": 0 },
            "Beta": { "Data": [ "junk", 42, { "Salary": "70000" } ] },
        }));

        let report = Aggregator::new().aggregate_observed(&p, NO_STRINGS, NO_STRINGS, &observer);

        assert_eq!(report.income.len(), 1);
        assert_eq!(report.income[0].source, "Beta");
        assert_eq!(report.stats.providers, 2);
        assert_eq!(report.stats.providers_skipped, 1);
        assert_eq!(report.stats.entries, 3);
        assert_eq!(report.stats.entries_skipped, 2);

        let events = observer.into_events();
        assert!(events.iter().any(|e| matches!(
            e,
            ExtractionEvent::ProviderSkipped { provider, reason: SkipReason::MissingData }
                if provider == "Alpha"
        )));
    }

    #[test]
    fn test_first_provider_in_document_wins() {
        let p = payload(json!({
            "Zeta": { "Data": [
                { "Address": "4410 Pearl Rd", "City": "FromZeta", "NickName": "Sue", "Income": "1" },
            ] },
            "Alpha": { "Data": [
                { "Address": "4410 PEARL RD.", "City": "FromAlpha", "NickName": "Sue", "Income": "2" },
            ] },
        }));

        let names: Vec<_> = p.providers().iter().map(|provider| provider.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);

        let report = Aggregator::new().aggregate(&p, NO_STRINGS, NO_STRINGS);

        assert_eq!(report.real_estate.len(), 1);
        assert_eq!(report.real_estate[0].city, "FromZeta");
        assert_eq!(report.family.len(), 1);
        let sources: Vec<_> = report.income.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, ["Zeta", "Alpha"]);
    }

    #[test]
    fn test_income_is_not_deduplicated() {
        let p = payload(json!({
            "Alpha": { "Data": [ { "Income": "50000" }, { "Income": "50000" } ] },
        }));

        let report = Aggregator::new().aggregate(&p, NO_STRINGS, NO_STRINGS);
        assert_eq!(report.income.len(), 2);
    }

    #[test]
    fn test_phones_and_names_flow_into_report() {
        let report = Aggregator::new().aggregate(
            &RawProviderPayload::new(),
            ["+14403828826", "(440) 382-8826"],
            ["Susan Abazia Site Manager", "SUSAN ABAZIA"],
        );

        assert_eq!(report.phones.len(), 1);
        assert_eq!(report.names.len(), 1);
        assert_eq!(report.names[0].cleaned, "Susan Abazia");
        assert_eq!(report.record_count(), 0);
    }

    #[test]
    fn test_report_field_names() {
        let report = Aggregator::new().aggregate(&RawProviderPayload::new(), NO_STRINGS, NO_STRINGS);
        let value = serde_json::to_value(&report).unwrap();

        for key in ["phones", "names", "vehicles", "family", "realEstate", "income", "stats"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
