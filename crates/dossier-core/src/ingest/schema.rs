//! Provider field vocabulary.
//!
//! Each logical attribute maps to an ordered list of field names; the first
//! one holding a real value wins. Supporting a new provider schema means
//! adding names here (or in a JSON override), not new branches in the
//! extractor.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::IncomeKind;
use crate::value::{Entry, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldChain(Vec<String>);

impl FieldChain {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First candidate holding a string or number that is not a placeholder.
    pub fn resolve(&self, entry: &Entry) -> Option<String> {
        self.lookup(entry, FieldValue::read, |_| {})
    }

    /// Walks the candidates with `read`, reporting each placeholder met on
    /// the way to the first real value.
    pub fn lookup<R, F>(&self, entry: &Entry, read: R, mut on_sentinel: F) -> Option<String>
    where
        R: Fn(&Entry, &str) -> FieldValue,
        F: FnMut(&str),
    {
        for name in &self.0 {
            match read(entry, name) {
                FieldValue::Text(text) => return Some(text),
                FieldValue::Sentinel => on_sentinel(name),
                FieldValue::Missing => {}
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleFields {
    pub make: FieldChain,
    pub model: FieldChain,
    pub year: FieldChain,
    pub vin: FieldChain,
    pub license: FieldChain,
}

impl Default for VehicleFields {
    fn default() -> Self {
        Self {
            make: FieldChain::new(["AutoBrand"]),
            model: FieldChain::new(["AutoModel"]),
            year: FieldChain::new(["IssueYear"]),
            vin: FieldChain::new(["VIN"]),
            license: FieldChain::new(["LicensePlate"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyFields {
    /// Comma separated free text: `First Last <age> <phone>, ...`.
    pub relatives: FieldChain,
    pub child_count: FieldChain,
    pub alias: FieldChain,
}

impl Default for FamilyFields {
    fn default() -> Self {
        Self {
            relatives: FieldChain::new(["Relatives"]),
            child_count: FieldChain::new(["AmountKids", "NumberOfChildren"]),
            alias: FieldChain::new(["NickName"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealEstateFields {
    pub address: FieldChain,
    pub city: FieldChain,
    pub state: FieldChain,
    pub zip_code: FieldChain,
    pub value: FieldChain,
    pub year_built: FieldChain,
    pub mortgage_lender: FieldChain,
    pub property_type: FieldChain,
}

impl Default for RealEstateFields {
    fn default() -> Self {
        Self {
            address: FieldChain::new(["Address"]),
            city: FieldChain::new(["City"]),
            state: FieldChain::new(["State"]),
            zip_code: FieldChain::new(["PostCode"]),
            value: FieldChain::new(["HomeValue", "PropertyValue", "EstimatedValue"]),
            year_built: FieldChain::new(["HomeBuiltYear", "PropertyYear"]),
            mortgage_lender: FieldChain::new(["MortgageLenderName"]),
            property_type: FieldChain::new(["PropertyType"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeField {
    pub fields: FieldChain,
    pub kind: IncomeKind,
}

impl IncomeField {
    #[must_use]
    pub fn new(field: &str, kind: IncomeKind) -> Self {
        Self {
            fields: FieldChain::new([field]),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    pub vehicle: VehicleFields,
    pub family: FamilyFields,
    pub real_estate: RealEstateFields,
    /// Checked independently; one entry may yield several income records.
    pub income: Vec<IncomeField>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            vehicle: VehicleFields::default(),
            family: FamilyFields::default(),
            real_estate: RealEstateFields::default(),
            income: vec![
                IncomeField::new("Income", IncomeKind::PersonalIncome),
                IncomeField::new("Salary", IncomeKind::Salary),
                IncomeField::new("AnnualIncome", IncomeKind::PersonalIncome),
                IncomeField::new("AnnualRevenue", IncomeKind::CompanyRevenue),
            ],
        }
    }
}

impl FieldSchema {
    /// Parses a (possibly partial) schema document. Sections left out keep
    /// their built-in field names.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<()> {
        let chains = [
            ("vehicle.make", &self.vehicle.make),
            ("vehicle.model", &self.vehicle.model),
            ("vehicle.year", &self.vehicle.year),
            ("vehicle.vin", &self.vehicle.vin),
            ("vehicle.license", &self.vehicle.license),
            ("family.relatives", &self.family.relatives),
            ("family.child_count", &self.family.child_count),
            ("family.alias", &self.family.alias),
            ("real_estate.address", &self.real_estate.address),
            ("real_estate.city", &self.real_estate.city),
            ("real_estate.state", &self.real_estate.state),
            ("real_estate.zip_code", &self.real_estate.zip_code),
            ("real_estate.value", &self.real_estate.value),
            ("real_estate.year_built", &self.real_estate.year_built),
            ("real_estate.mortgage_lender", &self.real_estate.mortgage_lender),
            ("real_estate.property_type", &self.real_estate.property_type),
        ];

        let income = self
            .income
            .iter()
            .enumerate()
            .map(|(i, field)| (format!("income[{i}]"), &field.fields));

        for (path, chain) in chains
            .into_iter()
            .map(|(path, chain)| (path.to_string(), chain))
            .chain(income)
        {
            if chain.is_empty() {
                return Err(Error::InvalidSchema(format!("{path} has no candidate fields")));
            }
            if chain.names().iter().any(|name| name.trim().is_empty()) {
                return Err(Error::InvalidSchema(format!("{path} contains a blank field name")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> Entry {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_chain_takes_first_real_value() {
        let chain = FieldChain::new(["HomeValue", "PropertyValue", "EstimatedValue"]);
        let e = entry(json!({ "HomeValue": "N/A", "PropertyValue": "", "EstimatedValue": 250000 }));

        let mut skipped = Vec::new();
        let value = chain.lookup(&e, FieldValue::read, |name| skipped.push(name.to_string()));

        assert_eq!(value.as_deref(), Some("250000"));
        assert_eq!(skipped, vec!["HomeValue", "PropertyValue"]);
    }

    #[test]
    fn test_chain_all_sentinel() {
        let chain = FieldChain::new(["Income"]);
        assert_eq!(chain.resolve(&entry(json!({ "Income": "U" }))), None);
        assert_eq!(chain.resolve(&entry(json!({}))), None);
    }

    #[test]
    fn test_default_schema_is_valid() {
        assert!(FieldSchema::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let schema = FieldSchema::from_json(
            r#"{ "vehicle": { "make": ["Make", "AutoBrand"] }, "income": [] }"#,
        )
        .unwrap();

        assert_eq!(schema.vehicle.make.names(), ["Make", "AutoBrand"]);
        assert_eq!(schema.vehicle.vin.names(), ["VIN"]);
        assert_eq!(schema.real_estate, RealEstateFields::default());
        assert!(schema.income.is_empty());
    }

    #[test]
    fn test_empty_chain_rejected() {
        let err = FieldSchema::from_json(r#"{ "family": { "alias": [] } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(msg) if msg.contains("family.alias")));

        let err = FieldSchema::from_json(
            r#"{ "income": [ { "fields": [" "], "kind": "salary" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(msg) if msg.contains("income[0]")));
    }

    #[test]
    fn test_schema_round_trips_through_json() {
        let json = serde_json::to_string(&FieldSchema::default()).unwrap();
        assert_eq!(FieldSchema::from_json(&json).unwrap(), FieldSchema::default());
    }
}
