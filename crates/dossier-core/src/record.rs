use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub make: String,
    pub model: String,
    pub year: String,
    pub vin: String,
    pub license: String,
}

impl VehicleRecord {
    /// Key used to collapse the same vehicle reported by several providers.
    /// The VIN identifies a vehicle on its own; otherwise every descriptive
    /// field has to agree.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        if self.vin.is_empty() {
            format!(
                "{}|{}|{}|{}",
                self.make.to_lowercase(),
                self.model.to_lowercase(),
                self.year.to_lowercase(),
                self.license.to_lowercase(),
            )
        } else {
            format!("vin:{}", self.vin.to_uppercase())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Relative,
    HouseholdInfo,
    Alias,
}

impl Relationship {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::HouseholdInfo => "household_info",
            Self::Alias => "alias",
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub name: String,
    pub relationship: Relationship,
    pub phone: String,
    pub age: String,
}

impl FamilyMember {
    #[must_use]
    pub const fn new(name: String, relationship: Relationship) -> Self {
        Self {
            name,
            relationship,
            phone: String::new(),
            age: String::new(),
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: String) -> Self {
        self.phone = phone;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateProperty {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub value: String,
    pub year_built: String,
    pub mortgage_lender: String,
    pub property_type: String,
}

impl RealEstateProperty {
    /// Lowercase alphanumerics of the address.
    #[must_use]
    pub fn address_key(&self) -> String {
        self.address
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    /// Whether the address is too vague to identify a property.
    #[must_use]
    pub fn is_non_specific(&self) -> bool {
        let collapsed = self
            .address
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        self.address_key().len() < 6 || collapsed.contains("united states")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKind {
    PersonalIncome,
    Salary,
    CompanyRevenue,
}

impl IncomeKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalIncome => "personal_income",
            Self::Salary => "salary",
            Self::CompanyRevenue => "company_revenue",
        }
    }
}

impl std::fmt::Display for IncomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    pub amount: String,
    pub source: String,
    pub kind: IncomeKind,
}
