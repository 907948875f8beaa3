use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::observer::{ExtractionEvent, ExtractionObserver, NoopObserver, RecordKind, SkipReason};

/// Below this, only a parenthesized form has a category to land in.
const MIN_DIGITS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneCategory {
    Main,
    Formatted,
    Mobile,
    Landline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPhone {
    /// Dedup key: digits with the North American trunk prefix folded away.
    pub key: String,
    /// Digits of `display`.
    pub digits: String,
    pub display: String,
    pub category: PhoneCategory,
    /// Every distinct raw string that collapsed into this number.
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneClassification {
    pub main: Option<NormalizedPhone>,
    pub formatted: Vec<NormalizedPhone>,
    pub mobile: Vec<NormalizedPhone>,
    pub landline: Vec<NormalizedPhone>,
}

impl PhoneClassification {
    pub fn len(&self) -> usize {
        usize::from(self.main.is_some())
            + self.formatted.len()
            + self.mobile.len()
            + self.landline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedPhone> {
        self.main
            .iter()
            .chain(&self.formatted)
            .chain(&self.mobile)
            .chain(&self.landline)
    }

    pub fn find(&self, raw: &str) -> Option<&NormalizedPhone> {
        let key = dedup_key(raw);
        self.iter().find(|phone| phone.key == key)
    }
}

#[must_use]
pub fn digits_of(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// `+1 (440) 382-8826`, `14403828826` and `440.382.8826` share one key.
#[must_use]
pub fn dedup_key(raw: &str) -> String {
    let digits = digits_of(raw);
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Preference among textual forms of one number: international prefix,
/// then parenthesized area code, then hyphenated, then anything.
fn display_rank(display: &str) -> u8 {
    if display.starts_with("+1") {
        3
    } else if is_parenthesized(display) {
        2
    } else if display.contains('-') {
        1
    } else {
        0
    }
}

fn is_parenthesized(display: &str) -> bool {
    display.contains('(') && display.contains(')')
}

/// Drops raw strings no category accepts: no digits at all, or too few
/// digits without a parenthesized area code.
fn is_classifiable(raw: &str, digit_count: usize) -> bool {
    digit_count >= MIN_DIGITS || (digit_count > 0 && is_parenthesized(raw))
}

fn classify(digits: &str, display: &str) -> PhoneCategory {
    let len = digits.len();
    if len == 11 && display.starts_with("+1") {
        PhoneCategory::Main
    } else if is_parenthesized(display) {
        PhoneCategory::Formatted
    } else if len == 10 && !display.starts_with('+') {
        PhoneCategory::Mobile
    } else if (MIN_DIGITS..10).contains(&len) {
        PhoneCategory::Landline
    } else {
        PhoneCategory::Mobile
    }
}

struct PhoneGroup {
    key: String,
    display: String,
    variants: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneNormalizer;

impl PhoneNormalizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub fn normalize<I, S>(&self, raw: I) -> PhoneClassification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.normalize_observed(raw, &NoopObserver)
    }

    pub fn normalize_observed<I, S>(
        &self,
        raw: I,
        observer: &dyn ExtractionObserver,
    ) -> PhoneClassification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = Self::group(raw, observer);
        Self::classify_groups(groups, observer)
    }

    fn group<I, S>(raw: I, observer: &dyn ExtractionObserver) -> Vec<PhoneGroup>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut groups: Vec<PhoneGroup> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for phone in raw {
            let phone = phone.as_ref().trim();
            let key = dedup_key(phone);

            if !is_classifiable(phone, digits_of(phone).len()) {
                if !phone.is_empty() {
                    observer.on_event(&ExtractionEvent::RecordDropped {
                        kind: RecordKind::Phone,
                        value: phone.to_string(),
                        reason: SkipReason::EmptyAfterCleaning,
                    });
                }
                continue;
            }

            if let Some(&idx) = by_key.get(&key) {
                let group = &mut groups[idx];
                if !group.variants.iter().any(|v| v == phone) {
                    group.variants.push(phone.to_string());
                }
                if display_rank(phone) > display_rank(&group.display) {
                    group.display = phone.to_string();
                }
                observer.on_event(&ExtractionEvent::DuplicateMerged {
                    kind: RecordKind::Phone,
                    key,
                    value: phone.to_string(),
                });
                continue;
            }

            by_key.insert(key.clone(), groups.len());
            groups.push(PhoneGroup {
                key,
                display: phone.to_string(),
                variants: vec![phone.to_string()],
            });
        }

        groups
    }

    fn classify_groups(
        groups: Vec<PhoneGroup>,
        observer: &dyn ExtractionObserver,
    ) -> PhoneClassification {
        let mut result = PhoneClassification::default();

        for group in groups {
            let digits = digits_of(&group.display);
            let category = classify(&digits, &group.display);
            let phone = NormalizedPhone {
                key: group.key,
                digits,
                display: group.display,
                category,
                variants: group.variants,
            };

            match category {
                PhoneCategory::Main => {
                    let current = phone.display.clone();
                    if let Some(mut previous) = result.main.replace(phone) {
                        observer.on_event(&ExtractionEvent::MainPhoneReplaced {
                            previous: previous.display.clone(),
                            current,
                        });
                        previous.category = PhoneCategory::Mobile;
                        result.mobile.push(previous);
                    }
                }
                PhoneCategory::Formatted => result.formatted.push(phone),
                PhoneCategory::Mobile => result.mobile.push(phone),
                PhoneCategory::Landline => result.landline.push(phone),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;

    #[test]
    fn test_international_forms_collapse_to_main() {
        let result =
            PhoneNormalizer::new().normalize(["+14403828826", "(440) 382-8826", "14403828826"]);

        let main = result.main.as_ref().unwrap();
        assert_eq!(main.display, "+14403828826");
        assert_eq!(main.digits, "14403828826");
        assert_eq!(main.variants.len(), 3);
        assert!(result.formatted.is_empty());
        assert!(result.mobile.is_empty());
        assert!(result.landline.is_empty());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_hyphenated_form_survives() {
        let result = PhoneNormalizer::new().normalize([
            "4409512603",
            "4409513757",
            "440-655-6937",
            "4406556937",
        ]);

        assert_eq!(result.len(), 3);
        assert!(result.main.is_none());

        let merged = result.find("4406556937").unwrap();
        assert_eq!(merged.display, "440-655-6937");
        assert_eq!(merged.category, PhoneCategory::Mobile);
        assert_eq!(merged.variants, vec!["440-655-6937", "4406556937"]);
        assert_eq!(
            result.mobile.iter().filter(|p| p.key == "4406556937").count(),
            1
        );
    }

    #[test]
    fn test_survivor_independent_of_order() {
        let forward =
            PhoneNormalizer::new().normalize(["4406556937", "440-655-6937", "(440) 655-6937"]);
        let backward =
            PhoneNormalizer::new().normalize(["(440) 655-6937", "440-655-6937", "4406556937"]);

        assert_eq!(forward.formatted[0].display, "(440) 655-6937");
        assert_eq!(backward.formatted[0].display, "(440) 655-6937");
    }

    #[test]
    fn test_landline_and_short_numbers() {
        let result = PhoneNormalizer::new().normalize(["9512603", "12345", "", "N/A"]);

        assert_eq!(result.len(), 1);
        assert_eq!(result.landline[0].display, "9512603");
    }

    #[test]
    fn test_short_parenthesized_number_is_formatted() {
        let result = PhoneNormalizer::new().normalize(["(44) 123", "44123", "()"]);

        assert_eq!(result.len(), 1);
        assert_eq!(result.formatted[0].display, "(44) 123");
        assert_eq!(result.formatted[0].digits, "44123");
        assert_eq!(result.formatted[0].variants, vec!["(44) 123"]);
    }

    #[test]
    fn test_count_matches_distinct_keys() {
        let raw = [
            "+14403828826",
            "(440) 382-8826",
            "14403828826",
            "9512603",
            "4409512603",
            "4409513757",
            "440-655-6937",
            "4406556937",
        ];
        let result = PhoneNormalizer::new().normalize(raw);

        let mut keys: Vec<String> = raw.iter().map(|r| dedup_key(r)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(result.len(), keys.len());
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_second_main_replaces_first() {
        let observer = RecordingObserver::new();
        let result =
            PhoneNormalizer::new().normalize_observed(["+14403828826", "+16465357491"], &observer);

        assert_eq!(result.main.as_ref().unwrap().display, "+16465357491");
        assert_eq!(result.mobile.len(), 1);
        assert_eq!(result.mobile[0].display, "+14403828826");
        assert_eq!(result.len(), 2);
        assert!(observer
            .events()
            .iter()
            .any(|e| matches!(e, ExtractionEvent::MainPhoneReplaced { .. })));
    }

    #[test]
    fn test_foreign_number_is_catch_all_mobile() {
        let result = PhoneNormalizer::new().normalize(["+44 20 7946 0958"]);

        assert_eq!(result.mobile.len(), 1);
        assert_eq!(result.mobile[0].digits, "442079460958");
    }
}
