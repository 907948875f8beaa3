use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::observer::{ExtractionEvent, ExtractionObserver, NoopObserver, RecordKind, SkipReason};

pub const DEFAULT_JOB_TITLES: &[&str] = &[
    "manager",
    "director",
    "ceo",
    "cto",
    "cfo",
    "president",
    "vice president",
    "vp",
    "supervisor",
    "coordinator",
    "specialist",
    "assistant",
    "associate",
    "analyst",
    "engineer",
    "developer",
    "consultant",
    "advisor",
    "executive",
    "officer",
    "site manager",
    "project manager",
    "team lead",
    "senior",
    "junior",
    "lead",
    "administrator",
    "technician",
    "operator",
    "representative",
    "agent",
    "secretary",
    "clerk",
    "receptionist",
    "accountant",
    "lawyer",
    "attorney",
    "doctor",
    "nurse",
    "teacher",
    "professor",
    "instructor",
    "trainer",
];

static GENERATIONAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:(?:jr|sr)\.?|iii|ii|iv)$").expect("suffix pattern is valid")
});

/// Shortest comparison key that may match as a substring of another.
const MIN_SUBSTRING_LEN: usize = 4;
/// Shared tokens must be longer than initials or particles.
const MIN_SHARED_TOKEN_LEN: usize = 3;
const MIN_SHARED_TOKENS: usize = 2;

/// How a raw name came to belong to its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// The input that founded the cluster.
    Canonical,
    ExactKey,
    Substring,
    SharedTokens,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSource {
    pub raw: String,
    pub cleaned: String,
    pub rule: MatchRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedName {
    pub cleaned: String,
    pub sources: Vec<NameSource>,
}

impl NormalizedName {
    pub fn raw_sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.raw.as_str())
    }
}

struct Candidate {
    raw: String,
    cleaned: String,
}

struct Cluster {
    name: NormalizedName,
    key: String,
}

/// Lowercase letters and single spaces.
#[must_use]
pub fn comparison_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn match_rule(candidate: &str, existing: &str) -> Option<MatchRule> {
    if candidate == existing {
        return Some(MatchRule::ExactKey);
    }

    let contains = |outer: &str, inner: &str| {
        inner.chars().count() >= MIN_SUBSTRING_LEN && outer.contains(inner)
    };
    if contains(existing, candidate) || contains(candidate, existing) {
        return Some(MatchRule::Substring);
    }

    let candidate_parts: Vec<&str> = candidate.split_whitespace().collect();
    let existing_parts: Vec<&str> = existing.split_whitespace().collect();
    if candidate_parts.len() < 2 || existing_parts.len() < 2 {
        return None;
    }

    let mut shared: Vec<&str> = candidate_parts
        .into_iter()
        .filter(|part| {
            part.chars().count() >= MIN_SHARED_TOKEN_LEN && existing_parts.contains(part)
        })
        .collect();
    shared.sort_unstable();
    shared.dedup();

    (shared.len() >= MIN_SHARED_TOKENS).then_some(MatchRule::SharedTokens)
}

fn trim_trailing_punctuation(name: &str) -> &str {
    name.trim_end_matches(|c: char| c == ',' || c == '-' || c.is_whitespace())
}

#[derive(Debug, Clone)]
pub struct NameNormalizer {
    /// Lowercase titles split into words, longest first.
    job_titles: Vec<Vec<String>>,
}

impl NameNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_job_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.job_titles.clear();
        self.extend_job_titles(titles);
        self
    }

    pub fn extend_job_titles<I, S>(&mut self, titles: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for title in titles {
            let words: Vec<String> = title
                .as_ref()
                .split_whitespace()
                .map(str::to_lowercase)
                .collect();
            if !words.is_empty() && !self.job_titles.contains(&words) {
                self.job_titles.push(words);
            }
        }
        self.job_titles.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then_with(|| b.concat().len().cmp(&a.concat().len()))
        });
    }

    /// Strips job titles from either end, generational suffixes and trailing
    /// punctuation until nothing changes. A name made only of a title is kept.
    #[must_use]
    pub fn clean(&self, raw: &str) -> String {
        let mut current = trim_trailing_punctuation(raw.trim()).to_string();

        loop {
            let mut words: Vec<&str> = current.split_whitespace().collect();
            self.strip_titles(&mut words);

            let joined = words.join(" ");
            let without_suffix = GENERATIONAL_SUFFIX.replace(&joined, "");
            let next = trim_trailing_punctuation(without_suffix.trim()).to_string();

            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn strip_titles(&self, words: &mut Vec<&str>) {
        loop {
            let before = words.len();

            if let Some(title) = self.job_titles.iter().find(|title| {
                words.len() > title.len()
                    && words[words.len() - title.len()..]
                        .iter()
                        .zip(title.iter())
                        .all(|(w, t)| w.to_lowercase() == *t)
            }) {
                words.truncate(words.len() - title.len());
            }

            if let Some(title) = self.job_titles.iter().find(|title| {
                words.len() > title.len()
                    && words[..title.len()]
                        .iter()
                        .zip(title.iter())
                        .all(|(w, t)| w.to_lowercase() == *t)
            }) {
                words.drain(..title.len());
            }

            if words.len() == before {
                return;
            }
        }
    }

    pub fn normalize<I, S>(&self, raw: I) -> Vec<NormalizedName>
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
    ) -> Vec<NormalizedName>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut candidates: Vec<Candidate> = Vec::new();
        for name in raw {
            let raw = name.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let cleaned = self.clean(raw);
            if cleaned.is_empty() {
                observer.on_event(&ExtractionEvent::RecordDropped {
                    kind: RecordKind::Name,
                    value: raw.to_string(),
                    reason: SkipReason::EmptyAfterCleaning,
                });
                continue;
            }
            candidates.push(Candidate {
                raw: raw.to_string(),
                cleaned,
            });
        }

        candidates.sort_by(|a, b| b.cleaned.chars().count().cmp(&a.cleaned.chars().count()));

        let mut clusters: Vec<Cluster> = Vec::new();
        for candidate in candidates {
            let key = comparison_key(&candidate.cleaned);

            let matched = clusters
                .iter_mut()
                .find_map(|cluster| match_rule(&key, &cluster.key).map(|rule| (cluster, rule)));

            if let Some((cluster, rule)) = matched {
                observer.on_event(&ExtractionEvent::DuplicateMerged {
                    kind: RecordKind::Name,
                    key: cluster.key.clone(),
                    value: candidate.raw.clone(),
                });
                if !cluster.name.raw_sources().any(|r| r == candidate.raw) {
                    cluster.name.sources.push(NameSource {
                        raw: candidate.raw,
                        cleaned: candidate.cleaned,
                        rule,
                    });
                }
                continue;
            }

            if candidate.cleaned.chars().count() <= 1 {
                observer.on_event(&ExtractionEvent::RecordDropped {
                    kind: RecordKind::Name,
                    value: candidate.raw,
                    reason: SkipReason::EmptyAfterCleaning,
                });
                continue;
            }

            clusters.push(Cluster {
                name: NormalizedName {
                    cleaned: candidate.cleaned.clone(),
                    sources: vec![NameSource {
                        raw: candidate.raw,
                        cleaned: candidate.cleaned,
                        rule: MatchRule::Canonical,
                    }],
                },
                key,
            });
        }

        clusters.into_iter().map(|c| c.name).collect()
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        let mut normalizer = Self {
            job_titles: Vec::new(),
        };
        normalizer.extend_job_titles(DEFAULT_JOB_TITLES);
        normalizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_titles_and_suffixes() {
        let normalizer = NameNormalizer::new();

        assert_eq!(normalizer.clean("Susan Abazia Site Manager"), "Susan Abazia");
        assert_eq!(normalizer.clean("Abazia Susan -"), "Abazia Susan");
        assert_eq!(normalizer.clean("SUSAN ABAZIA L"), "SUSAN ABAZIA L");
        assert_eq!(normalizer.clean("Director  John   Smith"), "John Smith");
        assert_eq!(normalizer.clean("John Smith Jr."), "John Smith");
        assert_eq!(normalizer.clean("John Smith III,"), "John Smith");
        assert_eq!(normalizer.clean("John Smith Sr Senior Engineer"), "John Smith");
        assert_eq!(normalizer.clean("Manager"), "Manager");
        assert_eq!(normalizer.clean(" - "), "");
    }

    #[test]
    fn test_same_person_variants_merge() {
        let names = NameNormalizer::new().normalize([
            "Susan Abazia Site Manager",
            "Abazia Susan -",
            "SUSAN ABAZIA L",
            "SUSAN COOK",
        ]);

        assert_eq!(names.len(), 2);

        let abazia = &names[0];
        assert_eq!(abazia.cleaned, "SUSAN ABAZIA L");
        let raws: Vec<&str> = abazia.raw_sources().collect();
        assert_eq!(raws.len(), 3);
        assert!(raws.contains(&"Susan Abazia Site Manager"));
        assert!(raws.contains(&"Abazia Susan -"));
        assert_eq!(abazia.sources[0].rule, MatchRule::Canonical);
        assert_eq!(abazia.sources[1].rule, MatchRule::Substring);
        assert_eq!(abazia.sources[2].rule, MatchRule::SharedTokens);

        assert_eq!(names[1].cleaned, "SUSAN COOK");
        assert_eq!(names[1].sources.len(), 1);
    }

    #[test]
    fn test_shared_surname_alone_stays_distinct() {
        let names = NameNormalizer::new().normalize(["Mary Jones", "Peter Jones"]);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_short_keys_do_not_substring_match() {
        // "ann" is too short to be treated as contained in "joanna"
        let names = NameNormalizer::new().normalize(["Joanna", "Ann"]);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_repeated_input_kept_once() {
        let names = NameNormalizer::new().normalize(["Mary Jones", "Mary Jones", "MARY JONES"]);
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].sources.len(), 2);
        assert_eq!(names[0].sources[1].rule, MatchRule::ExactKey);
    }

    #[test]
    fn test_degenerate_names_dropped() {
        let names = NameNormalizer::new().normalize(["", "-", "J"]);
        assert!(names.is_empty());
    }

    #[test]
    fn test_letterless_name_kept_on_cleaned_length() {
        let names = NameNormalizer::new().normalize(["1234", "5678", "Ann Lee"]);

        assert_eq!(names.len(), 2);
        assert_eq!(names[0].cleaned, "Ann Lee");
        assert_eq!(names[1].cleaned, "1234");
        assert_eq!(names[1].sources[1].raw, "5678");
        assert_eq!(names[1].sources[1].rule, MatchRule::ExactKey);
    }

    #[test]
    fn test_custom_titles() {
        let normalizer = NameNormalizer::new().with_job_titles(["sheriff"]);
        assert_eq!(normalizer.clean("Bob Lee Sheriff"), "Bob Lee");
        assert_eq!(normalizer.clean("Bob Lee Manager"), "Bob Lee Manager");
    }

    #[test]
    fn test_comparison_key() {
        assert_eq!(comparison_key("O'Brien,  Pat-3"), "obrien pat");
        assert_eq!(comparison_key("  "), "");
    }
}
