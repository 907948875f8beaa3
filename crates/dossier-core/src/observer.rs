//! Hook points the aggregation pipeline reports through.
//!
//! Nothing in the pipeline writes to a shared output stream. Callers that
//! want narration pass an observer; [`TracingObserver`] forwards to
//! `tracing`, [`RecordingObserver`] keeps events in memory.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Phone,
    Name,
    Vehicle,
    Family,
    RealEstate,
    Income,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Name => "name",
            Self::Vehicle => "vehicle",
            Self::Family => "family",
            Self::RealEstate => "real_estate",
            Self::Income => "income",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a piece of upstream data did not become (part of) a record.
/// None of these abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Provider without a `Data` sequence, or an entry that is not an object.
    MissingData,
    /// Field holding a placeholder for "unknown".
    SentinelValue,
    /// Count field that does not start with an integer.
    UnparseableNumber,
    /// Name or phone with nothing left after cleaning.
    EmptyAfterCleaning,
    /// Address too vague to identify a property.
    NonSpecificAddress,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingData => "missing_data",
            Self::SentinelValue => "sentinel_value",
            Self::UnparseableNumber => "unparseable_number",
            Self::EmptyAfterCleaning => "empty_after_cleaning",
            Self::NonSpecificAddress => "non_specific_address",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractionEvent {
    ProviderStarted {
        provider: String,
        entries: usize,
    },
    ProviderSkipped {
        provider: String,
        reason: SkipReason,
    },
    EntrySkipped {
        provider: String,
        index: usize,
        reason: SkipReason,
    },
    FieldSkipped {
        provider: String,
        field: String,
        reason: SkipReason,
    },
    RecordExtracted {
        provider: String,
        kind: RecordKind,
    },
    RecordDropped {
        kind: RecordKind,
        value: String,
        reason: SkipReason,
    },
    DuplicateMerged {
        kind: RecordKind,
        key: String,
        value: String,
    },
    MainPhoneReplaced {
        previous: String,
        current: String,
    },
}

pub trait ExtractionObserver: Send + Sync {
    fn on_event(&self, _event: &ExtractionEvent) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_event(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::ProviderStarted { provider, entries } => {
                tracing::debug!(%provider, entries, "Scanning provider");
            }
            ExtractionEvent::ProviderSkipped { provider, reason } => {
                tracing::debug!(%provider, %reason, "Skipping provider");
            }
            ExtractionEvent::EntrySkipped {
                provider,
                index,
                reason,
            } => {
                tracing::debug!(%provider, index, %reason, "Skipping entry");
            }
            ExtractionEvent::FieldSkipped {
                provider,
                field,
                reason,
            } => {
                tracing::trace!(%provider, %field, %reason, "Ignoring field");
            }
            ExtractionEvent::RecordExtracted { provider, kind } => {
                tracing::debug!(%provider, %kind, "Extracted record");
            }
            ExtractionEvent::RecordDropped {
                kind,
                value,
                reason,
            } => {
                tracing::debug!(%kind, %value, %reason, "Dropped record");
            }
            ExtractionEvent::DuplicateMerged { kind, key, value } => {
                tracing::trace!(%kind, %key, %value, "Merged duplicate");
            }
            ExtractionEvent::MainPhoneReplaced { previous, current } => {
                tracing::warn!(
                    %previous,
                    %current,
                    "Several numbers qualify as main phone; keeping the last one"
                );
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn into_events(self) -> Vec<ExtractionEvent> {
        self.events
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExtractionObserver for RecordingObserver {
    fn on_event(&self, event: &ExtractionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
