//! Aggregated test report summary models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute name to value, as written in the report document.
pub type Attributes = BTreeMap<String, String>;

/// The kinds of per-test-case detail elements captured from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    Error,
    Failure,
}

impl DetailKind {
    /// Every captured kind, in the order they are collected.
    pub const ALL: [Self; 2] = [Self::Error, Self::Failure];

    /// The element name in the report document.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Failure => "failure",
        }
    }

    /// The summary key the detail list is stored under.
    pub const fn summary_key(&self) -> &'static str {
        match self {
            Self::Error => "error_details",
            Self::Failure => "failure_details",
        }
    }
}

/// One flattened `error` or `failure` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// The element's own attributes (never contains `text`).
    #[serde(flatten)]
    pub attributes: Attributes,

    /// The element's text body, if it has one.
    pub text: Option<String>,
}

impl DetailRecord {
    /// Build a record; a `text` attribute is replaced by the element body.
    pub fn new(mut attributes: Attributes, text: Option<String>) -> Self {
        attributes.remove("text");
        Self { attributes, text }
    }
}

/// Summary of one report file: its root attributes plus any detail lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteEntry {
    #[serde(flatten)]
    pub attributes: Attributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Vec<DetailRecord>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_details: Option<Vec<DetailRecord>>,
}

impl SuiteEntry {
    pub fn new(attributes: Attributes) -> Self {
        let mut attributes = attributes;
        for kind in DetailKind::ALL {
            attributes.remove(kind.summary_key());
        }
        Self {
            attributes,
            error_details: None,
            failure_details: None,
        }
    }

    pub fn details(&self, kind: DetailKind) -> Option<&[DetailRecord]> {
        match kind {
            DetailKind::Error => self.error_details.as_deref(),
            DetailKind::Failure => self.failure_details.as_deref(),
        }
    }

    /// Attach a detail list. Empty lists are not recorded.
    pub fn set_details(&mut self, kind: DetailKind, records: Vec<DetailRecord>) {
        let records = (!records.is_empty()).then_some(records);
        match kind {
            DetailKind::Error => self.error_details = records,
            DetailKind::Failure => self.failure_details = records,
        }
    }
}

/// Aggregated results for a run, keyed by test suite name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestSuiteSummary {
    suites: BTreeMap<String, SuiteEntry>,
}

impl TestSuiteSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a suite, returning the entry it replaced if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, entry: SuiteEntry) -> Option<SuiteEntry> {
        self.suites.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&SuiteEntry> {
        self.suites.get(name)
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
