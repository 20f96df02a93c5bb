//! Raw form state as bound to the query builder's controls.
//!
//! Text inputs are kept as the strings the user typed; selectors are typed.

use super::TimeUnit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a dynamically added form section or row.
pub type SectionId = u64;

/// Kind selector of a group-by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupByKind {
    #[default]
    Tags,
    Time,
    Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupByRow {
    pub id: SectionId,
    pub kind: GroupByKind,
    /// Space or comma separated tag names (kind `tags`).
    pub tag_names: String,
    pub time_size: String,
    pub time_unit: TimeUnit,
    pub time_count: String,
    pub value_size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorRow {
    pub id: SectionId,
    pub name: String,
    pub sampling_value: String,
    pub sampling_unit: TimeUnit,
}

impl Default for AggregatorRow {
    fn default() -> Self {
        Self {
            id: 0,
            name: "sum".to_string(),
            sampling_value: "1".to_string(),
            sampling_unit: TimeUnit::Milliseconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRow {
    pub id: SectionId,
    pub name: String,
    pub value: String,
}

/// One metric tab.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSection {
    pub id: SectionId,
    pub name: String,
    pub tags: Vec<TagRow>,
    pub group_by: Vec<GroupByRow>,
    pub aggregators: Vec<AggregatorRow>,
}

/// Absolute date picker plus relative value/unit pair for one end of the range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeFields {
    pub absolute: Option<DateTime<Utc>>,
    pub relative_value: String,
    pub relative_unit: TimeUnit,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub metrics: Vec<MetricSection>,
    pub start: TimeFields,
    pub end: TimeFields,
}

impl FormState {
    pub fn metric(&self, id: SectionId) -> Option<&MetricSection> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn metric_mut(&mut self, id: SectionId) -> Option<&mut MetricSection> {
        self.metrics.iter_mut().find(|m| m.id == id)
    }
}
