//! Query model types and their JSON wire format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Time units understood by the time-series service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        };
        f.write_str(s)
    }
}

/// A relative duration such as "5 minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeTime {
    pub value: i64,
    pub unit: TimeUnit,
}

/// One end of the query's time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    Absolute { epoch_millis: i64 },
    Relative { value: i64, unit: TimeUnit },
}

/// A group-by clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum GroupBySpec {
    Tag {
        #[serde(rename = "tags")]
        tag_names: Vec<String>,
    },
    Time {
        range_size: RelativeTime,
        group_count: i64,
    },
    Value {
        range_size: i64,
    },
}

impl GroupBySpec {
    pub fn time(size: i64, unit: TimeUnit, count: i64) -> Self {
        GroupBySpec::Time {
            range_size: RelativeTime { value: size, unit },
            group_count: count,
        }
    }
}

/// An aggregator with an optional sampling window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorSpec {
    pub name: String,
    pub sampling_value: Option<i64>,
    pub sampling_unit: TimeUnit,
}

/// A metric selection: name, tag filters, group-bys and aggregators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricSpec {
    pub name: String,
    pub tags: Vec<(String, String)>,
    pub group_by: Vec<GroupBySpec>,
    pub aggregators: Vec<AggregatorSpec>,
}

impl MetricSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.push((name.into(), value.into()));
    }

    pub fn add_group_by(&mut self, group_by: GroupBySpec) {
        self.group_by.push(group_by);
    }

    pub fn add_aggregator(&mut self, name: impl Into<String>, sampling_value: Option<i64>, sampling_unit: TimeUnit) {
        self.aggregators.push(AggregatorSpec {
            name: name.into(),
            sampling_value,
            sampling_unit,
        });
    }
}

/// A complete query: at least one metric, a start bound and an optional end bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "QueryWire", try_from = "QueryWire")]
pub struct QueryRequest {
    pub metrics: Vec<MetricSpec>,
    pub start: TimeBound,
    pub end: Option<TimeBound>,
}

/// Errors raised while parsing a query document.
#[derive(Error, Debug)]
pub enum QueryParseError {
    #[error("invalid query JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryRequest {
    /// Pretty-printed JSON, as shown in the query text region.
    pub fn to_pretty_json(&self) -> String {
        // Serializing plain maps and numbers cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, QueryParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Wire representation
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SamplingWire {
    value: i64,
    unit: TimeUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AggregatorWire {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sampling: Option<SamplingWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetricWire {
    name: String,
    #[serde(default)]
    tags: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    group_by: Vec<GroupBySpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    aggregators: Vec<AggregatorWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueryWire {
    metrics: Vec<MetricWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_absolute: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_relative: Option<RelativeTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_absolute: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_relative: Option<RelativeTime>,
}

fn split_bound(bound: Option<TimeBound>) -> (Option<i64>, Option<RelativeTime>) {
    match bound {
        Some(TimeBound::Absolute { epoch_millis }) => (Some(epoch_millis), None),
        Some(TimeBound::Relative { value, unit }) => (None, Some(RelativeTime { value, unit })),
        None => (None, None),
    }
}

fn join_bound(absolute: Option<i64>, relative: Option<RelativeTime>) -> Option<TimeBound> {
    match (absolute, relative) {
        (Some(epoch_millis), _) => Some(TimeBound::Absolute { epoch_millis }),
        (None, Some(r)) => Some(TimeBound::Relative {
            value: r.value,
            unit: r.unit,
        }),
        (None, None) => None,
    }
}

impl From<MetricSpec> for MetricWire {
    fn from(metric: MetricSpec) -> Self {
        let mut tags = Map::new();
        for (name, value) in metric.tags {
            let entry = tags.entry(name).or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(values) = entry {
                values.push(Value::String(value));
            }
        }

        let aggregators = metric
            .aggregators
            .into_iter()
            .map(|a| AggregatorWire {
                name: a.name,
                sampling: a.sampling_value.map(|value| SamplingWire {
                    value,
                    unit: a.sampling_unit,
                }),
            })
            .collect();

        MetricWire {
            name: metric.name,
            tags,
            group_by: metric.group_by,
            aggregators,
        }
    }
}

impl TryFrom<MetricWire> for MetricSpec {
    type Error = String;

    fn try_from(wire: MetricWire) -> Result<Self, Self::Error> {
        if wire.name.is_empty() {
            return Err("metric name may not be empty".to_string());
        }

        let mut tags = Vec::new();
        for (name, value) in wire.tags {
            if name.is_empty() {
                return Err("Tag names cannot be empty".to_string());
            }
            let values = match value {
                Value::Array(values) => values,
                other => vec![other],
            };
            for value in values {
                match value {
                    Value::String(s) if !s.is_empty() => tags.push((name.clone(), s)),
                    _ => return Err(format!("Value for tag {} cannot be null or empty.", name)),
                }
            }
        }

        let aggregators = wire
            .aggregators
            .into_iter()
            .map(|a| AggregatorSpec {
                name: a.name,
                sampling_value: a.sampling.as_ref().map(|s| s.value),
                sampling_unit: a.sampling.map(|s| s.unit).unwrap_or_default(),
            })
            .collect();

        Ok(MetricSpec {
            name: wire.name,
            tags,
            group_by: wire.group_by,
            aggregators,
        })
    }
}

impl From<QueryRequest> for QueryWire {
    fn from(query: QueryRequest) -> Self {
        let (start_absolute, start_relative) = split_bound(Some(query.start));
        let (end_absolute, end_relative) = split_bound(query.end);
        QueryWire {
            metrics: query.metrics.into_iter().map(MetricWire::from).collect(),
            start_absolute,
            start_relative,
            end_absolute,
            end_relative,
        }
    }
}

impl TryFrom<QueryWire> for QueryRequest {
    type Error = String;

    fn try_from(wire: QueryWire) -> Result<Self, Self::Error> {
        if wire.metrics.is_empty() {
            return Err("metrics may not be empty".to_string());
        }
        let start = join_bound(wire.start_absolute, wire.start_relative)
            .ok_or_else(|| "start_absolute or start_relative is required".to_string())?;
        let end = join_bound(wire.end_absolute, wire.end_relative);

        let metrics = wire
            .metrics
            .into_iter()
            .map(MetricSpec::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryRequest { metrics, start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_metric_query() -> QueryRequest {
        let mut cpu = MetricSpec::new("sys.cpu");
        cpu.add_tag("host", "a");
        cpu.add_aggregator("sum", Some(1), TimeUnit::Minutes);
        QueryRequest {
            metrics: vec![cpu, MetricSpec::new("sys.mem")],
            start: TimeBound::Absolute {
                epoch_millis: 1_700_000_000_000,
            },
            end: None,
        }
    }

    #[test]
    fn test_serialize_two_metrics_without_end() {
        let text = two_metric_query().to_pretty_json();
        assert!(text.contains("\"sys.cpu\""));
        assert!(text.contains("\"sys.mem\""));
        assert!(text.contains("1700000000000"));
        assert!(!text.contains("end_"));
    }

    #[test]
    fn test_serialize_wire_shape() {
        let mut metric = MetricSpec::new("requests");
        metric.add_tag("host", "a");
        metric.add_tag("dc", "east");
        metric.add_tag("host", "b");
        metric.add_group_by(GroupBySpec::Tag {
            tag_names: vec!["host".to_string()],
        });
        metric.add_group_by(GroupBySpec::time(1, TimeUnit::Hours, 24));
        metric.add_group_by(GroupBySpec::Value { range_size: 10 });
        metric.add_aggregator("rate", None, TimeUnit::Seconds);

        let query = QueryRequest {
            metrics: vec![metric],
            start: TimeBound::Relative {
                value: 2,
                unit: TimeUnit::Hours,
            },
            end: Some(TimeBound::Relative {
                value: 5,
                unit: TimeUnit::Minutes,
            }),
        };

        let json = serde_json::to_value(&query).unwrap();
        let metric = &json["metrics"][0];
        assert_eq!(metric["tags"]["host"], serde_json::json!(["a", "b"]));
        let tag_keys: Vec<&String> = metric["tags"].as_object().unwrap().keys().collect();
        assert_eq!(tag_keys, vec!["host", "dc"]);
        assert_eq!(metric["group_by"][0], serde_json::json!({"name": "tag", "tags": ["host"]}));
        assert_eq!(
            metric["group_by"][1],
            serde_json::json!({"name": "time", "range_size": {"value": 1, "unit": "hours"}, "group_count": 24})
        );
        assert_eq!(metric["group_by"][2], serde_json::json!({"name": "value", "range_size": 10}));
        assert_eq!(metric["aggregators"][0], serde_json::json!({"name": "rate"}));
        assert_eq!(json["start_relative"], serde_json::json!({"value": 2, "unit": "hours"}));
        assert_eq!(json["end_relative"], serde_json::json!({"value": 5, "unit": "minutes"}));
        assert!(json.get("start_absolute").is_none());
    }

    #[test]
    fn test_parse_round_trips_pretty_text() {
        let query = two_metric_query();
        let parsed = QueryRequest::from_json(&query.to_pretty_json()).unwrap();
        assert_eq!(parsed, query);
    }

    #[test]
    fn test_parse_accepts_single_string_tag() {
        let query = QueryRequest::from_json(
            r#"{"metrics":[{"name":"m","tags":{"host":"a"}}],"start_relative":{"value":1,"unit":"days"}}"#,
        )
        .unwrap();
        assert_eq!(query.metrics[0].tags, vec![("host".to_string(), "a".to_string())]);
        assert_eq!(
            query.start,
            TimeBound::Relative {
                value: 1,
                unit: TimeUnit::Days
            }
        );
        assert!(query.end.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_documents() {
        // Missing start time
        assert!(QueryRequest::from_json(r#"{"metrics":[{"name":"m"}]}"#).is_err());

        // No metrics
        assert!(QueryRequest::from_json(r#"{"metrics":[],"start_absolute":1}"#).is_err());

        // Empty tag name
        let err = QueryRequest::from_json(r#"{"metrics":[{"name":"m","tags":{"":"a"}}],"start_absolute":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Tag names cannot be empty"));

        // Empty tag value
        let err = QueryRequest::from_json(r#"{"metrics":[{"name":"m","tags":{"host":""}}],"start_absolute":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Value for tag host cannot be null or empty."));

        // Unknown time unit
        assert!(QueryRequest::from_json(
            r#"{"metrics":[{"name":"m"}],"start_relative":{"value":1,"unit":"fortnights"}}"#
        )
        .is_err());
    }
}
