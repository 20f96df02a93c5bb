//! Response documents returned by the time-series service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a datapoints query response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub queries: Vec<ResultSet>,
}

/// Results for one metric of the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub sample_size: u64,
    #[serde(default)]
    pub results: Vec<QueryResult>,
}

/// One returned series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub name: String,
    #[serde(default)]
    pub group_by: Vec<GroupByResult>,
    #[serde(default)]
    pub tags: Map<String, Value>,
    /// `[timestamp_millis, value]` pairs, time-ordered.
    #[serde(default)]
    pub values: Vec<(i64, f64)>,
}

/// Group-by dimension a series belongs to, e.g. `{"name":"tag","group":{"host":"a"}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupByResult {
    pub name: String,
    #[serde(default)]
    pub group: Map<String, Value>,
}

/// Body of the name-listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamesResponse {
    #[serde(default)]
    pub results: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Error body, e.g. `{"errors":["metric[0].name may not be empty."]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}
