//! Flattens query result-sets into labeled chart series.

use crate::client::{GroupByResult, ResultSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Line break inserted before each group-by descriptor in a label.
pub const LABEL_LINE_BREAK: &str = "<br>";

/// A labeled series of `(timestamp_millis, value)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    #[serde(rename = "data")]
    pub points: Vec<(i64, f64)>,
}

/// All series of one response plus their total point count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    pub series: Vec<ChartSeries>,
    pub total_points: usize,
}

/// Build one series per returned result, in response order.
pub fn build_series(result_sets: &[ResultSet]) -> SeriesSet {
    let mut set = SeriesSet::default();

    for result_set in result_sets {
        for result in &result_set.results {
            set.total_points += result.values.len();
            set.series.push(ChartSeries {
                label: format!("{}{}", result.name, group_by_descriptor(&result.group_by)),
                points: result.values.clone(),
            });
        }
    }

    set
}

/// `"<br>(name: k1=v1, k2=v2)"` for each group-by dimension.
pub fn group_by_descriptor(group_by: &[GroupByResult]) -> String {
    let mut descriptor = String::new();
    for group in group_by {
        let pairs: Vec<String> = group
            .group
            .iter()
            .map(|(key, value)| format!("{}={}", key, value_text(value)))
            .collect();
        descriptor.push_str(&format!("{}({}: {})", LABEL_LINE_BREAK, group.name, pairs.join(", ")));
    }
    descriptor
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
