//! Builds a `QueryRequest` from the current form state.
//!
//! Failures are reported to the surface's error region only. A missing metric
//! name, a missing start time or a time value that is not a whole number aborts
//! the whole assembly; a bad group-by only drops that group-by.

use super::form::{FormState, GroupByKind, GroupByRow, MetricSection, TimeFields};
use super::{GroupBySpec, MetricSpec, QueryRequest, TimeBound};
use crate::surface::Surface;

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// User-facing validation messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Metric Name is required.")]
    MissingMetricName,
    #[error("Missing Group By tag names.")]
    MissingGroupByTagNames,
    #[error("Missing Time Group By size must be greater than 0.")]
    TimeGroupBySize,
    #[error("Missing Time Group By count must be greater than 0.")]
    TimeGroupByCount,
    #[error("Missing Value Group By size must be greater than 0.")]
    ValueGroupBySize,
    #[error("Start time is required.")]
    MissingStartTime,
    #[error("Start time value must be a whole number.")]
    InvalidStartTime,
    #[error("End time value must be a whole number.")]
    InvalidEndTime,
    #[error("Aggregator sampling value must be a whole number.")]
    InvalidSamplingValue,
}

fn tag_name_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,]+").expect("valid regex"))
}

/// Parse a positive-integer form field; empty or non-numeric input yields `None`.
fn parse_count(field: &str) -> Option<i64> {
    field.trim().parse::<i64>().ok().filter(|v| *v >= 1)
}

/// Parse an optional whole-number field: `Ok(None)` when blank, `Err(())` when
/// something other than a whole number was typed.
fn parse_optional_number(field: &str) -> Result<Option<i64>, ()> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }
    field.parse::<i64>().map(Some).map_err(|_| ())
}

/// Assemble the query, or report the first fatal failure and return `None`.
pub fn assemble(form: &FormState, surface: &mut dyn Surface) -> Option<QueryRequest> {
    if form.metrics.is_empty() {
        report(surface, ValidationError::MissingMetricName);
        return None;
    }

    let mut metrics = Vec::with_capacity(form.metrics.len());
    for section in &form.metrics {
        match build_metric(section, surface) {
            Ok(metric) => metrics.push(metric),
            Err(e) => {
                report(surface, e);
                return None;
            }
        }
    }

    let start = match resolve_bound(&form.start, ValidationError::InvalidStartTime) {
        Ok(Some(start)) => start,
        Ok(None) => {
            report(surface, ValidationError::MissingStartTime);
            return None;
        }
        Err(e) => {
            report(surface, e);
            return None;
        }
    };
    let end = match resolve_bound(&form.end, ValidationError::InvalidEndTime) {
        Ok(end) => end,
        Err(e) => {
            report(surface, e);
            return None;
        }
    };

    Some(QueryRequest { metrics, start, end })
}

fn report(surface: &mut dyn Surface, error: ValidationError) {
    tracing::debug!("Query validation failed: {}", error);
    surface.show_error(&error.to_string());
}

fn build_metric(section: &MetricSection, surface: &mut dyn Surface) -> Result<MetricSpec, ValidationError> {
    if section.name.is_empty() {
        return Err(ValidationError::MissingMetricName);
    }

    let mut metric = MetricSpec::new(section.name.clone());

    for row in &section.group_by {
        match build_group_by(row) {
            Ok(group_by) => metric.add_group_by(group_by),
            // Only this group-by is dropped; the metric continues.
            Err(e) => report(surface, e),
        }
    }

    for row in &section.aggregators {
        // The aggregator is kept either way; a bad sampling value is dropped and reported.
        let sampling_value = parse_optional_number(&row.sampling_value).unwrap_or_else(|_| {
            report(surface, ValidationError::InvalidSamplingValue);
            None
        });
        metric.add_aggregator(row.name.clone(), sampling_value, row.sampling_unit);
    }

    for row in &section.tags {
        if !row.name.is_empty() && !row.value.is_empty() {
            metric.add_tag(row.name.clone(), row.value.clone());
        }
    }

    Ok(metric)
}

fn build_group_by(row: &GroupByRow) -> Result<GroupBySpec, ValidationError> {
    match row.kind {
        GroupByKind::Tags => {
            let tag_names: Vec<String> = tag_name_separator()
                .split(&row.tag_names)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if tag_names.is_empty() {
                return Err(ValidationError::MissingGroupByTagNames);
            }
            Ok(GroupBySpec::Tag { tag_names })
        }
        GroupByKind::Time => {
            let size = parse_count(&row.time_size).ok_or(ValidationError::TimeGroupBySize)?;
            let count = parse_count(&row.time_count).ok_or(ValidationError::TimeGroupByCount)?;
            Ok(GroupBySpec::time(size, row.time_unit, count))
        }
        GroupByKind::Value => {
            let size = parse_count(&row.value_size).ok_or(ValidationError::ValueGroupBySize)?;
            Ok(GroupBySpec::Value { range_size: size })
        }
    }
}

fn resolve_bound(fields: &TimeFields, invalid: ValidationError) -> Result<Option<TimeBound>, ValidationError> {
    if let Some(date) = fields.absolute {
        return Ok(Some(TimeBound::Absolute {
            epoch_millis: date.timestamp_millis(),
        }));
    }
    let value = parse_optional_number(&fields.relative_value).map_err(|_| invalid)?;
    Ok(value.map(|value| TimeBound::Relative {
        value,
        unit: fields.relative_unit,
    }))
}
