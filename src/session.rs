//! Form session: owns the form state and hands out section identifiers.

use crate::query::form::{AggregatorRow, GroupByRow, MetricSection, TagRow};
use crate::query::{FormState, SectionId};

use serde::{Deserialize, Serialize};

const RATE_AGGREGATOR: &str = "rate";
const DEFAULT_TAB_LABEL: &str = "metric";

/// Editable query form with a monotonic id counter for added sections.
#[derive(Debug, Clone)]
pub struct FormSession {
    form: FormState,
    next_id: SectionId,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    /// Create a session holding one empty metric section.
    pub fn new() -> Self {
        let mut session = Self {
            form: FormState::default(),
            next_id: 0,
        };
        session.add_metric();
        session
    }

    /// Resume editing a form sent back by the page. New ids continue past the
    /// largest id already in use.
    pub fn from_form(form: FormState) -> Self {
        let next_id = form
            .metrics
            .iter()
            .flat_map(|m| {
                std::iter::once(m.id)
                    .chain(m.tags.iter().map(|r| r.id))
                    .chain(m.group_by.iter().map(|r| r.id))
                    .chain(m.aggregators.iter().map(|r| r.id))
            })
            .max()
            .map_or(0, |id| id + 1);
        Self { form, next_id }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn into_form(self) -> FormState {
        self.form
    }

    fn allocate_id(&mut self) -> SectionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a metric section with one default aggregator.
    pub fn add_metric(&mut self) -> SectionId {
        let id = self.allocate_id();
        let aggregator_id = self.allocate_id();
        self.form.metrics.push(MetricSection {
            id,
            aggregators: vec![AggregatorRow {
                id: aggregator_id,
                ..Default::default()
            }],
            ..Default::default()
        });
        tracing::debug!("Added metric section {}", id);
        id
    }

    /// Remove a metric section. Returns false if no such section exists.
    pub fn remove_metric(&mut self, id: SectionId) -> bool {
        let before = self.form.metrics.len();
        self.form.metrics.retain(|m| m.id != id);
        self.form.metrics.len() != before
    }

    /// Label shown on a metric's tab.
    pub fn tab_label(&self, metric: SectionId) -> Option<&str> {
        self.form.metric(metric).map(|m| {
            if m.name.is_empty() {
                DEFAULT_TAB_LABEL
            } else {
                m.name.as_str()
            }
        })
    }

    pub fn add_group_by(&mut self, metric: SectionId) -> Option<SectionId> {
        let id = self.allocate_id();
        let section = self.form.metric_mut(metric)?;
        section.group_by.push(GroupByRow {
            id,
            ..Default::default()
        });
        Some(id)
    }

    pub fn remove_group_by(&mut self, metric: SectionId, row: SectionId) -> bool {
        match self.form.metric_mut(metric) {
            Some(section) => remove_row(&mut section.group_by, row, |r| r.id),
            None => false,
        }
    }

    pub fn add_aggregator(&mut self, metric: SectionId) -> Option<SectionId> {
        let id = self.allocate_id();
        let section = self.form.metric_mut(metric)?;
        section.aggregators.push(AggregatorRow {
            id,
            ..Default::default()
        });
        Some(id)
    }

    pub fn remove_aggregator(&mut self, metric: SectionId, row: SectionId) -> bool {
        match self.form.metric_mut(metric) {
            Some(section) => remove_row(&mut section.aggregators, row, |r| r.id),
            None => false,
        }
    }

    pub fn add_tag(&mut self, metric: SectionId) -> Option<SectionId> {
        let id = self.allocate_id();
        let section = self.form.metric_mut(metric)?;
        section.tags.push(TagRow {
            id,
            ..Default::default()
        });
        Some(id)
    }

    pub fn remove_tag(&mut self, metric: SectionId, row: SectionId) -> bool {
        match self.form.metric_mut(metric) {
            Some(section) => remove_row(&mut section.tags, row, |r| r.id),
            None => false,
        }
    }

    /// Change an aggregator's name. `rate` takes no sampling, so its value is cleared.
    pub fn set_aggregator_name(&mut self, metric: SectionId, row: SectionId, name: &str) -> bool {
        let Some(aggregator) = self
            .form
            .metric_mut(metric)
            .and_then(|m| m.aggregators.iter_mut().find(|a| a.id == row))
        else {
            return false;
        };

        aggregator.name = name.to_string();
        if name == RATE_AGGREGATOR {
            aggregator.sampling_value.clear();
        }
        true
    }

    /// Append a tag name picked from the tag search dialog to a group-by row.
    pub fn append_group_by_tag_name(&mut self, metric: SectionId, row: SectionId, tag_name: &str) -> bool {
        let Some(group_by) = self
            .form
            .metric_mut(metric)
            .and_then(|m| m.group_by.iter_mut().find(|g| g.id == row))
        else {
            return false;
        };

        group_by.tag_names.push(' ');
        group_by.tag_names.push_str(tag_name);
        true
    }
}

/// One edit to the form, as sent by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormOp {
    AddMetric,
    RemoveMetric { metric: SectionId },
    AddGroupBy { metric: SectionId },
    RemoveGroupBy { metric: SectionId, row: SectionId },
    AddAggregator { metric: SectionId },
    RemoveAggregator { metric: SectionId, row: SectionId },
    AddTag { metric: SectionId },
    RemoveTag { metric: SectionId, row: SectionId },
    SetAggregatorName { metric: SectionId, row: SectionId, name: String },
    AppendGroupByTagName { metric: SectionId, row: SectionId, tag_name: String },
}

/// Result of applying a [`FormOp`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FormOpResult {
    /// False when the op referred to a section that does not exist.
    pub changed: bool,
    /// Id of the section an add op created.
    pub id: Option<SectionId>,
}

impl FormOpResult {
    fn added(id: Option<SectionId>) -> Self {
        Self {
            changed: id.is_some(),
            id,
        }
    }

    fn changed(changed: bool) -> Self {
        Self { changed, id: None }
    }
}

impl FormSession {
    pub fn apply(&mut self, op: FormOp) -> FormOpResult {
        tracing::debug!("Applying form op {:?}", op);
        match op {
            FormOp::AddMetric => FormOpResult::added(Some(self.add_metric())),
            FormOp::RemoveMetric { metric } => FormOpResult::changed(self.remove_metric(metric)),
            FormOp::AddGroupBy { metric } => FormOpResult::added(self.add_group_by(metric)),
            FormOp::RemoveGroupBy { metric, row } => FormOpResult::changed(self.remove_group_by(metric, row)),
            FormOp::AddAggregator { metric } => FormOpResult::added(self.add_aggregator(metric)),
            FormOp::RemoveAggregator { metric, row } => FormOpResult::changed(self.remove_aggregator(metric, row)),
            FormOp::AddTag { metric } => FormOpResult::added(self.add_tag(metric)),
            FormOp::RemoveTag { metric, row } => FormOpResult::changed(self.remove_tag(metric, row)),
            FormOp::SetAggregatorName { metric, row, name } => {
                FormOpResult::changed(self.set_aggregator_name(metric, row, &name))
            }
            FormOp::AppendGroupByTagName { metric, row, tag_name } => {
                FormOpResult::changed(self.append_group_by_tag_name(metric, row, &tag_name))
            }
        }
    }
}

fn remove_row<T>(rows: &mut Vec<T>, id: SectionId, key: impl Fn(&T) -> SectionId) -> bool {
    let before = rows.len();
    rows.retain(|r| key(r) != id);
    rows.len() != before
}
