//! Recorded page state, returned to the browser as JSON.

use crate::chart::{ChartSeries, PlotOptions, Plotter, Tooltip};
use crate::surface::Surface;

use serde::Serialize;

/// Page regions as last written by the pipelines.
///
/// `None` means the region was never touched during the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageState {
    pub error: Option<String>,
    pub status: Option<String>,
    pub query_time: Option<String>,
    pub num_data_points: Option<String>,
    pub query_text: Option<String>,
    pub chart_title: Option<String>,
    pub reset_zoom_visible: bool,
    pub confirmation_requested: bool,
    /// Set when the tooltip was taken down, whether or not a new one replaced it.
    pub tooltip_removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip)]
    confirm_large_plots: bool,
}

impl PageState {
    /// A page whose user answers "yes" to confirmation prompts.
    pub fn confirming() -> Self {
        Self {
            confirm_large_plots: true,
            ..Default::default()
        }
    }
}

impl Surface for PageState {
    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn set_status(&mut self, status: &str) {
        self.status = Some(status.to_string());
    }

    fn set_query_time(&mut self, text: &str) {
        self.query_time = Some(text.to_string());
    }

    fn set_num_data_points(&mut self, text: &str) {
        self.num_data_points = Some(text.to_string());
    }

    fn set_query_text(&mut self, text: &str) {
        self.query_text = Some(text.to_string());
    }

    fn set_chart_title(&mut self, title: &str) {
        self.chart_title = Some(title.to_string());
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirmation_requested = true;
        self.confirm_large_plots
    }

    fn set_reset_zoom_visible(&mut self, visible: bool) {
        self.reset_zoom_visible = visible;
    }

    fn show_tooltip(&mut self, tooltip: &Tooltip) {
        self.tooltip = Some(tooltip.clone());
    }

    fn remove_tooltip(&mut self) {
        self.tooltip_removed = true;
        self.tooltip = None;
    }
}

/// One draw call.
#[derive(Debug, Clone, Serialize)]
pub struct PlotCall {
    pub series: Vec<ChartSeries>,
    pub options: PlotOptions,
}

/// Plotter that records draw calls for the browser to replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartCanvas {
    pub plots: Vec<PlotCall>,
}

impl ChartCanvas {
    pub fn last(&self) -> Option<&PlotCall> {
        self.plots.last()
    }
}

impl Plotter for ChartCanvas {
    fn plot(&mut self, series: &[ChartSeries], options: &PlotOptions) {
        self.plots.push(PlotCall {
            series: series.to_vec(),
            options: options.clone(),
        });
    }
}
