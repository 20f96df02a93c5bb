//! Plotting component interface and its configuration.

use super::ChartSeries;
use serde::{Deserialize, Serialize};

/// Series colors, cycled in order.
pub const PALETTE: [&str; 5] = ["#4572a7", "#aa4643", "#89a54e", "#80699b", "#db843d"];

/// Element id of the legend container.
pub const LEGEND_CONTAINER: &str = "graphLegend";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toggle {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    pub lines: Toggle,
    pub points: Toggle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    pub hoverable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOptions {
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisOptions {
    pub mode: String,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    pub container: String,
    #[serde(rename = "noColumns")]
    pub columns: u32,
}

/// Plot configuration, serialized in the plotting library's option format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub series: SeriesOptions,
    pub grid: GridOptions,
    pub selection: SelectionOptions,
    pub xaxis: XAxisOptions,
    pub legend: LegendOptions,
    pub colors: Vec<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            series: SeriesOptions {
                lines: Toggle { show: true },
                points: Toggle { show: true },
            },
            grid: GridOptions { hoverable: true },
            selection: SelectionOptions { mode: "x".to_string() },
            xaxis: XAxisOptions {
                mode: "time".to_string(),
                timezone: "browser".to_string(),
                min: None,
                max: None,
            },
            legend: LegendOptions {
                container: LEGEND_CONTAINER.to_string(),
                columns: 5,
            },
            colors: PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A selected range on the x axis, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XRange {
    pub from: f64,
    pub to: f64,
}

impl PlotOptions {
    /// Copy of these options restricted to `range`.
    pub fn with_x_range(&self, range: XRange) -> Self {
        let mut options = self.clone();
        options.xaxis.min = Some(range.from);
        options.xaxis.max = Some(range.to);
        options
    }
}

/// Draws series onto the chart surface.
pub trait Plotter {
    fn plot(&mut self, series: &[ChartSeries], options: &PlotOptions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options_json() {
        let value = serde_json::to_value(PlotOptions::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "series": {"lines": {"show": true}, "points": {"show": true}},
                "grid": {"hoverable": true},
                "selection": {"mode": "x"},
                "xaxis": {"mode": "time", "timezone": "browser"},
                "legend": {"container": "graphLegend", "noColumns": 5},
                "colors": ["#4572a7", "#aa4643", "#89a54e", "#80699b", "#db843d"]
            })
        );
    }

    #[test]
    fn test_with_x_range() {
        let base = PlotOptions::default();
        let zoomed = base.with_x_range(XRange { from: 1000.0, to: 2000.0 });
        assert_eq!(zoomed.xaxis.min, Some(1000.0));
        assert_eq!(zoomed.xaxis.max, Some(2000.0));
        assert!(base.xaxis.min.is_none());
        assert_eq!(zoomed.colors, base.colors);
    }
}
