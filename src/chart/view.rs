//! A drawn chart and its hover and zoom interactions.

use super::tooltip::{self, Tooltip, TooltipSize, Viewport};
use super::{ChartSeries, PlotOptions, Plotter, XRange};
use crate::surface::Surface;

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

/// The point nearest the cursor, as reported by the plotting component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverItem {
    pub series_index: usize,
    pub data_index: usize,
    pub page_x: f64,
    pub page_y: f64,
}

/// Series currently on the chart plus the options they were drawn with.
#[derive(Debug, Clone)]
pub struct ChartView {
    series: Vec<ChartSeries>,
    options: PlotOptions,
    previous_point: Option<usize>,
}

impl ChartView {
    pub fn new(series: Vec<ChartSeries>, options: PlotOptions) -> Self {
        Self {
            series,
            options,
            previous_point: None,
        }
    }

    /// Restore the hover state of a view rebuilt between events.
    pub fn with_previous_point(mut self, previous_point: Option<usize>) -> Self {
        self.previous_point = previous_point;
        self
    }

    /// Data index of the point whose tooltip is showing.
    pub fn previous_point(&self) -> Option<usize> {
        self.previous_point
    }

    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Draw the full, unzoomed chart.
    pub fn draw<P: Plotter + ?Sized>(&self, plotter: &mut P) {
        plotter.plot(&self.series, &self.options);
    }

    /// Handle a hover event. The tooltip only changes when the hovered data index does.
    pub fn on_hover<S, Tz>(&mut self, item: Option<&HoverItem>, size: TooltipSize, body: Viewport, tz: &Tz, surface: &mut S)
    where
        S: Surface + ?Sized,
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let Some(item) = item else {
            surface.remove_tooltip();
            self.previous_point = None;
            return;
        };

        if self.previous_point == Some(item.data_index) {
            return;
        }
        self.previous_point = Some(item.data_index);
        surface.remove_tooltip();

        let Some(series) = self.series.get(item.series_index) else {
            return;
        };
        let Some(&(timestamp, value)) = series.points.get(item.data_index) else {
            return;
        };

        let contents = tooltip::tooltip_contents(&series.label, timestamp, value, tz);
        let (left, top) = tooltip::position(item.page_x, item.page_y, size, body);
        surface.show_tooltip(&Tooltip { left, top, contents });
    }

    /// Redraw restricted to the selected range and offer a zoom reset.
    pub fn on_select<S, P>(&self, range: XRange, plotter: &mut P, surface: &mut S)
    where
        S: Surface + ?Sized,
        P: Plotter + ?Sized,
    {
        plotter.plot(&self.series, &self.options.with_x_range(range));
        surface.set_reset_zoom_visible(true);
    }

    /// Hide the reset control and redraw the full range.
    pub fn reset_zoom<S, P>(&self, plotter: &mut P, surface: &mut S)
    where
        S: Surface + ?Sized,
        P: Plotter + ?Sized,
    {
        surface.set_reset_zoom_visible(false);
        self.draw(plotter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::{ChartCanvas, PageState};
    use chrono::Utc;

    const SIZE: TooltipSize = TooltipSize {
        outer_width: 100.0,
        height: 40.0,
        outer_height: 50.0,
    };
    const BODY: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[allow(clippy::approx_constant)]
    fn view() -> ChartView {
        ChartView::new(
            vec![
                ChartSeries {
                    label: "cpu".to_string(),
                    points: vec![(1_700_000_000_123, 3.14159), (1_700_000_001_000, 2.0)],
                },
                ChartSeries {
                    label: "mem".to_string(),
                    points: vec![(1_700_000_000_000, 7.0)],
                },
            ],
            PlotOptions::default(),
        )
    }

    fn hover(series_index: usize, data_index: usize) -> HoverItem {
        HoverItem {
            series_index,
            data_index,
            page_x: 200.0,
            page_y: 100.0,
        }
    }

    #[test]
    fn test_hover_shows_tooltip() {
        let mut view = view();
        let mut page = PageState::default();
        view.on_hover(Some(&hover(0, 0)), SIZE, BODY, &Utc, &mut page);

        let tooltip = page.tooltip.as_ref().unwrap();
        assert_eq!(tooltip.left, 205.0);
        assert_eq!(tooltip.top, 105.0);
        assert_eq!(tooltip.contents, "cpu<br>Nov 14, 2023 22:13:20.123 pm GMT+0000<br>3.14");
    }

    #[test]
    fn test_hover_same_index_keeps_tooltip() {
        let mut view = view();
        let mut page = PageState::default();
        view.on_hover(Some(&hover(0, 0)), SIZE, BODY, &Utc, &mut page);
        page.tooltip = None;

        // Same data index, even on another series, does not redraw.
        view.on_hover(Some(&hover(1, 0)), SIZE, BODY, &Utc, &mut page);
        assert!(page.tooltip.is_none());

        view.on_hover(Some(&hover(0, 1)), SIZE, BODY, &Utc, &mut page);
        assert!(page.tooltip.as_ref().unwrap().contents.ends_with("<br>2.00"));
    }

    #[test]
    fn test_hover_off_removes_tooltip() {
        let mut view = view();
        let mut page = PageState::default();
        view.on_hover(Some(&hover(0, 0)), SIZE, BODY, &Utc, &mut page);
        view.on_hover(None, SIZE, BODY, &Utc, &mut page);
        assert!(page.tooltip.is_none());

        // After leaving, the same point shows again.
        view.on_hover(Some(&hover(0, 0)), SIZE, BODY, &Utc, &mut page);
        assert!(page.tooltip.is_some());
    }

    #[test]
    fn test_restored_previous_point_suppresses_redraw() {
        let mut view = view().with_previous_point(Some(1));
        let mut page = PageState::default();
        view.on_hover(Some(&hover(0, 1)), SIZE, BODY, &Utc, &mut page);
        assert!(page.tooltip.is_none());
        assert!(!page.tooltip_removed);

        view.on_hover(Some(&hover(0, 0)), SIZE, BODY, &Utc, &mut page);
        assert_eq!(view.previous_point(), Some(0));
        assert!(page.tooltip.is_some());
    }

    #[test]
    fn test_select_and_reset_zoom() {
        let view = view();
        let mut page = PageState::default();
        let mut canvas = ChartCanvas::default();

        view.on_select(XRange { from: 1000.0, to: 2000.0 }, &mut canvas, &mut page);
        assert!(page.reset_zoom_visible);
        let zoomed = canvas.last().unwrap();
        assert_eq!(zoomed.options.xaxis.min, Some(1000.0));
        assert_eq!(zoomed.options.xaxis.max, Some(2000.0));
        assert_eq!(zoomed.series.len(), 2);

        view.reset_zoom(&mut canvas, &mut page);
        assert!(!page.reset_zoom_visible);
        let full = canvas.last().unwrap();
        assert!(full.options.xaxis.min.is_none());
        assert_eq!(canvas.plots.len(), 2);
    }
}
