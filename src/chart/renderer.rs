//! Turns query results into a drawn chart.

use super::{build_series, ChartSeries, ChartView, PlotOptions, Plotter};
use crate::client::ResultSet;
use crate::surface::Surface;

/// Point count above which the user must confirm before plotting.
pub const DEFAULT_CONFIRM_THRESHOLD: usize = 20_000;

pub const PLOTTING_CANCELED: &str = "Plotting canceled";
pub const RENDERING: &str = "Rendering...";

/// What a render call did.
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// No result-sets; the page was not touched.
    Empty,
    /// The user declined a large plot. The series are handed back so they can
    /// be drawn later without querying again.
    Declined(Vec<ChartSeries>),
    Drawn(ChartView),
}

impl RenderOutcome {
    pub fn into_view(self) -> Option<ChartView> {
        match self {
            RenderOutcome::Drawn(view) => Some(view),
            RenderOutcome::Empty | RenderOutcome::Declined(_) => None,
        }
    }
}

/// Renders result-sets with a fixed plot configuration.
#[derive(Debug, Clone)]
pub struct Renderer {
    confirm_threshold: usize,
    options: PlotOptions,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_THRESHOLD)
    }
}

impl Renderer {
    pub fn new(confirm_threshold: usize) -> Self {
        Self {
            confirm_threshold,
            options: PlotOptions::default(),
        }
    }

    pub fn confirm_threshold(&self) -> usize {
        self.confirm_threshold
    }

    /// A view over already-drawn series, for hover and zoom events.
    pub fn view(&self, series: Vec<ChartSeries>) -> ChartView {
        ChartView::new(series, self.options.clone())
    }

    /// Flatten the results and draw them, asking first when there are too many points.
    pub async fn render<S, P>(&self, result_sets: &[ResultSet], surface: &mut S, plotter: &mut P) -> RenderOutcome
    where
        S: Surface + ?Sized,
        P: Plotter + ?Sized,
    {
        if result_sets.is_empty() {
            return RenderOutcome::Empty;
        }

        let set = build_series(result_sets);
        surface.set_num_data_points(&set.total_points.to_string());

        if set.total_points > self.confirm_threshold && !surface.confirm(&self.large_plot_warning()) {
            tracing::info!("Plot of {} data points declined", set.total_points);
            surface.set_status(PLOTTING_CANCELED);
            return RenderOutcome::Declined(set.series);
        }

        RenderOutcome::Drawn(self.draw(set.series, surface, plotter).await)
    }

    /// Draw series without the confirmation gate.
    pub async fn draw<S, P>(&self, series: Vec<ChartSeries>, surface: &mut S, plotter: &mut P) -> ChartView
    where
        S: Surface + ?Sized,
        P: Plotter + ?Sized,
    {
        // Let the status paint before the draw blocks.
        surface.set_status(RENDERING);
        tokio::task::yield_now().await;

        let view = self.view(series);
        view.draw(plotter);
        surface.set_status("");

        tracing::debug!("Rendered {} series", view.series().len());
        view
    }

    fn large_plot_warning(&self) -> String {
        format!(
            "You are attempting to plot more than {} data points.\nThis may take a long time.\n\
             You may want to down sample your data.\n\nDo you want to continue?",
            group_thousands(self.confirm_threshold)
        )
    }
}

/// `20000` -> `20,000`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::QueryResult;
    use crate::web::{ChartCanvas, PageState};

    fn result_sets(points: usize) -> Vec<ResultSet> {
        vec![ResultSet {
            sample_size: points as u64,
            results: vec![QueryResult {
                name: "cpu".to_string(),
                values: (0..points).map(|i| (i as i64, 1.0)).collect(),
                ..Default::default()
            }],
        }]
    }

    #[test]
    fn test_empty_response_is_noop() {
        let renderer = Renderer::default();
        let mut page = PageState::default();
        let mut canvas = ChartCanvas::default();

        let outcome = tokio_test::block_on(renderer.render(&[], &mut page, &mut canvas));
        assert!(matches!(outcome, RenderOutcome::Empty));
        assert!(canvas.plots.is_empty());
        assert!(page.num_data_points.is_none());
        assert!(page.status.is_none());
    }

    #[test]
    fn test_render_draws_and_clears_status() {
        let renderer = Renderer::default();
        let mut page = PageState::default();
        let mut canvas = ChartCanvas::default();

        let view = tokio_test::block_on(renderer.render(&result_sets(3), &mut page, &mut canvas))
            .into_view()
            .unwrap();
        assert_eq!(view.series().len(), 1);
        assert_eq!(canvas.plots.len(), 1);
        assert_eq!(page.num_data_points.as_deref(), Some("3"));
        assert_eq!(page.status.as_deref(), Some(""));
        assert!(!page.confirmation_requested);
    }

    #[test]
    fn test_large_plot_declined() {
        let renderer = Renderer::default();
        let mut page = PageState::default();
        let mut canvas = ChartCanvas::default();

        let outcome = tokio_test::block_on(renderer.render(&result_sets(20_001), &mut page, &mut canvas));
        assert!(page.confirmation_requested);
        assert!(canvas.plots.is_empty());
        assert_eq!(page.status.as_deref(), Some("Plotting canceled"));
        assert_eq!(page.num_data_points.as_deref(), Some("20001"));

        // The declined series can be drawn later as-is.
        let RenderOutcome::Declined(series) = outcome else {
            panic!("expected declined plot");
        };
        assert_eq!(series[0].points.len(), 20_001);
        let view = tokio_test::block_on(renderer.draw(series, &mut page, &mut canvas));
        assert_eq!(view.series()[0].points.len(), 20_001);
        assert_eq!(canvas.plots.len(), 1);
        assert_eq!(page.status.as_deref(), Some(""));
    }

    #[test]
    fn test_large_plot_accepted() {
        let renderer = Renderer::default();
        let mut page = PageState::confirming();
        let mut canvas = ChartCanvas::default();

        let outcome = tokio_test::block_on(renderer.render(&result_sets(20_001), &mut page, &mut canvas));
        assert!(matches!(outcome, RenderOutcome::Drawn(_)));
        assert!(page.confirmation_requested);
        assert_eq!(canvas.last().unwrap().series[0].points.len(), 20_001);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let renderer = Renderer::default();
        let mut page = PageState::default();
        let mut canvas = ChartCanvas::default();

        let outcome = tokio_test::block_on(renderer.render(&result_sets(20_000), &mut page, &mut canvas));
        assert!(matches!(outcome, RenderOutcome::Drawn(_)));
        assert!(!page.confirmation_requested);
    }

    #[test]
    fn test_warning_text() {
        assert_eq!(group_thousands(20_000), "20,000");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        let warning = Renderer::default().large_plot_warning();
        assert!(warning.starts_with("You are attempting to plot more than 20,000 data points."));
        assert!(warning.ends_with("Do you want to continue?"));
    }
}
