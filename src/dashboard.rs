//! The "update chart" action: assemble, query, render.

use crate::chart::{Plotter, RenderOutcome, Renderer};
use crate::client::QueryClient;
use crate::query::{assemble, FormState};
use crate::surface::Surface;

use std::time::Instant;

pub const CHART_SUBTITLE: &str = "(Click and drag to zoom)";
pub const QUERY_IN_PROGRESS: &str = "Query in progress...";

/// Run one "update chart" action against the page.
///
/// Returns `None` if validation or the query failed. Otherwise the renderer's
/// outcome, which carries the series when the user declined a large plot.
pub async fn update_chart<C, S, P>(
    form: &FormState,
    surface: &mut S,
    client: &C,
    plotter: &mut P,
    renderer: &Renderer,
) -> Option<RenderOutcome>
where
    C: QueryClient,
    S: Surface,
    P: Plotter,
{
    surface.set_reset_zoom_visible(false);
    surface.hide_error();
    surface.set_status("");
    surface.set_query_time("");
    surface.set_num_data_points("");

    let query = assemble(form, surface)?;

    surface.set_query_text(&query.to_pretty_json());
    surface.set_chart_title(CHART_SUBTITLE);
    surface.set_status(QUERY_IN_PROGRESS);

    tracing::info!("Issuing query for {} metrics", query.metrics.len());
    let started = Instant::now();
    let result = client.query(&query).await;
    surface.set_query_time(&started.elapsed().as_millis().to_string());

    let result_sets = match result {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Query failed: {}", e);
            surface.set_status("");
            surface.show_error(&e.to_string());
            return None;
        }
    };

    Some(renderer.render(&result_sets, surface, plotter).await)
}
