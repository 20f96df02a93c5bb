//! HTTP request handlers.

use super::{AppState, ChartCanvas, PageState, PlotCall};
use crate::chart::{ChartSeries, HoverItem, RenderOutcome, TooltipSize, Viewport, XRange};
use crate::client::ClientError;
use crate::dashboard::update_chart;
use crate::query::{FormState, SectionId};
use crate::session::{FormOp, FormOpResult, FormSession};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{FixedOffset, Local};
use serde::{Deserialize, Serialize};

pub async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================================
// Query builder
// ============================================================================

/// A fresh form with one metric section.
pub async fn handle_new_form() -> Json<FormState> {
    Json(FormSession::new().into_form())
}

#[derive(Debug, Deserialize)]
pub struct FormOpRequest {
    pub form: FormState,
    pub op: FormOp,
}

#[derive(Debug, Serialize)]
pub struct TabLabel {
    pub id: SectionId,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct FormOpResponse {
    pub form: FormState,
    #[serde(flatten)]
    pub result: FormOpResult,
    pub tab_labels: Vec<TabLabel>,
}

/// Apply one edit to the posted form and return the new form.
pub async fn handle_form_op(Json(req): Json<FormOpRequest>) -> Json<FormOpResponse> {
    let mut session = FormSession::from_form(req.form);
    let result = session.apply(req.op);

    let tab_labels = session
        .form()
        .metrics
        .iter()
        .filter_map(|m| {
            session.tab_label(m.id).map(|label| TabLabel {
                id: m.id,
                label: label.to_string(),
            })
        })
        .collect();

    Json(FormOpResponse {
        form: session.into_form(),
        result,
        tab_labels,
    })
}

// ============================================================================
// Chart
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    pub form: FormState,
    /// The user's answer to the large plot prompt, if already asked.
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ChartResponse {
    #[serde(flatten)]
    pub page: PageState,
    pub plots: Vec<PlotCall>,
    /// Series of a declined large plot. Post them to `/api/plot` to draw
    /// without running the query again.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_series: Option<Vec<ChartSeries>>,
}

pub async fn handle_chart(State(state): State<AppState>, Json(req): Json<ChartRequest>) -> Json<ChartResponse> {
    let mut page = if req.confirmed {
        PageState::confirming()
    } else {
        PageState::default()
    };
    let mut canvas = ChartCanvas::default();

    let outcome = update_chart(
        &req.form,
        &mut page,
        state.client.as_ref(),
        &mut canvas,
        state.renderer.as_ref(),
    )
    .await;

    let pending_series = match outcome {
        Some(RenderOutcome::Declined(series)) => Some(series),
        _ => None,
    };

    Json(ChartResponse {
        page,
        plots: canvas.plots,
        pending_series,
    })
}

/// Series already on the page.
#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    pub series: Vec<ChartSeries>,
}

/// Draw series the user agreed to plot after all.
pub async fn handle_plot(State(state): State<AppState>, Json(req): Json<SeriesRequest>) -> Json<ChartResponse> {
    let mut page = PageState::default();
    let mut canvas = ChartCanvas::default();
    state.renderer.draw(req.series, &mut page, &mut canvas).await;

    Json(ChartResponse {
        page,
        plots: canvas.plots,
        ..Default::default()
    })
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    pub series: Vec<ChartSeries>,
    pub range: XRange,
}

pub async fn handle_zoom(State(state): State<AppState>, Json(req): Json<ZoomRequest>) -> Json<ChartResponse> {
    let mut page = PageState::default();
    let mut canvas = ChartCanvas::default();
    state.renderer.view(req.series).on_select(req.range, &mut canvas, &mut page);

    Json(ChartResponse {
        page,
        plots: canvas.plots,
        ..Default::default()
    })
}

pub async fn handle_reset_zoom(State(state): State<AppState>, Json(req): Json<SeriesRequest>) -> Json<ChartResponse> {
    let mut page = PageState::default();
    let mut canvas = ChartCanvas::default();
    state.renderer.view(req.series).reset_zoom(&mut canvas, &mut page);

    Json(ChartResponse {
        page,
        plots: canvas.plots,
        ..Default::default()
    })
}

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    pub series: Vec<ChartSeries>,
    /// The point under the cursor; absent when the cursor left the points.
    #[serde(default)]
    pub item: Option<HoverItem>,
    /// Echo of `previous_point` from the last hover response.
    #[serde(default)]
    pub previous_point: Option<usize>,
    pub size: TooltipSize,
    pub body: Viewport,
    /// Viewer's offset from UTC in minutes east; the server's zone when absent.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct HoverResponse {
    #[serde(flatten)]
    pub page: PageState,
    pub previous_point: Option<usize>,
}

pub async fn handle_hover(State(state): State<AppState>, Json(req): Json<HoverRequest>) -> impl IntoResponse {
    let mut view = state.renderer.view(req.series).with_previous_point(req.previous_point);
    let mut page = PageState::default();
    let item = req.item.as_ref();

    match req.utc_offset_minutes {
        Some(minutes) => match FixedOffset::east_opt(minutes * 60) {
            Some(tz) => view.on_hover(item, req.size, req.body, &tz, &mut page),
            None => return (StatusCode::BAD_REQUEST, "Invalid UTC offset").into_response(),
        },
        None => view.on_hover(item, req.size, req.body, &Local, &mut page),
    }

    Json(HoverResponse {
        page,
        previous_point: view.previous_point(),
    })
    .into_response()
}

// ============================================================================
// Autocomplete
// ============================================================================

fn upstream_error(e: ClientError) -> axum::response::Response {
    tracing::warn!("Upstream request failed: {}", e);
    (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
}

pub async fn handle_metric_names(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.metric_names().await {
        Ok(names) => Json(names).into_response(),
        Err(e) => upstream_error(e),
    }
}

pub async fn handle_tag_names(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.tag_names().await {
        Ok(names) => Json(names).into_response(),
        Err(e) => upstream_error(e),
    }
}

pub async fn handle_tag_values(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.tag_values().await {
        Ok(values) => Json(values).into_response(),
        Err(e) => upstream_error(e),
    }
}

pub async fn handle_version(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.version().await {
        Ok(version) => Json(serde_json::json!({ "version": version })).into_response(),
        Err(e) => upstream_error(e),
    }
}
