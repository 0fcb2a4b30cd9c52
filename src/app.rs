use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::car::CarRow;
use crate::downloader;
use crate::filter::{EmptySelectionBehavior, FilterController};

pub struct AppState {
    controller: Mutex<FilterController>,
}

#[derive(Deserialize)]
struct SelectPayload {
    value: Option<String>,
}

#[derive(Deserialize)]
struct ExportQuery {
    format: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: Option<String>,
}

pub async fn run(
    rows: Vec<CarRow>,
    behavior: EmptySelectionBehavior,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup app state; the controller owns the row set for the whole session
    let app_state = Arc::new(AppState {
        controller: Mutex::new(FilterController::new(rows, behavior)),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/api/state", get(get_state))
        .route("/api/select/series", post(select_series))
        .route("/api/select/grade", post(select_grade))
        .route("/api/select/color", post(select_color))
        .route("/api/clear", post(clear_all))
        .route("/api/export", get(export_visible))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    log::info!("Listening on http://127.0.0.1:3000");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

/// One settled snapshot of the filter state. Every intent handler responds
/// with this, so the page never has to stitch together partial updates.
fn state_json(controller: &FilterController) -> serde_json::Value {
    serde_json::json!({
        "selection": controller.selection(),
        "seriesOptions": controller.series_options(),
        "gradeOptions": controller.grade_options(),
        "colorOptions": controller.color_options(),
        "rows": controller.visible_rows(),
        "visibleCount": controller.visible_rows().len(),
        "totalCount": controller.row_count(),
    })
}

async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let controller = state.controller.lock().unwrap();
    Json(state_json(&controller))
}

async fn select_series(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectPayload>,
) -> impl IntoResponse {
    let mut controller = state.controller.lock().unwrap();
    controller.select_series(payload.value);
    Json(state_json(&controller))
}

async fn select_grade(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectPayload>,
) -> impl IntoResponse {
    let mut controller = state.controller.lock().unwrap();
    controller.select_grade(payload.value);
    Json(state_json(&controller))
}

async fn select_color(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectPayload>,
) -> impl IntoResponse {
    let mut controller = state.controller.lock().unwrap();
    controller.select_color(payload.value);
    Json(state_json(&controller))
}

async fn clear_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut controller = state.controller.lock().unwrap();
    controller.clear_all();
    Json(state_json(&controller))
}

async fn export_visible(
    Query(params): Query<ExportQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let controller = state.controller.lock().unwrap();

    match params.format.as_str() {
        "csv" => match downloader::to_csv(controller.visible_rows()) {
            Ok(csv) => download_response("text/csv", "catalog.csv", csv.into_bytes()),
            Err(e) => export_error(e),
        },
        "xlsx" => match downloader::to_xlsx(controller.visible_rows()) {
            Ok(buffer) => download_response(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "catalog.xlsx",
                buffer,
            ),
            Err(e) => export_error(e),
        },
        other => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                status: "error".to_string(),
                message: Some(format!("Unsupported export format: {}", other)),
            }),
        )
            .into_response(),
    }
}

fn download_response(content_type: &str, filename: &str, body: Vec<u8>) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(axum::body::Body::from(body))
        .unwrap()
}

fn export_error(e: Box<dyn std::error::Error>) -> Response {
    log::error!("Export failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            status: "error".to_string(),
            message: Some(e.to_string()),
        }),
    )
        .into_response()
}
