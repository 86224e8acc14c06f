use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, Json, Response, Sse},
};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

use super::events::{MapEvent, MapEventData};
use super::state::AppState;
use crate::constants::MAP_IMAGE;
use crate::panel::PanelState;
use crate::settings::Settings;
use crate::surface::Marker;
use crate::transition::ViewportState;

// Helper struct for SSE events
use axum::response::sse::Event as SseEvent;

#[derive(Debug, Deserialize)]
pub struct MarkerClickRequest {
    pub id: String,
    #[serde(default)]
    pub viewport: Option<ViewportState>,
}

#[derive(Debug, Deserialize)]
pub struct MapClickRequest {
    pub x: f64,
    pub y: f64,
}

// HTTP API Handlers

/// Map geometry the frontend needs before it can build the viewport
pub async fn get_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "image": MAP_IMAGE,
        "image_width": state.grid.image_width,
        "image_height": state.grid.image_height,
        "grid_cols": state.grid.cols,
        "grid_rows": state.grid.rows,
        "locations": state.registry.len(),
        "probe_enabled": state.probe.is_enabled(),
    }))
}

/// All markers placed at startup, in authoring order
pub async fn get_locations(State(state): State<AppState>) -> Json<Vec<Marker>> {
    Json(state.surface.markers())
}

/// Current content of the info panel
pub async fn get_panel(State(state): State<AppState>) -> Json<PanelState> {
    Json(state.panel.state())
}

// A marker was clicked in the viewport; the dispatcher decides whether
// that opens the panel or starts the transition
pub async fn marker_click(
    State(state): State<AppState>,
    Json(payload): Json<MarkerClickRequest>,
) -> Json<serde_json::Value> {
    state
        .dispatcher
        .marker_clicked(&payload.id, payload.viewport.as_ref());

    Json(serde_json::json!({ "status": "ok" }))
}

// A generic (non-marker) click on the viewport, fed to the grid probe
pub async fn map_click(
    State(state): State<AppState>,
    Json(payload): Json<MapClickRequest>,
) -> Json<serde_json::Value> {
    match state.probe.map_clicked(payload.x, payload.y) {
        Some(cell) => Json(serde_json::json!({
            "status": "ok",
            "col": cell.col,
            "row": cell.row,
        })),
        None => Json(serde_json::json!({ "status": "disabled" })),
    }
}

// SSE endpoint for panel updates, popups, transition phases and navigation
pub async fn map_events_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::channel(100);

    // Subscribe to the main event sender
    let mut event_receiver = state.event_sender.subscribe();

    // Forward events from main sender to SSE stream
    tokio::spawn(async move {
        loop {
            tokio::select! {
                event = event_receiver.recv() => {
                    match event {
                        Ok(map_event) => {
                            let sse_event = SseEvent::default()
                                .json_data(&map_event)
                                .unwrap_or_else(|_| SseEvent::default().data("Error serializing event"));

                            if tx.send(Ok(sse_event)).await.is_err() {
                                break; // Client disconnected
                            }
                        }
                        Err(_) => break, // Channel closed
                    }
                }
                _ = tokio::time::sleep(Duration::from_secs(30)) => {
                    // Send periodic heartbeat
                    let heartbeat = MapEvent {
                        event_type: "heartbeat".to_string(),
                        data: MapEventData {
                            message: Some("SSE connection alive".to_string()),
                            ..Default::default()
                        },
                    };

                    let sse_event = SseEvent::default()
                        .json_data(&heartbeat)
                        .unwrap_or_else(|_| SseEvent::default().data("Error serializing heartbeat"));

                    if tx.send(Ok(sse_event)).await.is_err() {
                        break; // Client disconnected
                    }
                }
            }
        }
    });

    let stream = ReceiverStream::new(rx);

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive-message"),
    )
}

// API endpoint to get current settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, StatusCode> {
    let settings = state.settings.lock().unwrap();
    Ok(Json((*settings).clone()))
}

// API endpoint to update settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(new_settings): Json<Settings>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut settings = state.settings.lock().unwrap();

    // Update settings
    *settings = new_settings.clone();

    // Save to disk
    if let Err(e) = settings.save() {
        eprintln!("Failed to save settings: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let response = serde_json::json!({
        "status": "success",
        "message": "Settings updated successfully"
    });

    Ok(Json(response))
}

pub async fn index_html() -> Html<Vec<u8>> {
    Html(Asset::get("index.html").unwrap().data.into_owned())
}

pub async fn style_css() -> Response {
    let content = Asset::get("style.css").unwrap().data;
    Response::builder()
        .header(header::CONTENT_TYPE, "text/css")
        .body(content.into_owned().into())
        .unwrap()
}

pub async fn script_js() -> Response {
    let content = Asset::get("script.js").unwrap().data;
    Response::builder()
        .header(header::CONTENT_TYPE, "application/javascript")
        .body(content.into_owned().into())
        .unwrap()
}
