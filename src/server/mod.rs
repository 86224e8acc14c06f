use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir};

pub mod events;
pub mod handlers;
pub mod state;

use self::state::AppState;
use handlers::{
    get_config, get_locations, get_panel, get_settings, index_html, map_click, map_events_stream,
    marker_click, script_js, style_css, update_settings,
};

// Create the main application router
fn create_app(state: AppState) -> Router {
    let assets_dir = {
        let settings = state.settings.lock().unwrap();
        settings.assets_dir.clone()
    };

    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/config", get(get_config))
        .route("/api/locations", get(get_locations))
        .route("/api/panel", get(get_panel))
        .route("/api/marker-click", post(marker_click))
        .route("/api/map-click", post(map_click))
        .route("/api/events", get(map_events_stream))
        .route("/api/settings", get(get_settings).post(update_settings))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;

    println!("   ✅ HTTP server started successfully at http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
