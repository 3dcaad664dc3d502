use axum::{
    extract::State,
    routing::{get, MethodRouter},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{api, settings_page, AppState};
use crate::render::ViewKind;

fn page_route(kind: ViewKind) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move { api::render_page(&state, kind).await })
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new();
    // One page per view
    for kind in ViewKind::all() {
        app = app.route(api::page_path(kind), page_route(kind));
    }

    app
        .route(
            api::SETTINGS_PATH,
            get(settings_page::settings_page).post(settings_page::submit_settings),
        )
        // API endpoints
        .route("/api/health", get(api::health_check))
        .route("/api/views/:view", get(api::get_view_fragment))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_dashboard_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Dashboard server starting on http://localhost:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
