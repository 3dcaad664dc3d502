use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::AppState;
use crate::render::ViewKind;

const WAITING_HTML: &str = r#"<div class="placeholder">Waiting for the first snapshot…</div>"#;

/// Route serving the page of each view.
pub fn page_path(kind: ViewKind) -> &'static str {
    match kind {
        ViewKind::Overview => "/",
        ViewKind::Dashboard => "/dashboard",
        ViewKind::Positions => "/positions",
        ViewKind::PositionsBasic => "/positions/basic",
        ViewKind::Logs => "/logs",
        ViewKind::Status => "/status",
    }
}

pub(super) const SETTINGS_PATH: &str = "/settings";

pub(super) const PAGE_STYLE: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f1419; color: #e7e9ea; margin: 0; }
        nav { background: #16202a; padding: 1rem 2rem; border-bottom: 1px solid #2f3336; }
        nav a { color: #8b98a5; margin-right: 1.5rem; text-decoration: none; }
        nav a.active { color: #1da1f2; }
        main { padding: 1.5rem 2rem; }
        table { border-collapse: collapse; margin-bottom: 1.5rem; }
        th, td { padding: 0.4rem 0.8rem; border-bottom: 1px solid #2f3336; text-align: left; }
        pre { background: #16202a; padding: 1rem; max-height: 60vh; overflow: auto; }
        label { display: block; margin-bottom: 0.8rem; }
        input, select { background: #16202a; color: #e7e9ea; border: 1px solid #2f3336; padding: 0.3rem; }
        .placeholder { color: #8b98a5; }
        .notice { margin-bottom: 1rem; color: #1da1f2; }
        .error { color: #f4212e; }
        footer { padding: 0 2rem 1rem; color: #536471; font-size: 0.8rem; }
"#;

pub(super) struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Links to every view page plus the settings editor; `active` is the
/// current path.
pub(super) fn nav_links(active: &str) -> Vec<NavLink> {
    ViewKind::all()
        .into_iter()
        .map(|k| (page_path(k), k.title()))
        .chain(std::iter::once((SETTINGS_PATH, "Settings")))
        .map(|(href, label)| NavLink {
            href,
            label,
            active: href == active,
        })
        .collect()
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="refresh" content="{{ refresh_secs }}">
    <title>{{ title }} - Futures Bot Monitor</title>
    <style>{{ style|safe }}</style>
</head>
<body>
<nav>{% for link in nav %}<a href="{{ link.href }}"{% if link.active %} class="active"{% endif %}>{{ link.label }}</a>{% endfor %}</nav>
<main>
<h1>{{ title }}</h1>
{{ body|safe }}
</main>
<footer>Backend: {{ backend_url }}</footer>
</body>
</html>"#,
    ext = "html"
)]
struct PageTemplate<'a> {
    style: &'static str,
    title: &'a str,
    refresh_secs: u64,
    nav: Vec<NavLink>,
    body: &'a str,
    backend_url: &'a str,
}

/// Full page for one view, wrapping its newest fragment.
pub async fn render_page(state: &AppState, kind: ViewKind) -> Response {
    let body = state
        .board
        .latest(kind)
        .await
        .map(|panel| panel.html)
        .unwrap_or_else(|| WAITING_HTML.to_string());

    let page = PageTemplate {
        style: PAGE_STYLE,
        title: kind.title(),
        refresh_secs: state.refresh_secs,
        nav: nav_links(page_path(kind)),
        body: &body,
        backend_url: &state.backend_url,
    };

    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render {} page: {}", kind, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Newest HTML fragment of a view, without the page around it.
pub async fn get_view_fragment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let Some(kind) = ViewKind::from_slug(&slug) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": format!("Unknown view: {}", slug)})))
            .into_response();
    };

    match state.board.latest(kind).await {
        Some(panel) => Html(panel.html).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "View not rendered yet"})),
        )
            .into_response(),
    }
}

// === Health Check ===

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub rendered_views: Vec<ViewKind>,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        rendered_views: state.board.rendered_views().await,
    })
}
