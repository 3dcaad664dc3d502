use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;
use tracing::{error, warn};

use super::api::{nav_links, NavLink, PAGE_STYLE, SETTINGS_PATH};
use super::AppState;
use crate::settings::{SaveOutcome, SettingsController, SettingsField, SettingsForm, StrategyOption};

const LOAD_FAILED: &str = "Failed to load settings";

struct FieldRow {
    key: &'static str,
    value: String,
    default: &'static str,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Settings - Futures Bot Monitor</title>
    <style>{{ style|safe }}</style>
</head>
<body>
<nav>{% for link in nav %}<a href="{{ link.href }}"{% if link.active %} class="active"{% endif %}>{{ link.label }}</a>{% endfor %}</nav>
<main>
<h1>Settings</h1>
{% match notice %}{% when Some with (text) %}<div class="notice">{{ text }}</div>{% when None %}{% endmatch %}
{% for message in errors %}<div class="error">{{ message }}</div>{% endfor %}
{% if loaded %}<form method="post" action="{{ action }}">
{% for field in fields %}<label>{{ field.key }} <input name="{{ field.key }}" value="{{ field.value }}" placeholder="{{ field.default }}"></label>
{% endfor %}<label>STRATEGIES <select name="STRATEGIES" multiple size="{{ options.len() }}">{% for option in options %}<option value="{{ option.id }}"{% if option.selected %} selected{% endif %}>{{ option.id }}</option>{% endfor %}</select></label>
<button type="submit">Save</button>
</form>{% endif %}
</main>
<footer>Backend: {{ backend_url }}</footer>
</body>
</html>"#,
    ext = "html"
)]
struct SettingsTemplate<'a> {
    style: &'static str,
    nav: Vec<NavLink>,
    action: &'static str,
    notice: Option<&'a str>,
    errors: Vec<String>,
    loaded: bool,
    fields: Vec<FieldRow>,
    options: Vec<StrategyOption>,
    backend_url: &'a str,
}

fn render_settings(
    state: &AppState,
    form: Option<&SettingsForm>,
    notice: Option<&str>,
    errors: Vec<String>,
) -> Response {
    let fields = form
        .map(|form| {
            SettingsField::ALL
                .into_iter()
                .filter(|field| *field != SettingsField::Strategies)
                .map(|field| FieldRow {
                    key: field.key(),
                    value: form.value(field),
                    default: field.backend_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    let page = SettingsTemplate {
        style: PAGE_STYLE,
        nav: nav_links(SETTINGS_PATH),
        action: SETTINGS_PATH,
        notice,
        errors,
        loaded: form.is_some(),
        fields,
        options: form.map(|f| f.strategies.options().to_vec()).unwrap_or_default(),
        backend_url: &state.backend_url,
    };

    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render settings page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Settings editor populated from the backend.
pub async fn settings_page(State(state): State<AppState>) -> Response {
    let mut controller = SettingsController::new(Arc::clone(&state.settings_api));
    match controller.load().await {
        Ok(form) => render_settings(&state, Some(form), None, Vec::new()),
        Err(e) => {
            warn!("Settings page could not load settings: {}", e);
            render_settings(&state, None, Some(LOAD_FAILED), Vec::new())
        }
    }
}

/// Applies the submitted form on top of freshly loaded settings and saves it.
pub async fn submit_settings(
    State(state): State<AppState>,
    Form(submitted): Form<Vec<(String, String)>>,
) -> Response {
    let mut controller = SettingsController::new(Arc::clone(&state.settings_api));
    if let Err(e) = controller.load().await {
        warn!("Settings could not be reloaded before saving: {}", e);
        return render_settings(&state, None, Some(SaveOutcome::Failed.notice()), Vec::new());
    }

    let errors = match controller.form_mut() {
        Some(form) => {
            let unknown = form.apply_submission(&submitted);
            if !unknown.is_empty() {
                warn!("Ignoring strategies missing from the catalog: {}", unknown.join(", "));
            }
            form.validate().err().unwrap_or_default()
        }
        None => Vec::new(),
    };
    if !errors.is_empty() {
        return render_settings(&state, controller.form(), None, errors);
    }

    let outcome = controller.save().await;
    render_settings(&state, controller.form(), Some(outcome.notice()), Vec::new())
}
