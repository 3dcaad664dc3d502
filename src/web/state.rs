use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::client::SettingsApi;
use crate::config::MonitorConfig;
use crate::poller::RenderTarget;
use crate::render::{markup, RenderedView, ViewKind};

/// Latest HTML fragment of one view.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub html: String,
    pub updated_at: DateTime<Utc>,
}

/// Render target holding the newest fragment per view for the page handlers.
#[derive(Clone, Default)]
pub struct ViewBoard {
    panels: Arc<RwLock<HashMap<ViewKind, Panel>>>,
}

impl ViewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest(&self, kind: ViewKind) -> Option<Panel> {
        self.panels.read().await.get(&kind).cloned()
    }

    pub async fn rendered_views(&self) -> Vec<ViewKind> {
        let mut kinds: Vec<ViewKind> = self.panels.read().await.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

#[async_trait]
impl RenderTarget for ViewBoard {
    async fn present(&self, view: &RenderedView) {
        match markup::to_html(view) {
            Ok(html) => {
                let panel = Panel {
                    html,
                    updated_at: Utc::now(),
                };
                self.panels.write().await.insert(view.kind, panel);
            }
            Err(e) => warn!("Failed to render {} view as HTML: {}", view.kind, e),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub board: ViewBoard,
    pub settings_api: Arc<dyn SettingsApi>,
    pub refresh_secs: u64,
    pub backend_url: String,
}

impl AppState {
    pub fn new(board: ViewBoard, settings_api: Arc<dyn SettingsApi>, config: &MonitorConfig) -> Self {
        // Pages reload at the poll period, rounded up to whole seconds.
        let refresh_secs = ((config.poll_interval_ms + 999) / 1000).max(1);
        Self {
            board,
            settings_api,
            refresh_secs,
            backend_url: config.backend_url.clone(),
        }
    }
}
