use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use tokio::sync::Mutex;
use tracing::warn;

use crate::render::{markup, RenderedView, ViewKind};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Where rendered views end up. Each call replaces whatever the target
/// showed for that view before.
#[async_trait]
pub trait RenderTarget: Send + Sync {
    async fn present(&self, view: &RenderedView);
}

/// Redraws every view the session renders as plain text on stdout.
pub struct TerminalTarget {
    panels: Mutex<BTreeMap<ViewKind, String>>,
}

impl TerminalTarget {
    pub fn new() -> Self {
        Self {
            panels: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for TerminalTarget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RenderTarget for TerminalTarget {
    async fn present(&self, view: &RenderedView) {
        let mut panels = self.panels.lock().await;
        panels.insert(view.kind, markup::to_text(view));

        let mut screen = String::from(CLEAR_SCREEN);
        for (kind, text) in panels.iter() {
            screen.push_str(&format!("== {} ==\n{}\n\n", kind.title(), text));
        }

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(screen.as_bytes()).and_then(|_| stdout.flush()) {
            warn!("Failed to draw {} view: {}", view.kind, e);
        }
    }
}
