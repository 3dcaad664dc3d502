pub mod document;
pub mod markup;
pub mod logs;
pub mod overview;
pub mod positions;
pub mod summary;
pub mod threads;

pub use document::*;
pub use logs::LogsView;
pub use overview::OverviewView;
pub use positions::PositionsView;
pub use summary::SummaryView;
pub use threads::ThreadStatusView;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::snapshot::SnapshotView;

/// The independently rendered views of the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    /// Prices, positions, per-symbol PNL, total and logs on one page.
    Overview,
    /// Total PNL, active symbol count and the prices table.
    Dashboard,
    Logs,
    /// Positions enriched with strategy metadata and exit stage.
    Positions,
    PositionsBasic,
    /// Worker thread health.
    Status,
}

impl ViewKind {
    pub fn all() -> [ViewKind; 6] {
        [
            ViewKind::Overview,
            ViewKind::Dashboard,
            ViewKind::Positions,
            ViewKind::PositionsBasic,
            ViewKind::Logs,
            ViewKind::Status,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ViewKind::Overview => "overview",
            ViewKind::Dashboard => "dashboard",
            ViewKind::Logs => "logs",
            ViewKind::Positions => "positions",
            ViewKind::PositionsBasic => "positions-basic",
            ViewKind::Status => "status",
        }
    }

    pub fn from_slug(slug: &str) -> Option<ViewKind> {
        Self::all().into_iter().find(|k| k.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Overview => "Overview",
            ViewKind::Dashboard => "Dashboard",
            ViewKind::Logs => "Logs",
            ViewKind::Positions => "Positions",
            ViewKind::PositionsBasic => "Positions (basic)",
            ViewKind::Status => "Thread Status",
        }
    }

    /// Renderer for this view with default options.
    pub fn view(self) -> Box<dyn View> {
        match self {
            ViewKind::Overview => Box::new(OverviewView),
            ViewKind::Dashboard => Box::new(SummaryView),
            ViewKind::Logs => Box::new(LogsView::new(None)),
            ViewKind::Positions => Box::new(PositionsView::detailed()),
            ViewKind::PositionsBasic => Box::new(PositionsView::basic()),
            ViewKind::Status => Box::new(ThreadStatusView),
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A pure projection of a snapshot: the same snapshot always renders the
/// same output.
pub trait View: Send + Sync {
    fn kind(&self) -> ViewKind;
    fn render(&self, snapshot: &SnapshotView<'_>) -> RenderedView;
}

/// Builds the renderer for `kind`, capping the logs view at `log_tail` lines.
pub fn build_view(kind: ViewKind, log_tail: Option<usize>) -> Box<dyn View> {
    match kind {
        ViewKind::Logs => Box::new(LogsView::new(log_tail)),
        other => other.view(),
    }
}
