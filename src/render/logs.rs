use super::{RenderedView, View, ViewKind};
use crate::snapshot::SnapshotView;

/// Raw log lines joined by newline, optionally limited to the newest `tail`.
pub struct LogsView {
    tail: Option<usize>,
}

impl LogsView {
    pub fn new(tail: Option<usize>) -> Self {
        Self { tail }
    }
}

impl View for LogsView {
    fn kind(&self) -> ViewKind {
        ViewKind::Logs
    }

    fn render(&self, snapshot: &SnapshotView<'_>) -> RenderedView {
        let lines = snapshot.logs();
        let start = match self.tail {
            Some(tail) => lines.len().saturating_sub(tail),
            None => 0,
        };
        RenderedView::new(ViewKind::Logs).preformatted(lines[start..].join("\n"))
    }
}
