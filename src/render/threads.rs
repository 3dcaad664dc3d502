use super::{RenderedView, Table, View, ViewKind};
use crate::snapshot::SnapshotView;

pub const NO_THREADS: &str = "No threads";

/// Health of the bot's worker threads.
pub struct ThreadStatusView;

impl View for ThreadStatusView {
    fn kind(&self) -> ViewKind {
        ViewKind::Status
    }

    fn render(&self, snapshot: &SnapshotView<'_>) -> RenderedView {
        let threads = snapshot.threads();
        if threads.is_empty() {
            return RenderedView::new(ViewKind::Status).placeholder(NO_THREADS);
        }

        let mut table = Table::new(&["Thread", "Status", "Updated"]);
        for thread in threads {
            table.push_row(vec![thread.name.to_string(), thread.status_text(), thread.time_text()]);
        }
        RenderedView::new(ViewKind::Status).table(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Block;
    use crate::snapshot::Snapshot;
    use serde_json::json;

    #[test]
    fn test_no_threads_placeholder() {
        for body in [json!({}), json!({"threads": {}}), json!({"threads": null})] {
            let snapshot = Snapshot::from(body);
            let rendered = ThreadStatusView.render(&snapshot.view());
            assert_eq!(rendered.blocks, vec![Block::Placeholder(NO_THREADS.to_string())]);
        }
    }

    #[test]
    fn test_thread_rows() {
        let snapshot = Snapshot::from(json!({
            "threads": {
                "scalp1m": {"status": "running"},
                "pnl": {"ts": 1_700_000_000}
            }
        }));
        let rendered = ThreadStatusView.render(&snapshot.view());
        let rows = &rendered.tables()[0].rows;

        assert_eq!(rows[0], vec!["scalp1m".to_string(), "running".to_string(), String::new()]);
        assert_eq!(rows[1][0], "pnl");
        assert_eq!(rows[1][1], "n/a");
        assert_eq!(rows[1][2].len(), 8);
    }
}
