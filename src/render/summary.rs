use super::{RenderedView, Table, View, ViewKind};
use crate::snapshot::{Fallback, SnapshotView};

/// Headline numbers plus the live prices table.
pub struct SummaryView;

impl View for SummaryView {
    fn kind(&self) -> ViewKind {
        ViewKind::Dashboard
    }

    fn render(&self, snapshot: &SnapshotView<'_>) -> RenderedView {
        let mut prices = Table::new(&["Symbol", "Price"]);
        for (symbol, price) in snapshot.prices() {
            prices.push_row(vec![symbol.to_string(), price.text(Fallback::Empty)]);
        }

        RenderedView::new(ViewKind::Dashboard)
            .stat("Total PNL", snapshot.total_pnl_text())
            .stat("Active symbols", snapshot.symbol_count().to_string())
            .table(prices)
    }
}
