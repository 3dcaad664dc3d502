use super::positions::identity_cells;
use super::{RenderedView, Table, View, ViewKind};
use crate::snapshot::{Fallback, SnapshotView, PNL_DIGITS};

/// Everything at once: total, prices, positions, per-symbol PNL and logs.
pub struct OverviewView;

impl View for OverviewView {
    fn kind(&self) -> ViewKind {
        ViewKind::Overview
    }

    fn render(&self, snapshot: &SnapshotView<'_>) -> RenderedView {
        let mut prices = Table::new(&["Symbol", "Price"]);
        for (symbol, price) in snapshot.prices() {
            prices.push_row(vec![symbol.to_string(), price.text(Fallback::Empty)]);
        }

        let mut positions = Table::new(&["Symbol", "Side", "Size", "Entry"]);
        for position in snapshot.positions() {
            positions.push_row(identity_cells(&position));
        }

        let mut pnl = Table::new(&["Symbol", "PNL (USDT)"]);
        for (symbol, value) in snapshot.pnl() {
            pnl.push_row(vec![symbol.to_string(), value.fixed(PNL_DIGITS, Fallback::Empty)]);
        }

        RenderedView::new(ViewKind::Overview)
            .heading(2, format!("PNL Total: {} USDT", snapshot.total_pnl_text()))
            .heading(3, "Prices")
            .table(prices)
            .heading(3, "Positions")
            .table(positions)
            .heading(3, "PNL")
            .table(pnl)
            .heading(3, "Logs")
            .preformatted(snapshot.logs().join("\n"))
    }
}
