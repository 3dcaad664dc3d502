use super::{RenderedView, Table, View, ViewKind};
use crate::snapshot::{PositionEntry, SnapshotView};

const BASE_HEADERS: [&str; 6] = ["Symbol", "Side", "Size", "Entry", "Last", "PNL"];

/// Extra per-symbol columns appended to the positions table.
pub trait PositionEnrichment: Send + Sync {
    fn headers(&self) -> &'static [&'static str];
    fn cells(&self, snapshot: &SnapshotView<'_>, symbol: &str) -> Vec<String>;
}

/// Strategy name, confidence and exit stage from `strategy_meta` / `exit_stage`.
pub struct StrategyMetaEnrichment;

impl PositionEnrichment for StrategyMetaEnrichment {
    fn headers(&self) -> &'static [&'static str] {
        &["Strategy", "Confidence", "Exit stage"]
    }

    fn cells(&self, snapshot: &SnapshotView<'_>, symbol: &str) -> Vec<String> {
        vec![
            snapshot.strategy_text(symbol),
            snapshot.confidence_text(symbol),
            snapshot.exit_stage_text(symbol),
        ]
    }
}

/// Symbol, side, size and entry price: the columns every positions table starts with.
pub(crate) fn identity_cells(position: &PositionEntry<'_>) -> Vec<String> {
    vec![
        position.symbol.to_string(),
        position.side_text(),
        position.size_text(),
        position.entry_text(),
    ]
}

/// Open positions joined with last price and PNL, optionally enriched.
pub struct PositionsView {
    enrichment: Option<Box<dyn PositionEnrichment>>,
}

impl PositionsView {
    pub fn new(enrichment: Option<Box<dyn PositionEnrichment>>) -> Self {
        Self { enrichment }
    }

    pub fn basic() -> Self {
        Self::new(None)
    }

    pub fn detailed() -> Self {
        Self::new(Some(Box::new(StrategyMetaEnrichment)))
    }

    pub fn table(&self, snapshot: &SnapshotView<'_>) -> Table {
        let mut headers: Vec<&str> = BASE_HEADERS.to_vec();
        if let Some(enrichment) = &self.enrichment {
            headers.extend_from_slice(enrichment.headers());
        }

        let mut table = Table::new(&headers);
        for position in snapshot.positions() {
            let mut row = identity_cells(&position);
            row.push(snapshot.price_text(position.symbol));
            row.push(snapshot.pnl_text(position.symbol));
            if let Some(enrichment) = &self.enrichment {
                row.extend(enrichment.cells(snapshot, position.symbol));
            }
            table.push_row(row);
        }
        table
    }
}

impl View for PositionsView {
    fn kind(&self) -> ViewKind {
        if self.enrichment.is_some() {
            ViewKind::Positions
        } else {
            ViewKind::PositionsBasic
        }
    }

    fn render(&self, snapshot: &SnapshotView<'_>) -> RenderedView {
        RenderedView::new(self.kind()).table(self.table(snapshot))
    }
}
