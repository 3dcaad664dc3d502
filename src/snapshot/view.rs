use serde_json::{Map, Value};

use super::format::{
    as_number, clock_time, display_value, fixed, is_truthy, CONFIDENCE_DIGITS, PNL_DIGITS,
};
use super::Snapshot;

/// Highest exit stage a position can reach (stage 3 means fully closed).
pub const MAX_EXIT_STAGE: u32 = 3;
/// Shown when a worker reports no status.
pub const STATUS_PLACEHOLDER: &str = "n/a";

const PRICES: &str = "prices";
const POSITIONS: &str = "positions";
const PNL: &str = "pnl";
const TOTAL_PNL: &str = "total_pnl";
const LOGS: &str = "logs";
const THREADS: &str = "threads";
const STRATEGY_META: &str = "strategy_meta";
const EXIT_STAGE: &str = "exit_stage";

/// What a missing or malformed field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Unknown: blank cell.
    Empty,
    /// Aggregates and counters start from zero.
    Zero,
    Placeholder(&'static str),
}

impl Fallback {
    fn text(self) -> String {
        match self {
            Fallback::Empty => String::new(),
            Fallback::Zero => "0".to_string(),
            Fallback::Placeholder(p) => p.to_string(),
        }
    }

    fn fixed(self, digits: u32) -> String {
        match self {
            Fallback::Zero => fixed(0.0, digits),
            other => other.text(),
        }
    }
}

/// A single optional field pulled out of the snapshot. `null` counts as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRef<'a> {
    value: Option<&'a Value>,
}

impl<'a> FieldRef<'a> {
    pub fn new(value: Option<&'a Value>) -> Self {
        Self {
            value: value.filter(|v| !v.is_null()),
        }
    }

    /// Drops falsy values (`0`, `""`, `false`).
    pub fn truthy(self) -> Self {
        Self {
            value: self.value.filter(|v| is_truthy(v)),
        }
    }

    pub fn number(&self) -> Option<f64> {
        self.value.and_then(as_number)
    }

    pub fn text(&self, fallback: Fallback) -> String {
        match self.value {
            Some(v) => display_value(v),
            None => fallback.text(),
        }
    }

    pub fn fixed(&self, digits: u32, fallback: Fallback) -> String {
        match self.number() {
            Some(n) => fixed(n, digits),
            None => fallback.fixed(digits),
        }
    }

    pub fn clock_time(&self, fallback: Fallback) -> String {
        self.number()
            .and_then(clock_time)
            .unwrap_or_else(|| fallback.text())
    }
}

/// One entry of the `positions` map.
#[derive(Debug, Clone, Copy)]
pub struct PositionEntry<'a> {
    pub symbol: &'a str,
    pub side: FieldRef<'a>,
    pub size: FieldRef<'a>,
    pub entry_price: FieldRef<'a>,
}

impl PositionEntry<'_> {
    pub fn side_text(&self) -> String {
        self.side.text(Fallback::Empty)
    }

    pub fn size_text(&self) -> String {
        self.size.text(Fallback::Empty)
    }

    pub fn entry_text(&self) -> String {
        self.entry_price.text(Fallback::Empty)
    }
}

/// One entry of the `threads` map.
#[derive(Debug, Clone, Copy)]
pub struct ThreadEntry<'a> {
    pub name: &'a str,
    pub status: FieldRef<'a>,
    pub ts: FieldRef<'a>,
}

impl ThreadEntry<'_> {
    pub fn status_text(&self) -> String {
        self.status.truthy().text(Fallback::Placeholder(STATUS_PLACEHOLDER))
    }

    pub fn time_text(&self) -> String {
        self.ts.truthy().clock_time(Fallback::Empty)
    }
}

/// Typed, read-only accessor over a [`Snapshot`].
///
/// Each lookup carries its own default policy so renderers never decide
/// ad hoc how a missing value looks: unknown per-symbol values are blank,
/// aggregates are zero, thread status falls back to `n/a`.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotView<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> SnapshotView<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.snapshot.get(key).and_then(Value::as_object)
    }

    fn entries(&self, key: &str) -> Vec<(&'a str, &'a Value)> {
        self.object(key)
            .map(|map| map.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    fn lookup(&self, key: &str, symbol: &str) -> FieldRef<'a> {
        FieldRef::new(self.object(key).and_then(|map| map.get(symbol)))
    }

    pub fn prices(&self) -> Vec<(&'a str, FieldRef<'a>)> {
        self.entries(PRICES)
            .into_iter()
            .map(|(symbol, v)| (symbol, FieldRef::new(Some(v))))
            .collect()
    }

    pub fn price_text(&self, symbol: &str) -> String {
        self.lookup(PRICES, symbol).text(Fallback::Empty)
    }

    /// Distinct symbols with a live price.
    pub fn symbol_count(&self) -> usize {
        self.object(PRICES).map(Map::len).unwrap_or(0)
    }

    pub fn positions(&self) -> Vec<PositionEntry<'a>> {
        self.entries(POSITIONS)
            .into_iter()
            .map(|(symbol, pos)| {
                let field = |name: &str| FieldRef::new(pos.as_object().and_then(|p| p.get(name)));
                PositionEntry {
                    symbol,
                    side: field("side"),
                    size: field("size"),
                    entry_price: field("entryPrice"),
                }
            })
            .collect()
    }

    pub fn pnl(&self) -> Vec<(&'a str, FieldRef<'a>)> {
        self.entries(PNL)
            .into_iter()
            .map(|(symbol, v)| (symbol, FieldRef::new(Some(v))))
            .collect()
    }

    /// PNL of one symbol for the positions table; a symbol without a PNL
    /// entry counts as zero.
    pub fn pnl_text(&self, symbol: &str) -> String {
        self.lookup(PNL, symbol).fixed(PNL_DIGITS, Fallback::Zero)
    }

    pub fn total_pnl_text(&self) -> String {
        FieldRef::new(self.snapshot.get(TOTAL_PNL))
            .truthy()
            .fixed(PNL_DIGITS, Fallback::Zero)
    }

    /// Log lines, oldest first.
    pub fn logs(&self) -> Vec<String> {
        self.snapshot
            .get(LOGS)
            .and_then(Value::as_array)
            .map(|lines| lines.iter().map(display_value).collect())
            .unwrap_or_default()
    }

    pub fn threads(&self) -> Vec<ThreadEntry<'a>> {
        self.entries(THREADS)
            .into_iter()
            .map(|(name, info)| {
                let field = |key: &str| FieldRef::new(info.as_object().and_then(|i| i.get(key)));
                ThreadEntry {
                    name,
                    status: field("status"),
                    ts: field("ts"),
                }
            })
            .collect()
    }

    fn meta_field(&self, symbol: &str, key: &str) -> FieldRef<'a> {
        FieldRef::new(
            self.object(STRATEGY_META)
                .and_then(|meta| meta.get(symbol))
                .and_then(Value::as_object)
                .and_then(|m| m.get(key)),
        )
    }

    pub fn strategy_text(&self, symbol: &str) -> String {
        self.meta_field(symbol, "strategy").truthy().text(Fallback::Empty)
    }

    pub fn confidence_text(&self, symbol: &str) -> String {
        self.meta_field(symbol, "confidence")
            .fixed(CONFIDENCE_DIGITS, Fallback::Empty)
    }

    /// `<stage>/<max>`, with a missing stage counted as zero.
    pub fn exit_stage_text(&self, symbol: &str) -> String {
        let stage = self.lookup(EXIT_STAGE, symbol).truthy().text(Fallback::Zero);
        format!("{}/{}", stage, MAX_EXIT_STAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> Snapshot {
        Snapshot::from(value)
    }

    #[test]
    fn test_absent_fields_are_empty_collections() {
        let s = snapshot(json!({}));
        let view = s.view();
        assert!(view.prices().is_empty());
        assert!(view.positions().is_empty());
        assert!(view.pnl().is_empty());
        assert!(view.logs().is_empty());
        assert!(view.threads().is_empty());
        assert_eq!(view.symbol_count(), 0);
        assert_eq!(view.total_pnl_text(), "0.0000");
    }

    #[test]
    fn test_mistyped_fields_are_tolerated() {
        let s = snapshot(json!({
            "prices": [1, 2],
            "positions": {"BTCUSDT": "oops"},
            "logs": "not a list",
            "total_pnl": "abc",
            "threads": 5
        }));
        let view = s.view();
        assert!(view.prices().is_empty());
        assert_eq!(view.positions().len(), 1);
        assert_eq!(view.positions()[0].side_text(), "");
        assert!(view.logs().is_empty());
        assert!(view.threads().is_empty());
        assert_eq!(view.total_pnl_text(), "0.0000");
    }

    #[test]
    fn test_cross_map_lookups_default() {
        let s = snapshot(json!({
            "positions": {"ETHUSDT": {"side": "short", "size": 1.5}},
            "prices": {"BTCUSDT": 65000}
        }));
        let view = s.view();
        assert_eq!(view.price_text("ETHUSDT"), "");
        assert_eq!(view.pnl_text("ETHUSDT"), "0.0000");
        assert_eq!(view.strategy_text("ETHUSDT"), "");
        assert_eq!(view.confidence_text("ETHUSDT"), "");
        assert_eq!(view.exit_stage_text("ETHUSDT"), "0/3");
    }

    #[test]
    fn test_missing_entry_price_is_blank() {
        let s = snapshot(json!({"positions": {"BTCUSDT": {"side": "long", "size": 0.01}}}));
        let positions = s.view().positions();
        assert_eq!(positions[0].entry_text(), "");

        let s = snapshot(json!({"positions": {"BTCUSDT": {"side": "long", "size": 0.01, "entryPrice": null}}}));
        assert_eq!(s.view().positions()[0].entry_text(), "");
    }

    #[test]
    fn test_strategy_meta_formatting() {
        let s = snapshot(json!({
            "strategy_meta": {
                "BTCUSDT": {"strategy": "mtf_ema_rsi_adx", "confidence": 0.876},
                "ETHUSDT": {"strategy": "", "confidence": 0}
            },
            "exit_stage": {"BTCUSDT": 2}
        }));
        let view = s.view();
        assert_eq!(view.strategy_text("BTCUSDT"), "mtf_ema_rsi_adx");
        assert_eq!(view.confidence_text("BTCUSDT"), "0.88");
        assert_eq!(view.exit_stage_text("BTCUSDT"), "2/3");
        assert_eq!(view.strategy_text("ETHUSDT"), "");
        assert_eq!(view.confidence_text("ETHUSDT"), "0.00");
    }

    #[test]
    fn test_thread_defaults() {
        let s = snapshot(json!({
            "threads": {
                "monitor": {"status": "", "ts": 0},
                "pnl": {"status": "running", "ts": 1_700_000_000.5},
                "orphan": {}
            }
        }));
        let threads = s.view().threads();
        assert_eq!(threads.len(), 3);
        assert_eq!(threads[0].name, "monitor");
        assert_eq!(threads[0].status_text(), "n/a");
        assert_eq!(threads[0].time_text(), "");
        assert_eq!(threads[1].status_text(), "running");
        assert_eq!(threads[1].time_text().len(), 8);
        assert_eq!(threads[2].status_text(), "n/a");
        assert_eq!(threads[2].time_text(), "");
    }

    #[test]
    fn test_logs_keep_order() {
        let s = snapshot(json!({"logs": ["first", "second", 3]}));
        assert_eq!(s.view().logs(), vec!["first", "second", "3"]);
    }
}
