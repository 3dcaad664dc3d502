pub mod format;
pub mod view;

pub use format::*;
pub use view::*;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Status snapshot returned by `GET /stats`.
///
/// Every top-level field is optional and may carry an unexpected type, so the
/// body is kept as a JSON object and typed lazily through [`SnapshotView`].
/// Field order is the order the backend sent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Snapshot {
    fields: Map<String, Value>,
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            other => {
                debug!("Snapshot body is not an object ({}), treating as empty", kind_of(&other));
                Self::default()
            }
        }
    }
}

impl Snapshot {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn view(&self) -> SnapshotView<'_> {
        SnapshotView::new(self)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_body_is_empty() {
        let snapshot: Snapshot = serde_json::from_str("[1, 2, 3]").unwrap();
        assert!(snapshot.is_empty());

        let snapshot: Snapshot = serde_json::from_str("null").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_keeps_backend_field_order() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"prices": {"SOLUSDT": 150, "BTCUSDT": 65000, "ETHUSDT": 3000}}"#)
                .unwrap();
        let symbols: Vec<&str> = snapshot.view().prices().into_iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["SOLUSDT", "BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn test_unknown_fields_are_kept_but_ignored() {
        let snapshot = Snapshot::from(json!({"universe": ["BTCUSDT"], "total_pnl": 1.5}));
        assert_eq!(snapshot.get("universe"), Some(&json!(["BTCUSDT"])));
        assert_eq!(snapshot.view().total_pnl_text(), "1.5000");
    }
}
