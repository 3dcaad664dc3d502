use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::snapshot::display_value;

/// Sentinel meaning "no explicit strategy selection, the backend decides".
pub const STRATEGIES_AUTO: &str = "auto";

/// Keys of the settings form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    UseTestnet,
    DryRun,
    Leverage,
    UniverseSize,
    MaxPositions,
    Strategies,
}

impl SettingsField {
    pub const ALL: [SettingsField; 6] = [
        SettingsField::UseTestnet,
        SettingsField::DryRun,
        SettingsField::Leverage,
        SettingsField::UniverseSize,
        SettingsField::MaxPositions,
        SettingsField::Strategies,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::UseTestnet => "USE_TESTNET",
            Self::DryRun => "DRY_RUN",
            Self::Leverage => "LEVERAGE",
            Self::UniverseSize => "UNIVERSE_SIZE",
            Self::MaxPositions => "MAX_POSITIONS",
            Self::Strategies => "STRATEGIES",
        }
    }

    /// Value the bot falls back to when the key is missing from its environment.
    pub fn backend_default(&self) -> &'static str {
        match self {
            Self::UseTestnet => "true",
            Self::DryRun => "true",
            Self::Leverage => "3",
            Self::UniverseSize => "200",
            Self::MaxPositions => "3",
            Self::Strategies => STRATEGIES_AUTO,
        }
    }
}

impl std::fmt::Display for SettingsField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Settings as loaded from `GET /settings`.
///
/// The backend may send booleans and numbers as JSON scalars or as strings;
/// everything is kept as text, the way the form shows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRecord {
    pub use_testnet: Option<String>,
    pub dry_run: Option<String>,
    pub leverage: Option<String>,
    pub universe_size: Option<String>,
    pub max_positions: Option<String>,
    pub strategies: Option<String>,
    /// Strategy catalog offered in the selector. Never submitted back.
    pub available_strategies: Vec<String>,
}

impl SettingsRecord {
    pub fn get(&self, field: SettingsField) -> Option<&str> {
        let value = match field {
            SettingsField::UseTestnet => &self.use_testnet,
            SettingsField::DryRun => &self.dry_run,
            SettingsField::Leverage => &self.leverage,
            SettingsField::UniverseSize => &self.universe_size,
            SettingsField::MaxPositions => &self.max_positions,
            SettingsField::Strategies => &self.strategies,
        };
        value.as_deref()
    }
}

impl From<Value> for SettingsRecord {
    fn from(value: Value) -> Self {
        let text = |field: SettingsField| {
            value
                .get(field.key())
                .filter(|v| !v.is_null())
                .map(display_value)
        };
        let available_strategies = value
            .get("available_strategies")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .map(display_value)
                    .filter(|id| !id.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            use_testnet: text(SettingsField::UseTestnet),
            dry_run: text(SettingsField::DryRun),
            leverage: text(SettingsField::Leverage),
            universe_size: text(SettingsField::UniverseSize),
            max_positions: text(SettingsField::MaxPositions),
            strategies: text(SettingsField::Strategies),
            available_strategies,
        }
    }
}

/// Body of `POST /settings`. Every value travels as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SettingsPayload {
    pub use_testnet: String,
    pub dry_run: String,
    pub leverage: String,
    pub universe_size: String,
    pub max_positions: String,
    pub strategies: String,
}
