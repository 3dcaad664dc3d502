use super::types::{SettingsField, SettingsPayload, SettingsRecord, STRATEGIES_AUTO};

/// Splits a comma separated `STRATEGIES` value into trimmed, non-empty ids.
pub fn parse_strategy_list(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|id| !id.is_empty()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOption {
    pub id: String,
    pub selected: bool,
}

/// Multi-select over the server's strategy catalog. Options keep catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategySelector {
    options: Vec<StrategyOption>,
}

impl StrategySelector {
    /// An option is selected when its id appears in `enabled`.
    pub fn from_catalog(catalog: &[String], enabled: &str) -> Self {
        let enabled = parse_strategy_list(enabled);
        let options = catalog
            .iter()
            .map(|id| StrategyOption {
                id: id.clone(),
                selected: enabled.contains(&id.as_str()),
            })
            .collect();
        Self { options }
    }

    pub fn options(&self) -> &[StrategyOption] {
        &self.options
    }

    /// Returns false when `id` is not in the catalog.
    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        match self.options.iter_mut().find(|o| o.id == id) {
            Some(option) => {
                option.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Replaces the selection. Ids missing from the catalog are returned.
    pub fn select_only<'a>(&mut self, ids: &[&'a str]) -> Vec<&'a str> {
        for option in &mut self.options {
            option.selected = ids.contains(&option.id.as_str());
        }
        ids.iter()
            .copied()
            .filter(|id| !self.options.iter().any(|o| o.id == *id))
            .collect()
    }

    pub fn clear(&mut self) {
        for option in &mut self.options {
            option.selected = false;
        }
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.id.as_str())
            .collect()
    }

    /// Value sent as `STRATEGIES`: the selected ids joined by comma, or the
    /// `auto` sentinel when nothing is selected.
    pub fn submission_value(&self) -> String {
        let picked = self.selected_ids();
        if picked.is_empty() {
            STRATEGIES_AUTO.to_string()
        } else {
            picked.join(",")
        }
    }
}

/// Editable copy of the settings, populated 1:1 from a [`SettingsRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub use_testnet: String,
    pub dry_run: String,
    pub leverage: String,
    pub universe_size: String,
    pub max_positions: String,
    pub strategies: StrategySelector,
}

impl SettingsForm {
    pub fn populate(record: &SettingsRecord) -> Self {
        let text = |field: SettingsField| record.get(field).unwrap_or_default().to_string();
        Self {
            use_testnet: text(SettingsField::UseTestnet),
            dry_run: text(SettingsField::DryRun),
            leverage: text(SettingsField::Leverage),
            universe_size: text(SettingsField::UniverseSize),
            max_positions: text(SettingsField::MaxPositions),
            strategies: StrategySelector::from_catalog(
                &record.available_strategies,
                record.get(SettingsField::Strategies).unwrap_or_default(),
            ),
        }
    }

    /// Current text of a field; for `Strategies` this is the submission value.
    pub fn value(&self, field: SettingsField) -> String {
        match field {
            SettingsField::UseTestnet => self.use_testnet.clone(),
            SettingsField::DryRun => self.dry_run.clone(),
            SettingsField::Leverage => self.leverage.clone(),
            SettingsField::UniverseSize => self.universe_size.clone(),
            SettingsField::MaxPositions => self.max_positions.clone(),
            SettingsField::Strategies => self.strategies.submission_value(),
        }
    }

    /// Edits a field. `Strategies` takes a comma separated list and replaces
    /// the selection; unknown ids are returned.
    pub fn set<'a>(&mut self, field: SettingsField, value: &'a str) -> Vec<&'a str> {
        let slot = match field {
            SettingsField::UseTestnet => &mut self.use_testnet,
            SettingsField::DryRun => &mut self.dry_run,
            SettingsField::Leverage => &mut self.leverage,
            SettingsField::UniverseSize => &mut self.universe_size,
            SettingsField::MaxPositions => &mut self.max_positions,
            SettingsField::Strategies => {
                return self.strategies.select_only(&parse_strategy_list(value));
            }
        };
        *slot = value.to_string();
        Vec::new()
    }

    /// Applies a submitted HTML form given as ordered key/value pairs.
    ///
    /// Scalar fields missing from the submission keep their value. The
    /// strategy selection is replaced by every `STRATEGIES` pair, so a
    /// multi-select with nothing chosen clears it. Ids missing from the
    /// catalog are returned.
    pub fn apply_submission<'a>(&mut self, pairs: &'a [(String, String)]) -> Vec<&'a str> {
        for field in SettingsField::ALL {
            if field == SettingsField::Strategies {
                continue;
            }
            if let Some((_, value)) = pairs.iter().rev().find(|(key, _)| key == field.key()) {
                self.set(field, value);
            }
        }

        let ids: Vec<&str> = pairs
            .iter()
            .filter(|(key, _)| key == SettingsField::Strategies.key())
            .map(|(_, id)| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        self.strategies.select_only(&ids)
    }

    pub fn to_payload(&self) -> SettingsPayload {
        SettingsPayload {
            use_testnet: self.use_testnet.clone(),
            dry_run: self.dry_run.clone(),
            leverage: self.leverage.clone(),
            universe_size: self.universe_size.clone(),
            max_positions: self.max_positions.clone(),
            strategies: self.strategies.submission_value(),
        }
    }

    /// Booleans are read case-insensitively and counts as positive
    /// integers, the way the bot parses its environment.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (field, value) in [
            (SettingsField::UseTestnet, &self.use_testnet),
            (SettingsField::DryRun, &self.dry_run),
        ] {
            let value = value.trim();
            if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
                errors.push(format!("{} must be true or false", field));
            }
        }

        for (field, value) in [
            (SettingsField::Leverage, &self.leverage),
            (SettingsField::UniverseSize, &self.universe_size),
            (SettingsField::MaxPositions, &self.max_positions),
        ] {
            match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => {}
                _ => errors.push(format!("{} must be an integer > 0", field)),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
