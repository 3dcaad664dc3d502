use std::sync::Arc;
use tracing::{info, warn};

use super::form::SettingsForm;
use crate::client::{ClientError, SettingsApi};

const SAVED_NOTICE: &str = "Saved. Restart the container to apply changes.";
const FAILED_NOTICE: &str = "Failed to save";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Viewing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
}

impl SaveOutcome {
    /// Message shown to the user after a save attempt.
    pub fn notice(&self) -> &'static str {
        match self {
            SaveOutcome::Saved => SAVED_NOTICE,
            SaveOutcome::Failed => FAILED_NOTICE,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// Loads the runtime settings into a form and submits user edits back.
///
/// The controller never holds an authoritative copy: after a save the form
/// is left as the user edited it, and only a new `load` shows what the
/// backend actually stored.
pub struct SettingsController {
    api: Arc<dyn SettingsApi>,
    form: Option<SettingsForm>,
    state: FormState,
}

impl SettingsController {
    pub fn new(api: Arc<dyn SettingsApi>) -> Self {
        Self {
            api,
            form: None,
            state: FormState::Viewing,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn form(&self) -> Option<&SettingsForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut SettingsForm> {
        self.form.as_mut()
    }

    /// Fetches settings and rebuilds the form. On failure the previous form
    /// (if any) is kept.
    pub async fn load(&mut self) -> Result<&SettingsForm, ClientError> {
        let record = self.api.load_settings().await?;
        info!(
            "Loaded settings ({} strategies in catalog)",
            record.available_strategies.len()
        );
        Ok(self.form.insert(SettingsForm::populate(&record)))
    }

    /// Submits the current form. Nothing is submitted before a successful load.
    pub async fn save(&mut self) -> SaveOutcome {
        let payload = match &self.form {
            Some(form) => form.to_payload(),
            None => {
                warn!("Settings save requested before settings were loaded");
                return SaveOutcome::Failed;
            }
        };

        self.state = FormState::Submitting;
        let outcome = match self.api.save_settings(&payload).await {
            Ok(()) => {
                info!("Settings saved: STRATEGIES={}", payload.strategies);
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!("Settings save failed: {}", e);
                SaveOutcome::Failed
            }
        };
        self.state = FormState::Viewing;
        outcome
    }
}
