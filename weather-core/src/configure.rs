//! Interactive (re)configuration of the target city and the API key.

use anyhow::Result;
use async_trait::async_trait;

use crate::{
    config::SettingsStore,
    model::Location,
};

pub const LOCATION_PROMPT: &str = "City. i.e.: São Paulo,BR";
pub const API_KEY_PROMPT: &str = "API Key for OpenWeatherMap.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: &'static str,
    /// Pre-filled answer, empty when nothing is stored yet.
    pub initial_value: String,
}

/// Asks the user for one line of text.
///
/// `Ok(None)` means the prompt was cancelled. Prompts must stay open until
/// the user submits or cancels.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn prompt(&self, request: &PromptRequest) -> Result<Option<String>>;
}

/// Which settings a flow run actually replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlowOutcome {
    pub location_updated: bool,
    pub api_key_updated: bool,
}

/// Prompt for location, then API key, persisting each accepted answer
/// immediately. Empty or cancelled answers leave the stored value alone.
///
/// A cancelled second prompt does not undo the first; both writes are
/// independent.
pub async fn run_configuration_flow(
    store: &dyn SettingsStore,
    prompter: &dyn Prompter,
) -> Result<FlowOutcome> {
    let mut settings = store.load()?;
    let mut outcome = FlowOutcome::default();

    let request = PromptRequest {
        message: LOCATION_PROMPT,
        initial_value: settings.location.as_ref().map(Location::to_string).unwrap_or_default(),
    };
    if let Some(input) = non_empty(prompter.prompt(&request).await?) {
        let location = Location::parse(&input);
        tracing::info!(
            city = %location.city_name,
            country = %location.country_code,
            "location updated"
        );
        settings.location = Some(location);
        store.save(&settings)?;
        outcome.location_updated = true;
    }

    let request = PromptRequest {
        message: API_KEY_PROMPT,
        initial_value: settings.api_key.clone().unwrap_or_default(),
    };
    if let Some(input) = non_empty(prompter.prompt(&request).await?) {
        settings.api_key = Some(input);
        store.save(&settings)?;
        tracing::info!("api key updated");
        outcome.api_key_updated = true;
    }

    Ok(outcome)
}

fn non_empty(answer: Option<String>) -> Option<String> {
    answer.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::test_support::{MemoryStore, ScriptedPrompter};

    fn stored() -> Settings {
        Settings {
            api_key: Some("OLD_KEY".into()),
            location: Some(Location::new("Caxias do Sul", "BR")),
        }
    }

    #[tokio::test]
    async fn stores_trimmed_location_and_key() {
        let store = MemoryStore::default();
        let prompter = ScriptedPrompter::new([Some("São Paulo, BR"), Some("NEW_KEY")]);

        let outcome = run_configuration_flow(&store, &prompter).await.unwrap();

        assert_eq!(outcome, FlowOutcome { location_updated: true, api_key_updated: true });
        let settings = store.settings();
        assert_eq!(settings.location, Some(Location::new("São Paulo", "BR")));
        assert_eq!(settings.api_key.as_deref(), Some("NEW_KEY"));
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn prompts_are_prefilled_from_store() {
        let store = MemoryStore::with(stored());
        let prompter = ScriptedPrompter::new([None, None]);

        run_configuration_flow(&store, &prompter).await.unwrap();

        let requests = prompter.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].message, LOCATION_PROMPT);
        assert_eq!(requests[0].initial_value, "Caxias do Sul,BR");
        assert_eq!(requests[1].message, API_KEY_PROMPT);
        assert_eq!(requests[1].initial_value, "OLD_KEY");
    }

    #[tokio::test]
    async fn empty_answers_leave_settings_unchanged() {
        let store = MemoryStore::with(stored());
        let prompter = ScriptedPrompter::new([Some(""), Some("")]);

        let outcome = run_configuration_flow(&store, &prompter).await.unwrap();

        assert_eq!(outcome, FlowOutcome::default());
        assert_eq!(store.settings(), stored());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn cancelled_key_prompt_keeps_new_location() {
        let store = MemoryStore::with(stored());
        let prompter = ScriptedPrompter::new([Some("Lisbon,PT"), None]);

        let outcome = run_configuration_flow(&store, &prompter).await.unwrap();

        assert!(outcome.location_updated);
        assert!(!outcome.api_key_updated);
        let settings = store.settings();
        assert_eq!(settings.location, Some(Location::new("Lisbon", "PT")));
        assert_eq!(settings.api_key.as_deref(), Some("OLD_KEY"));
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn location_without_comma_is_stored_unvalidated() {
        let store = MemoryStore::default();
        let prompter = ScriptedPrompter::new([Some("Lisbon"), None]);

        run_configuration_flow(&store, &prompter).await.unwrap();

        assert_eq!(store.settings().location, Some(Location::new("Lisbon", "")));
        assert!(!store.settings().is_complete());
    }
}
