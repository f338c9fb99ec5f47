use anyhow::{Context, Result};
use async_trait::async_trait;
use inquire::{InquireError, Text};
use simple_weather_core::{PromptRequest, Prompter};
use std::io::IsTerminal;

const HELP: &str = "Enter to save, Esc to keep the current value";

/// Terminal prompts. The prompt stays open until Enter or Esc.
#[derive(Debug, Default)]
pub struct InquirePrompter;

#[async_trait]
impl Prompter for InquirePrompter {
    async fn prompt(&self, request: &PromptRequest) -> Result<Option<String>> {
        if !std::io::stdin().is_terminal() {
            tracing::warn!(prompt = request.message, "no terminal attached; prompt skipped");
            return Ok(None);
        }

        let request = request.clone();
        tokio::task::spawn_blocking(move || ask(&request))
            .await
            .context("Prompt task failed")?
    }
}

fn ask(request: &PromptRequest) -> Result<Option<String>> {
    let answer = Text::new(request.message)
        .with_initial_value(&request.initial_value)
        .with_help_message(HELP)
        .prompt_skippable();

    match answer {
        Ok(answer) => Ok(answer),
        Err(InquireError::OperationInterrupted | InquireError::NotTTY) => Ok(None),
        Err(err) => Err(err).context("Failed to read answer from terminal"),
    }
}
