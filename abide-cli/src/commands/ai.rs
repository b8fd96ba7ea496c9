use abide_core::ai::{AiAction, AiOutput, AiService, GeminiClient, UNAVAILABLE_MESSAGE};
use abide_core::models::today;
use abide_core::{
    Collection, FileStore, IdGenerator, JesusSaidCard, QuickReadEntry, SituationalPrayer, UuidIds,
};
use clap::Args;
use serde_json::Value;

use super::{runtime, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct AiCommand {
    /// Action to run (situationalPrayer, scriptureAnalysis, applicationHelper,
    /// quickRead, jesusSaidCard, smallGroupTopics)
    pub action: String,

    /// Action payload as a JSON object
    #[arg(long, short, default_value = "{}")]
    pub payload: String,

    /// Keep the result in the matching history list
    #[arg(long)]
    pub save: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Builds the AI service from config; without an API key it is unavailable.
pub fn ai_service(config: &Config) -> AiService<GeminiClient> {
    match &config.ai.api_key.value {
        Some(key) => AiService::new(GeminiClient::new(key.clone(), config.ai.model.value.clone())),
        None => AiService::unavailable(),
    }
}

impl AiCommand {
    pub fn run(&self, store: &mut FileStore, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let action: AiAction = self.action.parse()?;
        let payload: Value = serde_json::from_str(&self.payload)
            .map_err(|e| format!("Invalid --payload JSON: {}", e))?;
        if !payload.is_object() {
            return Err("--payload must be a JSON object".into());
        }

        let service = ai_service(config);
        if !service.is_available() {
            println!("{}", UNAVAILABLE_MESSAGE);
            return Ok(());
        }

        let output = runtime()?.block_on(service.run(action, &payload))?;

        if self.save {
            match save_output(store, action, &payload, &output)? {
                Some(id) => tracing::info!("Saved {} result as {}", action, id),
                None => println!("Nothing to save for {}", action),
            }
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
            OutputFormat::Text => print!("{}", output),
        }
        Ok(())
    }
}

fn payload_text<'a>(payload: &'a Value, field: &str) -> &'a str {
    payload.get(field).and_then(Value::as_str).unwrap_or_default()
}

/// Stores a generated result in the history list for its action.
///
/// Returns the new record's id, or `None` for actions without a history list.
fn save_output(
    store: &mut FileStore,
    action: AiAction,
    payload: &Value,
    output: &AiOutput,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let id = UuidIds.next_id();
    let date = today();

    match (action, output) {
        (AiAction::SituationalPrayer, AiOutput::Text(prayer)) => {
            let mut situation = payload_text(payload, "situation");
            if situation.trim().is_empty() {
                situation = payload_text(payload, "highlights");
            }
            let record = SituationalPrayer::new(id.as_str(), date, situation, prayer.as_str());
            Collection::<_, SituationalPrayer>::new(store).upsert(&record)?;
        }
        (AiAction::QuickRead, AiOutput::Reading(reading)) => {
            let mut record = QuickReadEntry::new(id.as_str(), date, payload_text(payload, "userInput"));
            record.analysis = reading.analysis.clone();
            record.application = reading.application.clone();
            record.prayer = reading.prayer.clone();
            Collection::<_, QuickReadEntry>::new(store).upsert(&record)?;
        }
        (AiAction::JesusSaidCard, AiOutput::Card(card)) => {
            let record = JesusSaidCard::new(
                id.as_str(),
                date,
                card.verse.as_str(),
                card.message.as_str(),
                card.prayer.as_str(),
            );
            Collection::<_, JesusSaidCard>::new(store).upsert(&record)?;
        }
        _ => return Ok(None),
    }
    Ok(Some(id))
}
