use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AiError;

/// A generation the AI collaborator knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AiAction {
    SituationalPrayer,
    ScriptureAnalysis,
    ApplicationHelper,
    QuickRead,
    JesusSaidCard,
    SmallGroupTopics,
}

impl AiAction {
    pub const ALL: [AiAction; 6] = [
        AiAction::SituationalPrayer,
        AiAction::ScriptureAnalysis,
        AiAction::ApplicationHelper,
        AiAction::QuickRead,
        AiAction::JesusSaidCard,
        AiAction::SmallGroupTopics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::SituationalPrayer => "situationalPrayer",
            AiAction::ScriptureAnalysis => "scriptureAnalysis",
            AiAction::ApplicationHelper => "applicationHelper",
            AiAction::QuickRead => "quickRead",
            AiAction::JesusSaidCard => "jesusSaidCard",
            AiAction::SmallGroupTopics => "smallGroupTopics",
        }
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiAction {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AiError::UnknownAction(s.to_string()))
    }
}

/// Request envelope: `{"action": ..., "payload": {...}}`.
///
/// Both fields are optional on the wire so a missing one can be reported
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl AiRequest {
    pub fn new(action: AiAction, payload: Value) -> Self {
        Self {
            action: Some(action.as_str().to_string()),
            payload: Some(payload),
        }
    }

    /// Checks that both fields are present and the action is known.
    pub fn validate(self) -> Result<(AiAction, Value), AiError> {
        let (Some(action), Some(payload)) = (self.action, self.payload) else {
            return Err(AiError::MissingField);
        };
        if action.is_empty() || payload.is_null() {
            return Err(AiError::MissingField);
        }
        Ok((action.parse()?, payload))
    }
}

/// Response envelope: `{"result": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiResponse {
    Result { result: AiOutput },
    Error { error: String },
}

/// `{analysis, application, prayer}` for a quick reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub analysis: String,
    pub application: String,
    pub prayer: String,
}

/// `{verse, message, prayer}` for a gospel card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub verse: String,
    pub message: String,
    pub prayer: String,
}

/// What an action produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiOutput {
    Text(String),
    Reading(Reading),
    Card(Card),
    Topics(Vec<String>),
}

impl fmt::Display for AiOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiOutput::Text(text) => writeln!(f, "{}", text),
            AiOutput::Reading(reading) => {
                writeln!(f, "Analysis:\n{}\n", reading.analysis)?;
                writeln!(f, "Application:\n{}\n", reading.application)?;
                writeln!(f, "Prayer:\n{}", reading.prayer)
            }
            AiOutput::Card(card) => {
                writeln!(f, "{}\n", card.verse)?;
                writeln!(f, "{}\n", card.message)?;
                writeln!(f, "{}", card.prayer)
            }
            AiOutput::Topics(topics) => {
                for (i, topic) in topics.iter().enumerate() {
                    writeln!(f, "{}. {}", i + 1, topic)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_names() {
        for action in AiAction::ALL {
            assert_eq!(action.as_str().parse::<AiAction>().unwrap(), action);
            assert_eq!(serde_json::to_value(action).unwrap(), action.as_str());
        }
        assert!(matches!(
            "sermonWriter".parse::<AiAction>(),
            Err(AiError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_validate_request() {
        let request: AiRequest =
            serde_json::from_value(json!({"action": "quickRead", "payload": {"userInput": "詩篇 23"}}))
                .unwrap();
        let (action, payload) = request.validate().unwrap();
        assert_eq!(action, AiAction::QuickRead);
        assert_eq!(payload["userInput"], "詩篇 23");

        let missing: AiRequest = serde_json::from_value(json!({"action": "quickRead"})).unwrap();
        assert!(matches!(missing.validate(), Err(AiError::MissingField)));

        let unknown: AiRequest =
            serde_json::from_value(json!({"action": "nope", "payload": {}})).unwrap();
        assert!(matches!(unknown.validate(), Err(AiError::UnknownAction(_))));
    }

    #[test]
    fn test_response_envelope_shapes() {
        let text = AiResponse::Result {
            result: AiOutput::Text("阿們".to_string()),
        };
        assert_eq!(serde_json::to_value(&text).unwrap(), json!({"result": "阿們"}));

        let topics = AiResponse::Result {
            result: AiOutput::Topics(vec!["a".to_string(), "b".to_string()]),
        };
        assert_eq!(
            serde_json::to_value(&topics).unwrap(),
            json!({"result": ["a", "b"]})
        );

        let error = AiResponse::Error {
            error: "Unknown action".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"error": "Unknown action"})
        );
    }

    #[test]
    fn test_output_deserializes_by_shape() {
        let card: AiOutput =
            serde_json::from_value(json!({"verse": "v", "message": "m", "prayer": "p"})).unwrap();
        assert!(matches!(card, AiOutput::Card(_)));

        let reading: AiOutput = serde_json::from_value(
            json!({"analysis": "a", "application": "b", "prayer": "c"}),
        )
        .unwrap();
        assert!(matches!(reading, AiOutput::Reading(_)));
    }
}
