use std::future::Future;

use serde_json::Value;

use super::action::{AiAction, AiOutput, Card, Reading};
use super::parse::parse_response;
use super::AiError;

/// Returned for every action when no generator is configured.
pub const UNAVAILABLE_MESSAGE: &str = "AI 功能目前不可用。";

const NO_READING: &str = "AI 暫無回應";
const NO_VERSE: &str = "今日經文暫無";
const NO_MESSAGE: &str = "耶穌對你說暫無內容";
const NO_PRAYER: &str = "回應禱告暫無";

/// Output format requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// Something that turns a prompt into text.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> impl Future<Output = Result<String, AiError>> + Send;
}

/// Runs [`AiAction`]s against an optional generator.
#[derive(Debug, Clone)]
pub struct AiService<G> {
    generator: Option<G>,
}

impl<G: TextGenerator> AiService<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A service that answers every action with [`UNAVAILABLE_MESSAGE`].
    pub fn unavailable() -> Self {
        Self { generator: None }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    /// Performs `action` with the fields of `payload`.
    pub async fn run(&self, action: AiAction, payload: &Value) -> Result<AiOutput, AiError> {
        let Some(generator) = &self.generator else {
            return Ok(AiOutput::Text(UNAVAILABLE_MESSAGE.to_string()));
        };

        tracing::debug!("Running AI action {}", action);
        match action {
            AiAction::SituationalPrayer => {
                let situation = text_field(payload, "situation")
                    .or_else(|| text_field(payload, "highlights"))
                    .ok_or_else(|| AiError::InvalidInput("請輸入您的狀況。".to_string()))?;
                let prompt = format!(
                    "請根據以下的使用者情況，生成一段真誠、有同理心且帶有盼望的禱告詞（使用繁體中文）。情況：「{}」",
                    situation
                );
                generate_text(generator, &prompt).await
            }
            AiAction::ScriptureAnalysis => {
                let passage = passage(payload)?;
                let prompt = format!("請為以下經文生成經文摘要解析（使用繁體中文）：{}", passage);
                generate_text(generator, &prompt).await
            }
            AiAction::ApplicationHelper => {
                let passage = passage(payload)?;
                let prompt = format!("請根據以下經文生成實用的應用建議（使用繁體中文）：{}", passage);
                generate_text(generator, &prompt).await
            }
            AiAction::QuickRead => {
                let input = text_field(payload, "userInput").unwrap_or_default();
                let prompt = format!(
                    "你是一位聖經研究助理。請根據使用者輸入（繁體中文）「{}」生成 JSON：\
                     {{\"analysis\": \"經文摘要與解析\", \"application\": \"實用應用建議\", \"prayer\": \"對應禱告\"}}",
                    input
                );
                let text = generator.generate(&prompt, ResponseFormat::Json).await?;
                let fields = parse_response(&text, Value::Null).into_inner();
                Ok(AiOutput::Reading(Reading {
                    analysis: field_or(&fields, "analysis", NO_READING),
                    application: field_or(&fields, "application", NO_READING),
                    prayer: field_or(&fields, "prayer", NO_READING),
                }))
            }
            AiAction::JesusSaidCard => {
                let prompt = "生成一張福音卡片（繁體中文），JSON 格式：\
                     {\"verse\": \"經文（書卷章節）\", \"message\": \"耶穌今日對你說的話\", \"prayer\": \"對應禱告\"}";
                let text = generator.generate(prompt, ResponseFormat::Json).await?;
                let fields = parse_response(&text, Value::Null).into_inner();
                Ok(AiOutput::Card(Card {
                    verse: field_or(&fields, "verse", NO_VERSE),
                    message: field_or(&fields, "message", NO_MESSAGE),
                    prayer: field_or(&fields, "prayer", NO_PRAYER),
                }))
            }
            AiAction::SmallGroupTopics => {
                let scripture = text_field(payload, "scripture")
                    .ok_or_else(|| AiError::InvalidInput("請輸入經文。".to_string()))?;
                let prompt = format!(
                    "請根據經文「{}」產生三到五個適合小組討論的問題（繁體中文），以 JSON 字串陣列回傳。",
                    scripture
                );
                let text = generator.generate(&prompt, ResponseFormat::Json).await?;
                let topics: Vec<String> = parse_response(&text, Vec::new())
                    .into_inner()
                    .into_iter()
                    .map(|topic: String| topic.trim().to_string())
                    .filter(|topic| !topic.is_empty())
                    .collect();
                Ok(AiOutput::Topics(topics))
            }
        }
    }
}

async fn generate_text<G: TextGenerator>(generator: &G, prompt: &str) -> Result<AiOutput, AiError> {
    let text = generator.generate(prompt, ResponseFormat::Text).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(AiOutput::Text(text.to_string()))
}

/// A non-blank string field of `payload`, trimmed.
fn text_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `"<book> <chapter>"` from a payload with `book` and `chapter`.
fn passage(payload: &Value) -> Result<String, AiError> {
    let book = text_field(payload, "book")
        .ok_or_else(|| AiError::InvalidInput("Missing book".to_string()))?;
    let chapter = match payload.get("chapter") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return Err(AiError::InvalidInput("Missing chapter".to_string())),
    };
    Ok(format!("{} {}", book, chapter))
}

fn field_or(fields: &Value, key: &str, default: &str) -> String {
    text_field(fields, key).unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeGenerator {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<(String, ResponseFormat)>>,
    }

    impl FakeGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, AiError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), format));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(AiError::Api {
                    status: *status,
                    message: "quota exhausted".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_unavailable_service_answers_every_action() {
        let service = AiService::<FakeGenerator>::unavailable();
        for action in AiAction::ALL {
            let output = service.run(action, &json!({})).await.unwrap();
            assert_eq!(output, AiOutput::Text(UNAVAILABLE_MESSAGE.to_string()));
        }
    }

    #[tokio::test]
    async fn test_situational_prayer_uses_situation() {
        let service = AiService::new(FakeGenerator::replying("  主啊，求你賜下平安。\n"));

        let output = service
            .run(AiAction::SituationalPrayer, &json!({"situation": "明天考試"}))
            .await
            .unwrap();

        assert_eq!(output, AiOutput::Text("主啊，求你賜下平安。".to_string()));
        let prompts = service.generator.as_ref().unwrap().prompts.lock().unwrap();
        assert!(prompts[0].0.contains("明天考試"));
        assert_eq!(prompts[0].1, ResponseFormat::Text);
    }

    #[tokio::test]
    async fn test_situational_prayer_falls_back_to_highlights() {
        let service = AiService::new(FakeGenerator::replying("prayer"));
        service
            .run(AiAction::SituationalPrayer, &json!({"highlights": "信心"}))
            .await
            .unwrap();

        let prompts = service.generator.as_ref().unwrap().prompts.lock().unwrap();
        assert!(prompts[0].0.contains("信心"));
    }

    #[tokio::test]
    async fn test_blank_situation_is_rejected_without_calling_model() {
        let service = AiService::new(FakeGenerator::replying("unused"));

        let err = service
            .run(AiAction::SituationalPrayer, &json!({"situation": "   "}))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::InvalidInput(_)));
        assert!(err.is_client_error());
        assert!(service.generator.as_ref().unwrap().prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scripture_analysis_accepts_numeric_chapter() {
        let service = AiService::new(FakeGenerator::replying("analysis"));
        service
            .run(AiAction::ScriptureAnalysis, &json!({"book": "詩篇", "chapter": 23}))
            .await
            .unwrap();

        let prompts = service.generator.as_ref().unwrap().prompts.lock().unwrap();
        assert!(prompts[0].0.contains("詩篇 23"));
    }

    #[tokio::test]
    async fn test_quick_read_parses_wrapped_json() {
        let reply = "```json\n{\"analysis\": \"A\", \"application\": \"B\"}\n```";
        let service = AiService::new(FakeGenerator::replying(reply));

        let output = service
            .run(AiAction::QuickRead, &json!({"userInput": "約翰福音 3:16"}))
            .await
            .unwrap();

        assert_eq!(
            output,
            AiOutput::Reading(Reading {
                analysis: "A".to_string(),
                application: "B".to_string(),
                prayer: NO_READING.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_card_falls_back_to_defaults() {
        let service = AiService::new(FakeGenerator::replying("Sorry, no card today."));

        let output = service.run(AiAction::JesusSaidCard, &json!({})).await.unwrap();

        assert_eq!(
            output,
            AiOutput::Card(Card {
                verse: NO_VERSE.to_string(),
                message: NO_MESSAGE.to_string(),
                prayer: NO_PRAYER.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_small_group_topics() {
        let service = AiService::new(FakeGenerator::replying(
            "[\"神的恩典是什麼？\", \" \", \"這週你在哪裡經歷神？\"]",
        ));

        let output = service
            .run(AiAction::SmallGroupTopics, &json!({"scripture": "雅各書 1"}))
            .await
            .unwrap();

        assert_eq!(
            output,
            AiOutput::Topics(vec![
                "神的恩典是什麼？".to_string(),
                "這週你在哪裡經歷神？".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_generator_failure_surfaces() {
        let service = AiService::new(FakeGenerator::failing(429));

        let err = service
            .run(AiAction::ApplicationHelper, &json!({"book": "路加福音", "chapter": "15"}))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Api { status: 429, .. }));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_empty_text_is_an_error() {
        let service = AiService::new(FakeGenerator::replying("   "));
        let err = service
            .run(AiAction::ScriptureAnalysis, &json!({"book": "詩篇", "chapter": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }
}
