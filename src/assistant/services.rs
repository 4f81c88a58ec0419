// src/assistant/services.rs

use std::sync::Arc;
use tracing::{debug, warn};

use super::rules::{answer_as, classify, AssistantProfile, ChatReply, QuestionKind};
use crate::services::openai::TextGenerationPurpose;
use crate::services::{OpenAIService, SettingsService};

/// Setting that lets open-ended questions go to the language model
pub const AI_ENABLED_SETTING: &str = "assistant_ai_enabled";

const AI_CONFIDENCE: f64 = 0.8;

pub struct CareerAssistantService {
    settings: Arc<SettingsService>,
    openai: Arc<OpenAIService>,
}

impl CareerAssistantService {
    pub fn new(settings: Arc<SettingsService>, openai: Arc<OpenAIService>) -> Self {
        Self { settings, openai }
    }

    pub async fn ai_enabled(&self) -> bool {
        self.settings.get_bool(AI_ENABLED_SETTING, false).await && self.openai.is_configured().await
    }

    /// Profile questions are answered by rules. General ones try the model
    /// first when it is enabled and fall back to the rules on any failure.
    pub async fn reply(&self, question: &str, profile: &AssistantProfile) -> ChatReply {
        let kind = classify(question);

        if kind == QuestionKind::General && self.ai_enabled().await {
            match self
                .openai
                .generate_text(
                    TextGenerationPurpose::CareerAssistant,
                    question,
                    Some(profile.context()),
                )
                .await
            {
                Ok(text) if !text.trim().is_empty() => {
                    return ChatReply {
                        response: text.trim().to_string(),
                        confidence: AI_CONFIDENCE,
                        kind: kind.as_str(),
                        mentioned_skills: None,
                        source: "ai",
                    };
                }
                Ok(_) => warn!("Assistant model returned an empty answer; using rules"),
                Err(e) => warn!(error = %e, "Assistant model unavailable; using rules"),
            }
        }

        debug!(kind = kind.as_str(), "Answering from rules");
        answer_as(kind, question, profile)
    }
}
