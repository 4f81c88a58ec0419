// src/services/openai.rs
use crate::services::settings::SettingsService;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl OpenAIError {
    /// Configuration problems will not fix themselves on retry.
    fn is_retryable(&self) -> bool {
        !matches!(
            self,
            OpenAIError::NotConfigured | OpenAIError::SettingsError(_) | OpenAIError::SerializationError(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy)]
pub enum TextGenerationPurpose {
    /// Score a candidate against a posting; the reply must be JSON
    ResumeMatching,
    /// Answer a seeker's free-form career question
    CareerAssistant,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Debug)]
pub struct OpenAIService {
    settings_service: Arc<SettingsService>,
    client: Client,
    max_attempts: u32,
    base_delay: Duration,
}

impl OpenAIService {
    pub fn new(settings_service: Arc<SettingsService>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            settings_service,
            client,
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }

    /// Overrides the retry policy; tests use a single attempt with no delay.
    pub fn with_retry_policy(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_delay = base_delay;
        self
    }

    async fn setting(&self, key: &str) -> Result<Option<String>, OpenAIError> {
        self.settings_service
            .get_setting(key)
            .await
            .map_err(|e| OpenAIError::SettingsError(e.to_string()))
    }

    pub async fn get_config(&self) -> Result<OpenAIConfig, OpenAIError> {
        let api_key = self
            .setting("openai_api_key")
            .await?
            .filter(|k| !k.trim().is_empty())
            .ok_or(OpenAIError::NotConfigured)?;
        let base_url = self
            .setting("openai_base_url")
            .await?
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let model = self
            .setting("openai_model")
            .await?
            .unwrap_or_else(|| "gpt-4o-mini".to_string());

        Ok(OpenAIConfig {
            api_key,
            base_url,
            model,
        })
    }

    pub async fn is_configured(&self) -> bool {
        self.get_config().await.is_ok()
    }

    pub async fn generate_text(
        &self,
        purpose: TextGenerationPurpose,
        prompt: &str,
        context: Option<serde_json::Value>,
    ) -> Result<String, OpenAIError> {
        let config = self.get_config().await?;

        let user_content = match context {
            Some(ctx) => {
                let context_str = serde_json::to_string_pretty(&ctx)
                    .map_err(|e| OpenAIError::SerializationError(e.to_string()))?;
                format!("Context:\n{}\n\nTask:\n{}", context_str, prompt)
            }
            None => prompt.to_string(),
        };

        let request = ChatCompletionRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt(purpose).to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content,
                },
            ],
            temperature: match purpose {
                TextGenerationPurpose::ResumeMatching => 0.0,
                TextGenerationPurpose::CareerAssistant => 0.7,
            },
        };

        debug!(purpose = ?purpose, model = %config.model, "Sending OpenAI chat completion request");

        let response = self.make_request_with_retry(&config, &request).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OpenAIError::InvalidResponse("No choices in response".to_string()))?;

        if let Some(usage) = response.usage {
            info!(
                purpose = ?purpose,
                model = %config.model,
                tokens_used = usage.total_tokens,
                "OpenAI text generation completed"
            );
        }

        Ok(text)
    }

    async fn make_request_with_retry(
        &self,
        config: &OpenAIConfig,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAIError> {
        let mut attempt = 1;
        loop {
            match self.make_request(config, request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_attempts && e.is_retryable() => {
                    warn!(
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "OpenAI API request failed, retrying..."
                    );
                    tokio::time::sleep(self.base_delay * 2_u32.pow(attempt - 1)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn make_request(
        &self,
        config: &OpenAIConfig,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAIError> {
        let url = format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| OpenAIError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenAIError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "OpenAI API request failed");
            return Err(OpenAIError::RequestFailed(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| OpenAIError::InvalidResponse(e.to_string()))
    }
}

fn system_prompt(purpose: TextGenerationPurpose) -> &'static str {
    match purpose {
        TextGenerationPurpose::ResumeMatching => {
            "You are a recruiting assistant that compares a candidate profile with a job posting. \
             Reply with a single JSON object and nothing else: \
             {\"score\": <integer 0-100>, \"summary\": \"<one or two sentences>\"}."
        }
        TextGenerationPurpose::CareerAssistant => {
            "You are a friendly career assistant on a job portal. Answer using only the candidate \
             profile given in the context. Keep answers short and practical."
        }
    }
}
