//! Machine translation provider.
//!
//! [`HttpTranslator`] talks to an OpenAI-compatible chat completions endpoint.
//! Rate limits (429), server errors (5xx) and transport failures are retried;
//! other client errors fail immediately.

use crate::i18n::LanguageRegistry;
use crate::retry::{with_retry_if, RetryConfig};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("Translation API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Failed to reach translation API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Translation API returned an unreadable response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Translation API response contained no choices")]
    EmptyResponse,
}

impl TranslatorError {
    /// Whether another attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslatorError::Status { status, .. } => *status == 429 || *status >= 500,
            TranslatorError::Transport(_) => true,
            TranslatorError::Decode(_) | TranslatorError::EmptyResponse => false,
        }
    }
}

/// Something that can translate text between two language codes.
pub trait MachineTranslator: Send + Sync {
    fn translate_text(
        &self,
        text: &str,
        source_language_code: &str,
        target_language_code: &str,
    ) -> impl Future<Output = Result<String, TranslatorError>> + Send;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Reasoning models reject a `temperature` parameter.
fn is_reasoning_model(model: &str) -> bool {
    ["gpt-5", "o1", "o3", "o4"]
        .iter()
        .any(|prefix| model.starts_with(prefix))
}

fn language_name(code: &str) -> &str {
    LanguageRegistry::get()
        .get_by_code(code)
        .map(|lang| lang.name)
        .unwrap_or(code)
}

fn build_system_prompt(source_language_code: &str, target_language_code: &str) -> String {
    format!(
        r#"You are a professional translator for an educational platform. Translate the text you are given from {} to {}.

Rules:
- Reply with the translation only, no commentary.
- Preserve every HTML tag and attribute exactly as written; translate only the text between tags.
- Keep placeholders such as {{{{name}}}} and numbers unchanged.
- Keep the tone friendly and suitable for learners."#,
        language_name(source_language_code),
        language_name(target_language_code)
    )
}

/// Translator backed by an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    retry: RetryConfig,
}

impl HttpTranslator {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            retry: RetryConfig::translation_api(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn build_request(&self, text: &str, source: &str, target: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: build_system_prompt(source, target),
                },
                Message {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: if is_reasoning_model(&self.model) {
                None
            } else {
                Some(0.3)
            },
        }
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<String, TranslatorError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(TranslatorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let chat: ChatResponse = serde_json::from_slice(&body).map_err(TranslatorError::Decode)?;
        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(TranslatorError::EmptyResponse)
    }
}

impl MachineTranslator for HttpTranslator {
    async fn translate_text(
        &self,
        text: &str,
        source_language_code: &str,
        target_language_code: &str,
    ) -> Result<String, TranslatorError> {
        let request = self.build_request(text, source_language_code, target_language_code);
        with_retry_if(
            &self.retry,
            &format!(
                "Machine translation {} -> {}",
                source_language_code, target_language_code
            ),
            || self.send_once(&request),
            TranslatorError::is_retryable,
        )
        .await
    }
}
