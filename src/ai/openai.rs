//! OpenAI chat-completion backend.

use super::{AiCompletion, AiError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Production API URL
const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// User agent for API requests
const USER_AGENT: &str = concat!("kube-medic/", env!("CARGO_PKG_VERSION"));

/// Prompt template fixed at this layer; `{0}` = target language,
/// `{1}` = the error text being simplified.
fn render_prompt(language: &str, input: &str) -> String {
    format!(
        "Simplify the following Kubernetes error message and provide a solution in {}: {}",
        language, input
    )
}

/// Client for the OpenAI chat-completion API.
///
/// Construction is the configuration step: it takes credentials, the model
/// identifier, and the target explanation language, and fails when the
/// underlying HTTP client cannot be built or no credentials were given.
pub struct OpenAiClient {
    http_client: Client,
    api_url: String,
    api_key: String,
    model: String,
    language: String,
}

impl OpenAiClient {
    /// Create a client against the production OpenAI endpoint.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, AiError> {
        Self::with_url(OPENAI_API_URL, api_key, model, language)
    }

    /// Create a client against a custom base URL (OpenAI-compatible
    /// servers, test doubles).
    pub fn with_url(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, AiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingCredentials);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(AiError::Http)?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
            api_key,
            model: model.into(),
            language: language.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl AiCompletion for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, input: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: render_prompt(&self.language, input),
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_body)
                .map(|e| e.error.message)
                .unwrap_or(error_body);

            return Err(match status_code {
                401 => AiError::Unauthorized,
                429 => AiError::RateLimited,
                500..=599 => AiError::Server {
                    status: status_code,
                    message,
                },
                _ => AiError::Api {
                    status: status_code,
                    message,
                },
            });
        }

        let completion = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        // Only the first candidate is used.
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)
    }
}
