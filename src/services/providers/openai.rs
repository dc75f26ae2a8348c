/// OpenAI Chat Completions provider
///
/// Sends one system message and one user message per call; no history is kept.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
    services::providers::TextGenerator,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct OpenAiGenerator {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_api_url.clone(),
            config.openai_model.clone(),
        )
    }

    fn build_request(&self, system: &str, user: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        }
    }
}

/// Pull the reply text out of the first choice
fn extract_reply(response: ChatCompletionResponse) -> AppResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::Generation("OpenAI returned no text".to_string()))
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, system: &str, user: &str) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let request = self.build_request(system, user);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!(
                "OpenAI API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw OpenAI response");

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                AppError::Generation(format!("Failed to parse OpenAI response: {}", e))
            })?;

        let reply = extract_reply(parsed)?;

        tracing::info!(
            model = %self.model,
            reply_len = reply.len(),
            provider = "openai",
            "Recommendation text generated"
        );

        Ok(reply)
    }
}
