use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::OpenRouterConfig;
use blogforge_errors::AppError;

/// Chat-completions client. One request per call: no retry, no streaming,
/// transport default timeout.
pub struct OpenRouterClient {
    http_client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: config.api_key,
            api_url: config.api_url,
            model: config.model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` and returns the raw text of the first choice.
    pub async fn complete(&self, prompt: String) -> Result<String, AppError> {
        let request = ChatCompletionRequest::new(&self.model, prompt);

        let response = self
            .http_client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://blogforge.local")
            .header("X-Title", "Blogforge")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::GenerationService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter error: {} - {}", status, body);
            return Err(AppError::GenerationService(format!("API error: {}", status)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::GenerationService(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::InvalidResponse("no content in completion".to_string()))
    }
}
