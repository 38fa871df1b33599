use crate::config::Config;
use crate::error::AnalyzerError;
use crate::prompts::Prompt;
use async_trait::async_trait;
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Anything that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, AnalyzerError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_completion_tokens: u32,
    temperature: f32,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(config: &Config, api_key: String) -> Result<Self, AnalyzerError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, AnalyzerError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt.content,
            }],
            max_completion_tokens: prompt.kind.max_completion_tokens(),
            temperature: prompt.kind.temperature(),
        };

        debug!(
            "Sending {:?} prompt ({} chars) to {}",
            prompt.kind,
            prompt.content.len(),
            self.api_url
        );

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AnalyzerError::Service {
                status: status.as_u16(),
                body: text,
            });
        }

        let content = extract_content(&text)?;
        info!("Received {} chars for {:?} prompt", content.len(), prompt.kind);
        Ok(content)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions response.
fn extract_content(body: &str) -> Result<String, AnalyzerError> {
    let value: Value = serde_json::from_str(body)?;
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            AnalyzerError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}
