// src/oracle.rs
//! LLM oracle client. The pipeline only ever sees the `Oracle` trait, so
//! tests can substitute a deterministic stub for the live endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info};

/// Sampling temperature for both oracle calls. Kept low so replies stay
/// as stable as the model allows.
const SAMPLING_TEMPERATURE: f32 = 0.3;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// The external model service, reduced to the one operation the pipeline
/// needs: a system instruction plus a user message in, free text out.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for any OpenAI-compatible chat-completions endpoint.
pub struct OpenAiOracle {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiOracle {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model,
        })
    }

    /// Build the client from the environment. A missing credential is a
    /// startup failure: no document can be processed without it.
    pub fn from_env(base_url: String, model: String) -> Result<Self> {
        let api_key =
            env::var("OPENAI_API_KEY").context("OPENAI_API_KEY environment variable not set")?;
        Self::new(api_key, base_url, model)
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: SAMPLING_TEMPERATURE,
        };

        info!("Sending completion request to oracle model {}", self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send request to oracle endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Oracle endpoint error {}: {}", status, error_text);
            anyhow::bail!("Oracle returned error {}: {}", status, error_text);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse oracle response")?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Oracle reply carried no content")?;

        Ok(content.trim().to_string())
    }
}
