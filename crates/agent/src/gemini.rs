use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use dokkan_core::config::LlmConfig;
use dokkan_core::domain::chat::ChatRole;

use crate::extraction::ExtractedOrder;
use crate::llm::{CompletionClient, ReplyRequest};
use crate::prompt;

/// Client for the Gemini `generateContent` endpoint. Replies stream the full
/// transcript with a system instruction; extractions are single-shot calls
/// pinned to a JSON response schema.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("llm.api_key is not configured; set DOKKAN_LLM_API_KEY"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building http client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    async fn generate_content(&self, body: Value) -> Result<Value> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("sending completion request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("completion request failed with status {status}: {detail}"));
        }

        response.json().await.context("decoding completion response")
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate_reply(&self, request: ReplyRequest<'_>) -> Result<String> {
        let contents: Vec<Content> = request
            .transcript
            .iter()
            .map(|message| Content {
                role: match message.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "model",
                },
                parts: vec![Part { text: message.text.clone() }],
            })
            .collect();

        let body = json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "generationConfig": {
                "temperature": request.temperature,
            },
        });

        let response = self.generate_content(body).await?;
        Ok(first_candidate_text(&response).unwrap_or_default())
    }

    async fn extract_order(&self, transcript_text: &str) -> Result<Option<ExtractedOrder>> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt::extraction_prompt(transcript_text) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": extraction_schema(),
            },
        });

        let response = self.generate_content(body).await?;
        let Some(text) = first_candidate_text(&response) else {
            return Ok(None);
        };

        match serde_json::from_str::<ExtractedOrder>(&text) {
            Ok(extracted) => Ok(Some(extracted)),
            Err(error) => {
                warn!(%error, "extraction returned undecodable JSON; treating as no intent");
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

fn first_candidate_text(response: &Value) -> Option<String> {
    let text = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()?;

    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn extraction_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "customerName": { "type": "STRING" },
            "customerPhone": { "type": "STRING" },
            "address": { "type": "STRING" },
            "governorate": { "type": "STRING" },
            "productCode": { "type": "STRING" },
            "size": { "type": "STRING" },
            "color": { "type": "STRING" },
        },
        "required": ["customerPhone", "address", "productCode"]
    })
}
