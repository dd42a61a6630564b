//! HTTP client for the Gemini `generateContent` REST endpoint.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AppConfig;
use crate::content::prompt::{blurb_prompt, card_prompt};
use crate::content::provider::{BLURB_FALLBACK, ContentProvider};
use crate::foundation::error::{CardError, CardResult};
use crate::model::card::{CardData, UserInput};

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ResponseContent,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate; `None` when there is none.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// JSON schema the card call asks the service to follow.
pub fn card_response_schema() -> serde_json::Value {
    let section = json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "traits": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["title", "traits"]
    });
    json!({
        "type": "OBJECT",
        "properties": {
            "zodiac": section,
            "mbti": section,
            "animal": section,
            "bloodType": section,
            "coreTrait": { "type": "STRING" },
            "fortune": { "type": "STRING" }
        },
        "required": ["zodiac", "mbti", "animal", "bloodType", "coreTrait", "fortune"]
    })
}

/// Parse the card call's response text into a validated [`CardData`].
pub fn parse_card_text(text: &str) -> CardResult<CardData> {
    let card: CardData = serde_json::from_str(text.trim())
        .map_err(|e| CardError::content(format!("card response does not match schema: {e}")))?;
    card.validate()?;
    Ok(card)
}

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(cfg: &AppConfig) -> CardResult<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| CardError::validation("no API key configured (set GEMINI_API_KEY)"))?;
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| CardError::content(format!("build http client: {e}")))?;
        Ok(Self {
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    async fn generate(&self, request: &GenerateRequest) -> CardResult<Option<String>> {
        let start = Instant::now();
        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CardError::content(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CardError::content(format!(
                "service returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| CardError::content(format!("malformed response body: {e}")))?;
        tracing::debug!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "content call finished"
        );
        Ok(parsed.text())
    }
}

fn user_turn(prompt: String) -> Vec<Content> {
    vec![Content {
        role: "user",
        parts: vec![Part { text: prompt }],
    }]
}

#[async_trait(?Send)]
impl ContentProvider for GeminiProvider {
    #[tracing::instrument(skip(self), fields(model = %self.model))]
    async fn generate_card(&self, input: &UserInput) -> CardResult<CardData> {
        let request = GenerateRequest {
            contents: user_turn(card_prompt(input)),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: card_response_schema(),
            }),
        };
        let text = self
            .generate(&request)
            .await?
            .ok_or_else(|| CardError::content("empty response from content service"))?;
        parse_card_text(&text)
    }

    #[tracing::instrument(skip(self, card), fields(model = %self.model))]
    async fn generate_blurb(&self, input: &UserInput, card: &CardData) -> CardResult<String> {
        let request = GenerateRequest {
            contents: user_turn(blurb_prompt(input, card)),
            generation_config: None,
        };
        Ok(self
            .generate(&request)
            .await?
            .unwrap_or_else(|| BLURB_FALLBACK.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/gemini.rs"]
mod tests;
