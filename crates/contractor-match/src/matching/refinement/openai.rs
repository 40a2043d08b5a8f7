//! Hosted language model refiner speaking the OpenAI Responses API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::RefinerConfig;
use crate::matching::domain::BaseScoreRecord;

use super::prompt::{system_prompt, user_prompt};
use super::refiner::{RefinementContext, Refiner, RefinerError};

pub struct OpenAiRefiner {
    http: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiRefiner {
    pub fn new(config: &RefinerConfig) -> Self {
        // The refinement gate owns the request deadline; this one only keeps
        // abandoned connections from lingering.
        let http = HttpClient::builder()
            .timeout(config.timeout + Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| HttpClient::new());

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Refiner for OpenAiRefiner {
    async fn refine(
        &self,
        shortlist: &[BaseScoreRecord],
        context: &RefinementContext,
    ) -> Result<Value, RefinerError> {
        let api_key = self.api_key.as_deref().ok_or(RefinerError::NotConfigured)?;

        let body = json!({
            "model": self.model,
            "instructions": system_prompt(context),
            "input": user_prompt(shortlist, context),
        });

        debug!(model = %self.model, candidates = shortlist.len(), "requesting refinement");
        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefinerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        let text = output_text(&payload).ok_or(RefinerError::EmptyOutput)?;
        info!(model = %self.model, "received refinement response");

        parse_structured(&text)
    }
}

/// Concatenated `output_text` parts of a Responses API payload.
pub(crate) fn output_text(payload: &Value) -> Option<String> {
    if let Some(text) = payload.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let text: String = payload
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parses model output as JSON, tolerating a surrounding markdown fence.
pub(crate) fn parse_structured(text: &str) -> Result<Value, RefinerError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
        .map(|body| match body.split_once('\n') {
            // First line is the fence's info string, e.g. `json` or `JSON\r`.
            Some((info, rest)) if !info.trim_start().starts_with(['{', '[']) => rest,
            _ => body,
        })
        .unwrap_or(trimmed);

    Ok(serde_json::from_str(unfenced.trim())?)
}
