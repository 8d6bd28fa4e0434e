//! Minimal Gemini client for batch content generation.
//!
//! We only call generateContent and request plain text, which call sites then
//! parse as JSON. Calls are instrumented and log latencies and response sizes
//! (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::{GeminiConfig, GenerationParams};
use crate::errors::{GenError, GenResult};

#[derive(Clone)]
pub struct Gemini {
  client: reqwest::Client,
  api_key: String,
  pub endpoint: String,
  params: GenerationParams,
}

impl Gemini {
  /// Construct the client if the config carries an API key; otherwise return
  /// None and the pipeline runs on fallback content alone.
  pub fn new(cfg: &GeminiConfig) -> Option<Self> {
    let api_key = cfg.api_key.clone()?;

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()
      .ok()?;

    Some(Self { client, api_key, endpoint: cfg.endpoint.clone(), params: cfg.params.clone() })
  }

  /// Single-attempt plain-text generation with a bounded timeout. Retries,
  /// if any, belong to the caller; a repeat call with the same prompt is safe.
  #[instrument(level = "info", skip(self, prompt), fields(prompt_len = prompt.len()))]
  pub async fn generate(&self, prompt: &str) -> GenResult<String> {
    let req = GenerateContentRequest {
      contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
      generation_config: GenerationConfig::from(&self.params),
    };

    let start = std::time::Instant::now();
    let res = self
      .client
      .post(&self.endpoint)
      .query(&[("key", self.api_key.as_str())])
      .header(USER_AGENT, "courseforge/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&req)
      .send()
      .await
      .map_err(|e| GenError::Backend(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_api_error(&body).unwrap_or(body);
      error!(target: "generate", %status, elapsed = ?start.elapsed(), "Gemini HTTP error");
      return Err(GenError::Backend(format!("Gemini HTTP {}: {}", status, msg)));
    }

    let body: GenerateContentResponse =
      res.json().await.map_err(|e| GenError::Backend(e.to_string()))?;

    let text = first_candidate_text(body)
      .ok_or_else(|| GenError::Backend("response envelope carried no candidate text".into()))?;

    info!(
      target: "generate",
      elapsed = ?start.elapsed(),
      response_bytes = text.len(),
      "Gemini response received"
    );
    Ok(text)
  }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
  #[serde(rename = "generationConfig")]
  generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
  text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  temperature: f32,
  top_k: u32,
  top_p: f32,
  max_output_tokens: u32,
}

impl From<&GenerationParams> for GenerationConfig {
  fn from(p: &GenerationParams) -> Self {
    Self {
      temperature: p.temperature,
      top_k: p.top_k,
      top_p: p.top_p,
      max_output_tokens: p.max_output_tokens,
    }
  }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Content,
}

/// Navigate `candidates[0].content.parts[0].text`; None when the envelope is
/// present but empty (safety block, truncated stream).
fn first_candidate_text(body: GenerateContentResponse) -> Option<String> {
  body
    .candidates
    .into_iter()
    .next()
    .and_then(|c| c.content.parts.into_iter().next())
    .map(|p| p.text)
    .filter(|t| !t.is_empty())
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
