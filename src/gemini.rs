//! Minimal Gemini client for our use-cases.
//!
//! We only call models/{model}:generateContent, either for a strict JSON
//! object (with a declared responseSchema) or for plain text (transcription).
//! Calls are instrumented and log model names, latencies, and response sizes
//! (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short to
//! avoid leaking learner text into logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::{EvaluationResult, GrammarGuide, WordAnalysis};
use crate::error::TutorError;
use crate::schema;
use crate::util::{fill_template, trunc_for_log};

/// Linguistic operations the backend delegates to a generation service.
/// Implemented by [`Gemini`]; test code substitutes its own stand-ins.
#[async_trait]
pub trait Tutor: Send + Sync {
  async fn analyze_word(&self, prompts: &Prompts, word: &str) -> Result<WordAnalysis, TutorError>;

  async fn evaluate_sentence(
    &self,
    prompts: &Prompts,
    bengali: &str,
    japanese: &str,
  ) -> Result<EvaluationResult, TutorError>;

  async fn answer_grammar(&self, prompts: &Prompts, question: &str)
    -> Result<GrammarGuide, TutorError>;
}

/// One-shot speech-to-text over the same generation endpoint.
#[async_trait]
pub trait Transcriber: Send + Sync {
  async fn transcribe(
    &self,
    prompts: &Prompts,
    lang: &str,
    mime_type: &str,
    audio_base64: &str,
  ) -> Result<String, TutorError>;
}

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl Gemini {
  /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("GEMINI_API_KEY").ok()?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
    let model =
      std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".into());
    let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
      .ok()
      .and_then(|v| v.parse::<u64>().ok())
      .unwrap_or(20);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// Single generateContent call. Returns the first candidate's text, which
  /// is empty when the service replies with no candidates or no text part.
  #[instrument(level = "info", skip(self, parts, config), fields(model = %self.model, part_count = parts.len()))]
  async fn generate(&self, parts: Vec<Part>, config: GenerationConfig) -> Result<String, TutorError> {
    let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
    let req = GenerateContentRequest {
      contents: vec![Content { parts }],
      generation_config: config,
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "nihongo-bangla-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-goog-api-key", &self.api_key)
      .json(&req).send().await?;
    let elapsed = start.elapsed();

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or(body);
      error!(?elapsed, status = status.as_u16(), message = %trunc_for_log(&message, 200), "Generation call failed");
      return Err(TutorError::Api { status: status.as_u16(), message });
    }

    let body = res.text().await?;
    let envelope: GenerateContentResponse = serde_json::from_str(&body)?;
    if let Some(usage) = &envelope.usage_metadata {
      info!(
        prompt_tokens = ?usage.prompt_token_count,
        candidate_tokens = ?usage.candidates_token_count,
        total_tokens = ?usage.total_token_count,
        "Generation usage"
      );
    }

    let text = first_text(&envelope);
    info!(?elapsed, reply_bytes = text.len(), "Generation response received");
    Ok(text)
  }

  /// JSON-object generation against a declared schema. Generic over the
  /// target type T. An empty reply is treated as `{}` so it fails the strict
  /// parse instead of producing a half-empty value.
  async fn generate_json<T: for<'a> Deserialize<'a>>(
    &self,
    prompt: &str,
    schema: Value,
  ) -> Result<T, TutorError> {
    let config = GenerationConfig {
      response_mime_type: Some("application/json".into()),
      response_schema: Some(schema),
      thinking_config: ThinkingConfig { thinking_budget: 0 },
    };
    let mut text = self.generate(vec![Part::text(prompt)], config).await?;
    if text.trim().is_empty() {
      text = "{}".into();
    }
    Ok(serde_json::from_str::<T>(&text)?)
  }
}

#[async_trait]
impl Tutor for Gemini {
  #[instrument(level = "info", skip(self, prompts, word), fields(word_len = word.chars().count()))]
  async fn analyze_word(&self, prompts: &Prompts, word: &str) -> Result<WordAnalysis, TutorError> {
    let prompt = fill_template(&prompts.word_analysis_template, &[("word", word)]);
    let analysis: WordAnalysis = self.generate_json(&prompt, schema::word_analysis()).await?;
    info!(
      word = %trunc_for_log(word, 24),
      reading = %trunc_for_log(&analysis.reading, 24),
      example_count = analysis.examples.len(),
      "Word analysis received"
    );
    Ok(analysis)
  }

  #[instrument(
    level = "info",
    skip(self, prompts, bengali, japanese),
    fields(bengali_len = bengali.chars().count(), japanese_len = japanese.chars().count())
  )]
  async fn evaluate_sentence(
    &self,
    prompts: &Prompts,
    bengali: &str,
    japanese: &str,
  ) -> Result<EvaluationResult, TutorError> {
    let prompt = fill_template(
      &prompts.sentence_evaluation_template,
      &[("bengali", bengali), ("japanese", japanese)],
    );
    let result: EvaluationResult =
      self.generate_json(&prompt, schema::sentence_evaluation()).await?;
    info!(is_correct = result.is_correct, "Sentence evaluation received");
    Ok(result)
  }

  #[instrument(level = "info", skip(self, prompts, question), fields(question_len = question.chars().count()))]
  async fn answer_grammar(
    &self,
    prompts: &Prompts,
    question: &str,
  ) -> Result<GrammarGuide, TutorError> {
    let prompt = fill_template(&prompts.grammar_question_template, &[("question", question)]);
    let guide: GrammarGuide = self.generate_json(&prompt, schema::grammar_guide()).await?;
    info!(
      topic = %trunc_for_log(&guide.topic, 40),
      rule_count = guide.rules.len(),
      example_count = guide.examples.len(),
      "Grammar guide received"
    );
    Ok(guide)
  }
}

#[async_trait]
impl Transcriber for Gemini {
  #[instrument(
    level = "info",
    skip(self, prompts, lang, mime_type, audio_base64),
    fields(lang = %lang, mime = %mime_type, audio_b64_len = audio_base64.len())
  )]
  async fn transcribe(
    &self,
    prompts: &Prompts,
    lang: &str,
    mime_type: &str,
    audio_base64: &str,
  ) -> Result<String, TutorError> {
    let instruction = fill_template(&prompts.transcription_template, &[("lang", lang)]);
    let parts = vec![Part::text(&instruction), Part::inline(mime_type, audio_base64)];
    let config = GenerationConfig {
      response_mime_type: None,
      response_schema: None,
      thinking_config: ThinkingConfig { thinking_budget: 0 },
    };
    let text = self.generate(parts, config).await?;
    Ok(text.trim().to_string())
  }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
  #[serde(rename = "generationConfig")]
  generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
  parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
  #[serde(skip_serializing_if = "Option::is_none")]
  text: Option<String>,
  #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
  inline_data: Option<InlineData>,
}

impl Part {
  fn text(s: &str) -> Self {
    Self { text: Some(s.to_string()), inline_data: None }
  }

  fn inline(mime_type: &str, data_base64: &str) -> Self {
    Self {
      text: None,
      inline_data: Some(InlineData {
        mime_type: mime_type.to_string(),
        data: data_base64.to_string(),
      }),
    }
  }
}

#[derive(Serialize)]
struct InlineData {
  #[serde(rename = "mimeType")]
  mime_type: String,
  data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
  #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
  response_mime_type: Option<String>,
  #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
  response_schema: Option<Value>,
  #[serde(rename = "thinkingConfig")]
  thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
struct ThinkingConfig {
  #[serde(rename = "thinkingBudget")]
  thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default, rename = "usageMetadata")]
  usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
  #[serde(default)]
  text: Option<String>,
}

#[derive(Deserialize)]
struct UsageMetadata {
  #[serde(default, rename = "promptTokenCount")]
  prompt_token_count: Option<u32>,
  #[serde(default, rename = "candidatesTokenCount")]
  candidates_token_count: Option<u32>,
  #[serde(default, rename = "totalTokenCount")]
  total_token_count: Option<u32>,
}

fn first_text(envelope: &GenerateContentResponse) -> String {
  envelope
    .candidates
    .first()
    .and_then(|c| c.content.as_ref())
    .and_then(|c| c.parts.first())
    .and_then(|p| p.text.clone())
    .unwrap_or_default()
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
