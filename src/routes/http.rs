//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! They are the one-shot equivalents of the WS operations: no session state
//! is involved, so failures map to status codes instead of view banners.

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::{debug, error, info, instrument};

use crate::error::TutorError;
use crate::logic::*;
use crate::protocol::*;
use crate::session::{failure_message, ViewKind};
use crate::speech;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_capabilities(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(CapabilitiesOut {
    generation: state.generation_ready(),
    speech: state.speech_ready(),
  })
}

/// 503 when no client is configured, 502 when the upstream call failed.
/// The body carries the same localized banner the views show.
fn failure_response(view: ViewKind, err: TutorError) -> Response {
  let status = if err.is_unavailable() {
    StatusCode::SERVICE_UNAVAILABLE
  } else {
    StatusCode::BAD_GATEWAY
  };
  error!(target: "tutor", error = %err, ?view, status = status.as_u16(), "HTTP tutor call failed");
  (status, Json(ErrorOut { error: failure_message(view).to_string() })).into_response()
}

fn empty_input_response() -> Response {
  (
    StatusCode::UNPROCESSABLE_ENTITY,
    Json(ErrorOut { error: "input must not be empty".into() }),
  )
    .into_response()
}

#[instrument(level = "info", skip(state, body), fields(word_len = body.word.chars().count()))]
pub async fn http_post_analyze(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnalyzeIn>,
) -> Response {
  let word = body.word.trim();
  if word.is_empty() {
    return empty_input_response();
  }
  match do_analyze(&state, word).await {
    Ok(analysis) => {
      let history = state.history.load().await;
      info!(target: "tutor", "HTTP analyze served");
      Json(AnalyzeOut { analysis, history }).into_response()
    }
    Err(e) => failure_response(ViewKind::Dictionary, e),
  }
}

#[instrument(
  level = "info",
  skip(state, body),
  fields(bengali_len = body.bengali.chars().count(), japanese_len = body.japanese.chars().count())
)]
pub async fn http_post_evaluate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EvaluateIn>,
) -> Response {
  let bengali = body.bengali.trim();
  let japanese = body.japanese.trim();
  if bengali.is_empty() || japanese.is_empty() {
    return empty_input_response();
  }
  match do_evaluate(&state, bengali, japanese).await {
    Ok(result) => {
      info!(target: "tutor", is_correct = result.is_correct, "HTTP evaluate served");
      Json(EvaluateOut { result }).into_response()
    }
    Err(e) => failure_response(ViewKind::Practice, e),
  }
}

#[instrument(level = "info", skip(state, body), fields(question_len = body.question.chars().count()))]
pub async fn http_post_grammar(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GrammarIn>,
) -> Response {
  let question = body.question.trim();
  if question.is_empty() {
    return empty_input_response();
  }
  match do_grammar(&state, question).await {
    Ok(answer) => {
      info!(target: "tutor", "HTTP grammar answer served");
      Json(GrammarAnswerOut { answer }).into_response()
    }
    Err(e) => failure_response(ViewKind::Grammar, e),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HistoryOut { entries: state.history.load().await })
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_history_clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "nihongo_backend", "Search history cleared");
  Json(HistoryOut { entries: state.history.clear().await })
}

#[instrument(level = "info", skip(state, body), fields(lang = %body.lang, audio_b64_len = body.audio_base64.len()))]
pub async fn http_post_speech(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SpeechIn>,
) -> impl IntoResponse {
  // Voice input recovers silently: every failure comes back as an empty
  // transcript, never as an error.
  if speech::validate_audio(&body.audio_base64).is_none() {
    debug!(target: "tutor", "HTTP speech payload empty or undecodable");
    return Json(TranscriptOut { text: String::new() });
  }
  let text = match do_transcribe(&state, &body.lang, &body.mime, &body.audio_base64).await {
    Ok(t) => t.trim().to_string(),
    Err(e) => {
      debug!(target: "tutor", error = %e, "HTTP transcription failed; returning empty transcript");
      String::new()
    }
  };
  Json(TranscriptOut { text })
}
