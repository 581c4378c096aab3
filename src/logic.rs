//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each helper resolves the optional client behind its trait seam, performs
//! the call, and applies the operation's side effect (history recording for
//! dictionary lookups). Mapping failures to localized banners or HTTP status
//! codes is the caller's job.

use tracing::instrument;

use crate::domain::{EvaluationResult, GrammarGuide, WordAnalysis};
use crate::error::TutorError;
use crate::state::AppState;

/// Dictionary lookup. Records the word in the search history after a
/// successful analysis, never on failure.
#[instrument(level = "info", skip(state, word), fields(word_len = word.chars().count()))]
pub async fn do_analyze(state: &AppState, word: &str) -> Result<WordAnalysis, TutorError> {
  let tutor = state.tutor.as_ref().ok_or(TutorError::Unavailable)?;
  let analysis = tutor.analyze_word(&state.prompts, word).await?;
  state.history.record(word).await;
  Ok(analysis)
}

/// Practice evaluation of a Japanese attempt against its Bengali intent.
#[instrument(
  level = "info",
  skip(state, bengali, japanese),
  fields(bengali_len = bengali.chars().count(), japanese_len = japanese.chars().count())
)]
pub async fn do_evaluate(
  state: &AppState,
  bengali: &str,
  japanese: &str,
) -> Result<EvaluationResult, TutorError> {
  let tutor = state.tutor.as_ref().ok_or(TutorError::Unavailable)?;
  tutor.evaluate_sentence(&state.prompts, bengali, japanese).await
}

/// Free-form grammar question answered as a structured guide.
#[instrument(level = "info", skip(state, question), fields(question_len = question.chars().count()))]
pub async fn do_grammar(state: &AppState, question: &str) -> Result<GrammarGuide, TutorError> {
  let tutor = state.tutor.as_ref().ok_or(TutorError::Unavailable)?;
  tutor.answer_grammar(&state.prompts, question).await
}

/// One-shot transcription of a recorded voice note.
#[instrument(
  level = "info",
  skip(state, lang, mime_type, audio_base64),
  fields(lang = %lang, mime = %mime_type, audio_b64_len = audio_base64.len())
)]
pub async fn do_transcribe(
  state: &AppState,
  lang: &str,
  mime_type: &str,
  audio_base64: &str,
) -> Result<String, TutorError> {
  let transcriber = state.transcriber.as_ref().ok_or(TutorError::Unavailable)?;
  transcriber.transcribe(&state.prompts, lang, mime_type, audio_base64).await
}
