//! Per-connection session: the three view states and the voice capture.
//!
//! A session mirrors what one connected learner sees. Each view (dictionary,
//! practice, grammar) tracks its own loading flag, last result, and error
//! banner; submissions are guarded so a view never has two generation calls
//! in flight, while different views may overlap freely.
//!
//! Locking discipline: the session mutex is held only to flip flags and
//! apply outcomes, never across a service call.

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::domain::{EvaluationResult, GrammarGuide, WordAnalysis};
use crate::logic;
use crate::speech::{self, SpeechCapture};
use crate::state::AppState;

/// Fixed localized banners, one per view. Service failures never leak
/// upstream error text to the learner.
pub const DICTIONARY_FAILURE_BN: &str = "শব্দটি বিশ্লেষণ করতে সমস্যা হয়েছে। আবার চেষ্টা করুন।";
pub const PRACTICE_FAILURE_BN: &str = "মূল্যায়ন করতে সমস্যা হয়েছে। আবার চেষ্টা করুন।";
pub const GRAMMAR_FAILURE_BN: &str =
    "দুঃখিত, উত্তরটি তৈরি করা সম্ভব হয়নি। আপনার ইন্টারনেট কানেকশন বা API Key চেক করুন।";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Dictionary,
    Practice,
    Grammar,
}

pub fn failure_message(view: ViewKind) -> &'static str {
    match view {
        ViewKind::Dictionary => DICTIONARY_FAILURE_BN,
        ViewKind::Practice => PRACTICE_FAILURE_BN,
        ViewKind::Grammar => GRAMMAR_FAILURE_BN,
    }
}

/// Loading/result/error triple for one view.
#[derive(Debug)]
pub struct ViewState<T> {
    pub loading: bool,
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self { loading: false, result: None, error: None }
    }
}

impl<T> ViewState<T> {
    /// Take the loading flag for a new submission. Refuses when one is
    /// already in flight. Clears the banner; the previous result stays
    /// visible underneath the spinner.
    fn begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    fn finish_ok(&mut self, value: T) {
        self.loading = false;
        self.result = Some(value);
        self.error = None;
    }

    /// Failure keeps the previous result; only the banner changes.
    fn finish_err(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(message.to_string());
    }
}

pub struct Session {
    pub id: String,
    pub query: String,
    pub bengali: String,
    pub japanese: String,
    pub question: String,
    pub dictionary: ViewState<WordAnalysis>,
    pub practice: ViewState<EvaluationResult>,
    pub grammar: ViewState<GrammarGuide>,
    pub capture: SpeechCapture,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            query: String::new(),
            bengali: String::new(),
            japanese: String::new(),
            question: String::new(),
            dictionary: ViewState::default(),
            practice: ViewState::default(),
            grammar: ViewState::default(),
            capture: SpeechCapture::new(),
        }
    }

    /// The recent-search list is shown only while the dictionary view has no
    /// result and nothing in flight.
    pub fn history_visible(&self) -> bool {
        self.dictionary.result.is_none() && !self.dictionary.loading
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a submission was dropped without a service call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    Busy,
}

/// What pushing input through a view produced.
#[derive(Debug)]
pub enum Outcome<T> {
    Ignored(IgnoreReason),
    Succeeded(T),
    Failed(&'static str),
}

/// Dictionary lookup for this session. On success the input is cleared and
/// the word lands in the search history (inside `logic::do_analyze`).
pub async fn submit_lookup(
    session: &Mutex<Session>,
    state: &AppState,
    word: &str,
) -> Outcome<WordAnalysis> {
    let word = word.trim().to_string();
    if word.is_empty() {
        return Outcome::Ignored(IgnoreReason::EmptyInput);
    }

    {
        let mut s = session.lock().await;
        if !s.dictionary.begin() {
            debug!(target: "tutor", session = %s.id, "Dictionary lookup already in flight; dropping");
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        s.query = word.clone();
    }

    let result = logic::do_analyze(state, &word).await;

    let mut s = session.lock().await;
    match result {
        Ok(analysis) => {
            s.dictionary.finish_ok(analysis.clone());
            s.query.clear();
            Outcome::Succeeded(analysis)
        }
        Err(e) => {
            error!(target: "tutor", session = %s.id, error = %e, "Word analysis failed");
            s.dictionary.finish_err(DICTIONARY_FAILURE_BN);
            Outcome::Failed(DICTIONARY_FAILURE_BN)
        }
    }
}

/// Practice evaluation. Both the Bengali intent and the Japanese attempt
/// must be non-blank.
pub async fn submit_practice(
    session: &Mutex<Session>,
    state: &AppState,
    bengali: &str,
    japanese: &str,
) -> Outcome<EvaluationResult> {
    let bengali = bengali.trim().to_string();
    let japanese = japanese.trim().to_string();
    if bengali.is_empty() || japanese.is_empty() {
        return Outcome::Ignored(IgnoreReason::EmptyInput);
    }

    {
        let mut s = session.lock().await;
        if !s.practice.begin() {
            debug!(target: "tutor", session = %s.id, "Evaluation already in flight; dropping");
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        s.bengali = bengali.clone();
        s.japanese = japanese.clone();
    }

    let result = logic::do_evaluate(state, &bengali, &japanese).await;

    let mut s = session.lock().await;
    match result {
        Ok(evaluation) => {
            s.practice.finish_ok(evaluation.clone());
            Outcome::Succeeded(evaluation)
        }
        Err(e) => {
            error!(target: "tutor", session = %s.id, error = %e, "Sentence evaluation failed");
            s.practice.finish_err(PRACTICE_FAILURE_BN);
            Outcome::Failed(PRACTICE_FAILURE_BN)
        }
    }
}

/// Grammar question.
pub async fn submit_grammar(
    session: &Mutex<Session>,
    state: &AppState,
    question: &str,
) -> Outcome<GrammarGuide> {
    let question = question.trim().to_string();
    if question.is_empty() {
        return Outcome::Ignored(IgnoreReason::EmptyInput);
    }

    {
        let mut s = session.lock().await;
        if !s.grammar.begin() {
            debug!(target: "tutor", session = %s.id, "Grammar question already in flight; dropping");
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        s.question = question.clone();
    }

    let result = logic::do_grammar(state, &question).await;

    let mut s = session.lock().await;
    match result {
        Ok(guide) => {
            s.grammar.finish_ok(guide.clone());
            Outcome::Succeeded(guide)
        }
        Err(e) => {
            error!(target: "tutor", session = %s.id, error = %e, "Grammar answer failed");
            s.grammar.finish_err(GRAMMAR_FAILURE_BN);
            Outcome::Failed(GRAMMAR_FAILURE_BN)
        }
    }
}

/// One voice capture for this session. Every failure (no transcriber, bad
/// payload, capture already running, service error, silence) ends the
/// capture quietly and yields None; a transcript is returned only when some
/// speech was recognized.
pub async fn submit_speech(
    session: &Mutex<Session>,
    state: &AppState,
    lang: &str,
    mime_type: &str,
    audio_base64: &str,
) -> Option<String> {
    if !state.speech_ready() {
        debug!(target: "tutor", "Voice capture requested but no transcriber is configured; dropping");
        return None;
    }
    let Some(audio_bytes) = speech::validate_audio(audio_base64) else {
        debug!(target: "tutor", "Voice payload empty or undecodable; dropping");
        return None;
    };

    {
        let mut s = session.lock().await;
        if !s.capture.begin() {
            debug!(target: "tutor", session = %s.id, "Capture already listening; dropping");
            return None;
        }
    }
    debug!(target: "tutor", audio_bytes, %lang, "Voice capture started");

    let result = logic::do_transcribe(state, lang, mime_type, audio_base64).await;

    let mut s = session.lock().await;
    s.capture.end();
    match result {
        Ok(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                debug!(target: "tutor", session = %s.id, "No speech recognized; capture ends");
                None
            } else {
                Some(text)
            }
        }
        Err(e) => {
            debug!(target: "tutor", session = %s.id, error = %e, "Transcription failed; capture ends silently");
            None
        }
    }
}
