//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{EvaluationResult, GrammarGuide, SearchHistoryEntry, WordAnalysis};
use crate::session::{Session, ViewKind};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    AnalyzeWord {
        word: String,
    },
    EvaluateSentence {
        bengali: String,
        japanese: String,
    },
    AskGrammar {
        question: String,
    },
    GetState,
    GetHistory,
    ClearHistory,
    SpeechToText {
        lang: String,
        #[serde(rename = "audioBase64")]
        audio_base64: String,
        mime: String,
    },
}

impl ClientWsMessage {
    /// Stable operation name for logging. Message payloads (learner text,
    /// audio) stay out of the logs.
    pub fn op_name(&self) -> &'static str {
        match self {
            ClientWsMessage::Ping => "ping",
            ClientWsMessage::AnalyzeWord { .. } => "analyze_word",
            ClientWsMessage::EvaluateSentence { .. } => "evaluate_sentence",
            ClientWsMessage::AskGrammar { .. } => "ask_grammar",
            ClientWsMessage::GetState => "get_state",
            ClientWsMessage::GetHistory => "get_history",
            ClientWsMessage::ClearHistory => "clear_history",
            ClientWsMessage::SpeechToText { .. } => "speech_to_text",
        }
    }
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Analysis {
        analysis: WordAnalysis,
        history: Vec<SearchHistoryEntry>,
    },
    Evaluation {
        result: EvaluationResult,
    },
    GrammarAnswer {
        answer: GrammarGuide,
    },
    State {
        state: SessionSnapshot,
    },
    History {
        entries: Vec<SearchHistoryEntry>,
    },
    Transcript {
        lang: String,
        text: String,
    },
    /// A view-scoped failure: the client swaps in the localized banner.
    ViewError {
        view: ViewKind,
        message: String,
    },
    /// Protocol-level failure (unparseable message and similar).
    Error {
        message: String,
    },
}

/// Dictionary view as one connected client sees it.
#[derive(Debug, Serialize)]
pub struct DictionaryViewOut {
    pub loading: bool,
    pub result: Option<WordAnalysis>,
    pub error: Option<String>,
    pub query: String,
    #[serde(rename = "historyVisible")]
    pub history_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct PracticeViewOut {
    pub loading: bool,
    pub result: Option<EvaluationResult>,
    pub error: Option<String>,
    pub bengali: String,
    pub japanese: String,
}

#[derive(Debug, Serialize)]
pub struct GrammarViewOut {
    pub loading: bool,
    pub result: Option<GrammarGuide>,
    pub error: Option<String>,
    pub question: String,
}

/// DTO used for session-state delivery over WS.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub dictionary: DictionaryViewOut,
    pub practice: PracticeViewOut,
    pub grammar: GrammarViewOut,
}

/// Convert the internal `Session` to the public snapshot DTO.
pub fn to_snapshot(s: &Session) -> SessionSnapshot {
    SessionSnapshot {
        dictionary: DictionaryViewOut {
            loading: s.dictionary.loading,
            result: s.dictionary.result.clone(),
            error: s.dictionary.error.clone(),
            query: s.query.clone(),
            history_visible: s.history_visible(),
        },
        practice: PracticeViewOut {
            loading: s.practice.loading,
            result: s.practice.result.clone(),
            error: s.practice.error.clone(),
            bengali: s.bengali.clone(),
            japanese: s.japanese.clone(),
        },
        grammar: GrammarViewOut {
            loading: s.grammar.loading,
            result: s.grammar.result.clone(),
            error: s.grammar.error.clone(),
            question: s.question.clone(),
        },
    }
}

//
// HTTP request/response DTOs
//

#[derive(Deserialize)]
pub struct AnalyzeIn {
    pub word: String,
}
#[derive(Serialize)]
pub struct AnalyzeOut {
    pub analysis: WordAnalysis,
    pub history: Vec<SearchHistoryEntry>,
}

#[derive(Deserialize)]
pub struct EvaluateIn {
    pub bengali: String,
    pub japanese: String,
}
#[derive(Serialize)]
pub struct EvaluateOut {
    pub result: EvaluationResult,
}

#[derive(Deserialize)]
pub struct GrammarIn {
    pub question: String,
}
#[derive(Serialize)]
pub struct GrammarAnswerOut {
    pub answer: GrammarGuide,
}

#[derive(Serialize)]
pub struct HistoryOut {
    pub entries: Vec<SearchHistoryEntry>,
}

#[derive(Deserialize)]
pub struct SpeechIn {
    pub lang: String,
    #[serde(rename = "audioBase64")]
    pub audio_base64: String,
    pub mime: String,
}
#[derive(Serialize)]
pub struct TranscriptOut {
    pub text: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

/// Which of the optional backends are usable right now.
#[derive(Serialize)]
pub struct CapabilitiesOut {
    pub generation: bool,
    pub speech: bool,
}

/// Error body for non-2xx API replies.
#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_snake_case_tags() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"analyze_word","word":"猫"}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::AnalyzeWord { word } if word == "猫"));

        let msg: ClientWsMessage = serde_json::from_str(
            r#"{"type":"speech_to_text","lang":"bn-BD","audioBase64":"QUJD","mime":"audio/webm"}"#,
        )
        .unwrap();
        match msg {
            ClientWsMessage::SpeechToText { lang, audio_base64, mime } => {
                assert_eq!(lang, "bn-BD");
                assert_eq!(audio_base64, "QUJD");
                assert_eq!(mime, "audio/webm");
            }
            other => panic!("wrong variant: {:?}", other),
        }

        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"no_such_op"}"#).is_err());
    }

    #[test]
    fn view_error_serializes_view_kind_snake_case() {
        let msg = ServerWsMessage::ViewError {
            view: ViewKind::Dictionary,
            message: "x".into(),
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "view_error");
        assert_eq!(v["view"], "dictionary");
    }

    #[test]
    fn snapshot_reports_history_visibility() {
        let session = Session::new();
        let snap = to_snapshot(&session);
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v.pointer("/dictionary/historyVisible"), Some(&serde_json::json!(true)));
        assert_eq!(v.pointer("/practice/loading"), Some(&serde_json::json!(false)));
    }
}
