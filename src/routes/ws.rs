//! WebSocket upgrade + message loop. Each text frame is parsed as JSON and
//! dispatched on its own task, so a slow generation call on one view never
//! blocks pings, history requests, or the other views. Replies funnel back
//! through a per-connection outbox channel; the session guards make sure a
//! single view still runs at most one call at a time.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, instrument};

use crate::protocol::{to_snapshot, ClientWsMessage, ServerWsMessage};
use crate::session::{self, Outcome, Session, ViewKind};
use crate::state::AppState;

const OUTBOX_CAPACITY: usize = 32;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "nihongo_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let session = Arc::new(Mutex::new(Session::new()));
  let session_id = session.lock().await.id.clone();
  info!(target: "nihongo_backend", %session_id, "WebSocket connected");

  let (tx, mut rx) = mpsc::channel::<ServerWsMessage>(OUTBOX_CAPACITY);

  loop {
    tokio::select! {
      incoming = socket.recv() => {
        match incoming {
          Some(Ok(Message::Text(txt))) => {
            match serde_json::from_str::<ClientWsMessage>(&txt) {
              Ok(msg) => {
                debug!(target: "nihongo_backend", %session_id, op = msg.op_name(), "WS message received");
                tokio::spawn(handle_client_ws(msg, state.clone(), session.clone(), tx.clone()));
              }
              Err(e) => {
                let _ = tx.send(ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }).await;
              }
            }
          }
          Some(Ok(Message::Ping(payload))) => {
            let _ = socket.send(Message::Pong(payload)).await;
          }
          Some(Ok(Message::Close(_))) | None => break,
          Some(Ok(_)) => {}
          Some(Err(e)) => {
            error!(target: "nihongo_backend", %session_id, error = %e, "WS receive error");
            break;
          }
        }
      }
      Some(reply) = rx.recv() => {
        let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });
        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "nihongo_backend", %session_id, error = %e, "WS send error");
          break;
        }
      }
    }
  }
  info!(target: "nihongo_backend", %session_id, "WebSocket disconnected");
}

/// Handle one client message. Dropped submissions (blank input, view busy)
/// produce no reply at all; the client keeps its current state.
#[instrument(level = "debug", skip_all, fields(op = msg.op_name()))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: Arc<AppState>,
  session: Arc<Mutex<Session>>,
  tx: mpsc::Sender<ServerWsMessage>,
) {
  match msg {
    ClientWsMessage::Ping => {
      let _ = tx.send(ServerWsMessage::Pong).await;
    }

    ClientWsMessage::AnalyzeWord { word } => {
      match session::submit_lookup(&session, &state, &word).await {
        Outcome::Succeeded(analysis) => {
          let history = state.history.load().await;
          let _ = tx.send(ServerWsMessage::Analysis { analysis, history }).await;
        }
        Outcome::Failed(message) => {
          let _ = tx
            .send(ServerWsMessage::ViewError {
              view: ViewKind::Dictionary,
              message: message.to_string(),
            })
            .await;
        }
        Outcome::Ignored(reason) => {
          debug!(target: "tutor", ?reason, "WS analyze_word dropped");
        }
      }
    }

    ClientWsMessage::EvaluateSentence { bengali, japanese } => {
      match session::submit_practice(&session, &state, &bengali, &japanese).await {
        Outcome::Succeeded(result) => {
          let _ = tx.send(ServerWsMessage::Evaluation { result }).await;
        }
        Outcome::Failed(message) => {
          let _ = tx
            .send(ServerWsMessage::ViewError {
              view: ViewKind::Practice,
              message: message.to_string(),
            })
            .await;
        }
        Outcome::Ignored(reason) => {
          debug!(target: "tutor", ?reason, "WS evaluate_sentence dropped");
        }
      }
    }

    ClientWsMessage::AskGrammar { question } => {
      match session::submit_grammar(&session, &state, &question).await {
        Outcome::Succeeded(answer) => {
          let _ = tx.send(ServerWsMessage::GrammarAnswer { answer }).await;
        }
        Outcome::Failed(message) => {
          let _ = tx
            .send(ServerWsMessage::ViewError {
              view: ViewKind::Grammar,
              message: message.to_string(),
            })
            .await;
        }
        Outcome::Ignored(reason) => {
          debug!(target: "tutor", ?reason, "WS ask_grammar dropped");
        }
      }
    }

    ClientWsMessage::GetState => {
      let snapshot = to_snapshot(&*session.lock().await);
      let _ = tx.send(ServerWsMessage::State { state: snapshot }).await;
    }

    ClientWsMessage::GetHistory => {
      let entries = state.history.load().await;
      let _ = tx.send(ServerWsMessage::History { entries }).await;
    }

    ClientWsMessage::ClearHistory => {
      info!(target: "nihongo_backend", "Search history cleared");
      let entries = state.history.clear().await;
      let _ = tx.send(ServerWsMessage::History { entries }).await;
    }

    ClientWsMessage::SpeechToText { lang, audio_base64, mime } => {
      // Silent on every failure path: a transcript is pushed only when some
      // speech was recognized.
      if let Some(text) = session::submit_speech(&session, &state, &lang, &mime, &audio_base64).await {
        let _ = tx.send(ServerWsMessage::Transcript { lang, text }).await;
      }
    }
  }
}
