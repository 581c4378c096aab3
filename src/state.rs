//! Application state: prompts, the optional generation client, and the
//! search-history store.
//!
//! This module owns:
//!   - the prompts struct (from TOML or defaults)
//!   - the optional Gemini client, exposed through the `Tutor` and
//!     `Transcriber` seams so handlers never name the concrete client
//!   - the recent-search history store
//!
//! There is no offline fallback: without an API key the tutor operations
//! report unavailability and the views show their localized banners.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{load_tutor_config_from_env, Prompts};
use crate::gemini::{Gemini, Transcriber, Tutor};
use crate::history::HistoryStore;

pub struct AppState {
    pub tutor: Option<Arc<dyn Tutor>>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub prompts: Prompts,
    pub history: HistoryStore,
}

impl AppState {
    /// Build state from env: load config, open the history store, init Gemini.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let prompts = load_tutor_config_from_env().map(|c| c.prompts).unwrap_or_default();

        let gemini = Gemini::from_env().map(Arc::new);
        if let Some(g) = &gemini {
            info!(target: "nihongo_backend", base_url = %g.base_url, model = %g.model, "Gemini enabled.");
        } else {
            info!(target: "nihongo_backend", "Gemini disabled (no GEMINI_API_KEY). Tutor calls will be reported unavailable.");
        }

        let history = HistoryStore::from_env();

        Self {
            tutor: gemini.clone().map(|g| g as Arc<dyn Tutor>),
            transcriber: gemini.map(|g| g as Arc<dyn Transcriber>),
            prompts,
            history,
        }
    }

    /// True when dictionary/practice/grammar calls can be served.
    pub fn generation_ready(&self) -> bool {
        self.tutor.is_some()
    }

    /// True when voice input can be transcribed.
    pub fn speech_ready(&self) -> bool {
        self.transcriber.is_some()
    }
}
