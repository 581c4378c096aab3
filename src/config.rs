//! Loading tutor configuration (prompt templates) from TOML.
//!
//! See `TutorConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TutorConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompt templates sent to the generation service. Defaults carry the
/// Bengali instructions the tutor was built around; override them in TOML
/// to tune tone/structure. Placeholders in `{braces}` are substituted with
/// `util::fill_template`.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  /// Dictionary analysis of one word. Placeholder: {word}.
  pub word_analysis_template: String,
  /// Practice evaluation. Placeholders: {bengali}, {japanese}.
  pub sentence_evaluation_template: String,
  /// Grammar Q&A. Placeholder: {question}.
  pub grammar_question_template: String,
  /// Voice note transcription. Placeholder: {lang}.
  pub transcription_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      word_analysis_template: "জাপানি শব্দ বিশ্লেষণ: \"{word}\"।\n\nJSON আউটপুট দিন (বাংলায়):\n১. অর্থ ও কাঞ্জি।\n২. গ্রামার: \"Causative (খাইয়ে দেওয়া)\" সহ সকল রূপ।\n৩. টেবিল: অবশ্যই \"Causative\" রূপটি অন্তর্ভুক্ত করবেন। অন্যান্য রূপ: Dictionary, Polite, Negative, Te-form, Potential, Passive, Conditional।\n৪. ১০ থেকে ১৫টি সহজ উদাহরণ বাক্য (Japanese, Romaji, Bengali)।\n৫. Politeness এবং টিপস।".into(),
      sentence_evaluation_template: "বাক্য মূল্যায়ন:\nBengali: \"{bengali}\"\nJapanese Attempt: \"{japanese}\"\n\nJSON-এ দ্রুত উত্তর দিন (বাংলায় ব্যাখ্যা সহ)।".into(),
      grammar_question_template: "আপনি একজন বিশেষজ্ঞ জাপানি গ্রামার টিউটর। ইউজারের প্রশ্ন: \"{question}\"।\n\nনিম্নলিখিত কাঠামোতে উত্তর দিন (JSON ফরম্যাটে):\n১. সহজ ভাষায় মূল গ্রামারটির ব্যাখ্যা।\n২. পয়েন্ট আকারে গ্রামারের নিয়মাবলী (Rules)।\n৩. এই গ্রামার ব্যবহার করে ৫ থেকে ৬ লাইনের একটি কথোপকথন (Conversation)।\n৪. ১৫ থেকে ২০টি ভিন্ন ভিন্ন উদাহরণ বাক্য (Japanese, Romaji, Bengali translation, explanation)।\n\nসম্পূর্ণ উত্তর বাংলায় হতে হবে।".into(),
      transcription_template: "Transcribe this short {lang} voice note. Output ONLY the transcript text, with no extra words. If no speech is audible, output nothing.".into(),
    }
  }
}

/// Attempt to load `TutorConfig` from TUTOR_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_tutor_config_from_env() -> Option<TutorConfig> {
  let path = std::env::var("TUTOR_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<TutorConfig>(&s) {
      Ok(cfg) => {
        info!(target: "nihongo_backend", %path, "Loaded tutor config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "nihongo_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "nihongo_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::fill_template;

  #[test]
  fn default_templates_substitute_cleanly() {
    let prompts = Prompts::default();
    let filled = fill_template(&prompts.word_analysis_template, &[("word", "水")]);
    assert!(filled.contains("\"水\""));
    assert!(!filled.contains("{word}"));

    let filled = fill_template(
      &prompts.sentence_evaluation_template,
      &[("bengali", "আমি ভাত খাই"), ("japanese", "ご飯を食べます")],
    );
    assert!(filled.contains("আমি ভাত খাই"));
    assert!(filled.contains("ご飯を食べます"));
  }

  #[test]
  fn toml_overrides_prompts() {
    let toml_src = r#"
      [prompts]
      word_analysis_template = "analyze {word}"
      sentence_evaluation_template = "evaluate {bengali} vs {japanese}"
      grammar_question_template = "answer {question}"
      transcription_template = "transcribe {lang}"
    "#;
    let cfg: TutorConfig = toml::from_str(toml_src).unwrap();
    assert_eq!(cfg.prompts.word_analysis_template, "analyze {word}");
  }

  #[test]
  fn missing_prompts_section_falls_back_to_defaults() {
    let cfg: TutorConfig = toml::from_str("").unwrap();
    assert!(cfg.prompts.grammar_question_template.contains("{question}"));
  }
}
