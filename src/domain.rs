//! Domain models produced by the tutor: word analyses, sentence evaluations,
//! grammar guides, and the recent-search history entry.
//!
//! Field names follow the JSON wire contract declared to the generation
//! service (camelCase). Parsing is strict on the fields the declared schema
//! marks required; everything else is optional or defaulted, so one absent
//! required field fails the whole object instead of yielding a half-filled one.

use serde::{Deserialize, Serialize};

/// One sense of a word, with the context it applies in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Meaning {
  pub meaning: String,
  pub context: String,
  pub explanation: String,
}

/// A grammatical form of the word (causative, potential, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarVariation {
  pub form: String,
  pub explanation: String,
  pub example_variation: String,
  pub usage_rule: Option<String>,
}

/// One row of the conjugation table.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConjugationRow {
  pub form_name: String,
  pub japanese: String,
  pub romaji: String,
  pub meaning_in_bengali: String,
}

/// Same-reading word with a different kanji.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomonymInfo {
  pub kanji: String,
  pub meaning: String,
  pub difference_explanation: Option<String>,
}

/// Example sentence in Japanese with romaji and Bengali translation.
/// `explanation` is present on grammar-guide examples and often absent on
/// dictionary ones.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExampleSentence {
  pub japanese: String,
  pub romaji: String,
  pub bengali: String,
  pub explanation: Option<String>,
}

/// Politeness/mistake/cultural notes attached to a word analysis.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalNotes {
  pub politeness: String,
  pub mistakes: String,
  pub spoken_shortcuts: Option<String>,
  pub cultural: String,
}

/// Full dictionary analysis of one Japanese word.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordAnalysis {
  pub word: String,
  pub reading: String,
  #[serde(default)]
  pub word_type: String,
  pub meanings: Vec<Meaning>,
  pub grammar_breakdown: Vec<GrammarVariation>,
  pub conjugation_table: Vec<ConjugationRow>,
  #[serde(default)]
  pub homonyms: Vec<HomonymInfo>,
  pub examples: Vec<ExampleSentence>,
  pub additional_notes: AdditionalNotes,
}

/// Corrected versions of a learner sentence, casual and polite.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Corrections {
  pub casual: String,
  pub polite: String,
  pub explanation: String,
}

/// Verdict on a learner's Japanese attempt at expressing a Bengali sentence.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
  pub is_correct: bool,
  pub status_message: String,
  pub detailed_explanation: String,
  pub natural_japanese: String,
  pub romaji: String,
  pub bengali_meaning: String,
  pub corrections: Corrections,
  pub common_mistakes_in_this_context: Option<String>,
}

/// One line of the sample conversation in a grammar guide.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DialogueLine {
  pub speaker: String,
  pub text: String,
  pub romaji: String,
  pub translation: String,
}

/// Structured answer to a free-form grammar question.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrammarGuide {
  pub topic: String,
  pub explanation: String,
  pub rules: Vec<String>,
  pub conversation: Vec<DialogueLine>,
  pub examples: Vec<ExampleSentence>,
}

/// Recent dictionary search, newest first in the stored list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHistoryEntry {
  pub word: String,
  pub timestamp: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn analysis_json() -> serde_json::Value {
    serde_json::json!({
      "word": "食べる",
      "reading": "たべる",
      "wordType": "Verb (Ichidan)",
      "meanings": [
        {"meaning": "খাওয়া", "context": "সাধারণ", "explanation": "কিছু খাওয়ার ক্রিয়া"}
      ],
      "grammarBreakdown": [
        {"form": "Causative", "explanation": "খাইয়ে দেওয়া", "exampleVariation": "食べさせる"}
      ],
      "conjugationTable": [
        {"formName": "Polite", "japanese": "食べます", "romaji": "tabemasu", "meaningInBengali": "খাই"}
      ],
      "examples": [
        {"japanese": "ご飯を食べる", "romaji": "gohan o taberu", "bengali": "ভাত খাই"}
      ],
      "additionalNotes": {
        "politeness": "সাধারণ",
        "mistakes": "を বাদ দেওয়া",
        "cultural": "খাওয়ার আগে いただきます বলা হয়"
      }
    })
  }

  #[test]
  fn word_analysis_parses_with_optionals_absent() {
    let parsed: WordAnalysis = serde_json::from_value(analysis_json()).unwrap();
    assert_eq!(parsed.word, "食べる");
    assert_eq!(parsed.word_type, "Verb (Ichidan)");
    assert!(parsed.homonyms.is_empty());
    assert!(parsed.grammar_breakdown[0].usage_rule.is_none());
    assert!(parsed.examples[0].explanation.is_none());
    assert!(parsed.additional_notes.spoken_shortcuts.is_none());
  }

  #[test]
  fn word_analysis_rejects_missing_required_field() {
    let mut v = analysis_json();
    v.as_object_mut().unwrap().remove("reading");
    assert!(serde_json::from_value::<WordAnalysis>(v).is_err());
  }

  #[test]
  fn word_type_defaults_when_absent() {
    let mut v = analysis_json();
    v.as_object_mut().unwrap().remove("wordType");
    let parsed: WordAnalysis = serde_json::from_value(v).unwrap();
    assert_eq!(parsed.word_type, "");
  }

  #[test]
  fn evaluation_parses_and_serializes_camel_case() {
    let v = serde_json::json!({
      "isCorrect": false,
      "statusMessage": "প্রায় সঠিক",
      "detailedExplanation": "কণা ভুল হয়েছে",
      "naturalJapanese": "水を飲みます",
      "romaji": "mizu o nomimasu",
      "bengaliMeaning": "আমি পানি খাই",
      "corrections": {"casual": "水を飲む", "polite": "水を飲みます", "explanation": "を দরকার"}
    });
    let parsed: EvaluationResult = serde_json::from_value(v).unwrap();
    assert!(!parsed.is_correct);
    assert!(parsed.common_mistakes_in_this_context.is_none());

    let out = serde_json::to_value(&parsed).unwrap();
    assert!(out.get("statusMessage").is_some());
    assert!(out.get("status_message").is_none());
  }

  #[test]
  fn evaluation_rejects_missing_corrections() {
    let v = serde_json::json!({
      "isCorrect": true,
      "statusMessage": "সঠিক",
      "detailedExplanation": "ঠিক আছে",
      "naturalJapanese": "行きます",
      "romaji": "ikimasu",
      "bengaliMeaning": "যাই"
    });
    assert!(serde_json::from_value::<EvaluationResult>(v).is_err());
  }

  #[test]
  fn grammar_guide_parses() {
    let v = serde_json::json!({
      "topic": "て-form",
      "explanation": "সংযোজক রূপ",
      "rules": ["Group 1: う → って"],
      "conversation": [
        {"speaker": "A", "text": "食べてください", "romaji": "tabete kudasai", "translation": "খান"}
      ],
      "examples": [
        {"japanese": "見てください", "romaji": "mite kudasai", "bengali": "দেখুন", "explanation": "অনুরোধ"}
      ]
    });
    let parsed: GrammarGuide = serde_json::from_value(v).unwrap();
    assert_eq!(parsed.rules.len(), 1);
    assert_eq!(parsed.conversation[0].speaker, "A");
  }

  #[test]
  fn grammar_guide_serializes_all_entries_in_order() {
    let guide = GrammarGuide {
      topic: "て-form".into(),
      explanation: "সংযোজক রূপ".into(),
      rules: vec!["Group 1: う → って".into(), "Group 2: る → て".into()],
      conversation: (0..5)
        .map(|i| DialogueLine {
          speaker: if i % 2 == 0 { "A".into() } else { "B".into() },
          text: format!("せりふ{}", i),
          romaji: format!("serifu {}", i),
          translation: format!("সংলাপ {}", i),
        })
        .collect(),
      examples: (0..18)
        .map(|i| ExampleSentence {
          japanese: format!("例文{}", i),
          romaji: format!("reibun {}", i),
          bengali: format!("উদাহরণ {}", i),
          explanation: Some(format!("ব্যাখ্যা {}", i)),
        })
        .collect(),
    };

    let v = serde_json::to_value(&guide).unwrap();
    let conversation = v["conversation"].as_array().unwrap();
    let examples = v["examples"].as_array().unwrap();
    assert_eq!(conversation.len(), 5);
    assert_eq!(examples.len(), 18);
    assert_eq!(examples[0]["japanese"], "例文0");
    assert_eq!(examples[17]["japanese"], "例文17");
    assert_eq!(conversation[4]["speaker"], "A");
  }
}
