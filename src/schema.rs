//! Response schemas declared to the generation service.
//!
//! Each builder returns the `responseSchema` value for one operation, using
//! the service's schema dialect (uppercase type names, `required` lists,
//! `minItems`/`maxItems` bounds on arrays). These shapes are the contract the
//! strict parsers in `domain` rely on. The array bounds are advisory: the
//! service aims for them but replies are accepted at whatever length arrives.

use serde_json::{json, Value};

fn example_sentence_items(required: &[&str]) -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "japanese": { "type": "STRING" },
      "romaji": { "type": "STRING" },
      "bengali": { "type": "STRING" },
      "explanation": { "type": "STRING" }
    },
    "required": required
  })
}

/// Shape of a full dictionary word analysis.
pub fn word_analysis() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "word": { "type": "STRING" },
      "reading": { "type": "STRING" },
      "wordType": { "type": "STRING" },
      "meanings": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "meaning": { "type": "STRING" },
            "context": { "type": "STRING" },
            "explanation": { "type": "STRING" }
          },
          "required": ["meaning", "context", "explanation"]
        }
      },
      "grammarBreakdown": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "form": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "exampleVariation": { "type": "STRING" },
            "usageRule": { "type": "STRING" }
          },
          "required": ["form", "explanation", "exampleVariation"]
        }
      },
      "conjugationTable": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "formName": { "type": "STRING" },
            "japanese": { "type": "STRING" },
            "romaji": { "type": "STRING" },
            "meaningInBengali": { "type": "STRING" }
          },
          "required": ["formName", "japanese", "romaji", "meaningInBengali"]
        }
      },
      "homonyms": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "kanji": { "type": "STRING" },
            "meaning": { "type": "STRING" },
            "differenceExplanation": { "type": "STRING" }
          },
          "required": ["kanji", "meaning"]
        }
      },
      "examples": {
        "type": "ARRAY",
        "minItems": 10,
        "maxItems": 15,
        "items": example_sentence_items(&["japanese", "romaji", "bengali"])
      },
      "additionalNotes": {
        "type": "OBJECT",
        "properties": {
          "politeness": { "type": "STRING" },
          "mistakes": { "type": "STRING" },
          "spokenShortcuts": { "type": "STRING" },
          "cultural": { "type": "STRING" }
        },
        "required": ["politeness", "mistakes", "cultural"]
      }
    },
    "required": [
      "word", "reading", "meanings", "grammarBreakdown",
      "conjugationTable", "examples", "additionalNotes"
    ]
  })
}

/// Shape of a practice-sentence evaluation.
pub fn sentence_evaluation() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "isCorrect": { "type": "BOOLEAN" },
      "statusMessage": { "type": "STRING" },
      "detailedExplanation": { "type": "STRING" },
      "naturalJapanese": { "type": "STRING" },
      "romaji": { "type": "STRING" },
      "bengaliMeaning": { "type": "STRING" },
      "corrections": {
        "type": "OBJECT",
        "properties": {
          "casual": { "type": "STRING" },
          "polite": { "type": "STRING" },
          "explanation": { "type": "STRING" }
        },
        "required": ["casual", "polite", "explanation"]
      },
      "commonMistakesInThisContext": { "type": "STRING" }
    },
    "required": [
      "isCorrect", "statusMessage", "detailedExplanation",
      "naturalJapanese", "romaji", "bengaliMeaning", "corrections"
    ]
  })
}

/// Shape of a grammar question answer: explanation, rules, a short
/// conversation, and a large example set.
pub fn grammar_guide() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "topic": { "type": "STRING" },
      "explanation": { "type": "STRING" },
      "rules": { "type": "ARRAY", "items": { "type": "STRING" } },
      "conversation": {
        "type": "ARRAY",
        "minItems": 5,
        "maxItems": 6,
        "items": {
          "type": "OBJECT",
          "properties": {
            "speaker": { "type": "STRING" },
            "text": { "type": "STRING" },
            "romaji": { "type": "STRING" },
            "translation": { "type": "STRING" }
          },
          "required": ["speaker", "text", "romaji", "translation"]
        }
      },
      "examples": {
        "type": "ARRAY",
        "minItems": 15,
        "maxItems": 20,
        "items": example_sentence_items(&["japanese", "romaji", "bengali", "explanation"])
      }
    },
    "required": ["topic", "explanation", "rules", "conversation", "examples"]
  })
}
