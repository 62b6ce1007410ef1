//! Domain models: vocabulary records, component words, word types and gameplay modes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Value a missing priority/known/quality rating stands for in the vocabulary sheet.
pub const RATING_FALLBACK: u32 = 6;

/// Catalogued word types. `ComponentWord` is only ever assigned to index
/// entries for component words that have no record of their own.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WordType {
  #[serde(rename = "combo")] Combo,
  #[serde(rename = "no combo")] NoCombo,
  #[serde(rename = "two word")] TwoWord,
  #[serde(rename = "suffix")] Suffix,
  #[serde(rename = "single char")] SingleChar,
  #[serde(rename = "abbreviation")] Abbreviation,
  #[serde(rename = "prefix")] Prefix,
  #[serde(rename = "phrase")] Phrase,
  #[serde(rename = "phrase_save")] PhraseSave,
  #[serde(rename = "component_word")] ComponentWord,
}

impl WordType {
  pub fn is_phrase(self) -> bool {
    matches!(self, WordType::Phrase | WordType::PhraseSave)
  }
}

impl FromStr for WordType {
  type Err = QuizError;

  /// Parses the types a vocabulary row may carry. The component sentinel is
  /// not a row type and is rejected.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "combo" => Ok(WordType::Combo),
      "no combo" => Ok(WordType::NoCombo),
      "two word" => Ok(WordType::TwoWord),
      "suffix" => Ok(WordType::Suffix),
      "single char" => Ok(WordType::SingleChar),
      "abbreviation" => Ok(WordType::Abbreviation),
      "prefix" => Ok(WordType::Prefix),
      "phrase" => Ok(WordType::Phrase),
      "phrase_save" => Ok(WordType::PhraseSave),
      other => Err(QuizError::Configuration(format!("uncatalogued word type '{other}'"))),
    }
  }
}

/// One of the (up to four) simpler words a combo word is built from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentWord {
  pub chinese: String,
  pub english: String,
}

/// One quiz-able vocabulary entry, already validated at the load boundary.
///
/// Invariants: `chinese` is non-empty, `english` holds at least one
/// alternative, `id` is unique across the loaded table, and `components`
/// holds at most four words in `word1..word4` order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VocabRecord {
  pub id: u64,
  pub chinese: String,
  pub pinyin: String,
  /// Accepted English translations; any one of them is a correct answer.
  pub english: Vec<String>,
  #[serde(rename = "type")]
  pub word_type: WordType,
  #[serde(default)] pub category: Option<String>,
  #[serde(default)] pub secondary_category: Option<String>,
  /// Lower is more important.
  #[serde(default)] pub priority: Option<u32>,
  /// Self-rated familiarity, higher is better known.
  #[serde(default)] pub known: Option<u32>,
  /// Trustworthiness of the component decomposition, lower is better.
  #[serde(default)] pub quality: Option<u32>,
  #[serde(default)] pub components: Vec<ComponentWord>,
}

impl VocabRecord {
  pub fn priority_or_fallback(&self) -> u32 { self.priority.unwrap_or(RATING_FALLBACK) }
  pub fn known_or_fallback(&self) -> u32 { self.known.unwrap_or(RATING_FALLBACK) }
  pub fn quality_or_fallback(&self) -> u32 { self.quality.unwrap_or(RATING_FALLBACK) }

  /// English alternatives joined the way the sheet stores them.
  pub fn english_joined(&self) -> String {
    self.english.join("; ")
  }
}

/// How a quiz session is played.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameplayMode {
  /// Guess the English translation given the component words.
  #[default]
  Easy,
  /// Guess the English translation without hints.
  Medium,
  /// Guess the Chinese combo word from its English translation.
  Hard,
  /// Walk through the deck with everything revealed; nothing is graded.
  Review,
  /// Browse lists of words sharing a single character.
  ReviewShared,
}

impl GameplayMode {
  pub fn label(self) -> &'static str {
    match self {
      GameplayMode::Easy => "EASY",
      GameplayMode::Medium => "MEDIUM",
      GameplayMode::Hard => "HARD",
      GameplayMode::Review => "REVIEW",
      GameplayMode::ReviewShared => "REVIEW SHARED CHARACTERS",
    }
  }

  /// Component words are part of the prompt itself, so their quality matters.
  pub fn exposes_components(self) -> bool {
    matches!(self, GameplayMode::Easy | GameplayMode::Review)
  }

  pub fn is_graded(self) -> bool {
    matches!(self, GameplayMode::Easy | GameplayMode::Medium | GameplayMode::Hard)
  }
}

impl FromStr for GameplayMode {
  type Err = QuizError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "easy" => Ok(GameplayMode::Easy),
      "medium" => Ok(GameplayMode::Medium),
      "hard" => Ok(GameplayMode::Hard),
      "review" | "review_mode" => Ok(GameplayMode::Review),
      "review_shared" => Ok(GameplayMode::ReviewShared),
      other => Err(QuizError::Configuration(format!("gameplay option '{other}' not supported"))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_word_type_parse() {
    assert_eq!("single char".parse::<WordType>().unwrap(), WordType::SingleChar);
    assert_eq!(" phrase_save ".parse::<WordType>().unwrap(), WordType::PhraseSave);
    assert!("component_word".parse::<WordType>().is_err());
    assert!("idiom".parse::<WordType>().is_err());
  }

  #[test]
  fn test_gameplay_parse() {
    assert_eq!("HARD".parse::<GameplayMode>().unwrap(), GameplayMode::Hard);
    assert_eq!("review_mode".parse::<GameplayMode>().unwrap(), GameplayMode::Review);
    assert!(matches!("expert".parse::<GameplayMode>(), Err(QuizError::Configuration(_))));
  }

  #[test]
  fn test_gameplay_flags() {
    assert!(GameplayMode::Easy.exposes_components());
    assert!(!GameplayMode::Medium.exposes_components());
    assert!(!GameplayMode::Review.is_graded());
  }
}
