//! Loading app configuration (deck defaults, grading policy, vocabulary source) from TOML.
//!
//! Example:
//! ```toml
//! vocab_path = "vocab.toml"
//!
//! [deck]
//! max_priority_rating = 4
//! min_known_rating = 1
//! max_quality_rating = 1
//! eligible_types = ["combo", "two word"]
//!
//! [grading]
//! english = "fuzzy"   # or "containment" / "strict"
//! ```

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::{error, info};

use crate::deck::DeckFilters;
use crate::domain::{GameplayMode, WordType};
use crate::error::Result;
use crate::grading::GradingMode;
use crate::vocab::RawVocabRow;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub deck: DeckDefaults,
  #[serde(default)]
  pub grading: GradingCfg,
  /// TOML file with `[[rows]]` vocabulary rows.
  #[serde(default)]
  pub vocab_path: Option<String>,
  /// Inline vocabulary rows, same shape as the file rows.
  #[serde(default)]
  pub vocab: Vec<RawVocabRow>,
}

/// Filter values a new game starts from unless the client overrides them.
#[derive(Clone, Debug, Deserialize)]
pub struct DeckDefaults {
  #[serde(default = "default_max_priority")] pub max_priority_rating: u32,
  #[serde(default = "default_min_known")] pub min_known_rating: u32,
  #[serde(default = "default_max_quality")] pub max_quality_rating: u32,
  #[serde(default)] pub eligible_types: Option<BTreeSet<WordType>>,
  #[serde(default)] pub eligible_categories: Option<BTreeSet<String>>,
}

fn default_max_priority() -> u32 { 4 }
fn default_min_known() -> u32 { 1 }
fn default_max_quality() -> u32 { 1 }

impl Default for DeckDefaults {
  fn default() -> Self {
    Self {
      max_priority_rating: default_max_priority(),
      min_known_rating: default_min_known(),
      max_quality_rating: default_max_quality(),
      eligible_types: None,
      eligible_categories: None,
    }
  }
}

impl DeckDefaults {
  /// Filters for a game in `mode`; the quality filter only applies where the
  /// prompt itself shows the component words.
  pub fn filters_for(&self, mode: GameplayMode) -> DeckFilters {
    DeckFilters {
      max_priority_rating: Some(self.max_priority_rating),
      min_known_rating: Some(self.min_known_rating),
      max_quality_rating: mode.exposes_components().then_some(self.max_quality_rating),
      eligible_types: self.eligible_types.clone(),
      eligible_categories: self.eligible_categories.clone(),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GradingCfg {
  /// Policy for English answers: "fuzzy" (default), "containment" or "strict".
  #[serde(default = "default_english_policy")]
  pub english: String,
}

fn default_english_policy() -> String { "fuzzy".into() }

impl Default for GradingCfg {
  fn default() -> Self {
    Self { english: default_english_policy() }
  }
}

impl AppConfig {
  /// Parsed English grading policy. An unsupported value is a configuration error.
  pub fn english_policy(&self) -> Result<GradingMode> {
    self.grading.english.parse()
  }
}

/// Attempt to load `AppConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "combo_words", %path, "Loaded app config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "combo_words", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "combo_words", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::QuizError;

  #[test]
  fn test_defaults() {
    let cfg: AppConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.deck.max_priority_rating, 4);
    assert_eq!(cfg.deck.min_known_rating, 1);
    assert_eq!(cfg.english_policy().unwrap(), GradingMode::Fuzzy);
    assert!(cfg.vocab.is_empty());
  }

  #[test]
  fn test_partial_deck_section() {
    let cfg: AppConfig = toml::from_str(
      r#"
      [deck]
      min_known_rating = 3
      eligible_types = ["combo", "single char"]
      "#,
    )
    .unwrap();
    assert_eq!(cfg.deck.max_priority_rating, 4);
    assert_eq!(cfg.deck.min_known_rating, 3);
    let types = cfg.deck.eligible_types.unwrap();
    assert!(types.contains(&WordType::SingleChar));
  }

  #[test]
  fn test_quality_filter_only_when_components_shown() {
    let defaults = DeckDefaults::default();
    assert_eq!(defaults.filters_for(GameplayMode::Easy).max_quality_rating, Some(1));
    assert_eq!(defaults.filters_for(GameplayMode::Hard).max_quality_rating, None);
  }

  #[test]
  fn test_unsupported_grading_policy() {
    let cfg: AppConfig = toml::from_str("[grading]\nenglish = \"telepathy\"").unwrap();
    assert!(matches!(cfg.english_policy(), Err(QuizError::Configuration(_))));
  }

  #[test]
  fn test_inline_vocab() {
    let cfg: AppConfig = toml::from_str(
      r#"
      [grading]
      english = "containment"

      [[vocab]]
      id = 1
      chinese = "黄油"
      pinyin = "huáng yóu"
      english = "butter"
      type = "combo"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.english_policy().unwrap(), GradingMode::Containment);
    assert_eq!(cfg.vocab.len(), 1);
  }
}
