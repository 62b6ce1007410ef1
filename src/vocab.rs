//! Record-fetch boundary: spreadsheet-shaped rows in, validated `VocabRecord`s out.
//!
//! Rows mirror the columns of the vocabulary sheet. Anything that cannot be a
//! quiz item (missing id/chinese/pinyin/english, uncatalogued type, duplicate
//! id) is dropped here with a warning, so the rest of the crate can rely on the
//! record invariants.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::domain::{ComponentWord, VocabRecord, WordType};
use crate::error::{QuizError, Result};
use crate::grading::split_alternatives;
use crate::util::is_cjk;

/// One row as exported from the vocabulary sheet.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct RawVocabRow {
  #[serde(default)] pub id: Option<u64>,
  #[serde(default)] pub chinese: Option<String>,
  #[serde(default)] pub pinyin: Option<String>,
  /// `;`-delimited alternatives.
  #[serde(default)] pub english: Option<String>,
  #[serde(default, rename = "type")] pub word_type: Option<String>,
  #[serde(default)] pub priority: Option<u32>,
  #[serde(default)] pub quality: Option<u32>,
  #[serde(default)] pub known: Option<u32>,
  #[serde(default)] pub category1: Option<String>,
  #[serde(default)] pub category2: Option<String>,
  #[serde(default)] pub word1: Option<String>,
  #[serde(default)] pub word1_english: Option<String>,
  #[serde(default)] pub word2: Option<String>,
  #[serde(default)] pub word2_english: Option<String>,
  #[serde(default)] pub word3: Option<String>,
  #[serde(default)] pub word3_english: Option<String>,
  #[serde(default)] pub word4: Option<String>,
  #[serde(default)] pub word4_english: Option<String>,
}

/// A vocabulary file: `[[rows]]` tables.
#[derive(Debug, Deserialize, Default)]
pub struct VocabFile {
  #[serde(default)]
  pub rows: Vec<RawVocabRow>,
}

fn present(v: &Option<String>) -> Option<String> {
  v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

impl RawVocabRow {
  /// Validate a single row. `Err` carries the reason it was dropped.
  pub fn into_record(self) -> std::result::Result<VocabRecord, String> {
    let id = self.id.ok_or("missing id")?;
    let chinese = present(&self.chinese).ok_or("missing chinese")?;
    let pinyin = present(&self.pinyin).ok_or("missing pinyin")?;
    let english_cell = present(&self.english).ok_or("missing english")?;
    let english = split_alternatives(&english_cell);
    if english.is_empty() {
      return Err("english has no alternatives".into());
    }
    let type_cell = present(&self.word_type).ok_or("missing type")?;
    let word_type: WordType = type_cell.parse().map_err(|e: QuizError| e.to_string())?;

    let slots = [
      (&self.word1, &self.word1_english),
      (&self.word2, &self.word2_english),
      (&self.word3, &self.word3_english),
      (&self.word4, &self.word4_english),
    ];
    // word(n+1) absent => word(n+2..) ignored
    let components: Vec<ComponentWord> = slots
      .iter()
      .map_while(|(zh, en)| {
        present(zh).map(|chinese| ComponentWord {
          chinese,
          english: present(en).unwrap_or_default(),
        })
      })
      .collect();

    Ok(VocabRecord {
      id,
      chinese,
      pinyin,
      english,
      word_type,
      category: present(&self.category1),
      secondary_category: present(&self.category2),
      priority: self.priority,
      known: self.known,
      quality: self.quality,
      components,
    })
  }
}

/// Validate a batch of rows, dropping (and logging) the unusable ones.
#[instrument(level = "info", skip_all, fields(n_rows = rows.len()))]
pub fn records_from_rows(rows: Vec<RawVocabRow>) -> Vec<VocabRecord> {
  let mut ids: HashSet<u64> = HashSet::new();
  let mut out = Vec::with_capacity(rows.len());
  let n_rows = rows.len();

  for row in rows {
    let row_id = row.id;
    match row.into_record() {
      Ok(rec) => {
        if !ids.insert(rec.id) {
          warn!(target: "vocab", id = rec.id, "Dropping row: duplicate id");
          continue;
        }
        if !rec.chinese.chars().any(is_cjk) {
          warn!(target: "vocab", id = rec.id, chinese = %rec.chinese, "Row has no CJK characters");
        }
        out.push(rec);
      }
      Err(reason) => {
        warn!(target: "vocab", id = ?row_id, %reason, "Dropping row");
      }
    }
  }

  info!(target: "vocab", kept = out.len(), dropped = n_rows - out.len(), "Vocabulary validated");
  out
}

/// Read and validate a TOML vocabulary file.
#[instrument(level = "info")]
pub fn load_vocab_file(path: &str) -> Result<Vec<VocabRecord>> {
  let text = std::fs::read_to_string(path).map_err(|source| QuizError::VocabRead {
    path: path.to_string(),
    source,
  })?;
  let file: VocabFile = toml::from_str(&text).map_err(|source| QuizError::VocabParse {
    path: path.to_string(),
    source,
  })?;
  Ok(records_from_rows(file.rows))
}
