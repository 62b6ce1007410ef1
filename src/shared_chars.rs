//! Reverse index from every Chinese character to the words containing it.
//!
//! Both combo words and their component words are indexed as independent
//! entries. A component word that also has a record of its own is indexed
//! once, with the record's details, at the position it was first seen.
//! Only forms that never appear as a record keep blank pinyin and the
//! `component_word` type.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{VocabRecord, WordType};
use crate::error::{QuizError, Result};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SharedCharacterEntry {
  pub character: char,
  pub chinese: String,
  pub english: String,
  /// Empty for component words without a record of their own.
  pub pinyin: String,
  #[serde(rename = "type")]
  pub word_type: WordType,
}

/// Narrowing applied to a character lookup.
#[derive(Clone, Debug, Default)]
pub struct LookupFilter {
  /// Chinese forms to leave out (e.g. the querying word and its component).
  pub exclude: Vec<String>,
  /// Leave out the bare character itself as a word.
  pub exclude_character: bool,
  /// Leave out blank-pinyin placeholders.
  pub require_pinyin: bool,
  /// Leave out `phrase` / `phrase_save` entries.
  pub words_only: bool,
}

/// Character with the number of distinct words containing it.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CharacterCount {
  pub character: char,
  pub n_words: usize,
}

#[derive(Clone, Debug, Default)]
pub struct SharedCharacterIndex {
  buckets: HashMap<char, Vec<SharedCharacterEntry>>,
  n_words: usize,
}

struct FlatWord {
  /// False for component placeholders.
  catalogued: bool,
  chinese: String,
  english: String,
  pinyin: String,
  word_type: WordType,
}

impl SharedCharacterIndex {
  #[instrument(level = "debug", skip_all, fields(n_records = records.len()))]
  pub fn build(records: &[VocabRecord]) -> Self {
    // 1) flatten: combo word, then each component, in record order
    let mut flat: Vec<FlatWord> = Vec::new();
    for r in records {
      flat.push(FlatWord {
        catalogued: true,
        chinese: r.chinese.clone(),
        english: r.english_joined(),
        pinyin: r.pinyin.clone(),
        word_type: r.word_type,
      });
      for c in &r.components {
        flat.push(FlatWord {
          catalogued: false,
          chinese: c.chinese.clone(),
          english: c.english.clone(),
          pinyin: String::new(),
          word_type: WordType::ComponentWord,
        });
      }
    }

    // 2) one entry per chinese form; a record replaces an earlier placeholder
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut words: Vec<FlatWord> = Vec::with_capacity(flat.len());
    for w in flat {
      if w.chinese.trim().is_empty() {
        continue;
      }
      match slots.get(&w.chinese) {
        Some(&i) => {
          if w.catalogued && !words[i].catalogued {
            words[i] = w;
          }
        }
        None => {
          slots.insert(w.chinese.clone(), words.len());
          words.push(w);
        }
      }
    }

    // 3) + 4) bucket by character, one entry per (character, form)
    let mut buckets: HashMap<char, Vec<SharedCharacterEntry>> = HashMap::new();
    for w in &words {
      let mut chars_seen: HashSet<char> = HashSet::new();
      for ch in w.chinese.chars() {
        if !chars_seen.insert(ch) {
          continue;
        }
        buckets.entry(ch).or_default().push(SharedCharacterEntry {
          character: ch,
          chinese: w.chinese.clone(),
          english: w.english.clone(),
          pinyin: w.pinyin.clone(),
          word_type: w.word_type,
        });
      }
    }

    debug!(target: "vocab", n_words = words.len(), n_chars = buckets.len(), "Shared character index built");
    Self { buckets, n_words: words.len() }
  }

  /// Number of distinct words indexed.
  pub fn word_count(&self) -> usize { self.n_words }

  /// Every entry containing `ch`, in discovery order.
  pub fn lookup(&self, ch: char) -> &[SharedCharacterEntry] {
    self.buckets.get(&ch).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn lookup_filtered(&self, ch: char, filter: &LookupFilter) -> Vec<&SharedCharacterEntry> {
    let bare = ch.to_string();
    self
      .lookup(ch)
      .iter()
      .filter(|e| !filter.exclude.iter().any(|x| *x == e.chinese))
      .filter(|e| !(filter.exclude_character && e.chinese == bare))
      .filter(|e| !(filter.require_pinyin && e.pinyin.trim().is_empty()))
      .filter(|e| !(filter.words_only && e.word_type.is_phrase()))
      .collect()
  }

  /// Characters ranked by how many words contain them (ties broken by character).
  pub fn character_counts(&self) -> Vec<CharacterCount> {
    let mut counts: Vec<CharacterCount> = self
      .buckets
      .iter()
      .map(|(ch, entries)| CharacterCount { character: *ch, n_words: entries.len() })
      .collect();
    counts.sort_by(|a, b| b.n_words.cmp(&a.n_words).then(a.character.cmp(&b.character)));
    counts
  }

  /// Characters worth offering in a selection list.
  pub fn prolific_characters(&self, min_words: usize) -> Vec<CharacterCount> {
    self
      .character_counts()
      .into_iter()
      .filter(|c| c.n_words >= min_words)
      .collect()
  }
}

/// Find the character a component word shares with its combo word.
///
/// Component characters are tried left to right; for each one the whole combo
/// word is scanned left to right before moving to the next component
/// character. This is the wrap-around scan order (combo index advances
/// first, then the component index), so a component sharing two characters
/// bridges on its own first one. A single-character component is its own
/// bridge.
pub fn find_shared_char(component: &str, combo: &str) -> Result<char> {
  let comp: Vec<char> = component.chars().collect();
  if comp.len() == 1 {
    return Ok(comp[0]);
  }
  let combo_chars: Vec<char> = combo.chars().collect();

  for &c in &comp {
    for &w in &combo_chars {
      if c == w {
        return Ok(c);
      }
    }
  }

  Err(QuizError::NoSharedCharacter {
    component: component.to_string(),
    combo: combo.to_string(),
  })
}
