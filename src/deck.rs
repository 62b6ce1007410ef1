//! Deck construction: filter the vocabulary table, then order it reproducibly.
//!
//! `build` is a pure function of its inputs. Records are first sorted by id so
//! the seeded shuffle does not depend on load order, then the shuffled deck is
//! rotated so that `starting_index` becomes position 0.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{VocabRecord, WordType};

/// Independently toggleable filters; `None` disables a filter.
///
/// Absent ratings on a record pass every numeric filter, so unrated words are
/// never silently excluded.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DeckFilters {
  #[serde(default)] pub max_priority_rating: Option<u32>,
  #[serde(default)] pub min_known_rating: Option<u32>,
  #[serde(default)] pub max_quality_rating: Option<u32>,
  #[serde(default)] pub eligible_types: Option<BTreeSet<WordType>>,
  #[serde(default)] pub eligible_categories: Option<BTreeSet<String>>,
}

impl DeckFilters {
  pub fn accepts(&self, r: &VocabRecord) -> bool {
    if let (Some(max), Some(p)) = (self.max_priority_rating, r.priority) {
      if p > max { return false; }
    }
    if let (Some(min), Some(k)) = (self.min_known_rating, r.known) {
      if k < min { return false; }
    }
    if let (Some(max), Some(q)) = (self.max_quality_rating, r.quality) {
      if q > max { return false; }
    }
    if let Some(types) = &self.eligible_types {
      if !types.contains(&r.word_type) { return false; }
    }
    if let Some(cats) = &self.eligible_categories {
      match &r.category {
        Some(c) if cats.contains(c) => {}
        _ => return false,
      }
    }
    true
  }
}

/// Shuffle seed and rotation offset.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckOrder {
  pub seed: u64,
  #[serde(default)] pub starting_index: usize,
}

/// Ordered quiz sequence. Fixed once built; rebuild to change it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deck {
  records: Vec<VocabRecord>,
}

impl Deck {
  pub fn len(&self) -> usize { self.records.len() }
  pub fn is_empty(&self) -> bool { self.records.is_empty() }
  pub fn get(&self, position: usize) -> Option<&VocabRecord> { self.records.get(position) }

  #[cfg(test)]
  pub fn ids(&self) -> Vec<u64> {
    self.records.iter().map(|r| r.id).collect()
  }
}

#[instrument(level = "debug", skip(records, filters), fields(n_records = records.len(), seed = order.seed, start = order.starting_index))]
pub fn build(records: &[VocabRecord], filters: &DeckFilters, order: DeckOrder) -> Deck {
  let mut kept: Vec<VocabRecord> = records.iter().filter(|r| filters.accepts(r)).cloned().collect();
  kept.sort_by_key(|r| r.id);

  let mut rng = ChaCha8Rng::seed_from_u64(order.seed);
  kept.shuffle(&mut rng);

  if !kept.is_empty() {
    let k = order.starting_index % kept.len();
    kept.rotate_left(k);
  }

  debug!(target: "quiz", kept = kept.len(), dropped = records.len() - kept.len(), "Deck built");
  Deck { records: kept }
}
