//! Answer grading.
//!
//! Three policies are available:
//! - `Strict`: exact string equality (used for Chinese answers).
//! - `Fuzzy`: lower-cased, parenthetical-stripped guess compared with each
//!   accepted alternative by longest common substring ratio.
//! - `Containment`: the older rule; one string must contain the other and
//!   cover more than half of it. No case folding, no stripping.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Overlap must exceed this share of either string on its own...
const DOMINANT_OVERLAP: f64 = 0.75;
/// ...or this share of both strings at once.
const MUTUAL_OVERLAP: f64 = 0.5;
const CONTAINMENT_OVERLAP: f64 = 0.5;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradingMode {
  Strict,
  #[default]
  Fuzzy,
  Containment,
}

impl FromStr for GradingMode {
  type Err = QuizError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "strict" | "exact" => Ok(GradingMode::Strict),
      "fuzzy" | "lcs_ratio" => Ok(GradingMode::Fuzzy),
      "containment" | "legacy" => Ok(GradingMode::Containment),
      other => Err(QuizError::Configuration(format!("grading mode '{other}' not supported"))),
    }
  }
}

/// Outcome of grading one guess against a set of accepted answers.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Verdict {
  pub correct: bool,
  /// The accepted alternative that matched, if any.
  pub matched: Option<String>,
}

impl Verdict {
  fn miss() -> Self { Self { correct: false, matched: None } }
  fn hit(opt: &str) -> Self { Self { correct: true, matched: Some(opt.to_string()) } }
}

/// Grade `guess` against `accepted`; true if any alternative matches.
#[cfg(test)]
pub fn grade<S: AsRef<str>>(guess: &str, accepted: &[S], mode: GradingMode) -> bool {
  evaluate(guess, accepted, mode).correct
}

/// Grade `guess` against `accepted`, reporting which alternative matched.
pub fn evaluate<S: AsRef<str>>(guess: &str, accepted: &[S], mode: GradingMode) -> Verdict {
  match mode {
    GradingMode::Strict => accepted
      .iter()
      .map(AsRef::as_ref)
      .find(|opt| *opt == guess)
      .map(Verdict::hit)
      .unwrap_or_else(Verdict::miss),
    GradingMode::Fuzzy => {
      let guess = strip_parentheticals(&guess.to_lowercase()).trim().to_string();
      accepted
        .iter()
        .map(AsRef::as_ref)
        .find(|opt| fuzzy_match(&guess, &opt.trim().to_lowercase()))
        .map(Verdict::hit)
        .unwrap_or_else(Verdict::miss)
    }
    GradingMode::Containment => accepted
      .iter()
      .map(AsRef::as_ref)
      .find(|opt| containment_match(guess, opt))
      .map(Verdict::hit)
      .unwrap_or_else(Verdict::miss),
  }
}

/// Split a `;`-delimited answer cell into trimmed, non-empty alternatives.
pub fn split_alternatives(cell: &str) -> Vec<String> {
  cell
    .split(';')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

fn fuzzy_match(guess: &str, opt: &str) -> bool {
  let lcs = longest_common_substring_len(guess, opt) as f64;
  let g = guess.chars().count() as f64;
  let o = opt.chars().count() as f64;

  (lcs > DOMINANT_OVERLAP * g || lcs > DOMINANT_OVERLAP * o)
    || (lcs > MUTUAL_OVERLAP * g && lcs > MUTUAL_OVERLAP * o)
}

fn containment_match(guess: &str, opt: &str) -> bool {
  let g = guess.chars().count() as f64;
  let o = opt.chars().count() as f64;
  (opt.contains(guess) && g > CONTAINMENT_OVERLAP * o)
    || (guess.contains(opt) && o > CONTAINMENT_OVERLAP * g)
}

/// Length in chars of the longest contiguous run shared by `a` and `b`.
pub fn longest_common_substring_len(a: &str, b: &str) -> usize {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  if a.is_empty() || b.is_empty() {
    return 0;
  }

  // prev[j] = length of the common run ending at a[i-1], b[j-1]
  let mut prev = vec![0usize; b.len() + 1];
  let mut curr = vec![0usize; b.len() + 1];
  let mut best = 0;

  for i in 1..=a.len() {
    for j in 1..=b.len() {
      curr[j] = if a[i - 1] == b[j - 1] { prev[j - 1] + 1 } else { 0 };
      best = best.max(curr[j]);
    }
    std::mem::swap(&mut prev, &mut curr);
  }

  best
}

/// Remove every `( ... )` span, nested ones included. An unclosed `(` is kept as text.
pub fn strip_parentheticals(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut pending = String::new();
  let mut depth = 0usize;

  for ch in s.chars() {
    match ch {
      '(' => {
        depth += 1;
        pending.push(ch);
      }
      ')' if depth > 0 => {
        depth -= 1;
        if depth == 0 {
          pending.clear();
        } else {
          pending.push(ch);
        }
      }
      _ if depth > 0 => pending.push(ch),
      _ => out.push(ch),
    }
  }
  out.push_str(&pending);
  out
}
