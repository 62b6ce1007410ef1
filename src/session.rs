//! Quiz session state machine.
//!
//! `NotStarted -> InProgress(AwaitingAnswer | Submitted) -> Finished`.
//! Every action is one synchronous transition on an owned value; actions that
//! are not valid in the current phase are no-ops and report so.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::deck::{Deck, DeckOrder};
use crate::domain::{GameplayMode, VocabRecord};
use crate::grading::{evaluate, GradingMode, Verdict};

/// Upper bound (exclusive) for seeds handed out on restart.
pub const MAX_RANDOM_SEED: u64 = 100_000;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  NotStarted,
  AwaitingAnswer,
  Submitted,
  Finished,
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct Score {
  pub n_guess: u32,
  pub n_correct: u32,
  pub percent_correct: f64,
  pub streak: u32,
  pub previous_streak: u32,
}

impl Score {
  fn recompute_percent(&mut self) {
    self.percent_correct = if self.n_guess == 0 {
      0.0
    } else {
      100.0 * f64::from(self.n_correct) / f64::from(self.n_guess)
    };
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
  Graded(Verdict),
  /// Not awaiting an answer (already submitted, not started, finished, or a review mode).
  Ignored,
}

#[derive(Clone, Debug)]
pub struct QuizSession {
  gameplay: GameplayMode,
  english_policy: GradingMode,
  order: DeckOrder,
  deck: Deck,
  phase: Phase,
  position: usize,
  score: Score,
  guess: Option<String>,
  last_verdict: Option<Verdict>,
}

impl QuizSession {
  pub fn new(order: DeckOrder, english_policy: GradingMode) -> Self {
    Self {
      gameplay: GameplayMode::default(),
      english_policy,
      order,
      deck: Deck::default(),
      phase: Phase::NotStarted,
      position: 0,
      score: Score::default(),
      guess: None,
      last_verdict: None,
    }
  }

  pub fn phase(&self) -> Phase { self.phase }
  pub fn gameplay(&self) -> GameplayMode { self.gameplay }
  pub fn order(&self) -> DeckOrder { self.order }
  pub fn position(&self) -> usize { self.position }
  pub fn deck_len(&self) -> usize { self.deck.len() }
  pub fn score(&self) -> Score { self.score }
  pub fn guess(&self) -> Option<&str> { self.guess.as_deref() }
  pub fn last_verdict(&self) -> Option<&Verdict> { self.last_verdict.as_ref() }

  /// The record being asked, if the session is in progress.
  pub fn current(&self) -> Option<&VocabRecord> {
    match self.phase {
      Phase::AwaitingAnswer | Phase::Submitted => self.deck.get(self.position),
      Phase::NotStarted | Phase::Finished => None,
    }
  }

  /// Change the seed/offset used for the next deck build.
  pub fn set_order(&mut self, order: DeckOrder) {
    self.order = order;
  }

  /// Begin a game on a freshly built deck. Counters reset, position 0.
  #[instrument(level = "info", skip(self, deck), fields(deck_len = deck.len()))]
  pub fn start(&mut self, deck: Deck, gameplay: GameplayMode) {
    self.gameplay = gameplay;
    self.deck = deck;
    self.position = 0;
    self.score = Score::default();
    self.guess = None;
    self.last_verdict = None;
    self.phase = self.phase_for_new_item();
    info!(target: "quiz", deck_len = self.deck.len(), phase = ?self.phase, "Game started");
  }

  fn phase_for_new_item(&self) -> Phase {
    if self.position >= self.deck.len() {
      Phase::Finished
    } else if self.gameplay.is_graded() {
      Phase::AwaitingAnswer
    } else {
      // review modes reveal everything up front
      Phase::Submitted
    }
  }

  /// Grade a guess for the current item. A second submit before `next` is ignored.
  #[instrument(level = "debug", skip(self, guess), fields(guess_len = guess.len(), position = self.position))]
  pub fn submit(&mut self, guess: &str) -> SubmitOutcome {
    if self.phase != Phase::AwaitingAnswer {
      return SubmitOutcome::Ignored;
    }
    let Some(record) = self.deck.get(self.position) else {
      return SubmitOutcome::Ignored;
    };

    let verdict = match self.gameplay {
      GameplayMode::Hard => evaluate(guess, std::slice::from_ref(&record.chinese), GradingMode::Strict),
      _ => evaluate(guess, &record.english, self.english_policy),
    };

    self.score.n_guess += 1;
    if verdict.correct {
      self.score.n_correct += 1;
      self.score.streak += 1;
    } else {
      self.score.previous_streak = self.score.streak;
      self.score.streak = 0;
    }
    self.score.recompute_percent();

    debug!(target: "quiz", id = record.id, correct = verdict.correct, streak = self.score.streak, "Guess graded");
    self.guess = Some(guess.to_string());
    self.last_verdict = Some(verdict.clone());
    self.phase = Phase::Submitted;
    SubmitOutcome::Graded(verdict)
  }

  /// Move past the current item without grading it.
  pub fn skip(&mut self) -> bool {
    match self.phase {
      Phase::AwaitingAnswer | Phase::Submitted => {
        self.phase = Phase::Submitted;
        self.last_verdict = None;
        self.next()
      }
      Phase::NotStarted | Phase::Finished => false,
    }
  }

  /// Advance to the next item; only valid once the current one is submitted.
  pub fn next(&mut self) -> bool {
    if self.phase != Phase::Submitted {
      return false;
    }
    self.position += 1;
    self.guess = None;
    self.last_verdict = None;
    self.phase = self.phase_for_new_item();
    if self.phase == Phase::Finished {
      info!(target: "quiz", n_guess = self.score.n_guess, n_correct = self.score.n_correct, "No words remaining");
    }
    true
  }

  /// Override a false negative from the grader. Only valid while the streak is
  /// broken, so the same miss cannot be corrected twice.
  pub fn correct_wrongly_marked(&mut self) -> bool {
    let s = &mut self.score;
    if self.phase == Phase::NotStarted || s.streak != 0 || s.n_guess == 0 || s.n_correct >= s.n_guess {
      return false;
    }
    s.n_correct += 1;
    s.recompute_percent();
    s.streak = s.previous_streak + 1;
    if let Some(v) = self.last_verdict.as_mut() {
      v.correct = true;
    }
    info!(target: "quiz", n_correct = s.n_correct, streak = s.streak, "Verdict corrected by user");
    true
  }

  /// Back to the start screen with a fresh random seed for the next deck.
  pub fn restart(&mut self) {
    let seed = rand::thread_rng().gen_range(0..MAX_RANDOM_SEED);
    self.order = DeckOrder { seed, ..self.order };
    self.phase = Phase::NotStarted;
    self.deck = Deck::default();
    self.position = 0;
    self.guess = None;
    self.last_verdict = None;
    debug!(target: "quiz", seed, "Session restarted");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::deck::{build, DeckFilters};
  use crate::domain::WordType;

  fn record(id: u64, chinese: &str, english: &str) -> VocabRecord {
    VocabRecord {
      id,
      chinese: chinese.into(),
      pinyin: "py".into(),
      english: vec![english.into()],
      word_type: WordType::Combo,
      category: None,
      secondary_category: None,
      priority: Some(1),
      known: Some(1),
      quality: Some(1),
      components: vec![],
    }
  }

  fn deck_of(records: &[VocabRecord]) -> Deck {
    build(records, &DeckFilters::default(), DeckOrder { seed: 42, starting_index: 0 })
  }

  fn started(records: &[VocabRecord], gameplay: GameplayMode) -> QuizSession {
    let mut s = QuizSession::new(DeckOrder { seed: 42, starting_index: 0 }, GradingMode::Fuzzy);
    s.start(deck_of(records), gameplay);
    s
  }

  fn words() -> Vec<VocabRecord> {
    vec![record(1, "黄油", "butter"), record(2, "保险", "insurance"), record(3, "半岛", "peninsula")]
  }

  fn answer_for(s: &QuizSession) -> String {
    s.current().unwrap().english[0].clone()
  }

  #[test]
  fn test_start_resets() {
    let s = started(&words(), GameplayMode::Easy);
    assert_eq!(s.phase(), Phase::AwaitingAnswer);
    assert_eq!(s.position(), 0);
    assert_eq!(s.score(), Score::default());
    assert!(s.current().is_some());
  }

  #[test]
  fn test_not_started_ignores_actions() {
    let mut s = QuizSession::new(DeckOrder::default(), GradingMode::Fuzzy);
    assert_eq!(s.submit("butter"), SubmitOutcome::Ignored);
    assert!(!s.next());
    assert!(!s.skip());
    assert!(!s.correct_wrongly_marked());
    assert!(s.current().is_none());
  }

  #[test]
  fn test_submit_twice_is_noop() {
    let mut s = started(&words(), GameplayMode::Medium);
    let guess = answer_for(&s);
    assert!(matches!(s.submit(&guess), SubmitOutcome::Graded(Verdict { correct: true, .. })));
    assert_eq!(s.submit(&guess), SubmitOutcome::Ignored);
    assert_eq!(s.score().n_guess, 1);
    assert_eq!(s.score().n_correct, 1);
  }

  #[test]
  fn test_correct_wrongly_marked() {
    let mut s = started(&words(), GameplayMode::Easy);
    let guess = answer_for(&s);
    s.submit(&guess);
    s.next();
    s.submit("zzzzzz");
    let before = s.score();
    assert_eq!(before.streak, 0);
    assert_eq!(before.previous_streak, 1);

    assert!(s.correct_wrongly_marked());
    let after = s.score();
    assert_eq!(after.n_correct, before.n_correct + 1);
    assert_eq!(after.streak, before.previous_streak + 1);
    assert_eq!(after.percent_correct, 100.0);
    assert!(s.last_verdict().unwrap().correct);

    // streak is nonzero now
    assert!(!s.correct_wrongly_marked());
    assert_eq!(s.score(), after);
  }

  #[test]
  fn test_correct_wrongly_marked_requires_a_miss() {
    let mut s = started(&words(), GameplayMode::Easy);
    assert!(!s.correct_wrongly_marked());
    s.skip();
    assert!(!s.correct_wrongly_marked());
    assert_eq!(s.score().n_correct, 0);
  }

  #[test]
  fn test_skip_never_scores() {
    let mut s = started(&words(), GameplayMode::Easy);
    assert!(s.skip());
    assert_eq!(s.position(), 1);
    assert_eq!(s.phase(), Phase::AwaitingAnswer);

    let guess = answer_for(&s);
    s.submit(&guess);
    let score = s.score();
    assert!(s.skip());
    assert_eq!(s.position(), 2);
    assert_eq!(s.score(), score);
  }

  #[test]
  fn test_next_requires_submission() {
    let mut s = started(&words(), GameplayMode::Easy);
    assert!(!s.next());
    assert_eq!(s.position(), 0);
    s.submit("anything");
    assert!(s.next());
    assert_eq!(s.position(), 1);
    assert!(s.guess().is_none());
    assert!(s.last_verdict().is_none());
  }

  #[test]
  fn test_end_to_end_score() {
    let mut s = started(&words(), GameplayMode::Easy);
    let guess = answer_for(&s);
    s.submit(&guess);
    s.next();
    s.submit("qqqqqqqq");
    s.next();
    let guess = answer_for(&s);
    s.submit(&guess);
    s.next();

    assert_eq!(s.phase(), Phase::Finished);
    assert!(s.current().is_none());
    let score = s.score();
    assert_eq!((score.n_guess, score.n_correct), (3, 2));
    assert_eq!(format!("{:.1}", score.percent_correct), "66.7");
    assert_eq!(score.streak, 1);
  }

  #[test]
  fn test_hard_mode_grades_chinese_strictly() {
    let mut s = started(&words(), GameplayMode::Hard);
    let target = s.current().unwrap().chinese.clone();
    assert!(matches!(s.submit(&target), SubmitOutcome::Graded(Verdict { correct: true, .. })));
    s.next();
    let english = answer_for(&s);
    assert!(matches!(s.submit(&english), SubmitOutcome::Graded(Verdict { correct: false, .. })));
  }

  #[test]
  fn test_review_mode_is_never_graded() {
    let mut s = started(&words(), GameplayMode::Review);
    assert_eq!(s.phase(), Phase::Submitted);
    assert_eq!(s.submit("butter"), SubmitOutcome::Ignored);
    assert!(s.next());
    assert_eq!(s.phase(), Phase::Submitted);
    assert_eq!(s.score().n_guess, 0);
  }

  #[test]
  fn test_empty_deck_finishes_immediately() {
    let s = started(&[], GameplayMode::Easy);
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.deck_len(), 0);
  }

  #[test]
  fn test_restart() {
    let mut s = started(&words(), GameplayMode::Easy);
    s.restart();
    assert_eq!(s.phase(), Phase::NotStarted);
    assert!(s.order().seed < MAX_RANDOM_SEED);
    assert_eq!(s.deck_len(), 0);
  }
}
