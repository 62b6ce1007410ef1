//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Session lifecycle (create, start, submit, skip, next, correct, restart)
//!   - Snapshot rendering (prompt per gameplay mode, feedback, final summary)
//!   - Component breakdown via the shared-character index
//!   - Shared-character review and ad-hoc grading helpers

use tracing::{debug, info, instrument, warn};

use crate::deck::{self, DeckOrder};
use crate::domain::{GameplayMode, VocabRecord};
use crate::error::{QuizError, Result};
use crate::grading::{evaluate, GradingMode};
use crate::pinyin::{to_pinyin_diacritics, word_pinyin};
use crate::protocol::*;
use crate::session::{Phase, QuizSession, SubmitOutcome};
use crate::shared_chars::{find_shared_char, LookupFilter, SharedCharacterIndex};
use crate::state::AppState;
use crate::util::{single_char, trunc_for_log};

/// How many example words are listed per component in feedback.
const N_EXAMPLES_SHOW: usize = 5;
/// Characters offered for shared-character review need at least this many words.
const DEFAULT_MIN_WORDS: usize = 10;

#[instrument(level = "info", skip(state))]
pub async fn create_session(state: &AppState, seed: Option<u64>) -> Result<SessionOut> {
  let id = state.create_session(seed).await;
  get_session(state, &id).await
}

#[instrument(level = "info", skip(state, opts), fields(%session_id))]
pub async fn start_session(state: &AppState, session_id: &str, opts: StartIn) -> Result<SessionOut> {
  let gameplay: GameplayMode = match opts.gameplay.as_deref() {
    Some(g) => g.parse()?,
    None => GameplayMode::default(),
  };
  if gameplay == GameplayMode::ReviewShared {
    return Err(QuizError::Configuration(
      "review_shared has no deck; browse /api/v1/shared_options and /api/v1/shared/:character instead".into(),
    ));
  }
  let filters = opts.filters.unwrap_or_else(|| state.deck_defaults.filters_for(gameplay));
  let records = state.records.clone();

  state
    .with_session(session_id, |s| {
      let current = s.order();
      let order = DeckOrder {
        seed: opts.seed.unwrap_or(current.seed),
        starting_index: opts.starting_index.unwrap_or(current.starting_index),
      };
      s.set_order(order);
      let deck = deck::build(&records, &filters, order);
      if deck.is_empty() {
        warn!(target: "quiz", %session_id, "Filters left no words; game is over before it starts");
      }
      s.start(deck, gameplay);
    })
    .await?;

  get_session(state, session_id).await
}

#[instrument(level = "info", skip(state, guess), fields(%session_id, guess = %trunc_for_log(guess, 40)))]
pub async fn submit_guess(state: &AppState, session_id: &str, guess: &str) -> Result<SessionOut> {
  let outcome = state.with_session(session_id, |s| s.submit(guess)).await?;
  match outcome {
    SubmitOutcome::Graded(v) => info!(target: "quiz", %session_id, correct = v.correct, "Guess submitted"),
    SubmitOutcome::Ignored => debug!(target: "quiz", %session_id, "Submit ignored (not awaiting an answer)"),
  }
  get_session(state, session_id).await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn skip_word(state: &AppState, session_id: &str) -> Result<SessionOut> {
  let moved = state.with_session(session_id, QuizSession::skip).await?;
  debug!(target: "quiz", %session_id, moved, "Skip");
  get_session(state, session_id).await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn next_word(state: &AppState, session_id: &str) -> Result<SessionOut> {
  let moved = state.with_session(session_id, QuizSession::next).await?;
  debug!(target: "quiz", %session_id, moved, "Next");
  get_session(state, session_id).await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn correct_wrongly_marked(state: &AppState, session_id: &str) -> Result<SessionOut> {
  let applied = state.with_session(session_id, QuizSession::correct_wrongly_marked).await?;
  debug!(target: "quiz", %session_id, applied, "Wrongly-marked correction");
  get_session(state, session_id).await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn restart_session(state: &AppState, session_id: &str) -> Result<SessionOut> {
  state.with_session(session_id, QuizSession::restart).await?;
  get_session(state, session_id).await
}

pub async fn get_session(state: &AppState, session_id: &str) -> Result<SessionOut> {
  let index = state.index.clone();
  state
    .with_session(session_id, |s| snapshot(session_id, s, &index))
    .await
}

/// Render the player-facing view of a session.
pub fn snapshot(id: &str, s: &QuizSession, index: &SharedCharacterIndex) -> SessionOut {
  let order = s.order();
  let mut out = SessionOut {
    id: id.to_string(),
    phase: s.phase(),
    gameplay: s.gameplay(),
    gameplay_label: s.gameplay().label(),
    position: s.position(),
    deck_len: s.deck_len(),
    score: s.score(),
    seed: order.seed,
    starting_index: order.starting_index,
    prompt: None,
    feedback: None,
    summary: None,
  };

  match (s.phase(), s.current()) {
    (Phase::AwaitingAnswer, Some(rec)) => {
      out.prompt = Some(prompt_for(s.gameplay(), rec, s.position(), s.deck_len()));
    }
    (Phase::Submitted, Some(rec)) => {
      let verdict = s.last_verdict();
      out.feedback = Some(FeedbackOut {
        correct: verdict.map(|v| v.correct),
        guess: s.guess().map(str::to_string),
        matched: verdict.and_then(|v| v.matched.clone()),
        record: RecordOut::from(rec),
        components: component_breakdown(rec, index),
      });
    }
    (Phase::Finished, _) => {
      out.summary = Some(SummaryOut {
        message: "No words remaining".into(),
        final_score: s.gameplay().is_graded().then(|| s.score()),
      });
    }
    _ => {}
  }
  out
}

fn prompt_for(mode: GameplayMode, rec: &VocabRecord, position: usize, deck_len: usize) -> PromptOut {
  let number = position + 1;
  match mode {
    GameplayMode::Hard => PromptOut {
      number,
      question: format!("Chinese translation of '{}' ({number} / {deck_len})", rec.english_joined()),
      chinese: None,
      pinyin: None,
      english: Some(rec.english_joined()),
      components: vec![],
    },
    _ => PromptOut {
      number,
      question: format!("English translation of {} ({}) ({number} / {deck_len})", rec.chinese, rec.pinyin),
      chinese: Some(rec.chinese.clone()),
      pinyin: Some(rec.pinyin.clone()),
      english: None,
      components: if mode.exposes_components() {
        rec
          .components
          .iter()
          .map(|c| ComponentHint { chinese: c.chinese.clone(), english: c.english.clone() })
          .collect()
      } else {
        vec![]
      },
    },
  }
}

/// Per component: bridge character and other words sharing it.
pub fn component_breakdown(rec: &VocabRecord, index: &SharedCharacterIndex) -> Vec<ComponentOut> {
  rec
    .components
    .iter()
    .map(|c| {
      let base = ComponentOut {
        chinese: c.chinese.clone(),
        english: c.english.clone(),
        pinyin: word_pinyin(&c.chinese),
        shared_char: None,
        n_other_words: 0,
        examples: vec![],
        problem: None,
      };
      match find_shared_char(&c.chinese, &rec.chinese) {
        Ok(ch) => {
          let filter = LookupFilter {
            exclude: vec![c.chinese.clone(), rec.chinese.clone()],
            exclude_character: true,
            require_pinyin: true,
            words_only: false,
          };
          let others = index.lookup_filtered(ch, &filter);
          ComponentOut {
            shared_char: Some(ch.to_string()),
            n_other_words: others.len(),
            examples: others.iter().take(N_EXAMPLES_SHOW).map(|e| WordOut::from(*e)).collect(),
            ..base
          }
        }
        Err(e) => {
          warn!(target: "vocab", id = rec.id, component = %c.chinese, error = %e, "Component shares no character with its combo word");
          ComponentOut { problem: Some(e.to_string()), ..base }
        }
      }
    })
    .collect()
}

#[instrument(level = "info", skip(state, exclude))]
pub fn shared_words(state: &AppState, character: &str, include_phrases: bool, exclude: Vec<String>) -> Result<SharedWordsOut> {
  let ch = single_char(character)
    .ok_or_else(|| QuizError::InvalidInput(format!("expected a single character, got '{character}'")))?;
  let filter = LookupFilter {
    exclude,
    exclude_character: false,
    require_pinyin: false,
    words_only: !include_phrases,
  };
  let words: Vec<WordOut> = state.index.lookup_filtered(ch, &filter).into_iter().map(WordOut::from).collect();
  Ok(SharedWordsOut { character: ch.to_string(), n_words: words.len(), words })
}

pub fn shared_options(state: &AppState, min_words: Option<usize>) -> SharedOptionsOut {
  SharedOptionsOut {
    options: state.index.prolific_characters(min_words.unwrap_or(DEFAULT_MIN_WORDS)),
  }
}

#[instrument(level = "debug", skip(req), fields(n_accepted = req.accepted.len()))]
pub fn grade_adhoc(req: &GradeIn) -> Result<GradeOut> {
  let mode: GradingMode = match req.mode.as_deref() {
    Some(m) => m.parse()?,
    None => GradingMode::default(),
  };
  let v = evaluate(&req.guess, &req.accepted, mode);
  Ok(GradeOut { correct: v.correct, matched: v.matched })
}

pub fn do_pinyin(text: &str) -> String {
  to_pinyin_diacritics(text)
}
