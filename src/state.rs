//! Application state: vocabulary, shared-character index, deck defaults, and per-user sessions.
//!
//! The vocabulary and index are built once at startup and shared read-only.
//! Each quiz session is an independent `QuizSession` value keyed by id; the
//! lock only guards the map, never state shared between sessions.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_app_config_from_env, AppConfig, DeckDefaults};
use crate::deck::DeckOrder;
use crate::domain::VocabRecord;
use crate::error::{QuizError, Result};
use crate::grading::GradingMode;
use crate::seeds::seed_vocab;
use crate::session::{QuizSession, MAX_RANDOM_SEED};
use crate::shared_chars::SharedCharacterIndex;
use crate::vocab::{load_vocab_file, records_from_rows};

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<Vec<VocabRecord>>,
    pub index: Arc<SharedCharacterIndex>,
    pub deck_defaults: DeckDefaults,
    pub english_policy: GradingMode,
    pub sessions: Arc<RwLock<HashMap<String, QuizSession>>>,
}

impl AppState {
    /// Build state from env: load config, resolve vocabulary, build the index.
    /// An unsupported grading policy is fatal.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self> {
        let cfg = load_app_config_from_env().unwrap_or_default();
        let records = resolve_vocab(&cfg);
        Self::from_parts(&cfg, records)
    }

    pub fn from_parts(cfg: &AppConfig, records: Vec<VocabRecord>) -> Result<Self> {
        let english_policy = cfg.english_policy().map_err(|e| {
            error!(target: "combo_words", error = %e, "Invalid grading configuration");
            e
        })?;

        let index = SharedCharacterIndex::build(&records);
        info!(
            target: "combo_words",
            n_records = records.len(),
            n_indexed_words = index.word_count(),
            ?english_policy,
            "Vocabulary ready"
        );

        Ok(Self {
            records: Arc::new(records),
            index: Arc::new(index),
            deck_defaults: cfg.deck.clone(),
            english_policy,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Register a new, not yet started session. Without a seed, one is drawn at random.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self, seed: Option<u64>) -> String {
        use rand::Rng;
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..MAX_RANDOM_SEED));
        let id = Uuid::new_v4().to_string();
        let session = QuizSession::new(DeckOrder { seed, starting_index: 0 }, self.english_policy);
        self.sessions.write().await.insert(id.clone(), session);
        info!(target: "quiz", %id, seed, "Session created");
        id
    }

    /// Run one transition against a session under the map's write lock.
    pub async fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut QuizSession) -> R) -> Result<R> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(s) => Ok(f(s)),
            None => {
                warn!(target: "quiz", %id, "Unknown session");
                Err(QuizError::UnknownSession(id.to_string()))
            }
        }
    }
}

/// Vocabulary file first, then inline config rows, then built-in seeds.
fn resolve_vocab(cfg: &AppConfig) -> Vec<VocabRecord> {
    let mut records = Vec::new();

    if let Some(path) = &cfg.vocab_path {
        match load_vocab_file(path) {
            Ok(recs) => {
                info!(target: "vocab", %path, n = recs.len(), "Loaded vocabulary file");
                records = recs;
            }
            Err(e) => {
                error!(target: "vocab", %path, error = %e, "Vocabulary file unusable; falling back");
            }
        }
    }

    if records.is_empty() && !cfg.vocab.is_empty() {
        records = records_from_rows(cfg.vocab.clone());
    }

    if records.is_empty() {
        warn!(target: "vocab", "No vocabulary configured; using built-in seeds");
        records = seed_vocab();
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_vocab_falls_back_to_seeds() {
        let cfg = AppConfig {
            vocab_path: Some("/missing/vocab.toml".into()),
            ..Default::default()
        };
        assert_eq!(resolve_vocab(&cfg).len(), seed_vocab().len());
    }

    #[test]
    fn test_bad_policy_is_fatal() {
        let mut cfg = AppConfig::default();
        cfg.grading.english = "telepathy".into();
        assert!(matches!(AppState::from_parts(&cfg, seed_vocab()), Err(QuizError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let state = AppState::from_parts(&AppConfig::default(), seed_vocab()).unwrap();
        let a = state.create_session(Some(1)).await;
        let b = state.create_session(Some(2)).await;
        assert_ne!(a, b);
        let seed_a = state.with_session(&a, |s| s.order().seed).await.unwrap();
        let seed_b = state.with_session(&b, |s| s.order().seed).await.unwrap();
        assert_eq!((seed_a, seed_b), (1, 2));
        assert!(matches!(
            state.with_session("nope", |_| ()).await,
            Err(QuizError::UnknownSession(_))
        ));
    }
}
