//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::deck::DeckFilters;
use crate::domain::{GameplayMode, VocabRecord, WordType};
use crate::session::{Phase, Score};
use crate::shared_chars::{CharacterCount, SharedCharacterEntry};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewSession {
        #[serde(default)]
        seed: Option<u64>,
    },
    Start {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(flatten)]
        options: StartIn,
    },
    GetSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Submit {
        #[serde(rename = "sessionId")]
        session_id: String,
        guess: String,
    },
    Skip {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Next {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    CorrectWronglyMarked {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Restart {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Grade(GradeIn),
    SharedWords {
        character: String,
        #[serde(default, rename = "includePhrases")]
        include_phrases: bool,
    },
    SharedOptions {
        #[serde(default, rename = "minWords")]
        min_words: Option<usize>,
    },
    PinyinInput {
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session { session: SessionOut },
    Grade(GradeOut),
    SharedWords(SharedWordsOut),
    SharedOptions(SharedOptionsOut),
    Pinyin { text: String, pinyin: String },
    Error { message: String },
}

//
// Session DTOs
//

#[derive(Debug, Default, Deserialize)]
pub struct NewSessionIn {
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Game options; anything omitted falls back to the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct StartIn {
    #[serde(default)]
    pub gameplay: Option<String>,
    #[serde(default)]
    pub filters: Option<DeckFilters>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub starting_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GuessIn {
    pub guess: String,
}

#[derive(Debug, Serialize)]
pub struct SessionOut {
    pub id: String,
    pub phase: Phase,
    pub gameplay: GameplayMode,
    pub gameplay_label: &'static str,
    /// Zero-based position in the deck.
    pub position: usize,
    pub deck_len: usize,
    pub score: Score,
    pub seed: u64,
    pub starting_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryOut>,
}

/// What the player sees before answering.
#[derive(Debug, Serialize)]
pub struct PromptOut {
    /// "Vocabulary # n / N"
    pub number: usize,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chinese: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    /// Only filled in modes that show the component words up front.
    pub components: Vec<ComponentHint>,
}

#[derive(Debug, Serialize)]
pub struct ComponentHint {
    pub chinese: String,
    pub english: String,
}

/// Revealed answer plus cross-references, shown after submission or in review.
#[derive(Debug, Serialize)]
pub struct FeedbackOut {
    /// None when nothing was graded (review modes).
    pub correct: Option<bool>,
    pub guess: Option<String>,
    pub matched: Option<String>,
    pub record: RecordOut,
    pub components: Vec<ComponentOut>,
}

#[derive(Debug, Serialize)]
pub struct RecordOut {
    pub id: u64,
    pub chinese: String,
    pub pinyin: String,
    pub english: Vec<String>,
    #[serde(rename = "type")]
    pub word_type: WordType,
    pub category: Option<String>,
    /// Ratings with unrated fields shown as the sheet's fallback value.
    pub priority: u32,
    pub known: u32,
    pub quality: u32,
}

impl From<&VocabRecord> for RecordOut {
    fn from(r: &VocabRecord) -> Self {
        Self {
            id: r.id,
            chinese: r.chinese.clone(),
            pinyin: r.pinyin.clone(),
            english: r.english.clone(),
            word_type: r.word_type,
            category: r.category.clone(),
            priority: r.priority_or_fallback(),
            known: r.known_or_fallback(),
            quality: r.quality_or_fallback(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ComponentOut {
    pub chinese: String,
    pub english: String,
    pub pinyin: Option<String>,
    /// Character bridging the component to its combo word.
    pub shared_char: Option<String>,
    pub n_other_words: usize,
    pub examples: Vec<WordOut>,
    /// Set when the component and combo word share no character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WordOut {
    pub chinese: String,
    pub pinyin: String,
    pub english: String,
    #[serde(rename = "type")]
    pub word_type: WordType,
}

impl From<&SharedCharacterEntry> for WordOut {
    fn from(e: &SharedCharacterEntry) -> Self {
        Self {
            chinese: e.chinese.clone(),
            pinyin: e.pinyin.clone(),
            english: e.english.clone(),
            word_type: e.word_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub message: String,
    /// Absent for review modes, which keep no score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<Score>,
}

//
// Grading / shared-character DTOs
//

#[derive(Debug, Deserialize)]
pub struct GradeIn {
    pub guess: String,
    pub accepted: Vec<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GradeOut {
    pub correct: bool,
    pub matched: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SharedWordsQuery {
    #[serde(default)]
    pub include_phrases: bool,
    /// Comma-separated Chinese forms to leave out.
    #[serde(default)]
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SharedWordsOut {
    pub character: String,
    pub n_words: usize,
    pub words: Vec<WordOut>,
}

#[derive(Debug, Deserialize)]
pub struct SharedOptionsQuery {
    #[serde(default)]
    pub min_words: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SharedOptionsOut {
    pub options: Vec<CharacterCount>,
}

#[derive(Deserialize)]
pub struct PinyinIn {
    pub text: String,
}
#[derive(Serialize)]
pub struct PinyinOut {
    pub pinyin: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub n_records: usize,
}
