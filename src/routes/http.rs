//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::Result;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, n_records: state.records.len() })
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_create_session(
  State(state): State<Arc<AppState>>,
  body: Option<Json<NewSessionIn>>,
) -> Result<Json<SessionOut>> {
  let seed = body.and_then(|Json(b)| b.seed);
  let out = create_session(&state, seed).await?;
  info!(target: "quiz", id = %out.id, seed = out.seed, "HTTP session created");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(%id))]
pub async fn http_start_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  body: Option<Json<StartIn>>,
) -> Result<Json<SessionOut>> {
  let opts = body.map(|Json(b)| b).unwrap_or_default();
  let out = start_session(&state, &id, opts).await?;
  info!(target: "quiz", %id, deck_len = out.deck_len, gameplay = ?out.gameplay, "HTTP game started");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>> {
  Ok(Json(get_session(&state, &id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%id, guess_len = body.guess.len()))]
pub async fn http_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<GuessIn>,
) -> Result<Json<SessionOut>> {
  let out = submit_guess(&state, &id, &body.guess).await?;
  info!(target: "quiz", %id, correct = ?out.feedback.as_ref().and_then(|f| f.correct), "HTTP guess evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_skip(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<SessionOut>> {
  Ok(Json(skip_word(&state, &id).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_next(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<SessionOut>> {
  Ok(Json(next_word(&state, &id).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_correct(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<SessionOut>> {
  Ok(Json(correct_wrongly_marked(&state, &id).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_restart(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<SessionOut>> {
  Ok(Json(restart_session(&state, &id).await?))
}

#[instrument(level = "info", skip(body), fields(n_accepted = body.accepted.len()))]
pub async fn http_grade(Json(body): Json<GradeIn>) -> Result<Json<GradeOut>> {
  Ok(Json(grade_adhoc(&body)?))
}

#[instrument(level = "info", skip(state, q), fields(%character))]
pub async fn http_shared_words(
  State(state): State<Arc<AppState>>,
  Path(character): Path<String>,
  Query(q): Query<SharedWordsQuery>,
) -> Result<Json<SharedWordsOut>> {
  let exclude: Vec<String> = q
    .exclude
    .as_deref()
    .map(|s| s.split(',').map(str::trim).filter(|x| !x.is_empty()).map(str::to_string).collect())
    .unwrap_or_default();
  let out = shared_words(&state, &character, q.include_phrases, exclude)?;
  info!(target: "quiz", %character, n_words = out.n_words, "HTTP shared words served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, q))]
pub async fn http_shared_options(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SharedOptionsQuery>,
) -> impl IntoResponse {
  Json(shared_options(&state, q.min_words))
}

#[instrument(level = "info", skip(body), fields(text_len = body.text.len()))]
pub async fn http_post_pinyin(Json(body): Json<PinyinIn>) -> impl IntoResponse {
  let pinyin = do_pinyin(&body.text);
  Json(PinyinOut { pinyin })
}
