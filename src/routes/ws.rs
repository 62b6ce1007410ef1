//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::QuizError;
use crate::protocol::{ClientWsMessage, ServerWsMessage, SessionOut};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "combo_words", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "combo_words", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "combo_words", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "combo_words", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "combo_words", "WebSocket disconnected");
}

fn session_reply(res: Result<SessionOut, QuizError>) -> ServerWsMessage {
  match res {
    Ok(session) => ServerWsMessage::Session { session },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::NewSession { seed } => session_reply(create_session(state, seed).await),

    ClientWsMessage::Start { session_id, options } => {
      session_reply(start_session(state, &session_id, options).await)
    }

    ClientWsMessage::GetSession { session_id } => session_reply(get_session(state, &session_id).await),

    ClientWsMessage::Submit { session_id, guess } => {
      let res = submit_guess(state, &session_id, &guess).await;
      if let Ok(s) = &res {
        info!(target: "quiz", id = %session_id, correct = ?s.feedback.as_ref().and_then(|f| f.correct), "WS guess evaluated");
      }
      session_reply(res)
    }

    ClientWsMessage::Skip { session_id } => session_reply(skip_word(state, &session_id).await),
    ClientWsMessage::Next { session_id } => session_reply(next_word(state, &session_id).await),
    ClientWsMessage::CorrectWronglyMarked { session_id } => {
      session_reply(correct_wrongly_marked(state, &session_id).await)
    }
    ClientWsMessage::Restart { session_id } => session_reply(restart_session(state, &session_id).await),

    ClientWsMessage::Grade(req) => match grade_adhoc(&req) {
      Ok(out) => ServerWsMessage::Grade(out),
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::SharedWords { character, include_phrases } => {
      match shared_words(state, &character, include_phrases, vec![]) {
        Ok(out) => ServerWsMessage::SharedWords(out),
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::SharedOptions { min_words } => ServerWsMessage::SharedOptions(shared_options(state, min_words)),

    ClientWsMessage::PinyinInput { text } => {
      let pinyin = do_pinyin(&text);
      ServerWsMessage::Pinyin { text, pinyin }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::seeds::seed_vocab;
  use crate::session::Phase;

  fn parse(json: &str) -> ClientWsMessage {
    serde_json::from_str(json).unwrap()
  }

  #[tokio::test]
  async fn test_ws_session_flow() {
    let state = AppState::from_parts(&AppConfig::default(), seed_vocab()).unwrap();

    let id = match handle_client_ws(parse(r#"{"type":"new_session","seed":9}"#), &state).await {
      ServerWsMessage::Session { session } => session.id,
      other => panic!("unexpected reply: {:?}", other),
    };

    let start = format!(r#"{{"type":"start","sessionId":"{id}","gameplay":"medium","starting_index":2}}"#);
    match handle_client_ws(parse(&start), &state).await {
      ServerWsMessage::Session { session } => {
        assert_eq!(session.phase, Phase::AwaitingAnswer);
        assert_eq!(session.starting_index, 2);
      }
      other => panic!("unexpected reply: {:?}", other),
    }

    let skip = format!(r#"{{"type":"skip","sessionId":"{id}"}}"#);
    match handle_client_ws(parse(&skip), &state).await {
      ServerWsMessage::Session { session } => {
        assert_eq!(session.position, 1);
        assert_eq!(session.score.n_guess, 0);
      }
      other => panic!("unexpected reply: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_ws_unknown_session() {
    let state = AppState::from_parts(&AppConfig::default(), seed_vocab()).unwrap();
    let reply = handle_client_ws(parse(r#"{"type":"next","sessionId":"missing"}"#), &state).await;
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
  }

  #[tokio::test]
  async fn test_ws_grade() {
    let state = AppState::from_parts(&AppConfig::default(), seed_vocab()).unwrap();
    let msg = parse(r#"{"type":"grade","guess":"CATS","accepted":["cat"],"mode":"fuzzy"}"#);
    match handle_client_ws(msg, &state).await {
      ServerWsMessage::Grade(out) => assert!(out.correct),
      other => panic!("unexpected reply: {:?}", other),
    }
  }
}
