use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use mockview::interview::{NextAction, Persona, Session};
use mockview::models::message::ConversationMessage;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
struct StartRequest {
    role: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct StartResponse {
    session_id: String,
    message: String,
    turn: u32,
}

#[derive(Debug, Deserialize, Serialize)]
struct ReplyRequest {
    session_id: String,
    answer: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct ReplyResponse {
    message: String,
    action: NextAction,
    persona: Persona,
    turn: u32,
    finished: bool,
}

#[derive(Debug, Deserialize, Serialize)]
struct TranscriptResponse {
    session_id: String,
    role: String,
    turn: u32,
    question_number: u32,
    persona: Option<Persona>,
    finished: bool,
    created_at: DateTime<Utc>,
    history: Vec<ConversationMessage>,
}

impl From<Session> for TranscriptResponse {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            role: session.role,
            turn: session.turn_count,
            question_number: session.question_index,
            persona: session.persona,
            finished: session.finished,
            created_at: session.created_at,
            history: session.history,
        }
    }
}

async fn start_interview(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    let (session, message) = state.interviewer.start(&request.role).await?;
    let response = StartResponse {
        session_id: session.id.clone(),
        message,
        turn: session.turn_count,
    };
    state.sessions.put(session);
    Ok(Json(response))
}

async fn reply(
    State(state): State<AppState>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let mut session = state
        .sessions
        .get(&request.session_id)
        .ok_or_else(|| ApiError::SessionNotFound(request.session_id.clone()))?;

    // the stored session only changes when the whole turn succeeds
    let turn = state
        .interviewer
        .respond(&mut session, &request.answer)
        .await?;
    state.sessions.put(session);

    Ok(Json(ReplyResponse {
        message: turn.message,
        action: turn.action,
        persona: turn.persona,
        turn: turn.turn,
        finished: turn.finished,
    }))
}

async fn transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    state
        .sessions
        .get(&session_id)
        .map(|session| Json(session.into()))
        .ok_or(ApiError::SessionNotFound(session_id))
}

async fn delete_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.delete(&session_id) {
        tracing::info!(session_id = %session_id, "interview deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(session_id))
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/interview/start", post(start_interview))
        .route("/interview/reply", post(reply))
        .route(
            "/interview/:session_id",
            get(transcript).delete(delete_interview),
        )
        .with_state(state)
}
