//! HTTP handlers

use super::AppState;
use super::error::{ApiError, ApiResult};
use super::schema::{
    HealthResponse, NextTurnRequest, ReplyRequest, SessionResponse, TurnResponse,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use interview_application::NextTurnInput;
use interview_domain::SessionId;
use tracing::debug;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /v1/sessions`: new session with the greeting
pub async fn create_session(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<TurnResponse>)> {
    let output = state.interview.start(SessionId::generate()).await?;
    debug!(session = %output.session_id, "Session created");
    Ok((StatusCode::CREATED, Json(output.into())))
}

/// `GET /v1/sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session_id = SessionId::parse(id)?;
    let status = state.interview.status(session_id).await?;
    Ok(Json(status.into()))
}

/// `POST /v1/sessions/{id}/turns`
pub async fn post_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> ApiResult<Json<TurnResponse>> {
    let session_id = SessionId::parse(id)?;
    let Json(request) = payload?;
    request.validate(&state.limits)?;

    let output = state.interview.reply(session_id, &request.content).await?;
    Ok(Json(output.into()))
}

/// `POST /v1/interview/next-turn`: stateless, the caller owns the history
pub async fn next_turn(
    State(state): State<AppState>,
    payload: Result<Json<NextTurnRequest>, JsonRejection>,
) -> ApiResult<Json<TurnResponse>> {
    let Json(request) = payload?;
    let (session_id, history, stage) = request.into_parts(&state.limits)?;

    let output = state
        .turns
        .execute(NextTurnInput::new(session_id, history, stage))
        .await
        .map_err(ApiError::from)?;
    Ok(Json(output.into()))
}
