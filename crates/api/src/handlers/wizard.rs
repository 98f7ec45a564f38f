use axum::{Json, extract::State, http::StatusCode};
use rendezvous_core::wizard::StepInput;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{error_handling::AppError, session::SessionId},
    service::BookingView,
};

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub id: Uuid,
}

#[axum::debug_handler]
pub async fn get_wizard(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<BookingView>, AppError> {
    Ok(Json(state.service.view(&session).await?))
}

#[axum::debug_handler]
pub async fn toggle(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<BookingView>, AppError> {
    Ok(Json(state.service.toggle(&session, payload.id).await?))
}

#[axum::debug_handler]
pub async fn next(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
    Json(input): Json<StepInput>,
) -> Result<Json<BookingView>, AppError> {
    Ok(Json(state.service.next(&session, input).await?))
}

#[axum::debug_handler]
pub async fn previous(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<BookingView>, AppError> {
    Ok(Json(state.service.previous(&session).await?))
}

#[axum::debug_handler]
pub async fn edit_profile(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<BookingView>, AppError> {
    Ok(Json(state.service.edit_profile(&session).await?))
}

#[axum::debug_handler]
pub async fn edit_date(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<BookingView>, AppError> {
    Ok(Json(state.service.edit_date(&session).await?))
}

#[axum::debug_handler]
pub async fn submit(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<(StatusCode, Json<BookingView>), AppError> {
    let view = state.service.submit(&session).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[axum::debug_handler]
pub async fn reset(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<StatusCode, AppError> {
    state.service.reset(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
