//! Handlers of the edit wizard. The booking being edited is kept in the
//! session's draft once `start_edit` has opened it.

use axum::{
    Json,
    extract::{Path, State},
};
use rendezvous_core::wizard::StepInput;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{error_handling::AppError, session::SessionId},
    service::EditView,
};

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: String,
}

#[axum::debug_handler]
pub async fn start_edit(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
    Path(id): Path<Uuid>,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.start_edit(&session, id).await?))
}

#[axum::debug_handler]
pub async fn get_edit(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.edit_view_for(&session).await?))
}

#[axum::debug_handler]
pub async fn verify(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.verify(&session, payload.code).await?))
}

#[axum::debug_handler]
pub async fn resend(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.resend(&session).await?))
}

#[axum::debug_handler]
pub async fn next(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
    Json(input): Json<StepInput>,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.edit_next(&session, input).await?))
}

#[axum::debug_handler]
pub async fn previous(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.edit_previous(&session).await?))
}

#[axum::debug_handler]
pub async fn edit_profile(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.edit_change_profile(&session).await?))
}

#[axum::debug_handler]
pub async fn edit_date(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.edit_change_date(&session).await?))
}

#[axum::debug_handler]
pub async fn submit(
    State(state): State<Arc<ApiState>>,
    SessionId(session): SessionId,
) -> Result<Json<EditView>, AppError> {
    Ok(Json(state.service.edit_submit(&session).await?))
}
