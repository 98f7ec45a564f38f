use axum::{
    Json,
    extract::{Path, Query, State},
};
use rendezvous_core::models::{Booking, BookingSummary};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    #[serde(default)]
    pub phone: String,
}

#[axum::debug_handler]
pub async fn search_by_phone(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PhoneQuery>,
) -> Result<Json<Vec<BookingSummary>>, AppError> {
    Ok(Json(state.service.search_by_phone(&query.phone).await?))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.service.cancel(id).await?))
}
