//! Administrative listing and creation of agencies, advisors and
//! appointment types.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use rendezvous_core::models::{
    Advisor, Agency, AppointmentType, BookingFilter, BookingSummary, CreateAdvisorRequest,
    CreateAgencyRequest, CreateAppointmentTypeRequest,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct AgencyQuery {
    pub name: Option<String>,
}

#[axum::debug_handler]
pub async fn list_agencies(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AgencyQuery>,
) -> Result<Json<Vec<Agency>>, AppError> {
    let name = query.name.filter(|name| !name.trim().is_empty());
    Ok(Json(state.service.store().list_agencies(name).await?))
}

#[axum::debug_handler]
pub async fn create_agency(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAgencyRequest>,
) -> Result<(StatusCode, Json<Agency>), AppError> {
    let agency = state.service.create_agency(payload).await?;
    Ok((StatusCode::CREATED, Json(agency)))
}

#[axum::debug_handler]
pub async fn create_advisor(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAdvisorRequest>,
) -> Result<(StatusCode, Json<Advisor>), AppError> {
    let advisor = state.service.create_advisor(payload).await?;
    Ok((StatusCode::CREATED, Json(advisor)))
}

#[axum::debug_handler]
pub async fn list_appointment_types(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<AppointmentType>>, AppError> {
    Ok(Json(state.service.store().list_appointment_types().await?))
}

#[axum::debug_handler]
pub async fn create_appointment_type(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentTypeRequest>,
) -> Result<(StatusCode, Json<AppointmentType>), AppError> {
    let kind = state.service.create_appointment_type(payload).await?;
    Ok((StatusCode::CREATED, Json(kind)))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<BookingSummary>>, AppError> {
    Ok(Json(state.service.list_bookings(&filter).await?))
}
