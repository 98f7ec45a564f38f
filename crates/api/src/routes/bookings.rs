use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings/search", get(handlers::bookings::search_by_phone))
        .route("/api/bookings/:id/cancel", post(handlers::bookings::cancel_booking))
        .route("/api/bookings/:id/edit", post(handlers::edit::start_edit))
        .route("/api/bookings/edit", get(handlers::edit::get_edit))
        .route("/api/bookings/edit/verify", post(handlers::edit::verify))
        .route("/api/bookings/edit/resend", post(handlers::edit::resend))
        .route("/api/bookings/edit/next", post(handlers::edit::next))
        .route("/api/bookings/edit/previous", post(handlers::edit::previous))
        .route("/api/bookings/edit/edit-profile", post(handlers::edit::edit_profile))
        .route("/api/bookings/edit/edit-date", post(handlers::edit::edit_date))
        .route("/api/bookings/edit/submit", post(handlers::edit::submit))
}
