use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/bookings", get(handlers::admin::list_bookings))
        .route(
            "/api/admin/agencies",
            get(handlers::admin::list_agencies).post(handlers::admin::create_agency),
        )
        .route("/api/admin/advisors", post(handlers::admin::create_advisor))
        .route(
            "/api/admin/appointment-types",
            get(handlers::admin::list_appointment_types)
                .post(handlers::admin::create_appointment_type),
        )
}
