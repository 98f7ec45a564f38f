use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/booking/wizard",
            get(handlers::wizard::get_wizard).delete(handlers::wizard::reset),
        )
        .route("/api/booking/wizard/toggle", post(handlers::wizard::toggle))
        .route("/api/booking/wizard/next", post(handlers::wizard::next))
        .route("/api/booking/wizard/previous", post(handlers::wizard::previous))
        .route(
            "/api/booking/wizard/edit-profile",
            post(handlers::wizard::edit_profile),
        )
        .route("/api/booking/wizard/edit-date", post(handlers::wizard::edit_date))
        .route("/api/booking/wizard/submit", post(handlers::wizard::submit))
}
