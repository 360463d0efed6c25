use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::book_appointment),
        )
        .route("/conflicts/check", get(handlers::check_appointment_conflicts))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        // Clinical records attached to an appointment
        .route(
            "/{appointment_id}/prescription",
            get(handlers::get_prescription)
                .post(handlers::add_prescription)
                .delete(handlers::delete_prescription),
        )
        .route(
            "/{appointment_id}/diagnostics",
            get(handlers::list_diagnostics).post(handlers::add_diagnostic),
        )
        .route("/diagnostics/{diagnostic_id}", delete(handlers::delete_diagnostic))
        .with_state(state)
}
