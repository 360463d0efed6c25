use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn department_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/{department_id}",
            get(handlers::get_department)
                .put(handlers::update_department)
                .delete(handlers::delete_department),
        )
        .route("/{department_id}/doctors", get(handlers::list_department_doctors))
        .with_state(state)
}

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::create_doctor))
        .route(
            "/{doctor_id}",
            get(handlers::get_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::delete_doctor),
        )
        .with_state(state)
}

pub fn nurse_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_nurses).post(handlers::create_nurse))
        .route(
            "/{nurse_id}",
            get(handlers::get_nurse)
                .put(handlers::update_nurse)
                .delete(handlers::delete_nurse),
        )
        .with_state(state)
}
