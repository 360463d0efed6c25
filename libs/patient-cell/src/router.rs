use std::sync::Arc;
use axum::{routing::get, Router};
use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_patient_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(search_patients).post(create_patient))
        .route(
            "/{id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .with_state(config)
}
