use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::{department_routes, doctor_routes, nurse_routes};
use patient_cell::router::create_patient_router;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/departments", department_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/nurses", nurse_routes(state.clone()))
        .nest("/patients", create_patient_router(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;
    use shared_utils::test_utils::{empty_request, response_json, TestDatabase};

    #[tokio::test]
    async fn liveness_route_answers() {
        let db = TestDatabase::new();
        let response = create_router(db.config.clone())
            .oneshot(empty_request("GET", "/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cells_are_nested_under_their_prefixes() {
        let db = TestDatabase::new();
        let app = create_router(db.config.clone());

        for uri in ["/departments", "/doctors", "/nurses", "/patients", "/appointments"] {
            let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
            assert_eq!(response_json(response).await["success"], true);
        }

        let response = app.oneshot(empty_request("GET", "/appointments/12")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
