use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use cascade_cell::CascadeService;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::records::{PatientDetails, RecordId};

use crate::models::PatientSearchQuery;
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<PatientDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&config);

    let patient = service.create_patient(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "patient": patient
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patient = service.get_patient(patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "patient": patient
    })))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<RecordId>,
    Json(request): Json<PatientDetails>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patient = service.update_patient(patient_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "patient": patient
    })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let service = CascadeService::new(&config);

    let report = service.delete_patient(patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "deleted": report,
        "message": "Patient deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn search_patients(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patients = service.search_patients(query).await?;

    Ok(Json(json!({
        "success": true,
        "total": patients.len(),
        "patients": patients
    })))
}
