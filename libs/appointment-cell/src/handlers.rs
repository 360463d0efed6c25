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
use shared_models::records::{AppointmentDetails, DiagnosticDetails, PrescriptionDetails, RecordId};

use crate::models::{
    AppointmentError, AppointmentListQuery, ClinicalRecordError, ConflictCheckQuery, SchedulingOutcome,
};
use crate::services::clinical_records::ClinicalRecordService;
use crate::services::scheduling::AppointmentSchedulingService;

fn scheduling_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::NotFound(id) => AppError::NotFound(format!("Appointment {} not found", id)),
        AppointmentError::Storage(e) => AppError::Database(e.to_string()),
    }
}

fn clinical_record_error(e: ClinicalRecordError) -> AppError {
    match e {
        ClinicalRecordError::AppointmentNotFound(_)
        | ClinicalRecordError::PrescriptionNotFound(_)
        | ClinicalRecordError::DiagnosticNotFound(_) => AppError::NotFound(e.to_string()),
        ClinicalRecordError::PrescriptionExists(_) => AppError::Conflict(e.to_string()),
        ClinicalRecordError::ValidationError(msg) => AppError::ValidationError(msg),
        ClinicalRecordError::Storage(e) if e.is_constraint_violation() => AppError::Conflict(
            "Appointment already has a prescription".to_string(),
        ),
        ClinicalRecordError::Storage(e) => AppError::Database(e.to_string()),
    }
}

/// Reserved answers `success_status`; a conflict answers 409 with the ids it overlapped.
fn outcome_response(
    outcome: SchedulingOutcome,
    success_status: StatusCode,
    message: &str,
) -> (StatusCode, Json<Value>) {
    match outcome {
        SchedulingOutcome::Reserved { appointment_id } => (
            success_status,
            Json(json!({
                "success": true,
                "appointment_id": appointment_id,
                "message": message
            })),
        ),
        SchedulingOutcome::Conflict(conflict) => (
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "error": conflict.reason,
                "conflicting_appointment_ids": conflict.conflicting_appointment_ids
            })),
        ),
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let scheduling_service = AppointmentSchedulingService::new(&state);

    let appointments = scheduling_service
        .list_appointments(query)
        .await
        .map_err(scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "total": appointments.len(),
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<AppointmentDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let scheduling_service = AppointmentSchedulingService::new(&state);

    let outcome = scheduling_service
        .book_appointment(request)
        .await
        .map_err(scheduling_error)?;

    Ok(outcome_response(outcome, StatusCode::CREATED, "Appointment booked successfully"))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let scheduling_service = AppointmentSchedulingService::new(&state);

    let appointment = scheduling_service
        .get_appointment(appointment_id)
        .await
        .map_err(scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
    Json(request): Json<AppointmentDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let scheduling_service = AppointmentSchedulingService::new(&state);

    let outcome = scheduling_service
        .reschedule_appointment(appointment_id, request)
        .await
        .map_err(scheduling_error)?;

    Ok(outcome_response(outcome, StatusCode::OK, "Appointment updated successfully"))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let cascade_service = CascadeService::new(&state);

    let report = cascade_service.delete_appointment(appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "deleted": report,
        "message": "Appointment deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn check_appointment_conflicts(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ConflictCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let scheduling_service = AppointmentSchedulingService::new(&state);

    let result = scheduling_service
        .check_conflicts(query)
        .await
        .map_err(scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "has_conflict": result.has_conflict,
        "conflicting_appointment_ids": result.conflicting_appointment_ids
    })))
}

// ==============================================================================
// PRESCRIPTIONS & DIAGNOSTICS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_prescription(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let service = ClinicalRecordService::new(&state);

    let prescription = service
        .get_prescription(appointment_id)
        .await
        .map_err(clinical_record_error)?;

    Ok(Json(json!({
        "success": true,
        "prescription": prescription
    })))
}

#[axum::debug_handler]
pub async fn add_prescription(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
    Json(request): Json<PrescriptionDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ClinicalRecordService::new(&state);

    let prescription = service
        .add_prescription(appointment_id, request)
        .await
        .map_err(clinical_record_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "prescription": prescription
        })),
    ))
}

#[axum::debug_handler]
pub async fn delete_prescription(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let service = ClinicalRecordService::new(&state);

    service
        .delete_prescription(appointment_id)
        .await
        .map_err(clinical_record_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Prescription deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn list_diagnostics(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let service = ClinicalRecordService::new(&state);

    let diagnostics = service
        .list_diagnostics(appointment_id)
        .await
        .map_err(clinical_record_error)?;

    Ok(Json(json!({
        "success": true,
        "diagnostics": diagnostics
    })))
}

#[axum::debug_handler]
pub async fn add_diagnostic(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<RecordId>,
    Json(request): Json<DiagnosticDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ClinicalRecordService::new(&state);

    let diagnostic = service
        .add_diagnostic(appointment_id, request)
        .await
        .map_err(clinical_record_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "diagnostic": diagnostic
        })),
    ))
}

#[axum::debug_handler]
pub async fn delete_diagnostic(
    State(state): State<Arc<AppConfig>>,
    Path(diagnostic_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let service = ClinicalRecordService::new(&state);

    service
        .delete_diagnostic(diagnostic_id)
        .await
        .map_err(clinical_record_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Diagnostic deleted successfully"
    })))
}
