use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use cascade_cell::CascadeService;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::records::{DepartmentDetails, DoctorDetails, NurseDetails, RecordId};

use crate::services::{DepartmentService, DoctorService, NurseService};

// ==============================================================================
// DEPARTMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_departments(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let department_service = DepartmentService::new(&state);

    let departments = department_service.list_departments().await?;

    Ok(Json(json!({
        "success": true,
        "total": departments.len(),
        "departments": departments
    })))
}

#[axum::debug_handler]
pub async fn get_department(
    State(state): State<Arc<AppConfig>>,
    Path(department_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let department_service = DepartmentService::new(&state);

    let department = department_service.get_department(department_id).await?;

    Ok(Json(json!({
        "success": true,
        "department": department
    })))
}

#[axum::debug_handler]
pub async fn create_department(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<DepartmentDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let department_service = DepartmentService::new(&state);

    let department = department_service.create_department(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "department": department,
            "message": "Department created successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_department(
    State(state): State<Arc<AppConfig>>,
    Path(department_id): Path<RecordId>,
    Json(request): Json<DepartmentDetails>,
) -> Result<Json<Value>, AppError> {
    let department_service = DepartmentService::new(&state);

    let department = department_service.update_department(department_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "department": department,
        "message": "Department updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn delete_department(
    State(state): State<Arc<AppConfig>>,
    Path(department_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let cascade_service = CascadeService::new(&state);

    let report = cascade_service.delete_department(department_id).await?;

    Ok(Json(json!({
        "success": true,
        "deleted": report,
        "message": "Department deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn list_department_doctors(
    State(state): State<Arc<AppConfig>>,
    Path(department_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let department_service = DepartmentService::new(&state);

    let doctors = department_service.list_department_doctors(department_id).await?;

    Ok(Json(json!({
        "success": true,
        "department_id": department_id,
        "total": doctors.len(),
        "doctors": doctors
    })))
}

// ==============================================================================
// DOCTORS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "total": doctors.len(),
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<DoctorDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.create_doctor(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "doctor": doctor,
            "message": "Doctor created successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<RecordId>,
    Json(request): Json<DoctorDetails>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.update_doctor(doctor_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let cascade_service = CascadeService::new(&state);

    let report = cascade_service.delete_doctor(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "deleted": report,
        "message": "Doctor deleted successfully"
    })))
}

// ==============================================================================
// NURSES
// ==============================================================================

#[axum::debug_handler]
pub async fn list_nurses(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let nurse_service = NurseService::new(&state);

    let nurses = nurse_service.list_nurses().await?;

    Ok(Json(json!({
        "success": true,
        "total": nurses.len(),
        "nurses": nurses
    })))
}

#[axum::debug_handler]
pub async fn get_nurse(
    State(state): State<Arc<AppConfig>>,
    Path(nurse_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let nurse_service = NurseService::new(&state);

    let nurse = nurse_service.get_nurse(nurse_id).await?;

    Ok(Json(json!({
        "success": true,
        "nurse": nurse
    })))
}

#[axum::debug_handler]
pub async fn create_nurse(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<NurseDetails>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let nurse_service = NurseService::new(&state);

    let nurse = nurse_service.create_nurse(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "nurse": nurse,
            "message": "Nurse created successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_nurse(
    State(state): State<Arc<AppConfig>>,
    Path(nurse_id): Path<RecordId>,
    Json(request): Json<NurseDetails>,
) -> Result<Json<Value>, AppError> {
    let nurse_service = NurseService::new(&state);

    let nurse = nurse_service.update_nurse(nurse_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "nurse": nurse,
        "message": "Nurse updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn delete_nurse(
    State(state): State<Arc<AppConfig>>,
    Path(nurse_id): Path<RecordId>,
) -> Result<Json<Value>, AppError> {
    let nurse_service = NurseService::new(&state);

    nurse_service.delete_nurse(nurse_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Nurse deleted successfully"
    })))
}
