use rusqlite::{Connection, TransactionBehavior};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::repository::{address, appointment, department, diagnostic, doctor, nurse, patient, prescription};
use shared_database::{Database, DatabaseError};
use shared_models::records::RecordId;

use crate::models::{CascadeError, CascadeNode, CascadePlan, CascadeReport};
use crate::services::planner::plan_cascade;

fn delete_node(conn: &Connection, node: CascadeNode, report: &mut CascadeReport) -> Result<(), DatabaseError> {
    match node {
        CascadeNode::Appointment(id) => {
            report.prescriptions += prescription::delete_prescription_for_appointment(conn, id)?;
            report.diagnostics += diagnostic::delete_diagnostics_for_appointment(conn, id)?;
            report.appointments += appointment::delete_appointment(conn, id)?;
        }
        CascadeNode::Doctor(id) => {
            let address_id = doctor::address_id_for_doctor(conn, id)?;
            report.nurses_detached += nurse::detach_nurses_from_doctor(conn, id)?;
            report.doctors += doctor::delete_doctor(conn, id)?;
            if let Some(address_id) = address_id {
                report.addresses += address::delete_address(conn, address_id)?;
            }
        }
        CascadeNode::Patient(id) => {
            let address_id = patient::address_id_for_patient(conn, id)?;
            report.patients += patient::delete_patient(conn, id)?;
            if let Some(address_id) = address_id {
                report.addresses += address::delete_address(conn, address_id)?;
            }
        }
        CascadeNode::Department(id) => {
            report.departments += department::delete_department(conn, id)?;
        }
    }
    Ok(())
}

fn execute_plan(conn: &Connection, plan: &CascadePlan) -> Result<CascadeReport, DatabaseError> {
    let mut report = CascadeReport::default();
    for node in plan.execution_order() {
        delete_node(conn, *node, &mut report)?;
    }
    Ok(report)
}

/// Plan and execute the closure of `root` in one IMMEDIATE transaction.
/// Nothing is committed unless every step succeeds.
pub fn execute_cascade(conn: &mut Connection, root: CascadeNode) -> Result<CascadeReport, CascadeError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let plan = plan_cascade(&tx, root)?;

    let report = match execute_plan(&tx, &plan) {
        Ok(report) => report,
        Err(e) => {
            warn!("Cascade delete of {} rolled back: {}", root, e);
            return Err(CascadeError::Storage(e));
        }
    };
    tx.commit()?;

    info!(
        root = %root,
        nodes = plan.nodes.len(),
        appointments = report.appointments,
        prescriptions = report.prescriptions,
        diagnostics = report.diagnostics,
        doctors = report.doctors,
        nurses_detached = report.nurses_detached,
        "Cascade delete committed"
    );
    Ok(report)
}

pub fn delete_appointment_cascade(conn: &mut Connection, id: RecordId) -> Result<CascadeReport, CascadeError> {
    execute_cascade(conn, CascadeNode::Appointment(id))
}

pub fn delete_doctor_cascade(conn: &mut Connection, id: RecordId) -> Result<CascadeReport, CascadeError> {
    execute_cascade(conn, CascadeNode::Doctor(id))
}

pub fn delete_patient_cascade(conn: &mut Connection, id: RecordId) -> Result<CascadeReport, CascadeError> {
    execute_cascade(conn, CascadeNode::Patient(id))
}

pub fn delete_department_cascade(conn: &mut Connection, id: RecordId) -> Result<CascadeReport, CascadeError> {
    execute_cascade(conn, CascadeNode::Department(id))
}

/// Async entry point used by the request handlers.
pub struct CascadeService {
    database: Database,
}

impl CascadeService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            database: Database::new(config),
        }
    }

    pub async fn delete(&self, root: CascadeNode) -> Result<CascadeReport, CascadeError> {
        self.database
            .run(move |conn| execute_cascade(conn, root))
            .await
    }

    pub async fn delete_appointment(&self, id: RecordId) -> Result<CascadeReport, CascadeError> {
        self.delete(CascadeNode::Appointment(id)).await
    }

    pub async fn delete_doctor(&self, id: RecordId) -> Result<CascadeReport, CascadeError> {
        self.delete(CascadeNode::Doctor(id)).await
    }

    pub async fn delete_patient(&self, id: RecordId) -> Result<CascadeReport, CascadeError> {
        self.delete(CascadeNode::Patient(id)).await
    }

    pub async fn delete_department(&self, id: RecordId) -> Result<CascadeReport, CascadeError> {
        self.delete(CascadeNode::Department(id)).await
    }
}
