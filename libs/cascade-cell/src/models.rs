use std::fmt;

use serde::Serialize;
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::records::RecordId;

/// A record whose deletion drags its dependents along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CascadeNode {
    Department(RecordId),
    Doctor(RecordId),
    Patient(RecordId),
    Appointment(RecordId),
}

impl CascadeNode {
    pub fn id(&self) -> RecordId {
        match *self {
            CascadeNode::Department(id)
            | CascadeNode::Doctor(id)
            | CascadeNode::Patient(id)
            | CascadeNode::Appointment(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CascadeNode::Department(_) => "department",
            CascadeNode::Doctor(_) => "doctor",
            CascadeNode::Patient(_) => "patient",
            CascadeNode::Appointment(_) => "appointment",
        }
    }
}

impl fmt::Display for CascadeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Nodes of one cascade closure in breadth-first discovery order. The root
/// comes first and every node precedes its dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    pub root: CascadeNode,
    pub nodes: Vec<CascadeNode>,
}

impl CascadePlan {
    /// Reverse discovery order: dependents before the records they reference.
    pub fn execution_order(&self) -> impl Iterator<Item = &CascadeNode> {
        self.nodes.iter().rev()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub prescriptions: usize,
    pub diagnostics: usize,
    pub appointments: usize,
    pub nurses_detached: usize,
    pub doctors: usize,
    pub patients: usize,
    pub departments: usize,
    pub addresses: usize,
}

impl CascadeReport {
    pub fn total_deleted(&self) -> usize {
        self.prescriptions
            + self.diagnostics
            + self.appointments
            + self.doctors
            + self.patients
            + self.departments
            + self.addresses
    }
}

#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("{0} not found")]
    NotFound(CascadeNode),

    #[error("Cascade rolled back: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<rusqlite::Error> for CascadeError {
    fn from(err: rusqlite::Error) -> Self {
        CascadeError::Storage(DatabaseError::from(err))
    }
}

impl From<CascadeError> for AppError {
    fn from(err: CascadeError) -> Self {
        match err {
            CascadeError::NotFound(node) => AppError::NotFound(format!("{} not found", node)),
            CascadeError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}
