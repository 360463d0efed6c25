use std::collections::{HashSet, VecDeque};

use rusqlite::Connection;

use shared_database::repository::{appointment, department, doctor, patient};
use shared_database::DatabaseError;

use crate::models::{CascadeError, CascadeNode, CascadePlan};

fn node_exists(conn: &Connection, node: CascadeNode) -> Result<bool, DatabaseError> {
    let exists = match node {
        CascadeNode::Department(id) => department::get_department(conn, id)?.is_some(),
        CascadeNode::Doctor(id) => doctor::address_id_for_doctor(conn, id)?.is_some(),
        CascadeNode::Patient(id) => patient::address_id_for_patient(conn, id)?.is_some(),
        CascadeNode::Appointment(id) => appointment::get_appointment(conn, id)?.is_some(),
    };
    Ok(exists)
}

/// Direct dependents that must be deleted before `node`.
fn dependents(conn: &Connection, node: CascadeNode) -> Result<Vec<CascadeNode>, DatabaseError> {
    let children = match node {
        CascadeNode::Department(id) => doctor::doctor_ids_for_department(conn, id)?
            .into_iter()
            .map(CascadeNode::Doctor)
            .collect(),
        CascadeNode::Doctor(id) => appointment::appointment_ids_for_doctor(conn, id)?
            .into_iter()
            .map(CascadeNode::Appointment)
            .collect(),
        CascadeNode::Patient(id) => appointment::appointment_ids_for_patient(conn, id)?
            .into_iter()
            .map(CascadeNode::Appointment)
            .collect(),
        // Prescriptions and diagnostics are removed with their appointment.
        CascadeNode::Appointment(_) => Vec::new(),
    };
    Ok(children)
}

/// Breadth-first walk from `root` over the reference graph.
/// Run it inside the transaction that executes the plan.
pub fn plan_cascade(conn: &Connection, root: CascadeNode) -> Result<CascadePlan, CascadeError> {
    if !node_exists(conn, root)? {
        return Err(CascadeError::NotFound(root));
    }

    let mut nodes = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([root]);
    visited.insert(root);

    while let Some(node) = queue.pop_front() {
        nodes.push(node);
        for child in dependents(conn, node)? {
            if visited.insert(child) {
                queue.push_back(child);
            }
        }
    }

    Ok(CascadePlan { root, nodes })
}
