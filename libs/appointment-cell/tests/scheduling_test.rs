use std::sync::{Arc, Barrier};
use std::thread;

use assert_matches::assert_matches;
use rusqlite::Connection;

use appointment_cell::services::scheduling::{check_conflicts, validate_and_reserve, AppointmentSchedulingService};
use appointment_cell::{AppointmentError, AppointmentListQuery, SchedulingOutcome, CONFLICT_REASON};
use shared_config::BoundaryPolicy;
use shared_database::repository::appointment;
use shared_database::{open_memory_database, DatabaseError};
use shared_models::records::{AppointmentDetails, RecordId};
use shared_utils::test_utils::{
    appointment_details, at, seed_appointment, seed_department, seed_doctor, seed_patient, TestConfig,
    TestDatabase,
};

struct Practice {
    doctor: RecordId,
    other_doctor: RecordId,
    patient: RecordId,
}

fn seed_practice(conn: &Connection) -> Practice {
    let department = seed_department(conn, "General");
    Practice {
        doctor: seed_doctor(conn, department, "Dr. A"),
        other_doctor: seed_doctor(conn, department, "Dr. B"),
        patient: seed_patient(conn, "Pat"),
    }
}

fn reserved_id(outcome: SchedulingOutcome) -> RecordId {
    match outcome {
        SchedulingOutcome::Reserved { appointment_id } => appointment_id,
        other => panic!("expected a reservation, got {other:?}"),
    }
}

#[test]
fn overlapping_booking_is_rejected_without_a_write() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    let existing = seed_appointment(&conn, p.doctor, p.patient, at(9, 0), at(9, 30));

    let outcome = validate_and_reserve(
        &mut conn,
        &appointment_details(p.doctor, p.patient, at(9, 15), at(9, 45)),
        None,
        BoundaryPolicy::Closed,
    )
    .unwrap();

    assert_matches!(
        outcome,
        SchedulingOutcome::Conflict(conflict)
            if conflict.reason == CONFLICT_REASON && conflict.conflicting_appointment_ids == vec![existing]
    );
    assert_eq!(appointment::list_appointments(&conn).unwrap().len(), 1);
}

#[test]
fn disjoint_booking_is_accepted() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    seed_appointment(&conn, p.doctor, p.patient, at(9, 0), at(9, 30));

    let outcome = validate_and_reserve(
        &mut conn,
        &appointment_details(p.doctor, p.patient, at(9, 31), at(10, 0)),
        None,
        BoundaryPolicy::Closed,
    )
    .unwrap();

    assert_matches!(outcome, SchedulingOutcome::Reserved { .. });
    assert_eq!(appointment::list_appointments(&conn).unwrap().len(), 2);
}

#[test]
fn other_doctors_bookings_do_not_conflict() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    seed_appointment(&conn, p.other_doctor, p.patient, at(9, 0), at(9, 30));

    let outcome = validate_and_reserve(
        &mut conn,
        &appointment_details(p.doctor, p.patient, at(9, 0), at(9, 30)),
        None,
        BoundaryPolicy::Closed,
    )
    .unwrap();
    assert_matches!(outcome, SchedulingOutcome::Reserved { .. });
}

#[test]
fn touching_boundary_is_a_conflict_under_the_closed_policy() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    seed_appointment(&conn, p.doctor, p.patient, at(9, 0), at(9, 30));

    let outcome = validate_and_reserve(
        &mut conn,
        &appointment_details(p.doctor, p.patient, at(9, 30), at(10, 0)),
        None,
        BoundaryPolicy::Closed,
    )
    .unwrap();
    assert_matches!(outcome, SchedulingOutcome::Conflict(_));
}

#[test]
fn touching_boundary_is_accepted_under_the_half_open_policy() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    seed_appointment(&conn, p.doctor, p.patient, at(9, 0), at(9, 30));

    let outcome = validate_and_reserve(
        &mut conn,
        &appointment_details(p.doctor, p.patient, at(9, 30), at(10, 0)),
        None,
        BoundaryPolicy::HalfOpen,
    )
    .unwrap();
    assert_matches!(outcome, SchedulingOutcome::Reserved { .. });
}

#[test]
fn editing_an_appointment_against_itself_succeeds() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    let id = seed_appointment(&conn, p.doctor, p.patient, at(9, 0), at(9, 30));

    let mut unchanged = appointment_details(p.doctor, p.patient, at(9, 0), at(9, 30));
    unchanged.notes = Some("bring lab results".into());
    let outcome = validate_and_reserve(&mut conn, &unchanged, Some(id), BoundaryPolicy::Closed).unwrap();

    assert_eq!(outcome, SchedulingOutcome::Reserved { appointment_id: id });
    let stored = appointment::get_appointment(&conn, id).unwrap().unwrap();
    assert_eq!(stored.notes.as_deref(), Some("bring lab results"));
}

#[test]
fn editing_into_another_booking_conflicts_and_keeps_the_existing_slot() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    let morning = seed_appointment(&conn, p.doctor, p.patient, at(9, 0), at(9, 30));
    let noon = seed_appointment(&conn, p.doctor, p.patient, at(12, 0), at(12, 30));

    let moved = appointment_details(p.doctor, p.patient, at(9, 15), at(9, 45));
    let outcome = validate_and_reserve(&mut conn, &moved, Some(noon), BoundaryPolicy::Closed).unwrap();

    assert_matches!(
        outcome,
        SchedulingOutcome::Conflict(conflict) if conflict.conflicting_appointment_ids == vec![morning]
    );
    let stored = appointment::get_appointment(&conn, noon).unwrap().unwrap();
    assert_eq!(stored.from_time, at(12, 0));
}

#[test]
fn editing_a_missing_appointment_is_not_found() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);

    let result = validate_and_reserve(
        &mut conn,
        &appointment_details(p.doctor, p.patient, at(9, 0), at(9, 30)),
        Some(404),
        BoundaryPolicy::Closed,
    );
    assert_matches!(result, Err(AppointmentError::NotFound(404)));
}

#[test]
fn empty_and_inverted_intervals_are_validation_errors() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);

    for (from, to) in [(at(9, 0), at(9, 0)), (at(10, 0), at(9, 0))] {
        let result = validate_and_reserve(
            &mut conn,
            &appointment_details(p.doctor, p.patient, from, to),
            None,
            BoundaryPolicy::Closed,
        );
        assert_matches!(result, Err(AppointmentError::ValidationError(_)));
    }
    assert!(appointment::list_appointments(&conn).unwrap().is_empty());
}

#[test]
fn unknown_patient_surfaces_as_a_storage_failure() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);

    let result = validate_and_reserve(
        &mut conn,
        &appointment_details(p.doctor, 999, at(9, 0), at(9, 30)),
        None,
        BoundaryPolicy::Closed,
    );
    assert_matches!(
        result,
        Err(AppointmentError::Storage(DatabaseError::ConstraintViolation(_)))
    );
}

#[test]
fn created_appointment_round_trips() {
    let mut conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    let details = AppointmentDetails {
        doctor_id: p.doctor,
        patient_id: p.patient,
        from_time: at(14, 0),
        to_time: at(14, 45),
        notes: Some("annual checkup".into()),
    };

    let id = reserved_id(validate_and_reserve(&mut conn, &details, None, BoundaryPolicy::Closed).unwrap());
    let stored = appointment::get_appointment(&conn, id).unwrap().unwrap();
    assert_eq!(stored.details(), details);
}

#[test]
fn conflict_check_does_not_write() {
    let conn = open_memory_database().unwrap();
    let p = seed_practice(&conn);
    let existing = seed_appointment(&conn, p.doctor, p.patient, at(9, 0), at(9, 30));

    let hits = check_conflicts(&conn, p.doctor, at(9, 0), at(10, 0), None, BoundaryPolicy::Closed).unwrap();
    assert_eq!(hits, vec![existing]);
    let excluded =
        check_conflicts(&conn, p.doctor, at(9, 0), at(10, 0), Some(existing), BoundaryPolicy::Closed).unwrap();
    assert!(excluded.is_empty());
    assert_eq!(appointment::list_appointments(&conn).unwrap().len(), 1);
}

#[test]
fn concurrent_overlapping_bookings_never_both_commit() {
    let db = TestDatabase::new();
    let p = seed_practice(&db.connection());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let database = db.database.clone();
            let barrier = Arc::clone(&barrier);
            let details = appointment_details(p.doctor, p.patient, at(9, i * 10), at(9, 30 + i * 10));
            thread::spawn(move || {
                let mut conn = database.open().unwrap();
                barrier.wait();
                validate_and_reserve(&mut conn, &details, None, BoundaryPolicy::Closed).unwrap()
            })
        })
        .collect();

    let outcomes: Vec<SchedulingOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let reserved = outcomes
        .iter()
        .filter(|o| matches!(o, SchedulingOutcome::Reserved { .. }))
        .count();

    assert_eq!(reserved, 1, "outcomes: {outcomes:?}");
    assert_eq!(db.count("appointments"), 1);
}

#[tokio::test]
async fn service_applies_the_configured_boundary_policy() {
    let db = TestDatabase::with_config(TestConfig::half_open());
    let p = seed_practice(&db.connection());
    let service = AppointmentSchedulingService::new(&db.config);

    let first = service
        .book_appointment(appointment_details(p.doctor, p.patient, at(9, 0), at(9, 30)))
        .await
        .unwrap();
    let second = service
        .book_appointment(appointment_details(p.doctor, p.patient, at(9, 30), at(10, 0)))
        .await
        .unwrap();
    assert_matches!(first, SchedulingOutcome::Reserved { .. });
    assert_matches!(second, SchedulingOutcome::Reserved { .. });

    let listed = service
        .list_appointments(AppointmentListQuery {
            doctor_id: Some(p.doctor),
            patient_id: None,
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].from_time < listed[1].from_time);
}
