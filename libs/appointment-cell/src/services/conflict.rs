use chrono::NaiveDateTime;

use shared_config::BoundaryPolicy;
use shared_models::records::{Appointment, RecordId};

/// Overlap predicate for two intervals of the same doctor.
pub fn intervals_overlap(
    a_from: NaiveDateTime,
    a_to: NaiveDateTime,
    b_from: NaiveDateTime,
    b_to: NaiveDateTime,
    policy: BoundaryPolicy,
) -> bool {
    match policy {
        BoundaryPolicy::Closed => a_from <= b_to && b_from <= a_to,
        BoundaryPolicy::HalfOpen => a_from < b_to && b_from < a_to,
    }
}

/// Ids of the `existing` appointments that overlap `[from_time, to_time]`.
pub fn find_conflicts(
    existing: &[Appointment],
    from_time: NaiveDateTime,
    to_time: NaiveDateTime,
    policy: BoundaryPolicy,
) -> Vec<RecordId> {
    existing
        .iter()
        .filter(|appointment| {
            intervals_overlap(from_time, to_time, appointment.from_time, appointment.to_time, policy)
        })
        .map(|appointment| appointment.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn booked(id: RecordId, from: NaiveDateTime, to: NaiveDateTime) -> Appointment {
        Appointment {
            id,
            doctor_id: 1,
            patient_id: 1,
            from_time: from,
            to_time: to,
            notes: None,
        }
    }

    #[test]
    fn partial_overlap_conflicts_under_both_policies() {
        for policy in [BoundaryPolicy::Closed, BoundaryPolicy::HalfOpen] {
            assert!(intervals_overlap(at(9, 0), at(9, 30), at(9, 15), at(9, 45), policy));
            assert!(intervals_overlap(at(9, 15), at(9, 45), at(9, 0), at(9, 30), policy));
        }
    }

    #[test]
    fn containment_conflicts() {
        assert!(intervals_overlap(at(9, 0), at(10, 0), at(9, 15), at(9, 45), BoundaryPolicy::Closed));
        assert!(intervals_overlap(at(9, 15), at(9, 45), at(9, 0), at(10, 0), BoundaryPolicy::HalfOpen));
    }

    #[test]
    fn touching_boundary_depends_on_policy() {
        assert!(intervals_overlap(at(9, 0), at(9, 30), at(9, 30), at(10, 0), BoundaryPolicy::Closed));
        assert!(!intervals_overlap(at(9, 0), at(9, 30), at(9, 30), at(10, 0), BoundaryPolicy::HalfOpen));
    }

    #[test]
    fn disjoint_intervals_never_conflict() {
        for policy in [BoundaryPolicy::Closed, BoundaryPolicy::HalfOpen] {
            assert!(!intervals_overlap(at(9, 0), at(9, 30), at(9, 31), at(10, 0), policy));
            assert!(!intervals_overlap(at(11, 0), at(12, 0), at(9, 0), at(10, 0), policy));
        }
    }

    #[test]
    fn find_conflicts_reports_every_overlapping_booking() {
        let existing = vec![
            booked(1, at(8, 0), at(8, 30)),
            booked(2, at(9, 0), at(9, 30)),
            booked(3, at(9, 45), at(10, 15)),
            booked(4, at(11, 0), at(11, 30)),
        ];

        assert_eq!(
            find_conflicts(&existing, at(9, 15), at(10, 0), BoundaryPolicy::Closed),
            vec![2, 3]
        );
        assert_eq!(
            find_conflicts(&existing, at(8, 30), at(9, 0), BoundaryPolicy::Closed),
            vec![1, 2]
        );
        assert!(find_conflicts(&existing, at(8, 30), at(9, 0), BoundaryPolicy::HalfOpen).is_empty());
    }
}
