//! Room availability
//!
//! A candidate reservation is available unless an existing reservation for
//! the same hotel and room type has a stay overlapping it. Stays are half-open,
//! so a check-out and a check-in on the same day never conflict.

use crate::models::Reservation;

/// Whether two reservations compete for the same room on the same night
pub fn conflicts(candidate: &Reservation, existing: &Reservation) -> bool {
    candidate.same_room_pool(existing) && candidate.stay().overlaps(&existing.stay())
}

/// First existing reservation that blocks `candidate`, if any
pub fn find_conflict<'a>(
    candidate: &Reservation,
    existing: &'a [Reservation],
) -> Option<&'a Reservation> {
    existing.iter().find(|e| conflicts(candidate, e))
}

/// Whether `candidate` can be booked alongside `existing`
pub fn is_available(candidate: &Reservation, existing: &[Reservation]) -> bool {
    find_conflict(candidate, existing).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stay;

    fn booking(customer: &str, hotel: &str, room: &str, check_in: &str, check_out: &str) -> Reservation {
        Reservation::new(customer, hotel, room, Stay::parse(check_in, check_out).unwrap()).unwrap()
    }

    fn existing() -> Vec<Reservation> {
        vec![booking("John Doe", "Test Hotel", "101", "2024-02-20", "2024-02-25")]
    }

    #[test]
    fn test_back_to_back_is_available() {
        let after = booking("Jane Roe", "Test Hotel", "101", "2024-02-25", "2024-02-28");
        let before = booking("Jane Roe", "Test Hotel", "101", "2024-02-17", "2024-02-20");

        assert!(is_available(&after, &existing()));
        assert!(is_available(&before, &existing()));
    }

    #[test]
    fn test_inside_stay_conflicts() {
        let inside = booking("Jane Roe", "Test Hotel", "101", "2024-02-22", "2024-02-24");
        let bookings = existing();

        let conflict = find_conflict(&inside, &bookings).unwrap();
        assert_eq!(conflict.customer_name, "John Doe");
        assert!(!is_available(&inside, &bookings));
    }

    #[test]
    fn test_partial_overlaps_conflict() {
        let bookings = existing();

        let early = booking("Jane Roe", "Test Hotel", "101", "2024-02-18", "2024-02-21");
        let late = booking("Jane Roe", "Test Hotel", "101", "2024-02-24", "2024-03-01");
        let covering = booking("Jane Roe", "Test Hotel", "101", "2024-02-01", "2024-03-01");

        assert!(!is_available(&early, &bookings));
        assert!(!is_available(&late, &bookings));
        assert!(!is_available(&covering, &bookings));
    }

    #[test]
    fn test_other_room_type_is_independent() {
        let bookings = vec![booking("John Doe", "Test Hotel", "Single", "2024-02-20", "2024-02-25")];

        let suite = booking("Jane Roe", "Test Hotel", "Suite", "2024-02-21", "2024-02-23");
        let lowercase = booking("Jane Roe", "Test Hotel", "single", "2024-02-21", "2024-02-23");

        assert!(is_available(&suite, &bookings));
        assert!(is_available(&lowercase, &bookings));
    }

    #[test]
    fn test_other_hotel_is_independent() {
        let elsewhere = booking("Jane Roe", "Other Hotel", "101", "2024-02-20", "2024-02-25");
        assert!(is_available(&elsewhere, &existing()));
    }

    #[test]
    fn test_empty_collection_is_available() {
        let candidate = booking("Jane Roe", "Test Hotel", "101", "2024-02-20", "2024-02-25");
        assert!(is_available(&candidate, &[]));
    }

    #[test]
    fn test_first_conflict_is_reported() {
        let bookings = vec![
            booking("A", "Test Hotel", "101", "2024-01-01", "2024-01-05"),
            booking("B", "Test Hotel", "101", "2024-02-20", "2024-02-25"),
            booking("C", "Test Hotel", "101", "2024-02-25", "2024-03-02"),
        ];

        let candidate = booking("D", "Test Hotel", "101", "2024-02-24", "2024-02-27");
        assert_eq!(find_conflict(&candidate, &bookings).unwrap().customer_name, "B");
    }

    #[test]
    fn test_conflict_is_symmetric() {
        let dates = [
            ("2024-02-01", "2024-02-05"),
            ("2024-02-03", "2024-02-04"),
            ("2024-02-05", "2024-02-09"),
            ("2024-02-04", "2024-02-10"),
            ("2024-01-20", "2024-02-02"),
            ("2024-02-10", "2024-02-11"),
        ];

        for (a_in, a_out) in dates {
            for (b_in, b_out) in dates {
                let a = booking("A", "Test Hotel", "101", a_in, a_out);
                let b = booking("B", "Test Hotel", "101", b_in, b_out);
                assert_eq!(
                    conflicts(&a, &b),
                    conflicts(&b, &a),
                    "[{a_in}, {a_out}) vs [{b_in}, {b_out})"
                );
            }
        }
    }
}
