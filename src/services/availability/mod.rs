// Availability service
// Conflict rules for placing a booking on a table

use chrono::{NaiveDate, NaiveTime};

use crate::models::booking::Booking;
use crate::models::table::{compare_table_numbers, DiningTable};
use crate::utils::time::minutes_of_day;

/// Half-open interval overlap: touching endpoints never conflict.
pub fn intervals_overlap(start_a: i64, end_a: i64, start_b: i64, end_b: i64) -> bool {
    start_a < end_b && end_a > start_b
}

/// Whether `table` can host a booking of `duration_minutes` starting at
/// `time` on `date` for `party_size` guests.
///
/// Rules, in order: the table must be active and its capacity range must
/// include the party size (zero party size skips the capacity check), and
/// no existing booking on the same table and date may overlap the proposed
/// half-open interval. Total - never errors.
pub fn is_available(
    table: &DiningTable,
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
    party_size: u32,
    bookings: &[Booking],
) -> bool {
    if !table.is_active || !table.fits_party(party_size) {
        return false;
    }

    let new_start = minutes_of_day(time);
    let new_end = new_start + duration_minutes;

    !bookings.iter().any(|booking| {
        booking.table_number == table.number
            && booking.date == date
            && intervals_overlap(
                new_start,
                new_end,
                booking.start_minutes(),
                booking.end_minutes(),
            )
    })
}

/// Scan tables in numeric-aware label order and return the first that can
/// host the booking, or `None` when every table is taken or unsuitable.
pub fn find_first_available_table<'a>(
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
    party_size: u32,
    tables: &'a [DiningTable],
    bookings: &[Booking],
) -> Option<&'a DiningTable> {
    let mut ordered: Vec<&DiningTable> = tables.iter().collect();
    ordered.sort_by(|a, b| compare_table_numbers(&a.number, &b.number));

    ordered
        .into_iter()
        .find(|table| is_available(table, date, time, duration_minutes, party_size, bookings))
}

/// Probe 30-minute steps from `time` until some table is free, staying on
/// the same calendar day. Caller-side fallback for a fully booked slot.
pub fn first_slot_on_or_after<'a>(
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
    party_size: u32,
    tables: &'a [DiningTable],
    bookings: &[Booking],
) -> Option<(NaiveTime, &'a DiningTable)> {
    const STEP_MINUTES: i64 = 30;
    const DAY_MINUTES: i64 = 24 * 60;

    let mut candidate = minutes_of_day(time);
    while candidate + duration_minutes <= DAY_MINUTES {
        let slot = NaiveTime::from_hms_opt((candidate / 60) as u32, (candidate % 60) as u32, 0)?;
        if let Some(table) =
            find_first_available_table(date, slot, duration_minutes, party_size, tables, bookings)
        {
            return Some((slot, table));
        }
        candidate += STEP_MINUTES;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(number: &str, min: u32, max: u32) -> DiningTable {
        DiningTable {
            id: 0,
            number: number.to_string(),
            min_capacity: min,
            max_capacity: max,
            section: None,
            is_active: true,
        }
    }

    fn booking(table_number: &str, time: (u32, u32), duration: i64) -> Booking {
        Booking::builder()
            .id(1)
            .guest_name("Guest")
            .party_size(2)
            .table_number(table_number)
            .date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .time(NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap())
            .duration_minutes(duration)
            .build()
            .unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_overlap_half_open() {
        // [60, 120) vs [120, 180): touching, no conflict
        assert!(!intervals_overlap(60, 120, 120, 180));
        assert!(!intervals_overlap(120, 180, 60, 120));
        // [60, 121) vs [120, 180): one minute shared
        assert!(intervals_overlap(60, 121, 120, 180));
        // containment
        assert!(intervals_overlap(60, 180, 90, 120));
    }

    #[test]
    fn test_inactive_table_unavailable() {
        let mut t = table("1", 1, 4);
        t.is_active = false;
        assert!(!is_available(&t, date(), at(18, 0), 90, 2, &[]));
    }

    #[test]
    fn test_capacity_bounds() {
        let t = table("1", 2, 4);
        assert!(!is_available(&t, date(), at(18, 0), 90, 1, &[]));
        assert!(!is_available(&t, date(), at(18, 0), 90, 5, &[]));
        assert!(is_available(&t, date(), at(18, 0), 90, 4, &[]));
        // Unknown party size skips the capacity check
        assert!(is_available(&t, date(), at(18, 0), 90, 0, &[]));
    }

    #[test]
    fn test_conflict_same_table_same_date() {
        let t = table("4", 1, 6);
        let existing = vec![booking("4", (18, 0), 90)];
        assert!(!is_available(&t, date(), at(18, 30), 90, 2, &existing));
        // Touching end at 19:30 is fine
        assert!(is_available(&t, date(), at(19, 30), 90, 2, &existing));
        // A different table is unaffected
        let other = table("5", 1, 6);
        assert!(is_available(&other, date(), at(18, 30), 90, 2, &existing));
        // A different date is unaffected
        let next_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(is_available(&t, next_day, at(18, 30), 90, 2, &existing));
    }

    #[test]
    fn test_first_available_numeric_order() {
        let tables = vec![table("2", 1, 6), table("10", 1, 6), table("1", 1, 6)];
        // All free: the numerically first label wins, not lexicographic "1","10","2"
        let found =
            find_first_available_table(date(), at(18, 0), 90, 2, &tables, &[]).unwrap();
        assert_eq!(found.number, "1");

        // Occupy "1": the scan must fall through to "2", not "10"
        let existing = vec![booking("1", (18, 0), 120)];
        let found =
            find_first_available_table(date(), at(18, 0), 90, 2, &tables, &existing).unwrap();
        assert_eq!(found.number, "2");
    }

    #[test]
    fn test_first_available_none() {
        let tables = vec![table("1", 1, 2)];
        let existing = vec![booking("1", (18, 0), 120)];
        assert!(find_first_available_table(date(), at(18, 30), 60, 2, &tables, &existing).is_none());
        // Party too large for every table
        assert!(find_first_available_table(date(), at(12, 0), 60, 8, &tables, &[]).is_none());
    }

    #[test]
    fn test_fallback_probe_steps_forward() {
        let tables = vec![table("1", 1, 4)];
        let existing = vec![booking("1", (18, 0), 90)];
        // 18:00 and 18:30 conflict; 19:30 is the first free half-hour step
        let (slot, found) =
            first_slot_on_or_after(date(), at(18, 0), 60, 2, &tables, &existing).unwrap();
        assert_eq!(slot, at(19, 30));
        assert_eq!(found.number, "1");
    }

    #[test]
    fn test_fallback_probe_stays_on_day() {
        let tables = vec![table("1", 1, 4)];
        // A booking covering the rest of the day leaves nothing before midnight
        let existing = vec![booking("1", (10, 0), 14 * 60)];
        assert!(first_slot_on_or_after(date(), at(23, 30), 60, 2, &tables, &existing).is_none());
    }
}
