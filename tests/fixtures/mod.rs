// Test fixtures - reusable test data
// Provides consistent tables and bookings across the test files
#![allow(dead_code)] // each test binary uses a subset

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use table_plan::models::booking::{Booking, BookingStatus};
use table_plan::models::table::DiningTable;

/// The evening every scenario runs on
pub fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// 18:00 anchor on the service date
pub fn evening_anchor() -> NaiveDateTime {
    service_date().and_hms_opt(18, 0, 0).unwrap()
}

pub fn table(id: i64, number: &str, min: u32, max: u32) -> DiningTable {
    DiningTable {
        id,
        number: number.to_string(),
        min_capacity: min,
        max_capacity: max,
        section: None,
        is_active: true,
    }
}

/// The standard dining room: labels deliberately unsorted and mixing
/// plain numbers with lettered sections
pub fn dining_room() -> Vec<DiningTable> {
    vec![
        table(1, "2", 1, 4),
        table(2, "10", 2, 8),
        table(3, "1", 1, 2),
        table(4, "4", 2, 6),
        table(5, "B1", 2, 4),
    ]
}

pub fn booking(id: i64, table_number: &str, time: NaiveTime, duration_minutes: i64) -> Booking {
    Booking::builder()
        .id(id)
        .guest_name(format!("Guest {id}"))
        .phone("0400 000 000")
        .party_size(2)
        .table_number(table_number)
        .date(service_date())
        .time(time)
        .duration_minutes(duration_minutes)
        .status(BookingStatus::Confirmed)
        .build()
        .unwrap()
}

/// A typical Saturday evening: two seatings on table 4, one on B1
pub fn evening_bookings() -> Vec<Booking> {
    vec![
        booking(101, "4", at(18, 0), 90),
        booking(102, "4", at(20, 0), 120),
        booking(103, "B1", at(19, 0), 90),
    ]
}
