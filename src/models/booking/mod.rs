// Booking module
// Reservation model matching the backend's JSON wire format

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::utils::time::minutes_of_day;

/// Minimum booking length accepted at creation time, in minutes.
pub const MIN_CREATE_DURATION: i64 = 30;

/// Booking status labels.
///
/// The backend treats status as an open set of strings; the two labels the
/// grid styles specially are modelled explicitly, everything else passes
/// through as `Other` and gets the default styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    NewBooking,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::NewBooking => "new_booking",
            BookingStatus::Other(label) => label,
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(label: &str) -> Self {
        match label {
            "confirmed" => BookingStatus::Confirmed,
            "new_booking" => BookingStatus::NewBooking,
            other => BookingStatus::Other(other.to_string()),
        }
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(BookingStatus::from(label.as_str()))
    }
}

/// Serde adapter for the backend's minute-precision "HH:MM" time strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{format_hhmm, parse_hhmm};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hhmm(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid HH:MM time: {raw:?}")))
    }
}

/// A table reservation as served by the booking backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub guest_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub party_size: u32,
    /// Table label, alphanumeric ("1", "B1", "W1") - not necessarily numeric
    pub table_number: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration_minutes: i64,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_notes: Option<String>,
}

impl Booking {
    /// Create a builder for constructing bookings with optional fields
    pub fn builder() -> BookingBuilder {
        BookingBuilder::new()
    }

    /// Validate the booking
    pub fn validate(&self) -> Result<(), String> {
        if self.guest_name.trim().is_empty() {
            return Err("Guest name cannot be empty".to_string());
        }
        if self.party_size == 0 {
            return Err("Party size must be at least 1".to_string());
        }
        if self.table_number.trim().is_empty() {
            return Err("Table number cannot be empty".to_string());
        }
        if self.duration_minutes < MIN_CREATE_DURATION {
            return Err(format!(
                "Booking duration must be at least {} minutes",
                MIN_CREATE_DURATION
            ));
        }
        Ok(())
    }

    /// Start of the reservation, in minutes since midnight.
    pub fn start_minutes(&self) -> i64 {
        minutes_of_day(self.time)
    }

    /// End of the half-open reservation interval, in minutes since midnight.
    pub fn end_minutes(&self) -> i64 {
        self.start_minutes() + self.duration_minutes
    }
}

/// Builder for creating bookings with optional fields
pub struct BookingBuilder {
    id: i64,
    guest_name: Option<String>,
    phone: String,
    email: Option<String>,
    party_size: u32,
    table_number: Option<String>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    duration_minutes: i64,
    status: BookingStatus,
    special_request: Option<String>,
    dietary_notes: Option<String>,
}

impl BookingBuilder {
    pub fn new() -> Self {
        Self {
            id: 0,
            guest_name: None,
            phone: String::new(),
            email: None,
            party_size: 2,
            table_number: None,
            date: None,
            time: None,
            duration_minutes: 90,
            status: BookingStatus::NewBooking,
            special_request: None,
            dietary_notes: None,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn guest_name(mut self, name: impl Into<String>) -> Self {
        self.guest_name = Some(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn party_size(mut self, size: u32) -> Self {
        self.party_size = size;
        self
    }

    pub fn table_number(mut self, number: impl Into<String>) -> Self {
        self.table_number = Some(number.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn special_request(mut self, text: impl Into<String>) -> Self {
        self.special_request = Some(text.into());
        self
    }

    pub fn dietary_notes(mut self, text: impl Into<String>) -> Self {
        self.dietary_notes = Some(text.into());
        self
    }

    /// Build the booking
    pub fn build(self) -> Result<Booking, String> {
        let guest_name = self.guest_name.ok_or("Guest name is required")?;
        let table_number = self.table_number.ok_or("Table number is required")?;
        let date = self.date.ok_or("Booking date is required")?;
        let time = self.time.ok_or("Booking time is required")?;

        let booking = Booking {
            id: self.id,
            guest_name,
            phone: self.phone,
            email: self.email,
            party_size: self.party_size,
            table_number,
            date,
            time,
            duration_minutes: self.duration_minutes,
            status: self.status,
            special_request: self.special_request,
            dietary_notes: self.dietary_notes,
        };

        booking.validate()?;
        Ok(booking)
    }
}

impl Default for BookingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
