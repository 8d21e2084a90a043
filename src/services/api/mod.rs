// Booking API client
// JSON-over-HTTP collaborator for booking and table queries/mutations

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::models::booking::{hhmm, Booking};
use crate::models::pending::PendingChange;
use crate::models::table::DiningTable;

/// Partial update sent for one staged entry during apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingPatch {
    #[serde(with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl From<&PendingChange> for BookingPatch {
    fn from(change: &PendingChange) -> Self {
        Self {
            time: Some(change.time),
            table_number: Some(change.table_number.clone()),
            duration_minutes: Some(change.duration_minutes),
        }
    }
}

/// Request body for the external creation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub guest_name: String,
    pub phone: String,
    pub party_size: u32,
    pub table_number: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration_minutes: i64,
}

mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::Serializer;

    use crate::utils::time::format_hhmm;

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&format_hhmm(*t)),
            None => serializer.serialize_none(),
        }
    }
}

/// Errors from the booking backend, reported per call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Boundary contract for the booking/table collaborators.
///
/// The grid filters by date and table itself; no filtering is required of
/// the implementation.
pub trait BookingApi {
    fn list_bookings(&self) -> Result<Vec<Booking>, ApiError>;
    fn list_tables(&self, restaurant_id: Option<i64>) -> Result<Vec<DiningTable>, ApiError>;
    fn update_booking(&self, id: i64, patch: &BookingPatch) -> Result<Booking, ApiError>;
    fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, ApiError>;
}

/// reqwest-backed client speaking the backend's JSON protocol.
#[derive(Clone)]
pub struct HttpBookingApi {
    client: Client,
    base_url: String,
}

impl HttpBookingApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build booking API HTTP client")?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        response.json::<T>().map_err(ApiError::Decode)
    }
}

impl BookingApi for HttpBookingApi {
    fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let response = self.client.get(self.url("bookings")).send()?;
        Self::decode(response)
    }

    fn list_tables(&self, restaurant_id: Option<i64>) -> Result<Vec<DiningTable>, ApiError> {
        let mut request = self.client.get(self.url("tables"));
        if let Some(id) = restaurant_id {
            request = request.query(&[("restaurant", id)]);
        }
        let response = request.send()?;
        Self::decode(response)
    }

    fn update_booking(&self, id: i64, patch: &BookingPatch) -> Result<Booking, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("bookings/{id}")))
            .json(patch)
            .send()?;
        Self::decode(response)
    }

    fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, ApiError> {
        let response = self
            .client
            .post(self.url("bookings"))
            .json(request)
            .send()?;
        Self::decode(response)
    }
}

/// Outcome of one apply pass over the staged set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommitReport {
    pub applied: Vec<i64>,
    /// (booking id, error description) for entries that stay staged
    pub failed: Vec<(i64, String)>,
}

impl CommitReport {
    pub fn all_applied(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Issue one update per staged entry, collecting per-entry results.
///
/// Failures are recorded, never retried here; the caller leaves failed
/// entries staged so the user can apply again.
pub fn apply_changes(api: &dyn BookingApi, changes: &[PendingChange]) -> CommitReport {
    let mut report = CommitReport::default();
    for change in changes {
        let patch = BookingPatch::from(change);
        match api.update_booking(change.booking_id, &patch) {
            Ok(_) => {
                log::info!(
                    "Applied booking {} -> table {} at {}",
                    change.booking_id,
                    change.table_number,
                    change.time.format("%H:%M"),
                );
                report.applied.push(change.booking_id);
            }
            Err(err) => {
                log::error!("Failed to update booking {}: {}", change.booking_id, err);
                report.failed.push((change.booking_id, err.to_string()));
            }
        }
    }
    report
}
