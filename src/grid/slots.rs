// Slot-click dispatch
// Turns an empty-cell click into either a caller callback or a handoff
// to the external booking-creation flow. No validation happens here;
// creation re-checks availability before persisting.

use chrono::{NaiveDate, NaiveTime};

use crate::utils::time::format_hhmm;

/// The slot the user clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSelection {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub table_number: String,
}

/// Wire-shaped payload for the external creation flow.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationHandoff {
    /// ISO-8601 calendar date, "YYYY-MM-DD"
    pub date: String,
    /// Minute-precision 24-hour time, "HH:MM"
    pub time: String,
    pub table: String,
}

impl From<&SlotSelection> for CreationHandoff {
    fn from(selection: &SlotSelection) -> Self {
        Self {
            date: selection.date.format("%Y-%m-%d").to_string(),
            time: format_hhmm(selection.time),
            table: selection.table_number.clone(),
        }
    }
}

pub type SlotCallback = Box<dyn FnMut(SlotSelection)>;

/// Routes empty-slot clicks.
///
/// With a callback installed (the grid embedded in a creation form), the
/// callback consumes the selection; otherwise the click becomes a
/// [`CreationHandoff`] for the caller to navigate with.
#[derive(Default)]
pub struct SlotDispatcher {
    callback: Option<SlotCallback>,
}

impl SlotDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: SlotCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn set_callback(&mut self, callback: Option<SlotCallback>) {
        self.callback = callback;
    }

    pub fn dispatch(&mut self, selection: SlotSelection) -> Option<CreationHandoff> {
        match self.callback.as_mut() {
            Some(callback) => {
                callback(selection);
                None
            }
            None => Some(CreationHandoff::from(&selection)),
        }
    }
}
