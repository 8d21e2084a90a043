// Booking grid core
// Pure time mapping, layout, availability-aware staging - no UI types here

pub mod engine;
pub mod layout;
pub mod slots;
pub mod window;

use crate::models::booking::Booking;
use crate::models::table::{sort_tables, DiningTable};

/// Immutable view of the fetched server state for one render pass.
///
/// A refetch replaces the snapshot wholesale and bumps the version; nothing
/// patches it in place.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub bookings: Vec<Booking>,
    pub tables: Vec<DiningTable>,
    pub version: u64,
}

impl Snapshot {
    pub fn new(bookings: Vec<Booking>, mut tables: Vec<DiningTable>) -> Self {
        sort_tables(&mut tables);
        Self {
            bookings,
            tables,
            version: 1,
        }
    }

    /// Swap in freshly fetched data, invalidating anything derived from
    /// the previous version.
    pub fn replace(&mut self, bookings: Vec<Booking>, mut tables: Vec<DiningTable>) {
        sort_tables(&mut tables);
        self.bookings = bookings;
        self.tables = tables;
        self.version += 1;
    }

    pub fn booking(&self, id: i64) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn table(&self, number: &str) -> Option<&DiningTable> {
        self.tables.iter().find(|t| t.number == number)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
