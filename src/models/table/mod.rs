// Table module
// Physical seating unit, fetched once per view session and immutable

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A physical table in the restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    /// Display label, alphanumeric ("1", "B1", "W1")
    pub number: String,
    pub min_capacity: u32,
    pub max_capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub is_active: bool,
}

impl DiningTable {
    /// Whether the capacity range [min, max] can host the party.
    ///
    /// A party size of zero means "unknown" and skips the check.
    pub fn fits_party(&self, party_size: u32) -> bool {
        party_size == 0 || (self.min_capacity <= party_size && party_size <= self.max_capacity)
    }
}

/// Numeric-aware ordering for table labels.
///
/// Runs of digits compare as numbers, everything else compares
/// case-insensitively char by char, so "2" < "10" and "B2" < "B10".
/// Display order and the first-available-table scan both use this.
pub fn compare_table_numbers(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let na = take_number(&mut ca);
                    let nb = take_number(&mut cb);
                    match na.cmp(&nb) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                let xl = x.to_ascii_lowercase();
                let yl = y.to_ascii_lowercase();
                match xl.cmp(&yl) {
                    Ordering::Equal => {
                        ca.next();
                        cb.next();
                    }
                    other => return other,
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut value: u64 = 0;
    while let Some(c) = chars.peek() {
        if let Some(digit) = c.to_digit(10) {
            value = value.saturating_mul(10).saturating_add(digit as u64);
            chars.next();
        } else {
            break;
        }
    }
    value
}

/// Sort tables in place by their numeric-aware label order.
pub fn sort_tables(tables: &mut [DiningTable]) {
    tables.sort_by(|a, b| compare_table_numbers(&a.number, &b.number));
}
