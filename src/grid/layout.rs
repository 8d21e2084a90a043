// Grid layout
// Pure pass from a snapshot + engine overlay to positioned blocks.
// No painting here; the egui view turns percentages into pixels.

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::grid::engine::EditEngine;
use crate::grid::window::{GridLine, ViewWindow, WINDOW_MINUTES};
use crate::grid::Snapshot;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::table::DiningTable;
use crate::services::availability::intervals_overlap;
use crate::utils::time::{format_hhmm, minutes_of_day};

/// A positioned booking block within one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingBlock {
    pub booking_id: i64,
    pub left_pct: f64,
    pub width_pct: f64,
    pub guest_name: String,
    /// "18:00 – 19:30"
    pub time_label: String,
    pub party_size: u32,
    pub status: BookingStatus,
    /// Has a staged, uncommitted change
    pub pending: bool,
    /// Is the live gesture preview
    pub preview: bool,
    /// Preview/pending placement overlaps another booking on this table
    pub conflicting: bool,
}

/// An invisible half-hour hit target for click-to-place.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCell {
    pub table_number: String,
    pub time: NaiveTime,
    pub left_pct: f64,
    pub width_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub table: DiningTable,
    pub blocks: Vec<BookingBlock>,
    pub slots: Vec<SlotCell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLayout {
    pub rows: Vec<TableRow>,
    pub lines: Vec<GridLine>,
    /// Pinned "now" position while live tracking
    pub now_pct: Option<f64>,
}

impl GridLayout {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Effective placement of a booking for display: staged change first,
/// then the live preview, then the raw booking.
fn effective_placement<'a>(
    booking: &'a Booking,
    engine: &'a EditEngine,
) -> (&'a str, NaiveTime, i64, bool, bool) {
    if let Some(change) = engine.pending().get(&booking.id) {
        let previewing = engine
            .preview()
            .is_some_and(|p| p.booking_id == booking.id);
        if !previewing {
            return (
                change.table_number.as_str(),
                change.time,
                change.duration_minutes,
                true,
                false,
            );
        }
    }
    if let Some(preview) = engine.preview().filter(|p| p.booking_id == booking.id) {
        return (
            preview.table_number.as_str(),
            preview.time,
            preview.duration_minutes,
            engine.pending().contains_key(&booking.id),
            true,
        );
    }
    (
        booking.table_number.as_str(),
        booking.time,
        booking.duration_minutes,
        false,
        false,
    )
}

/// Lay out every table row for the selected date.
///
/// Pure in all inputs; the caller owns the snapshot for the duration of
/// the pass. Tables come back in the snapshot's numeric-aware order, with
/// inactive tables still present so their historical bookings stay
/// visible. Slot cells are emitted only outside edit mode and only for
/// active tables.
pub fn layout(
    snapshot: &Snapshot,
    selected_date: NaiveDate,
    window: &ViewWindow,
    engine: &EditEngine,
) -> GridLayout {
    let mut rows = Vec::with_capacity(snapshot.tables.len());

    for table in &snapshot.tables {
        let mut blocks = Vec::new();

        for booking in &snapshot.bookings {
            if booking.date != selected_date {
                continue;
            }
            let (table_number, time, duration, pending, preview) =
                effective_placement(booking, engine);
            if table_number != table.number {
                continue;
            }

            let start = selected_date.and_time(time);
            let left_pct = window.time_to_percent(start);
            let width_pct = duration as f64 / WINDOW_MINUTES as f64 * 100.0;
            // Entirely off-screen blocks are skipped, not painted at 0 width
            if left_pct + width_pct <= 0.0 || left_pct >= 100.0 {
                continue;
            }

            let conflicting = (pending || preview)
                && has_conflict(booking.id, table_number, selected_date, time, duration, snapshot);

            let end = start + Duration::minutes(duration);
            blocks.push(BookingBlock {
                booking_id: booking.id,
                left_pct,
                width_pct,
                guest_name: booking.guest_name.clone(),
                time_label: format!("{} – {}", format_hhmm(time), format_hhmm(end.time())),
                party_size: booking.party_size,
                status: booking.status.clone(),
                pending,
                preview,
                conflicting,
            });
        }

        blocks.sort_by(|a, b| {
            a.left_pct
                .partial_cmp(&b.left_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let slots = if engine.edit_mode() || !table.is_active {
            Vec::new()
        } else {
            slot_cells(table, window)
        };

        rows.push(TableRow {
            table: table.clone(),
            blocks,
            slots,
        });
    }

    GridLayout {
        rows,
        lines: window.grid_lines(),
        now_pct: window.now_percent(),
    }
}

/// True when the placement overlaps any other booking shown on the same
/// table and date. Raw positions only: two previewed bookings cannot
/// exist at once, and staged positions still belong to their own row.
fn has_conflict(
    booking_id: i64,
    table_number: &str,
    date: NaiveDate,
    time: NaiveTime,
    duration: i64,
    snapshot: &Snapshot,
) -> bool {
    let start = minutes_of_day(time);
    let end = start + duration;
    snapshot.bookings.iter().any(|other| {
        other.id != booking_id
            && other.date == date
            && other.table_number == table_number
            && intervals_overlap(start, end, other.start_minutes(), other.end_minutes())
    })
}

/// Half-hour hit targets across the visible window of one row.
fn slot_cells(table: &DiningTable, window: &ViewWindow) -> Vec<SlotCell> {
    let slot_width = 30.0 / WINDOW_MINUTES as f64 * 100.0;
    window
        .grid_lines()
        .iter()
        .filter(|line| line.percent < 100.0)
        .map(|line| SlotCell {
            table_number: table.number.clone(),
            time: line.time.time(),
            left_pct: line.percent,
            width_pct: slot_width,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::grid::engine::{BlockRegion, GridEvent};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn anchor() -> NaiveDateTime {
        date().and_hms_opt(18, 0, 0).unwrap()
    }

    fn table(number: &str, active: bool) -> DiningTable {
        DiningTable {
            id: 0,
            number: number.to_string(),
            min_capacity: 1,
            max_capacity: 8,
            section: None,
            is_active: active,
        }
    }

    fn booking(id: i64, table_number: &str, time: NaiveTime, duration: i64) -> Booking {
        Booking::builder()
            .id(id)
            .guest_name(format!("Guest {id}"))
            .party_size(2)
            .table_number(table_number)
            .date(date())
            .time(time)
            .duration_minutes(duration)
            .build()
            .unwrap()
    }

    #[test]
    fn test_rows_follow_numeric_table_order() {
        let snapshot = Snapshot::new(
            vec![],
            vec![table("10", true), table("2", true), table("1", true)],
        );
        let grid = layout(
            &snapshot,
            date(),
            &ViewWindow::fixed(anchor()),
            &EditEngine::new(),
        );
        let order: Vec<&str> = grid.rows.iter().map(|r| r.table.number.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_block_position_and_payload() {
        let snapshot = Snapshot::new(
            vec![booking(1, "4", at(18, 0), 90)],
            vec![table("4", true)],
        );
        let window = ViewWindow::fixed(anchor());
        let grid = layout(&snapshot, date(), &window, &EditEngine::new());

        let row = &grid.rows[0];
        assert_eq!(row.blocks.len(), 1);
        let block = &row.blocks[0];
        // 18:00 in a 17:00-anchored window: one hour in
        assert!((block.left_pct - 60.0 / 420.0 * 100.0).abs() < 1e-9);
        assert!((block.width_pct - 90.0 / 420.0 * 100.0).abs() < 1e-9);
        assert_eq!(block.time_label, "18:00 – 19:30");
        assert_eq!(block.party_size, 2);
        assert!(!block.pending && !block.preview && !block.conflicting);
    }

    #[test]
    fn test_off_screen_and_other_date_blocks_skipped() {
        let mut other_day = booking(3, "4", at(18, 0), 90);
        other_day.date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let snapshot = Snapshot::new(
            vec![
                booking(1, "4", at(12, 0), 90),  // ends 13:30, before 17:00
                booking(2, "4", at(18, 0), 90),  // visible
                other_day,                        // wrong date
            ],
            vec![table("4", true)],
        );
        let window = ViewWindow::fixed(anchor());
        let grid = layout(&snapshot, date(), &window, &EditEngine::new());
        let ids: Vec<i64> = grid.rows[0].blocks.iter().map(|b| b.booking_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_partially_visible_block_kept() {
        // Starts before the window but overlaps its left edge
        let snapshot = Snapshot::new(
            vec![booking(1, "4", at(16, 30), 60)],
            vec![table("4", true)],
        );
        let grid = layout(
            &snapshot,
            date(),
            &ViewWindow::fixed(anchor()),
            &EditEngine::new(),
        );
        let block = &grid.rows[0].blocks[0];
        assert!(block.left_pct < 0.0);
        assert!(block.left_pct + block.width_pct > 0.0);
    }

    #[test]
    fn test_pending_change_moves_block_between_rows() {
        let snapshot = Snapshot::new(
            vec![booking(1, "4", at(18, 0), 90)],
            vec![table("4", true), table("5", true)],
        );
        let window = ViewWindow::fixed(anchor());
        let mut engine = EditEngine::new();
        engine.set_edit_mode(true);
        engine.dispatch(
            GridEvent::BlockPressed {
                booking_id: 1,
                region: BlockRegion::Body,
                grab_offset: 0.0,
            },
            &snapshot,
            &window,
        );
        engine.dispatch(
            GridEvent::PointerMoved {
                table_number: "5".to_string(),
                row_pct: window.time_to_percent(date().and_hms_opt(19, 0, 0).unwrap()),
            },
            &snapshot,
            &window,
        );
        engine.dispatch(
            GridEvent::RowClicked {
                table_number: "5".to_string(),
            },
            &snapshot,
            &window,
        );

        let grid = layout(&snapshot, date(), &window, &engine);
        assert!(grid.rows[0].blocks.is_empty());
        let block = &grid.rows[1].blocks[0];
        assert!(block.pending);
        assert_eq!(block.time_label, "19:00 – 20:30");
    }

    #[test]
    fn test_preview_overlap_flags_conflict() {
        let snapshot = Snapshot::new(
            vec![
                booking(1, "4", at(18, 0), 90),
                booking(2, "5", at(18, 0), 90),
            ],
            vec![table("4", true), table("5", true)],
        );
        let window = ViewWindow::fixed(anchor());
        let mut engine = EditEngine::new();
        engine.set_edit_mode(true);
        // Drag booking 1 onto table 5 at the occupied 18:00 slot
        engine.dispatch(
            GridEvent::BlockPressed {
                booking_id: 1,
                region: BlockRegion::Body,
                grab_offset: 0.0,
            },
            &snapshot,
            &window,
        );
        engine.dispatch(
            GridEvent::PointerMoved {
                table_number: "5".to_string(),
                row_pct: window.time_to_percent(anchor()),
            },
            &snapshot,
            &window,
        );

        let grid = layout(&snapshot, date(), &window, &engine);
        let preview_block = grid.rows[1]
            .blocks
            .iter()
            .find(|b| b.booking_id == 1)
            .unwrap();
        assert!(preview_block.preview);
        assert!(preview_block.conflicting);
        // The resident booking itself is not flagged
        let resident = grid.rows[1]
            .blocks
            .iter()
            .find(|b| b.booking_id == 2)
            .unwrap();
        assert!(!resident.conflicting);
    }

    #[test]
    fn test_slot_cells_only_outside_edit_mode_and_active_tables() {
        let snapshot = Snapshot::new(vec![], vec![table("4", true), table("9", false)]);
        let window = ViewWindow::fixed(anchor());

        let grid = layout(&snapshot, date(), &window, &EditEngine::new());
        assert!(!grid.rows[0].slots.is_empty());
        // 14 half-hour starts inside a 7-hour window
        assert_eq!(grid.rows[0].slots.len(), 14);
        // Inactive table: no placement targets
        assert!(grid.rows[1].slots.is_empty());

        let mut engine = EditEngine::new();
        engine.set_edit_mode(true);
        let grid = layout(&snapshot, date(), &window, &engine);
        assert!(grid.rows[0].slots.is_empty());
    }

    #[test]
    fn test_inactive_table_still_shows_bookings() {
        let snapshot = Snapshot::new(
            vec![booking(1, "9", at(18, 0), 90)],
            vec![table("9", false)],
        );
        let grid = layout(
            &snapshot,
            date(),
            &ViewWindow::fixed(anchor()),
            &EditEngine::new(),
        );
        assert_eq!(grid.rows[0].blocks.len(), 1);
    }

    #[test]
    fn test_empty_snapshot_has_no_rows() {
        let grid = layout(
            &Snapshot::default(),
            date(),
            &ViewWindow::fixed(anchor()),
            &EditEngine::new(),
        );
        assert!(grid.is_empty());
    }
}
