// Edit-staging engine
// Explicit state machine for the grid's move/resize gestures. All mutable
// interaction state lives here; the renderer reads it, the shell feeds it
// events, and only apply_all talks to the backend.

use std::collections::BTreeMap;

use chrono::NaiveTime;

use crate::grid::window::{snap_minutes, ViewWindow, SNAP_MINUTES};
use crate::grid::Snapshot;
use crate::models::booking::Booking;
use crate::models::pending::PendingChange;
use crate::services::api::{apply_changes, BookingApi, CommitReport};
use crate::utils::time::minutes_of_day;

/// Pixel band at each end of a rendered block that grabs as a resize
/// handle, independent of the time scale.
pub const EDGE_GRAB_PX: f32 = 16.0;
/// Resize duration bounds, in minutes.
pub const MIN_RESIZE_MINUTES: i64 = 60;
pub const MAX_RESIZE_MINUTES: i64 = 180;

/// Where a press landed on a block. The UI resolves the 16-px edge bands
/// in pixel space and reports the region here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRegion {
    Body,
    LeftEdge,
    RightEdge,
}

/// Pointer and keyboard input, already translated out of pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Press on a rendered block. `grab_offset` is the pointer's offset
    /// within the block as a fraction of the block's own width.
    BlockPressed {
        booking_id: i64,
        region: BlockRegion,
        grab_offset: f64,
    },
    /// Pointer travelling over a table row, at `row_pct` percent of the
    /// row's content width.
    PointerMoved { table_number: String, row_pct: f64 },
    /// Click on a row outside any block.
    RowClicked { table_number: String },
    EscapePressed,
}

/// Exactly one gesture at a time; entering one clears any other.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    Moving { booking_id: i64, grab_offset: f64 },
    ResizingLeft { booking_id: i64 },
    ResizingRight { booking_id: i64 },
}

/// A transient visual placement shown during an active gesture. Not yet
/// staged; republished on every pointer move.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPreview {
    pub booking_id: i64,
    pub table_number: String,
    pub time: NaiveTime,
    pub duration_minutes: i64,
}

pub struct EditEngine {
    edit_mode: bool,
    state: InteractionState,
    preview: Option<PlacementPreview>,
    pending: BTreeMap<i64, PendingChange>,
}

impl Default for EditEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EditEngine {
    pub fn new() -> Self {
        Self {
            edit_mode: false,
            state: InteractionState::Idle,
            preview: None,
            pending: BTreeMap::new(),
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Toggle the edit-mode super-state. Entering clears any stale
    /// selection; leaving while changes are pending discards them.
    pub fn set_edit_mode(&mut self, on: bool) {
        if on {
            self.edit_mode = true;
            self.state = InteractionState::Idle;
            self.preview = None;
        } else {
            self.cancel_all();
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn preview(&self) -> Option<&PlacementPreview> {
        self.preview.as_ref()
    }

    pub fn pending(&self) -> &BTreeMap<i64, PendingChange> {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The booking currently selected by an active gesture, if any.
    pub fn active_booking(&self) -> Option<i64> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Moving { booking_id, .. }
            | InteractionState::ResizingLeft { booking_id }
            | InteractionState::ResizingRight { booking_id } => Some(booking_id),
        }
    }

    /// Feed one event through the state machine. Returns the change staged
    /// by this event, if the event completed a gesture.
    pub fn dispatch(
        &mut self,
        event: GridEvent,
        snapshot: &Snapshot,
        window: &ViewWindow,
    ) -> Option<PendingChange> {
        if let GridEvent::EscapePressed = event {
            // Synchronous cancel of whatever is in progress; committed
            // pending changes for other bookings are unaffected.
            self.state = InteractionState::Idle;
            self.preview = None;
            return None;
        }

        if !self.edit_mode {
            return None;
        }

        match event {
            GridEvent::BlockPressed {
                booking_id,
                region,
                grab_offset,
            } => self.on_block_pressed(booking_id, region, grab_offset, snapshot),
            GridEvent::PointerMoved {
                table_number,
                row_pct,
            } => {
                self.on_pointer_moved(&table_number, row_pct, snapshot, window);
                None
            }
            GridEvent::RowClicked { .. } => {
                if self.is_idle() {
                    None
                } else {
                    self.stage_preview()
                }
            }
            GridEvent::EscapePressed => unreachable!("handled above"),
        }
    }

    fn on_block_pressed(
        &mut self,
        booking_id: i64,
        region: BlockRegion,
        grab_offset: f64,
        snapshot: &Snapshot,
    ) -> Option<PendingChange> {
        match self.state.clone() {
            InteractionState::Idle => {
                let (table_number, time, duration_minutes) =
                    self.effective_placement(booking_id, snapshot)?;
                // Seed the preview at the current placement so a commit
                // without any pointer travel stages the unchanged value.
                self.preview = Some(PlacementPreview {
                    booking_id,
                    table_number,
                    time,
                    duration_minutes,
                });
                self.state = match region {
                    BlockRegion::Body => InteractionState::Moving {
                        booking_id,
                        grab_offset: grab_offset.clamp(0.0, 1.0),
                    },
                    BlockRegion::LeftEdge => InteractionState::ResizingLeft { booking_id },
                    BlockRegion::RightEdge => InteractionState::ResizingRight { booking_id },
                };
                None
            }
            InteractionState::Moving {
                booking_id: selected,
                ..
            } => {
                if selected == booking_id {
                    // Clicking the already-selected block deselects with
                    // no change emitted.
                    self.state = InteractionState::Idle;
                    self.preview = None;
                    None
                } else {
                    // A click on another block is a click on its row.
                    self.stage_preview()
                }
            }
            InteractionState::ResizingLeft {
                booking_id: selected,
            } => {
                if selected == booking_id && region == BlockRegion::RightEdge {
                    // Swap the active edge, keeping the preview.
                    self.state = InteractionState::ResizingRight {
                        booking_id: selected,
                    };
                    None
                } else {
                    self.stage_preview()
                }
            }
            InteractionState::ResizingRight {
                booking_id: selected,
            } => {
                if selected == booking_id && region == BlockRegion::LeftEdge {
                    self.state = InteractionState::ResizingLeft {
                        booking_id: selected,
                    };
                    None
                } else {
                    self.stage_preview()
                }
            }
        }
    }

    fn on_pointer_moved(
        &mut self,
        table_number: &str,
        row_pct: f64,
        snapshot: &Snapshot,
        window: &ViewWindow,
    ) {
        let pointer_minutes = minutes_of_day(window.percent_to_time(row_pct).time());

        match self.state.clone() {
            InteractionState::Idle => {}
            InteractionState::Moving {
                booking_id,
                grab_offset,
            } => {
                let Some(anchor) = self.anchor_placement(booking_id, snapshot) else {
                    return;
                };
                let offset_minutes = (grab_offset * anchor.2 as f64).round() as i64;
                let start = clamp_start(
                    snap_minutes(pointer_minutes - offset_minutes),
                    anchor.2,
                );
                self.preview = Some(PlacementPreview {
                    booking_id,
                    table_number: table_number.to_string(),
                    time: time_from_minutes(start),
                    duration_minutes: anchor.2,
                });
            }
            InteractionState::ResizingRight { booking_id } => {
                let Some((table, start, _)) = self.anchor_placement(booking_id, snapshot) else {
                    return;
                };
                let start_minutes = minutes_of_day(start);
                let duration = (snap_minutes(pointer_minutes) - start_minutes)
                    .clamp(MIN_RESIZE_MINUTES, MAX_RESIZE_MINUTES);
                self.preview = Some(PlacementPreview {
                    booking_id,
                    table_number: table,
                    time: start,
                    duration_minutes: duration,
                });
            }
            InteractionState::ResizingLeft { booking_id } => {
                let Some((table, start, duration)) = self.anchor_placement(booking_id, snapshot)
                else {
                    return;
                };
                // The fixed edge is the end; recompute start from the
                // clamped duration so the end stays exact.
                let fixed_end = minutes_of_day(start) + duration;
                let new_start = snap_minutes(pointer_minutes);
                let clamped = (fixed_end - new_start).clamp(MIN_RESIZE_MINUTES, MAX_RESIZE_MINUTES);
                self.preview = Some(PlacementPreview {
                    booking_id,
                    table_number: table,
                    time: time_from_minutes(fixed_end - clamped),
                    duration_minutes: clamped,
                });
            }
        }
    }

    /// Convert the last preview into a staged change, overwriting any
    /// prior entry for the same booking.
    fn stage_preview(&mut self) -> Option<PendingChange> {
        let preview = self.preview.take()?;
        self.state = InteractionState::Idle;
        let change = PendingChange {
            booking_id: preview.booking_id,
            time: preview.time,
            table_number: preview.table_number,
            duration_minutes: preview.duration_minutes,
        };
        log::debug!(
            "Staged booking {} -> table {} at {} for {}min",
            change.booking_id,
            change.table_number,
            change.time.format("%H:%M"),
            change.duration_minutes,
        );
        self.pending.insert(change.booking_id, change.clone());
        Some(change)
    }

    /// Placement the active gesture measures against: the in-progress
    /// preview when present, else the staged change, else the raw booking.
    fn anchor_placement(
        &self,
        booking_id: i64,
        snapshot: &Snapshot,
    ) -> Option<(String, NaiveTime, i64)> {
        if let Some(preview) = self.preview.as_ref().filter(|p| p.booking_id == booking_id) {
            return Some((
                preview.table_number.clone(),
                preview.time,
                preview.duration_minutes,
            ));
        }
        self.effective_placement(booking_id, snapshot)
    }

    /// Staged change if present, else the booking's own placement.
    fn effective_placement(
        &self,
        booking_id: i64,
        snapshot: &Snapshot,
    ) -> Option<(String, NaiveTime, i64)> {
        if let Some(change) = self.pending.get(&booking_id) {
            return Some((
                change.table_number.clone(),
                change.time,
                change.duration_minutes,
            ));
        }
        snapshot
            .booking(booking_id)
            .map(|b: &Booking| (b.table_number.clone(), b.time, b.duration_minutes))
    }

    /// Issue one update per staged entry and drain what succeeded.
    ///
    /// Failed entries stay staged so the user can apply again; edit mode
    /// ends only once the set drains. Only valid from idle.
    pub fn apply_all(&mut self, api: &dyn BookingApi) -> CommitReport {
        if !self.is_idle() {
            log::warn!("apply_all ignored while a gesture is in progress");
            return CommitReport::default();
        }
        let changes: Vec<PendingChange> = self.pending.values().cloned().collect();
        let report = apply_changes(api, &changes);
        self.finish_commit(&report);
        report
    }

    /// Fold a commit report back in: applied entries leave the set,
    /// failed ones stay for retry.
    pub fn finish_commit(&mut self, report: &CommitReport) {
        for id in &report.applied {
            self.pending.remove(id);
        }
        if self.pending.is_empty() {
            self.edit_mode = false;
        }
    }

    /// Discard every staged change and leave edit mode. Never touches
    /// the network.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.preview = None;
        self.state = InteractionState::Idle;
        self.edit_mode = false;
    }
}

fn clamp_start(start_minutes: i64, duration_minutes: i64) -> i64 {
    let max_start = (24 * 60 - duration_minutes).max(0);
    let snapped_max = max_start - max_start % SNAP_MINUTES;
    start_minutes.clamp(0, snapped_max)
}

fn time_from_minutes(minutes: i64) -> NaiveTime {
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).expect("midnight is valid"))
}
