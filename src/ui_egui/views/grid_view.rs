//! Booking grid view.
//!
//! Paints the layout produced by `grid::layout` and translates pointer
//! input into `GridEvent`s for the edit-staging engine. All geometry in
//! here is pixels; everything time-shaped stays in the core.

use chrono::NaiveDate;
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Rounding, Sense, Stroke, Vec2};

use crate::grid::engine::{BlockRegion, EditEngine, GridEvent, EDGE_GRAB_PX};
use crate::grid::layout::{self, BookingBlock, GridLayout};
use crate::grid::slots::SlotSelection;
use crate::grid::window::ViewWindow;
use crate::grid::Snapshot;
use crate::ui_egui::theme::GridTheme;

/// Row height in pixels.
const ROW_HEIGHT: f32 = 44.0;
/// Width of the table label gutter.
const LABEL_WIDTH: f32 = 86.0;
/// Height of the hour scale above the rows.
const SCALE_HEIGHT: f32 = 22.0;

/// What the grid wants the app to do after this frame.
#[derive(Default)]
pub struct GridViewResponse {
    /// Empty half-hour cell clicked while not in edit mode
    pub slot_clicked: Option<SlotSelection>,
    /// Number of changes staged by this frame's events
    pub staged_count: usize,
}

/// Render the grid for one date and feed interactions into the engine.
pub fn render_grid(
    ui: &mut egui::Ui,
    snapshot: &Snapshot,
    selected_date: NaiveDate,
    window: &ViewWindow,
    engine: &mut EditEngine,
    theme: &GridTheme,
) -> GridViewResponse {
    let mut response = GridViewResponse::default();
    let grid = layout::layout(snapshot, selected_date, window, engine);
    let mut events: Vec<GridEvent> = Vec::new();

    draw_time_scale(ui, &grid, theme);

    for (row_index, row) in grid.rows.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            draw_row_label(ui, row, theme);

            let desired = Vec2::new(ui.available_width(), ROW_HEIGHT);
            let (rect, row_response) =
                ui.allocate_exact_size(desired, Sense::click().union(Sense::hover()));

            let bg = if row_index % 2 == 0 {
                theme.row_background
            } else {
                theme.row_background_alt
            };
            ui.painter().rect_filled(rect, 0.0, bg);
            draw_grid_lines(ui, rect, &grid, theme);

            // One allocation per row; blocks get manual hit testing
            // against their painted rects.
            let mut hitboxes: Vec<(Rect, &BookingBlock)> = Vec::new();
            for block in &row.blocks {
                let block_rect = block_rect_in_row(rect, block);
                draw_block(ui, block_rect, block, engine, theme);
                hitboxes.push((block_rect, block));
            }

            if let Some(now_pct) = grid.now_pct {
                draw_now_indicator(ui, rect, now_pct, theme);
            }

            let pointer = row_response
                .interact_pointer_pos()
                .or_else(|| ui.input(|i| i.pointer.hover_pos()));

            // Cursor feedback over blocks
            if engine.edit_mode() {
                if let Some(pos) = pointer.filter(|p| rect.contains(*p)) {
                    if let Some((block_rect, _)) =
                        hitboxes.iter().rev().find(|(r, _)| r.contains(pos))
                    {
                        let cursor = match region_at(*block_rect, pos) {
                            BlockRegion::Body => CursorIcon::Grab,
                            _ => CursorIcon::ResizeHorizontal,
                        };
                        ui.output_mut(|out| out.cursor_icon = cursor);
                    }
                }
            }

            // Gesture tracking: republish the preview on every pointer
            // move over a row while a gesture is active.
            if engine.active_booking().is_some() {
                if let Some(pos) = pointer.filter(|p| rect.contains(*p)) {
                    events.push(GridEvent::PointerMoved {
                        table_number: row.table.number.clone(),
                        row_pct: ((pos.x - rect.left()) / rect.width() * 100.0) as f64,
                    });
                    ui.ctx().request_repaint();
                }
            }

            if row_response.clicked() {
                if let Some(pos) = row_response.interact_pointer_pos() {
                    if let Some((block_rect, block)) =
                        hitboxes.iter().rev().find(|(r, _)| r.contains(pos))
                    {
                        events.push(GridEvent::BlockPressed {
                            booking_id: block.booking_id,
                            region: region_at(*block_rect, pos),
                            grab_offset: ((pos.x - block_rect.left()) / block_rect.width())
                                as f64,
                        });
                    } else if engine.edit_mode() {
                        events.push(GridEvent::RowClicked {
                            table_number: row.table.number.clone(),
                        });
                    } else if let Some(slot) = row
                        .slots
                        .iter()
                        .rev()
                        .find(|s| slot_rect_in_row(rect, s).contains(pos))
                    {
                        response.slot_clicked = Some(SlotSelection {
                            date: selected_date,
                            time: slot.time,
                            table_number: slot.table_number.clone(),
                        });
                    }
                }
            }
        });
    }

    for event in events {
        if engine.dispatch(event, snapshot, window).is_some() {
            response.staged_count += 1;
        }
    }

    response
}

fn block_rect_in_row(row_rect: Rect, block: &BookingBlock) -> Rect {
    let left = row_rect.left() + row_rect.width() * (block.left_pct as f32 / 100.0);
    let width = row_rect.width() * (block.width_pct as f32 / 100.0);
    Rect::from_min_size(
        Pos2::new(left, row_rect.top() + 2.0),
        Vec2::new(width, row_rect.height() - 4.0),
    )
}

fn slot_rect_in_row(row_rect: Rect, slot: &layout::SlotCell) -> Rect {
    let left = row_rect.left() + row_rect.width() * (slot.left_pct as f32 / 100.0);
    let width = row_rect.width() * (slot.width_pct as f32 / 100.0);
    Rect::from_min_size(Pos2::new(left, row_rect.top()), Vec2::new(width, row_rect.height()))
}

/// Resolve the fixed 16-px edge bands; everything between is body.
fn region_at(block_rect: Rect, pos: Pos2) -> BlockRegion {
    // Small blocks split in half rather than letting the bands overlap
    let band = EDGE_GRAB_PX.min(block_rect.width() / 2.0);
    if pos.x <= block_rect.left() + band {
        BlockRegion::LeftEdge
    } else if pos.x >= block_rect.right() - band {
        BlockRegion::RightEdge
    } else {
        BlockRegion::Body
    }
}

fn draw_time_scale(ui: &mut egui::Ui, grid: &GridLayout, theme: &GridTheme) {
    let desired = Vec2::new(ui.available_width(), SCALE_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(desired, Sense::hover());
    let content_left = rect.left() + LABEL_WIDTH;
    let content_width = rect.width() - LABEL_WIDTH;

    for line in grid.lines.iter().filter(|l| l.on_hour) {
        if !(0.0..=100.0).contains(&line.percent) {
            continue;
        }
        let x = content_left + content_width * (line.percent as f32 / 100.0);
        ui.painter().text(
            Pos2::new(x + 3.0, rect.center().y),
            Align2::LEFT_CENTER,
            line.time.format("%H:%M").to_string(),
            FontId::proportional(11.0),
            theme.text_secondary,
        );
    }
}

fn draw_row_label(ui: &mut egui::Ui, row: &layout::TableRow, theme: &GridTheme) {
    ui.allocate_ui_with_layout(
        Vec2::new(LABEL_WIDTH, ROW_HEIGHT),
        egui::Layout::left_to_right(egui::Align::Center),
        |ui| {
            ui.add_space(6.0);
            let label = format!(
                "{}  ({}–{})",
                row.table.number, row.table.min_capacity, row.table.max_capacity
            );
            let color = if row.table.is_active {
                theme.text_primary
            } else {
                theme.text_secondary
            };
            ui.label(egui::RichText::new(label).size(12.0).color(color));
        },
    );
}

fn draw_grid_lines(ui: &mut egui::Ui, rect: Rect, grid: &GridLayout, theme: &GridTheme) {
    for line in &grid.lines {
        if !(0.0..=100.0).contains(&line.percent) {
            continue;
        }
        let x = rect.left() + rect.width() * (line.percent as f32 / 100.0);
        let color = if line.on_hour {
            theme.hour_line
        } else {
            theme.half_hour_line
        };
        ui.painter().line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, color),
        );
    }
}

fn draw_now_indicator(ui: &mut egui::Ui, rect: Rect, now_pct: f64, theme: &GridTheme) {
    let x = rect.left() + rect.width() * (now_pct as f32 / 100.0);
    ui.painter().line_segment(
        [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
        Stroke::new(2.0, theme.now_line),
    );
}

fn draw_block(
    ui: &mut egui::Ui,
    block_rect: Rect,
    block: &BookingBlock,
    engine: &EditEngine,
    theme: &GridTheme,
) {
    let base = theme.status_color(&block.status);
    let fill = if block.preview {
        // Translucent silhouette while the gesture is in flight
        Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), 150)
    } else {
        base
    };
    ui.painter()
        .rect_filled(block_rect, Rounding::same(3.0), fill);

    if block.conflicting {
        ui.painter()
            .rect_filled(block_rect, Rounding::same(3.0), theme.conflict_fill);
    }
    if block.pending {
        ui.painter().rect_stroke(
            block_rect,
            Rounding::same(3.0),
            Stroke::new(2.0, theme.pending_outline),
        );
    }
    if engine.active_booking() == Some(block.booking_id) {
        ui.painter().rect_stroke(
            block_rect.expand(1.0),
            Rounding::same(3.0),
            Stroke::new(1.5, theme.text_primary),
        );
    }

    if block_rect.width() > 40.0 {
        ui.painter().text(
            Pos2::new(block_rect.left() + 5.0, block_rect.top() + 4.0),
            Align2::LEFT_TOP,
            format!("{} ({})", block.guest_name, block.party_size),
            FontId::proportional(11.0),
            Color32::WHITE,
        );
        ui.painter().text(
            Pos2::new(block_rect.left() + 5.0, block_rect.bottom() - 4.0),
            Align2::LEFT_BOTTOM,
            &block.time_label,
            FontId::proportional(10.0),
            Color32::from_rgba_unmultiplied(255, 255, 255, 200),
        );
    }
}
