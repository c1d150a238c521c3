// crates/loopdesk-ui/src/modules/timeline.rs
use egui::{Align2, Color32, FontId, Id, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use loopdesk_core::commands::ReviewCommand;
use loopdesk_core::helpers::geometry::{content_width, follow_scroll_offset, position, span_width, time_at};
use loopdesk_core::helpers::time::format_time;
use loopdesk_core::segments::SegmentKind;
use loopdesk_core::state::ReviewState;
use loopdesk_core::timeline::{ticks, PlayheadDrag, ZOOM_MAX, ZOOM_MIN};

use super::ReviewModule;
use crate::helpers::format::{fit_label, zoom_label};
use crate::theme::{DARK_BG_0, DARK_BG_2, DARK_TEXT_DIM, PLAYHEAD, SEG_HIGHLIGHT, SEG_SILENT};

const RULER_H:   f32 = 22.0;
const SEGMENT_H: f32 = 34.0;
const TRACK_PAD: f32 = 8.0;
const TRACK_H:   f32 = RULER_H + SEGMENT_H + TRACK_PAD * 2.0;

pub struct TimelineModule {
    drag: PlayheadDrag,
    /// current_time seen on the previous frame. The scroll offset only
    /// follows the playhead on frames where this changed.
    last_time: f64,
}

impl TimelineModule {
    pub fn new() -> Self {
        Self { drag: PlayheadDrag::default(), last_time: f64::NAN }
    }
}

fn tool_btn(label: impl Into<egui::WidgetText>) -> egui::Button<'static> {
    egui::Button::new(label).min_size(egui::vec2(26.0, 24.0))
}

impl ReviewModule for TimelineModule {
    fn name(&self) -> &str { "Timeline" }

    fn ui(&mut self, ui: &mut Ui, state: &ReviewState, cmd: &mut Vec<ReviewCommand>) {
        let pb   = &state.playback;
        let zoom = state.prefs.timeline_zoom;

        // ── Header ───────────────────────────────────────────────────────────
        egui::Frame::new()
            .fill(DARK_BG_2)
            .inner_margin(egui::Margin { left: 8, right: 8, top: 4, bottom: 4 })
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("🎞 {}", self.name())).size(12.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(zoom < ZOOM_MAX, tool_btn("+"))
                            .on_hover_text("Zoom in")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::ZoomIn);
                        }
                        ui.label(RichText::new(zoom_label(zoom)).monospace().size(11.0));
                        if ui.add_enabled(zoom > ZOOM_MIN, tool_btn("−"))
                            .on_hover_text("Zoom out")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::ZoomOut);
                        }
                    });
                });
            });

        ui.add_space(4.0);

        if !pb.video_loaded {
            let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), TRACK_H), Sense::hover());
            ui.painter().rect_filled(rect, 4.0, DARK_BG_0);
            ui.painter().text(rect.center(), Align2::CENTER_CENTER,
                "Load a video to see the timeline.",
                FontId::proportional(13.0), DARK_TEXT_DIM);
            self.last_time = f64::NAN;
            return;
        }

        let duration  = pb.duration;
        let display_w = ui.available_width();
        let track_w   = content_width(duration, zoom, display_w);

        let time_moved = pb.current_time != self.last_time;
        self.last_time = pb.current_time;

        let mut area = egui::ScrollArea::horizontal()
            .id_salt("timeline_scroll")
            .auto_shrink([false, true]);
        if time_moved && !self.drag.is_active() {
            area = area.horizontal_scroll_offset(
                follow_scroll_offset(pb.current_time, duration, track_w, display_w),
            );
        }

        area.show(ui, |ui| {
            let (rect, track_resp) = ui.allocate_exact_size(Vec2::new(track_w, TRACK_H), Sense::click());
            let painter = ui.painter().clone();
            painter.rect_filled(rect, 4.0, DARK_BG_0);

            let x_of = |t: f64| rect.min.x + position(t, duration, track_w);

            // ── Ruler ────────────────────────────────────────────────────────
            let ruler = Rect::from_min_size(rect.min, Vec2::new(track_w, RULER_H));
            painter.rect_filled(ruler, 0.0, Color32::from_rgb(16, 18, 24));
            for tick in ticks(duration, track_w) {
                let x = x_of(tick.time);
                let h = if tick.major { RULER_H } else { RULER_H * 0.4 };
                painter.line_segment(
                    [Pos2::new(x, ruler.max.y - h), Pos2::new(x, ruler.max.y)],
                    Stroke::new(1.0, Color32::from_gray(if tick.major { 90 } else { 60 })));
                if tick.major {
                    painter.text(Pos2::new(x + 3.0, ruler.min.y + 2.0), Align2::LEFT_TOP,
                        format_time(tick.time), FontId::monospace(10.0), Color32::from_gray(140));
                }
            }

            // ── Segments ─────────────────────────────────────────────────────
            let lane_y = ruler.max.y + TRACK_PAD;
            let seg_painter = painter.with_clip_rect(rect);
            for seg in &state.segments {
                let x = x_of(seg.start);
                let w = span_width(seg.span(), duration, track_w);
                let bar = Rect::from_min_size(Pos2::new(x, lane_y), Vec2::new(w, SEGMENT_H));
                let fill = match seg.kind {
                    SegmentKind::Silent    => SEG_SILENT,
                    SegmentKind::Highlight => SEG_HIGHLIGHT,
                };
                let hover = ui.interact(bar, Id::new(("segment", seg.id.as_str())), Sense::hover())
                    .on_hover_text(seg.tooltip());
                let alpha = if hover.hovered() { 0.95 } else { 0.7 };
                seg_painter.rect_filled(bar, 3.0, fill.gamma_multiply(alpha));
                let label = fit_label(seg.kind.label(), w - 8.0);
                if !label.is_empty() {
                    seg_painter.text(bar.left_center() + egui::vec2(4.0, 0.0), Align2::LEFT_CENTER,
                        label, FontId::proportional(11.0), Color32::WHITE);
                }
            }

            // Click anywhere on the track to seek.
            if track_resp.clicked() {
                if let Some(ptr) = track_resp.interact_pointer_pos() {
                    cmd.push(ReviewCommand::Seek(time_at(ptr.x - rect.min.x, duration, track_w)));
                }
            }

            // ── Playhead ─────────────────────────────────────────────────────
            let ph_x = x_of(pb.current_time.clamp(0.0, duration));
            painter.line_segment(
                [Pos2::new(ph_x + 1.0, rect.min.y), Pos2::new(ph_x + 1.0, rect.max.y)],
                Stroke::new(1.0, Color32::from_black_alpha(80)));
            painter.line_segment(
                [Pos2::new(ph_x, rect.min.y), Pos2::new(ph_x, rect.max.y)],
                Stroke::new(2.0, PLAYHEAD));
            painter.add(egui::Shape::convex_polygon(
                vec![Pos2::new(ph_x - 6.0, rect.min.y),
                     Pos2::new(ph_x + 6.0, rect.min.y),
                     Pos2::new(ph_x, rect.min.y + 12.0)],
                PLAYHEAD, Stroke::NONE));

            // Handle covers the head and the whole line so the line can be grabbed.
            let handle_rect = Rect::from_min_max(
                Pos2::new(ph_x - 7.0, rect.min.y),
                Pos2::new(ph_x + 7.0, rect.max.y),
            );
            let handle = ui.interact(handle_rect, Id::new("playhead_handle"), Sense::drag());

            if handle.drag_started() && self.drag.begin(pb.video_loaded, duration, pb.is_playing) && pb.is_playing {
                cmd.push(ReviewCommand::Pause);
            }
            if self.drag.is_active() {
                if let Some(ptr) = ui.input(|i| i.pointer.interact_pos()) {
                    let frame = ui.ctx().cumulative_pass_nr();
                    if let Some(t) = self.drag.update(ptr.x - rect.min.x, track_w, duration, frame) {
                        cmd.push(ReviewCommand::Seek(t));
                    }
                }
                ui.ctx().request_repaint();
            }
            if handle.drag_stopped() && self.drag.end() {
                cmd.push(ReviewCommand::Play);
            }

            if handle.hovered() || self.drag.is_active() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                painter.text(Pos2::new(ph_x + 9.0, rect.min.y + 2.0), Align2::LEFT_TOP,
                    format_time(pb.current_time), FontId::monospace(11.0), PLAYHEAD);
            }
        });

        // ── Readout ──────────────────────────────────────────────────────────
        ui.add_space(2.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{} / {}", format_time(pb.current_time), format_time(duration)))
                .monospace().size(11.0).color(DARK_TEXT_DIM));
        });
    }
}
