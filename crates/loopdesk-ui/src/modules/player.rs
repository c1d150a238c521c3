// crates/loopdesk-ui/src/modules/player.rs
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use loopdesk_core::commands::ReviewCommand;
use loopdesk_core::helpers::geometry::letterbox;
use loopdesk_core::helpers::time::format_time;
use loopdesk_core::state::ReviewState;

use super::ReviewModule;
use crate::helpers::format::{fit_label, progress_label};
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM};

// ── Transport bar layout constants ───────────────────────────────────────────
const BAR_H:    f32 = 44.0;
const BTN_SIZE: f32 = 30.0;
const BTN_R:    f32 = 4.0;
const ICON_SZ:  f32 = 9.0;    // half-size of painted icon geometry
const GAP:      f32 = 4.0;
const SEP:      f32 = 12.0;
const PAD:      f32 = 10.0;
const TIME_W:   f32 = 46.0;
const VOL_W:    f32 = 80.0;
const CANVAS_RATIO: f32 = 16.0 / 9.0;

#[derive(Default)]
pub struct PlayerModule {
    /// Live frame for the current source, set by app.rs before ui().
    pub current_frame: Option<egui::TextureHandle>,
    /// Download progress while the sample is fetched.
    pub progress:      Option<(u64, Option<u64>)>,
}

impl ReviewModule for PlayerModule {
    fn name(&self) -> &str { "Player" }

    fn ui(&mut self, ui: &mut Ui, state: &ReviewState, cmd: &mut Vec<ReviewCommand>) {
        let pb = &state.playback;

        // ── Video canvas ─────────────────────────────────────────────────────
        let panel_w = ui.available_width();
        let panel_h = (ui.available_height() - BAR_H - 8.0).max(80.0);
        let (canvas_w, canvas_h) = {
            let h = panel_w / CANVAS_RATIO;
            if h <= panel_h { (panel_w, h) } else { (panel_h * CANVAS_RATIO, panel_h) }
        };

        let (outer_rect, _) = ui.allocate_exact_size(Vec2::new(panel_w, canvas_h), Sense::hover());
        let canvas = Rect::from_center_size(outer_rect.center(), Vec2::new(canvas_w, canvas_h));
        let canvas_resp = ui.interact(canvas, ui.id().with("canvas"), Sense::click());
        let painter = ui.painter().clone();

        let border = if pb.is_playing {
            Stroke::new(1.5, ACCENT.gamma_multiply(0.55))
        } else {
            Stroke::new(1.0, DARK_BORDER)
        };
        painter.rect_stroke(canvas.expand(1.0), 4.0, border, egui::StrokeKind::Outside);
        painter.rect_filled(canvas, 3.0, Color32::BLACK);

        if pb.source.is_none() {
            painter.text(canvas.center(), Align2::CENTER_CENTER,
                "No video loaded. Upload or use sample.",
                FontId::proportional(14.0), DARK_TEXT_DIM);
        } else if state.load_failed {
            painter.text(canvas.center(), Align2::CENTER_CENTER,
                "Video failed to load.",
                FontId::proportional(14.0), Color32::from_rgb(220, 90, 90));
        } else if state.is_loading() {
            draw_spinner(ui, &painter, canvas.center() - egui::vec2(0.0, 12.0));
            let name = pb.source.as_ref().map(|s| s.source.display_name()).unwrap_or_default();
            let line = match self.progress {
                Some((got, total)) => format!("Downloading {}", progress_label(got, total)),
                None               => format!("Loading {}", fit_label(&name, canvas_w - 80.0)),
            };
            painter.text(canvas.center() + egui::vec2(0.0, 24.0), Align2::CENTER_CENTER,
                line, FontId::proportional(12.0), Color32::from_gray(120));
        } else if let Some(tex) = &self.current_frame {
            let [fw, fh] = tex.size();
            let (w, h) = letterbox(fw as u32, fh as u32, canvas.width(), canvas.height());
            let frame_rect = Rect::from_center_size(canvas.center(), Vec2::new(w, h));
            painter.image(tex.id(), frame_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE);
        }

        // ── Play/pause overlay ───────────────────────────────────────────────
        if pb.video_loaded {
            if !pb.is_playing || canvas_resp.hovered() {
                let c = canvas.center();
                let alpha = if canvas_resp.hovered() { 200 } else { 140 };
                painter.circle_filled(c, 28.0, Color32::from_black_alpha(alpha));
                draw_play_pause(&painter, c, pb.is_playing, Color32::WHITE, 1.4);
            }
            if canvas_resp.clicked() {
                cmd.push(ReviewCommand::TogglePlay);
            }
        }

        ui.add_space(8.0);

        // ── Transport bar ────────────────────────────────────────────────────
        // Buttons and labels are placed with coordinate math from the bar rect;
        // only the sliders go through egui layout, via ui.put / scope_builder.
        let bar_w = ui.available_width();
        let (bar_rect, _) = ui.allocate_exact_size(Vec2::new(bar_w, BAR_H), Sense::hover());
        let painter = ui.painter().clone();
        painter.rect_filled(bar_rect, BTN_R, DARK_BG_3);
        painter.rect_stroke(bar_rect, BTN_R, Stroke::new(1.0, DARK_BORDER), egui::StrokeKind::Outside);

        let cy    = bar_rect.center().y;
        let mut x = bar_rect.min.x + PAD;

        // One fixed-size painted button. Evaluates to `clicked`.
        macro_rules! tbtn {
            ($id:expr, $enabled:expr, $active:expr, $draw_icon:expr) => {{
                let r = Rect::from_min_size(Pos2::new(x, cy - BTN_SIZE / 2.0), Vec2::splat(BTN_SIZE));
                let sense = if $enabled { Sense::click() } else { Sense::hover() };
                let resp = ui.interact(r, ui.id().with($id), sense);
                let (bg, icol) = if !$enabled {
                    (DARK_BG_3, Color32::from_gray(80))
                } else if resp.is_pointer_button_down_on() {
                    (DARK_BG_2.gamma_multiply(0.6), Color32::WHITE)
                } else if resp.hovered() {
                    (DARK_BG_2, ACCENT.linear_multiply(1.2))
                } else if $active {
                    (DARK_BG_3, ACCENT)
                } else {
                    (DARK_BG_3, Color32::from_gray(175))
                };
                painter.rect_filled(r, BTN_R, bg);
                if $enabled && (resp.hovered() || $active) {
                    painter.rect_stroke(r, BTN_R, Stroke::new(1.0, ACCENT.gamma_multiply(0.35)),
                        egui::StrokeKind::Outside);
                }
                $draw_icon(r.center(), icol);
                x += BTN_SIZE;
                $enabled && resp.clicked()
            }};
        }

        // ── Play / Pause ──────────────────────────────────────────────────────
        let playing = pb.is_playing;
        if tbtn!("play_pause", pb.video_loaded, playing, |c: Pos2, col: Color32| {
            draw_play_pause(&painter, c, playing, col, 1.0);
        }) {
            cmd.push(ReviewCommand::TogglePlay);
        }
        x += SEP;

        // ── Current time ──────────────────────────────────────────────────────
        painter.text(Pos2::new(x, cy), Align2::LEFT_CENTER, format_time(pb.current_time),
            FontId::monospace(12.0), ACCENT);
        x += TIME_W + GAP;

        // Right-hand group is laid out from the right edge inwards.
        let right_w   = TIME_W + SEP + BTN_SIZE + GAP + VOL_W;
        let right_x   = bar_rect.max.x - PAD - right_w;
        let seek_rect = Rect::from_min_max(
            Pos2::new(x, cy - 10.0),
            Pos2::new((right_x - SEP).max(x + 20.0), cy + 10.0),
        );

        // ── Seek slider ───────────────────────────────────────────────────────
        let seek_enabled = pb.video_loaded && pb.duration > 0.0;
        let mut t = pb.current_time;
        let seek_resp = ui.scope_builder(egui::UiBuilder::new().max_rect(seek_rect), |ui| {
            ui.spacing_mut().slider_width = seek_rect.width();
            ui.add_enabled(seek_enabled,
                egui::Slider::new(&mut t, 0.0..=pb.duration.max(0.0))
                    .step_by(0.01)
                    .show_value(false)
                    .trailing_fill(true))
        }).inner;
        if seek_resp.changed() {
            cmd.push(ReviewCommand::Seek(t));
        }

        // ── Total duration ────────────────────────────────────────────────────
        x = right_x;
        painter.text(Pos2::new(x, cy), Align2::LEFT_CENTER, format_time(pb.duration),
            FontId::monospace(12.0), Color32::from_gray(150));
        x += TIME_W + SEP;

        // ── Mute ──────────────────────────────────────────────────────────────
        let muted   = state.prefs.muted;
        let vol_val = state.prefs.volume;
        if tbtn!("mute", true, muted, |c: Pos2, col: Color32| {
            // Speaker cone
            painter.add(egui::Shape::convex_polygon(vec![
                Pos2::new(c.x - ICON_SZ + 1.0, c.y - ICON_SZ * 0.4),
                Pos2::new(c.x - ICON_SZ + 1.0, c.y + ICON_SZ * 0.4),
                Pos2::new(c.x + 1.0,           c.y + ICON_SZ * 0.9),
                Pos2::new(c.x + 1.0,           c.y - ICON_SZ * 0.9),
            ], col, Stroke::NONE));
            if muted {
                let ox = c.x + ICON_SZ * 0.45;
                let red = Color32::from_rgb(200, 60, 60);
                painter.line_segment([Pos2::new(ox - 3.5, c.y - 3.5), Pos2::new(ox + 3.5, c.y + 3.5)],
                    Stroke::new(1.5, red));
                painter.line_segment([Pos2::new(ox + 3.5, c.y - 3.5), Pos2::new(ox - 3.5, c.y + 3.5)],
                    Stroke::new(1.5, red));
            } else if vol_val > 0.0 {
                painter.circle_stroke(Pos2::new(c.x + 2.0, c.y), ICON_SZ * 0.85,
                    Stroke::new(1.5, col.gamma_multiply(0.65)));
            }
        }) {
            cmd.push(ReviewCommand::ToggleMute);
        }
        x += GAP;

        // ── Volume ────────────────────────────────────────────────────────────
        let vol_rect = Rect::from_min_size(Pos2::new(x, cy - BTN_SIZE / 2.0), Vec2::new(VOL_W, BTN_SIZE));
        let mut vol = state.prefs.volume;
        if ui.put(vol_rect,
            egui::Slider::new(&mut vol, 0.0_f32..=1.0_f32)
                .show_value(false)
                .trailing_fill(true)
        ).changed() {
            cmd.push(ReviewCommand::SetVolume(vol));
        }

        if let Some(src) = &pb.source {
            ui.add_space(4.0);
            ui.label(RichText::new(src.source.display_name()).size(11.0).color(DARK_TEXT_DIM));
        }
    }
}

// ── Painting helpers ─────────────────────────────────────────────────────────

fn draw_play_pause(painter: &egui::Painter, c: Pos2, playing: bool, col: Color32, scale: f32) {
    let s = ICON_SZ * scale;
    if playing {
        for ox in [-s * 0.45, s * 0.45] {
            painter.rect_filled(
                Rect::from_center_size(Pos2::new(c.x + ox, c.y), Vec2::new(3.0 * scale, s * 1.8)),
                1.0, col);
        }
    } else {
        painter.add(egui::Shape::convex_polygon(vec![
            Pos2::new(c.x - s * 0.5, c.y - s),
            Pos2::new(c.x - s * 0.5, c.y + s),
            Pos2::new(c.x + s,       c.y),
        ], col, Stroke::NONE));
    }
}

fn draw_spinner(ui: &Ui, painter: &egui::Painter, c: Pos2) {
    let t = ui.input(|i| i.time) as f32;
    let r = 14.0_f32;
    painter.circle_stroke(c, r, Stroke::new(1.5, Color32::from_gray(40)));
    let a = t * 3.5;
    painter.line_segment([c, c + egui::vec2(a.cos() * r, a.sin() * r)], Stroke::new(2.0, ACCENT));
    ui.ctx().request_repaint();
}
