// crates/loopdesk-ui/src/modules/upload.rs
//
// Start screen: drop zone, native file picker and the sample shortcut.
// Dropped files are collected by app.rs (they arrive as raw window input);
// this module only highlights the zone while something hovers.

use egui::{Align2, Color32, FontId, RichText, Sense, Stroke, StrokeKind, Ui, Vec2};
use loopdesk_core::commands::ReviewCommand;
use loopdesk_core::source::VIDEO_EXTENSIONS;
use loopdesk_core::state::ReviewState;
use rfd::FileDialog;

use super::ReviewModule;
use crate::theme::{primary_btn, DARK_BG_2, DARK_BORDER, DARK_TEXT_DIM, DROP_ZONE};

const ZONE_W: f32 = 520.0;
const ZONE_H: f32 = 300.0;

pub struct UploadModule;

impl ReviewModule for UploadModule {
    fn name(&self) -> &str { "Upload" }

    fn ui(&mut self, ui: &mut Ui, _state: &ReviewState, cmd: &mut Vec<ReviewCommand>) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());

        let avail = ui.available_size();
        let size  = Vec2::new(ZONE_W.min(avail.x - 24.0).max(200.0), ZONE_H.min(avail.y - 24.0).max(180.0));
        ui.add_space(((avail.y - size.y) / 2.0).max(0.0));

        ui.vertical_centered(|ui| {
            let (zone, _) = ui.allocate_exact_size(size, Sense::hover());
            let painter = ui.painter();

            let (fill, stroke) = if hovering {
                (DROP_ZONE.gamma_multiply(0.18), Stroke::new(2.0, DROP_ZONE))
            } else {
                (DARK_BG_2, Stroke::new(1.0, DARK_BORDER))
            };
            painter.rect_filled(zone, 10.0, fill);
            painter.rect_stroke(zone, 10.0, stroke, StrokeKind::Inside);

            let c = zone.center();
            // Up-arrow glyph
            let arrow_col = if hovering { DROP_ZONE } else { DARK_TEXT_DIM };
            painter.add(egui::Shape::convex_polygon(vec![
                c + egui::vec2(0.0, -92.0),
                c + egui::vec2(16.0, -72.0),
                c + egui::vec2(-16.0, -72.0),
            ], arrow_col, Stroke::NONE));
            painter.rect_filled(
                egui::Rect::from_center_size(c + egui::vec2(0.0, -62.0), egui::vec2(8.0, 22.0)),
                1.0, arrow_col);

            painter.text(c + egui::vec2(0.0, -30.0), Align2::CENTER_CENTER,
                if hovering { "Release to upload" } else { "Drag and drop a video file here" },
                FontId::proportional(16.0), Color32::from_gray(220));
            painter.text(c + egui::vec2(0.0, -8.0), Align2::CENTER_CENTER,
                "MP4, MOV, WebM, MKV and other video formats",
                FontId::proportional(12.0), DARK_TEXT_DIM);

            // Buttons laid out inside the zone
            let btn_rect = egui::Rect::from_center_size(c + egui::vec2(0.0, 48.0), egui::vec2(size.x - 40.0, 34.0));
            ui.scope_builder(egui::UiBuilder::new().max_rect(btn_rect), |ui| {
                ui.columns(2, |cols| {
                    cols[0].vertical_centered(|ui| {
                        if ui.add(primary_btn(RichText::new("📂 Browse Files").size(13.0))).clicked() {
                            if let Some(path) = FileDialog::new()
                                .add_filter("Video", VIDEO_EXTENSIONS)
                                .pick_file()
                            {
                                cmd.push(ReviewCommand::OpenFile(path));
                            }
                        }
                    });
                    cols[1].vertical_centered(|ui| {
                        if ui.button(RichText::new("▶ Use Sample Video").size(13.0)).clicked() {
                            cmd.push(ReviewCommand::UseSample);
                        }
                    });
                });
            });
        });
    }
}
