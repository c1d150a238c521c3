// crates/loopdesk-ui/src/modules/key_moments.rs
use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use loopdesk_core::commands::ReviewCommand;
use loopdesk_core::helpers::time::format_time;
use loopdesk_core::state::ReviewState;

use super::ReviewModule;
use crate::theme::{primary_btn, ACCENT_HOVER, DARK_BG_2, DARK_TEXT_DIM};

const ROW_H: f32 = 30.0;

pub struct KeyMomentsModule;

impl ReviewModule for KeyMomentsModule {
    fn name(&self) -> &str { "Key Moments" }

    fn ui(&mut self, ui: &mut Ui, state: &ReviewState, cmd: &mut Vec<ReviewCommand>) {
        let loaded = state.playback.video_loaded;

        // ── Header ───────────────────────────────────────────────────────────
        egui::Frame::new()
            .fill(DARK_BG_2)
            .inner_margin(egui::Margin { left: 8, right: 8, top: 6, bottom: 6 })
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("⭐ {}", self.name())).size(13.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(loaded, primary_btn("Generate"))
                            .on_disabled_hover_text("Load a video first")
                            .clicked()
                        {
                            cmd.push(ReviewCommand::GenerateKeyMoments);
                        }
                    });
                });
            });

        ui.add_space(6.0);

        if state.key_moments.is_empty() {
            let hint = if loaded {
                "Click 'Generate' to create a consistent set of key moments."
            } else {
                "Load a video to see key moments."
            };
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(hint).size(12.0).color(DARK_TEXT_DIM));
            });
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder())
            .column(Column::auto().at_least(72.0))
            .body(|mut body| {
                for moment in &state.key_moments {
                    body.row(ROW_H, |mut row| {
                        row.col(|ui| {
                            ui.label(&moment.title);
                        });
                        row.col(|ui| {
                            let label = RichText::new(format!("▶ {}", format_time(moment.timestamp)))
                                .monospace()
                                .color(ACCENT_HOVER);
                            if ui.add_enabled(loaded, egui::Button::new(label))
                                .on_hover_text(format!("Jump to {}", format_time(moment.timestamp)))
                                .clicked()
                            {
                                cmd.push(ReviewCommand::Seek(moment.timestamp));
                            }
                        });
                    });
                }
            });
    }
}
