// src/app.rs (loopdesk-ui)
use std::time::Duration;

use eframe::egui;
use loopdesk_core::commands::ReviewCommand;
use loopdesk_core::state::{ReviewPrefs, ReviewState};
use loopdesk_media::MediaWorker;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::loopdesk_log;
use crate::modules::{
    ReviewModule,
    audio_module::AudioModule,
    key_moments::KeyMomentsModule,
    player::PlayerModule,
    timeline::TimelineModule,
    upload::UploadModule,
    video_module::VideoModule,
};
use crate::theme::{configure_style, ACCENT, DARK_TEXT_DIM};

#[derive(Serialize, Deserialize)]
struct AppStorage {
    prefs: ReviewPrefs,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct LoopdeskApp {
    state:        ReviewState,
    context:      AppContext,
    upload:       UploadModule,
    player:       PlayerModule,
    timeline:     TimelineModule,
    key_moments:  KeyMomentsModule,
    audio:        AudioModule,
    /// Commands emitted by modules this frame, processed after the UI pass.
    pending_cmds: Vec<ReviewCommand>,
}

impl LoopdeskApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        configure_style(&cc.egui_ctx);
        // Pin to dark so an OS theme change doesn't overwrite the palette.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        let prefs = cc.storage
            .and_then(|s| eframe::get_value::<AppStorage>(s, eframe::APP_KEY))
            .map(|d| d.prefs)
            .unwrap_or_default();

        Self {
            state:        ReviewState::new(prefs),
            context:      AppContext::new(MediaWorker::new()),
            upload:       UploadModule,
            player:       PlayerModule::default(),
            timeline:     TimelineModule::new(),
            key_moments:  KeyMomentsModule,
            audio:        AudioModule::new(),
            pending_cmds: Vec::new(),
        }
    }

    fn process_command(&mut self, cmd: ReviewCommand) {
        match cmd {
            // ── Playback ─────────────────────────────────────────────────────
            ReviewCommand::Play => {
                self.state.playback.play();
            }
            ReviewCommand::Pause => {
                self.state.playback.pause();
            }
            ReviewCommand::TogglePlay => {
                self.state.playback.toggle();
            }
            ReviewCommand::Seek(t) => {
                if self.state.playback.seek(t) {
                    self.context.audio_sink = None;
                    self.context.playback.audio_was_playing = false;
                    self.context.pending_pb_frame = None;
                    if self.state.playback.is_playing {
                        self.context.playback.restart_playback = true;
                    }
                }
            }
            ReviewCommand::SetVolume(v) => {
                self.state.set_volume(v);
            }
            ReviewCommand::ToggleMute => {
                self.state.toggle_mute();
            }

            // ── Source ───────────────────────────────────────────────────────
            ReviewCommand::OpenFile(path) => {
                match self.state.open_file(&path) {
                    Ok(id) => {
                        self.context.release_source();
                        loopdesk_log!("[app] opening {} as {id}", path.display());
                    }
                    Err(e) => loopdesk_log!("[app] rejected {}: {e}", path.display()),
                }
            }
            ReviewCommand::UseSample => {
                let id = self.state.use_sample();
                self.context.release_source();
                loopdesk_log!("[app] loading sample as {id}");
            }
            ReviewCommand::NewUpload => {
                self.state.new_upload();
                self.context.release_source();
            }

            // ── Review ───────────────────────────────────────────────────────
            ReviewCommand::GenerateKeyMoments => {
                self.state.generate_key_moments();
            }

            // ── View / UI ────────────────────────────────────────────────────
            ReviewCommand::ZoomIn => {
                self.state.zoom_in();
            }
            ReviewCommand::ZoomOut => {
                self.state.zoom_out();
            }
            ReviewCommand::DismissNotice => {
                self.state.notice = None;
            }
        }
    }

    fn poll_media(&mut self, ctx: &egui::Context) {
        // ── Hand queued loads to the worker ───────────────────────────────────
        for (id, url) in self.state.pending_fetches.drain(..) {
            self.context.media_worker.fetch(id, url);
        }
        for (id, path) in self.state.pending_loads.drain(..) {
            self.context.media_worker.load(id, path);
        }

        // ── Playback frame consumption (PTS-gated) ────────────────────────────
        VideoModule::poll_playback(&self.state, &mut self.context, ctx);

        self.context.ingest_media_results(&mut self.state, ctx);
    }

    /// Files dropped on the window. Only the upload screen accepts them; the
    /// first one wins.
    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        if !self.state.show_upload { return; }
        if let Some(path) = files.into_iter().find_map(|f| f.path) {
            self.pending_cmds.push(ReviewCommand::OpenFile(path));
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if self.state.show_upload || ctx.wants_keyboard_input() { return; }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.pending_cmds.push(ReviewCommand::TogglePlay);
        }
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.state.notice else { return };
        egui::Window::new(notice.title.as_str())
            .id(egui::Id::new("notice_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.label(&notice.message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.pending_cmds.push(ReviewCommand::DismissNotice);
                    }
                });
            });
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for LoopdeskApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &AppStorage { prefs: self.state.prefs.clone() });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.context.media_worker.shutdown();
        // Drops the sink before the temp WAV it reads from.
        self.context.release_source();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_drag_and_drop(ctx);
        self.poll_media(ctx);
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(38.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(egui::RichText::new("▶ Loopdesk").strong().size(15.0).color(ACCENT));
                    ui.separator();
                    ui.label(egui::RichText::new("Video Analytics").size(12.0).color(DARK_TEXT_DIM));
                    if !self.state.show_upload {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("⬆ New Upload").clicked() {
                                self.pending_cmds.push(ReviewCommand::NewUpload);
                            }
                        });
                    }
                });
            });

        if self.state.show_upload {
            egui::CentralPanel::default().show(ctx, |ui| {
                self.upload.ui(ui, &self.state, &mut self.pending_cmds);
            });
        } else {
            egui::SidePanel::right("key_moments_panel")
                .resizable(true)
                .default_width(280.0)
                .min_width(220.0)
                .show(ctx, |ui| {
                    self.key_moments.ui(ui, &self.state, &mut self.pending_cmds);
                });

            egui::TopBottomPanel::bottom("timeline_panel")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.add_space(4.0);
                    self.timeline.ui(ui, &self.state, &mut self.pending_cmds);
                    ui.add_space(4.0);
                });

            egui::CentralPanel::default().show(ctx, |ui| {
                self.player.current_frame = self.context.current_frame.clone();
                self.player.progress = self.state.playback.source_id()
                    .and_then(|id| self.context.resources.progress(id));
                self.player.ui(ui, &self.state, &mut self.pending_cmds);
            });
        }

        self.notice_window(ctx);

        // ── Process commands emitted this frame ───────────────────────────────
        let cmds: Vec<ReviewCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(cmd);
        }

        // ── Non-rendering modules ─────────────────────────────────────────────
        VideoModule::tick(&self.state, &mut self.context);
        self.audio.tick(&self.state, &mut self.context);

        // ── Clock ─────────────────────────────────────────────────────────────
        if self.state.playback.is_playing {
            let dt = ctx.input(|i| i.stable_dt as f64);
            if self.state.playback.advance(dt) {
                eprintln!("[app] reached end at {:.3}s", self.state.playback.current_time);
            }
            ctx.request_repaint();
        } else if self.state.is_loading() || self.context.playback.awaiting_frame {
            // Worker results don't wake the event loop on their own.
            ctx.request_repaint_after(Duration::from_millis(30));
        }
    }
}
