// crates/loopdesk-ui/src/context.rs
//
// AppContext owns every runtime handle that is NOT part of ReviewState.
// LoopdeskApp holds one of these plus a ReviewState and the modules.
//
//   AppContext
//     ├── media_worker           — FFmpeg worker + channel handles
//     ├── current_frame          — texture shown in the player canvas
//     ├── playback: PlaybackContext — scrub/playback decode tracking
//     ├── resources: SourceResources — temp files tied to the current source
//     ├── audio_stream           — rodio OutputStream (must outlive the sink)
//     └── audio_sink             — managed by audio_module only

use eframe::egui;
use loopdesk_core::media_types::PlaybackFrame;
use loopdesk_core::state::ReviewState;
use loopdesk_media::{MediaResult, MediaWorker};
use rodio::{OutputStream, Sink};
use tempfile::TempPath;
use uuid::Uuid;

use crate::loopdesk_log;

// ── PlaybackContext ───────────────────────────────────────────────────────────
// Decode-tracking state mutated by video_module and audio_module.
#[derive(Default)]
pub struct PlaybackContext {
    /// (source id, timestamp) of the last scrub request. Exact f64 so every
    /// drag step past 10 ms fires a request.
    pub last_frame_req: Option<(Uuid, f64)>,

    /// A scrub request is in flight; app.rs keeps repainting until it lands.
    pub awaiting_frame: bool,

    /// Which source the playback thread is decoding.
    pub playback_id: Option<Uuid>,

    /// Was is_playing true on the previous frame?
    pub prev_playing: bool,

    /// Set by a seek during playback so tick() restarts the pipeline at the
    /// new position.
    pub restart_playback: bool,

    /// Was audio running on the previous tick?
    pub audio_was_playing: bool,
}

impl PlaybackContext {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── SourceResources ───────────────────────────────────────────────────────────
// Temp files backing the current source. Dropping a TempPath deletes the file,
// so replacing or clearing these is the whole cleanup story.
#[derive(Default)]
pub struct SourceResources {
    /// The downloaded sample clip.
    pub sample_file:    Option<(Uuid, TempPath)>,
    /// Audio track extracted to WAV.
    pub audio_file:     Option<(Uuid, TempPath)>,
    /// (id, received, total) of the running download.
    pub fetch_progress: Option<(Uuid, u64, Option<u64>)>,
}

impl SourceResources {
    pub fn audio_path(&self, id: Uuid) -> Option<&std::path::Path> {
        self.audio_file.as_ref()
            .filter(|(aid, _)| *aid == id)
            .map(|(_, p)| &**p)
    }

    pub fn progress(&self, id: Uuid) -> Option<(u64, Option<u64>)> {
        self.fetch_progress
            .filter(|(pid, _, _)| *pid == id)
            .map(|(_, r, t)| (r, t))
    }
}

// ── AppContext ────────────────────────────────────────────────────────────────

pub struct AppContext {
    pub media_worker: MediaWorker,

    /// Latest scrub or playback frame for the current source.
    pub current_frame: Option<egui::TextureHandle>,

    /// One-slot look-ahead for PTS-gated playback (see video_module).
    pub pending_pb_frame: Option<PlaybackFrame>,

    pub playback:  PlaybackContext,
    pub resources: SourceResources,

    // ── Audio (rodio 0.21) ───────────────────────────────────────────────────
    // The stream must stay alive while any sink plays. Created lazily by
    // audio_module once the event loop is running.
    pub audio_stream: Option<OutputStream>,
    pub audio_sink:   Option<Sink>,
}

impl AppContext {
    pub fn new(media_worker: MediaWorker) -> Self {
        Self {
            media_worker,
            current_frame:    None,
            pending_pb_frame: None,
            playback:         PlaybackContext::default(),
            resources:        SourceResources::default(),
            audio_stream:     None,
            audio_sink:       None,
        }
    }

    /// Drop everything tied to the previous source: stop the pipeline, the
    /// sink and the frame, and delete its temp files.
    pub fn release_source(&mut self) {
        let r = &self.resources;
        for (_, file) in r.sample_file.iter().chain(r.audio_file.iter()) {
            eprintln!("[app] removing {}", file.display());
        }
        self.media_worker.stop_playback();
        self.audio_sink       = None;
        self.current_frame    = None;
        self.pending_pb_frame = None;
        self.resources        = SourceResources::default();
        self.playback.reset();
    }

    /// Upload an RGBA frame into the player texture, reusing the handle.
    pub fn show_frame(&mut self, ctx: &egui::Context, width: u32, height: u32, data: &[u8]) {
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize], data,
        );
        match self.current_frame.as_mut() {
            Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.current_frame = Some(ctx.load_texture(
                    "player-frame", image, egui::TextureOptions::LINEAR,
                ));
            }
        }
        ctx.request_repaint();
    }

    /// Drain the worker channels into state and the texture. Called once per
    /// frame from `app::poll_media`, after PTS-gated playback consumption.
    ///
    /// Results for a source that has since been replaced are discarded, and
    /// any temp file they carry is deleted on drop.
    pub fn ingest_media_results(&mut self, state: &mut ReviewState, ctx: &egui::Context) {
        // Scrub frames first so they never queue behind a download.
        while let Ok(result) = self.media_worker.scrub_rx.try_recv() {
            if let MediaResult::VideoFrame { id, width, height, data } = result {
                if !state.playback.is_current(id) || state.playback.is_playing {
                    continue;
                }
                self.playback.awaiting_frame = false;
                self.show_frame(ctx, width, height, &data);
            }
        }

        while let Ok(result) = self.media_worker.rx.try_recv() {
            self.apply_result(state, ctx, result);
        }
    }

    /// Apply one worker result. A temp file carried by a result for a
    /// replaced source is dropped here, which deletes it.
    fn apply_result(&mut self, state: &mut ReviewState, ctx: &egui::Context, result: MediaResult) {
        match result {
            MediaResult::FetchProgress { id, received, total } => {
                if state.playback.is_current(id) {
                    self.resources.fetch_progress = Some((id, received, total));
                    ctx.request_repaint();
                }
            }

            MediaResult::Fetched { id, file } => {
                if state.fetched(id, file.to_path_buf()) {
                    loopdesk_log!("[fetch] sample ready at {}", file.display());
                    self.resources.sample_file = Some((id, file));
                }
            }

            MediaResult::Loaded { id, duration, width, height } => {
                if !state.playback.is_current(id) { return; }
                if !duration.is_finite() || duration <= 0.0 {
                    self.fail(state, id, "the video reports no duration");
                    return;
                }
                state.playback.on_loaded(id, duration, width, height);
                self.resources.fetch_progress = None;
                loopdesk_log!("[app] loaded {id}: {duration:.2}s {width}x{height}");
                ctx.request_repaint();
            }

            MediaResult::AudioPath { id, file } => {
                if state.playback.is_current(id) {
                    self.resources.audio_file = Some((id, file));
                }
            }

            MediaResult::Error { id, msg } => self.fail(state, id, &msg),

            // Scrub frames only travel on scrub_rx.
            MediaResult::VideoFrame { .. } => {}
        }
    }

    fn fail(&mut self, state: &mut ReviewState, id: Uuid, msg: &str) {
        if !state.media_failed(id, msg) { return; }
        loopdesk_log!("[media] {id}: {msg}");
        self.media_worker.stop_playback();
        self.audio_sink                = None;
        self.current_frame             = None;
        self.pending_pb_frame          = None;
        self.resources.fetch_progress  = None;
        self.playback.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopdesk_core::state::ReviewPrefs;
    use std::path::PathBuf;

    fn temp_file(suffix: &str) -> TempPath {
        tempfile::Builder::new().suffix(suffix).tempfile().unwrap().into_temp_path()
    }

    fn setup() -> (ReviewState, AppContext, egui::Context) {
        let state = ReviewState::new(ReviewPrefs::default());
        let ctx   = AppContext::new(MediaWorker::new());
        (state, ctx, egui::Context::default())
    }

    #[test]
    fn release_deletes_sample_and_audio() {
        let (_state, mut ctx, _ui) = setup();
        let id     = Uuid::new_v4();
        let sample = temp_file(".mp4");
        let audio  = temp_file(".wav");
        let (sample_path, audio_path): (PathBuf, PathBuf) = (sample.to_path_buf(), audio.to_path_buf());
        ctx.resources.sample_file = Some((id, sample));
        ctx.resources.audio_file  = Some((id, audio));
        assert!(sample_path.exists() && audio_path.exists());

        ctx.release_source();
        assert!(!sample_path.exists());
        assert!(!audio_path.exists());
        assert!(ctx.resources.sample_file.is_none());
        ctx.media_worker.shutdown();
    }

    #[test]
    fn fetched_sample_is_kept_for_current_source() {
        let (mut state, mut ctx, ui) = setup();
        let id   = state.use_sample();
        let file = temp_file(".mp4");
        let path = file.to_path_buf();

        ctx.apply_result(&mut state, &ui, MediaResult::Fetched { id, file });
        assert!(path.exists());
        assert_eq!(state.playback.playable_path(), Some(path.as_path()));
        assert!(ctx.resources.sample_file.as_ref().is_some_and(|(sid, _)| *sid == id));

        // New Upload releases it.
        state.new_upload();
        ctx.release_source();
        assert!(!path.exists());
        ctx.media_worker.shutdown();
    }

    #[test]
    fn results_for_replaced_source_delete_their_files() {
        let (mut state, mut ctx, ui) = setup();
        let old = state.use_sample();
        let _new = state.use_sample();

        let sample = temp_file(".mp4");
        let audio  = temp_file(".wav");
        let (sample_path, audio_path) = (sample.to_path_buf(), audio.to_path_buf());

        ctx.apply_result(&mut state, &ui, MediaResult::Fetched { id: old, file: sample });
        ctx.apply_result(&mut state, &ui, MediaResult::AudioPath { id: old, file: audio });

        assert!(!sample_path.exists());
        assert!(!audio_path.exists());
        assert!(ctx.resources.sample_file.is_none());
        assert!(ctx.resources.audio_file.is_none());
        assert!(state.playback.playable_path().is_none());
        ctx.media_worker.shutdown();
    }
}
