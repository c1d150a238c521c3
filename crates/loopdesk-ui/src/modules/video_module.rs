// crates/loopdesk-ui/src/modules/video_module.rs
//
// VideoModule owns scrub and playback frame logic. No panel: poll_playback()
// runs before the UI pass and tick() after commands are processed.

use eframe::egui;
use loopdesk_core::media_types::PlaybackFrame;
use loopdesk_core::state::ReviewState;

use crate::context::AppContext;

/// A frame is shown at most this far ahead of the clock.
const EARLY_SLACK: f64 = 1.0 / 60.0;
/// Frames further behind than this are dropped instead of shown late.
const STALE_AFTER: f64 = 3.0;

pub struct VideoModule;

impl VideoModule {
    // ── poll_playback ─────────────────────────────────────────────────────────
    /// PTS-gated playback frame consumption.
    ///
    /// The decode thread fills its channel as fast as FFmpeg goes. Showing the
    /// newest frame every tick would race ahead at decode speed, so one frame
    /// waits in `pending_pb_frame` until the clock reaches its timestamp.
    pub fn poll_playback(state: &ReviewState, ctx: &mut AppContext, egui_ctx: &egui::Context) {
        let pb = &state.playback;
        if !pb.is_playing {
            return;
        }
        let t = pb.current_time;

        // Frames from a replaced source, or decoded before the last restart,
        // never reach the screen. After a backward seek those still carry the
        // old position and would hold the slot until the clock caught up.
        let generation = ctx.media_worker.playback_generation();
        let live = |f: &PlaybackFrame| pb.is_current(f.id) && f.generation == generation;

        if let Some(pending) = &ctx.pending_pb_frame {
            if !live(pending) || pending.timestamp < t - STALE_AFTER {
                ctx.pending_pb_frame = None;
            }
        }

        if ctx.pending_pb_frame.is_none() {
            ctx.pending_pb_frame = ctx.media_worker.pb_rx.try_iter().find(|f| live(f));
        }

        // Skip overdue frames in one go (keyframe lead-in after a seek).
        while ctx.pending_pb_frame
            .as_ref()
            .is_some_and(|f| f.timestamp < t - 1.0 / 30.0)
        {
            match ctx.media_worker.pb_rx.try_iter().find(|f| live(f)) {
                Some(newer) => ctx.pending_pb_frame = Some(newer),
                None        => break,
            }
        }

        let due = ctx.pending_pb_frame.as_ref().is_some_and(|f| {
            f.timestamp <= t + EARLY_SLACK && f.timestamp >= t - STALE_AFTER
        });
        if due {
            if let Some(f) = ctx.pending_pb_frame.take() {
                ctx.show_frame(egui_ctx, f.width, f.height, &f.data);
                ctx.pending_pb_frame = ctx.media_worker.pb_rx.try_iter().find(|f| live(f));
            }
        }
    }

    // ── tick ──────────────────────────────────────────────────────────────────
    /// Start/stop the playback pipeline on play edges, seeks and source
    /// changes; request scrub frames while paused.
    pub fn tick(state: &ReviewState, ctx: &mut AppContext) {
        let pb = &state.playback;
        let just_started = pb.is_playing && !ctx.playback.prev_playing;
        let just_stopped = !pb.is_playing && ctx.playback.prev_playing;
        ctx.playback.prev_playing = pb.is_playing;

        let (Some(id), Some(path)) = (pb.source_id(), pb.playable_path()) else {
            ctx.playback.last_frame_req = None;
            return;
        };

        // ── Playback mode ─────────────────────────────────────────────────────
        if pb.is_playing {
            let source_changed = ctx.playback.playback_id != Some(id);
            if just_started || source_changed || ctx.playback.restart_playback {
                ctx.playback.playback_id      = Some(id);
                ctx.playback.restart_playback = false;
                ctx.pending_pb_frame          = None;
                eprintln!("[pb] start {id} at {:.3}s", pb.current_time);
                ctx.media_worker.start_playback(id, path, pb.current_time);
            }
            return;
        }

        // ── Transition: playing → paused ──────────────────────────────────────
        if just_stopped {
            ctx.media_worker.stop_playback();
            ctx.playback.playback_id    = None;
            ctx.playback.last_frame_req = None;
            ctx.pending_pb_frame        = None;
        }

        if !pb.video_loaded {
            ctx.playback.last_frame_req = None;
            return;
        }

        // Any move over ~10 ms fires a request; the latest-wins slot in the
        // worker is the rate limiter.
        let t = pb.current_time;
        let moved = ctx.playback.last_frame_req
            .map(|(rid, last)| rid != id || (last - t).abs() > 0.010)
            .unwrap_or(true);
        if moved {
            ctx.playback.last_frame_req = Some((id, t));
            ctx.playback.awaiting_frame = true;
            ctx.media_worker.request_frame(id, path, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopdesk_core::state::ReviewPrefs;
    use loopdesk_media::MediaWorker;
    use uuid::Uuid;

    fn frame(id: Uuid, generation: u64, timestamp: f64) -> PlaybackFrame {
        PlaybackFrame { id, generation, timestamp, width: 2, height: 2, data: vec![0; 16] }
    }

    /// A loaded 60 s clip, playing from `t`.
    fn playing_at(t: f64) -> (ReviewState, Uuid) {
        let mut state = ReviewState::new(ReviewPrefs::default());
        let id = state.use_sample();
        assert!(state.playback.on_loaded(id, 60.0, 640, 360));
        assert!(state.playback.seek(t));
        assert!(state.playback.play());
        (state, id)
    }

    #[test]
    fn frame_from_before_restart_is_dropped() {
        let (state, id) = playing_at(10.0);
        let mut ctx = AppContext::new(MediaWorker::new());
        let egui_ctx = egui::Context::default();

        // Session 1 was decoding around 41 s when the user jumped back to
        // 10 s; the restart moved the worker on to a new session.
        ctx.media_worker.stop_playback();
        let old = ctx.media_worker.playback_generation() - 1;
        ctx.pending_pb_frame = Some(frame(id, old, 41.0));

        VideoModule::poll_playback(&state, &mut ctx, &egui_ctx);
        assert!(ctx.pending_pb_frame.is_none());
        assert!(ctx.current_frame.is_none());
        ctx.media_worker.shutdown();
    }

    #[test]
    fn due_frame_from_current_session_is_shown() {
        let (state, id) = playing_at(10.0);
        let mut ctx = AppContext::new(MediaWorker::new());
        let egui_ctx = egui::Context::default();

        let current = ctx.media_worker.playback_generation();
        ctx.pending_pb_frame = Some(frame(id, current, 10.0));

        VideoModule::poll_playback(&state, &mut ctx, &egui_ctx);
        assert!(ctx.pending_pb_frame.is_none());
        assert!(ctx.current_frame.is_some());
        ctx.media_worker.shutdown();
    }

    #[test]
    fn future_frame_from_current_session_waits() {
        let (state, id) = playing_at(10.0);
        let mut ctx = AppContext::new(MediaWorker::new());
        let egui_ctx = egui::Context::default();

        let current = ctx.media_worker.playback_generation();
        ctx.pending_pb_frame = Some(frame(id, current, 10.5));

        VideoModule::poll_playback(&state, &mut ctx, &egui_ctx);
        assert!(ctx.pending_pb_frame.as_ref().is_some_and(|f| f.timestamp == 10.5));
        assert!(ctx.current_frame.is_none());
        ctx.media_worker.shutdown();
    }
}
