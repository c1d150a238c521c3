// crates/loopdesk-ui/src/modules/audio_module.rs
//
// AudioModule owns the rodio sink. No panel: tick() is called every frame
// from app.rs after commands are processed.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use loopdesk_core::state::ReviewState;
use rodio::{Decoder, OutputStreamBuilder, Sink};

use crate::context::AppContext;
use crate::loopdesk_log;

/// Ticks to wait after the stream opens before connecting a sink. WASAPI
/// registers its session asynchronously and drops a sink created too early.
const WARMUP_TICKS: u8 = 5;

#[derive(Default)]
pub struct AudioModule {
    warmup_ticks:  u8,
    stream_failed: bool,
    /// File the current sink was opened from, or the last one that failed
    /// to open. Prevents a retry every frame.
    opened_from:   Option<PathBuf>,
}

impl AudioModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, state: &ReviewState, ctx: &mut AppContext) {
        // Created lazily: opening the device before the event loop runs fails
        // silently on Windows GUI-subsystem launches.
        if ctx.audio_stream.is_none() && !self.stream_failed {
            match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => {
                    loopdesk_log!("[audio] stream ready");
                    ctx.audio_stream  = Some(stream);
                    self.warmup_ticks = WARMUP_TICKS;
                }
                Err(e) => {
                    loopdesk_log!("[audio] stream init failed: {e}");
                    self.stream_failed = true;
                }
            }
        }
        if self.warmup_ticks > 0 {
            self.warmup_ticks -= 1;
            return;
        }
        if ctx.audio_stream.is_none() { return; }

        let pb = &state.playback;
        if !pb.is_playing {
            if ctx.playback.audio_was_playing {
                ctx.playback.audio_was_playing = false;
                ctx.audio_sink   = None;
                self.opened_from = None;
            }
            return;
        }

        // A seek clears audio_was_playing, so this also covers re-opening at
        // the new position.
        if !ctx.playback.audio_was_playing {
            ctx.audio_sink   = None;
            self.opened_from = None;
        }
        ctx.playback.audio_was_playing = true;

        let Some(id) = pb.source_id() else { return };
        // Prefer the extracted WAV; fall back to the container itself, which
        // rodio can decode for some codecs.
        let wanted = ctx.resources.audio_path(id)
            .or_else(|| pb.playable_path())
            .map(Path::to_path_buf);
        let Some(wanted) = wanted else { return };

        if self.opened_from.as_ref() != Some(&wanted) {
            ctx.audio_sink   = self.open_sink(ctx, &wanted, pb.current_time, state.output_volume());
            self.opened_from = Some(wanted);
        } else if let Some(sink) = &ctx.audio_sink {
            sink.set_volume(state.output_volume());
        }
    }

    fn open_sink(&self, ctx: &AppContext, path: &Path, at: f64, volume: f32) -> Option<Sink> {
        let stream = ctx.audio_stream.as_ref()?;
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                loopdesk_log!("[audio] open {} failed: {e}", path.display());
                return None;
            }
        };
        let decoder = match Decoder::new(BufReader::new(file)) {
            Ok(d) => d,
            Err(e) => {
                loopdesk_log!("[audio] no decodable audio in {}: {e}", path.display());
                return None;
            }
        };
        let sink = Sink::connect_new(&stream.mixer());
        sink.append(decoder);
        if let Err(e) = sink.try_seek(Duration::from_secs_f64(at.max(0.0))) {
            eprintln!("[audio] seek to {at:.3}s failed: {e}");
        }
        sink.set_volume(volume);
        sink.play();
        eprintln!("[audio] sink opened at {at:.3}s ← {}", path.display());
        Some(sink)
    }
}
