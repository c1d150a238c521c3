// crates/loopdesk-core/src/media_types.rs
//
// Types that flow across the channel between loopdesk-media and loopdesk-ui.
// No egui, no ffmpeg. Temp files travel as `TempPath` so whoever holds the
// result owns the file's lifetime.

use tempfile::TempPath;
use uuid::Uuid;

/// Results sent from the MediaWorker background threads to the UI.
/// Every variant carries the load id it belongs to.
pub enum MediaResult {
    /// Bytes received so far; `total` when the server sent a length.
    FetchProgress { id: Uuid, received: u64, total: Option<u64> },
    /// The sample download finished.
    Fetched    { id: Uuid, file: TempPath },
    /// Probe succeeded: the source is playable.
    Loaded     { id: Uuid, duration: f64, width: u32, height: u32 },
    /// Scrub frame (RGBA).
    VideoFrame { id: Uuid, width: u32, height: u32, data: Vec<u8> },
    /// Extracted audio track as a temp WAV.
    AudioPath  { id: Uuid, file: TempPath },
    /// Download, probe or decode failed.
    Error      { id: Uuid, msg: String },
}

/// A decoded frame from the dedicated playback pipeline.
pub struct PlaybackFrame {
    pub id:         Uuid,
    /// Playback session that decoded this frame. Bumped on every start and
    /// stop, so frames decoded before a restart can be told apart.
    pub generation: u64,
    pub timestamp:  f64,
    pub width:     u32,
    pub height:    u32,
    pub data:      Vec<u8>, // RGBA
}

// Hand-written so frame buffers print as a byte count.
impl std::fmt::Debug for MediaResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchProgress { id, received, total } => f.debug_struct("FetchProgress")
                .field("id", id).field("received", received).field("total", total).finish(),
            Self::Fetched { id, file } => f.debug_struct("Fetched")
                .field("id", id).field("file", &file.to_path_buf()).finish(),
            Self::Loaded { id, duration, width, height } => f.debug_struct("Loaded")
                .field("id", id).field("duration", duration)
                .field("width", width).field("height", height).finish(),
            Self::VideoFrame { id, width, height, data } => f.debug_struct("VideoFrame")
                .field("id", id).field("width", width).field("height", height)
                .field("bytes", &data.len()).finish(),
            Self::AudioPath { id, file } => f.debug_struct("AudioPath")
                .field("id", id).field("file", &file.to_path_buf()).finish(),
            Self::Error { id, msg } => f.debug_struct("Error")
                .field("id", id).field("msg", msg).finish(),
        }
    }
}
