// crates/loopdesk-core/src/commands.rs
//
// Every user action in Loopdesk is expressed as a ReviewCommand.
// Modules emit these; app.rs processes them after the UI pass.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewCommand {
    // ── Playback ─────────────────────────────────────────────────────────────
    Play,
    Pause,
    TogglePlay,
    Seek(f64),
    SetVolume(f32),
    ToggleMute,

    // ── Source ───────────────────────────────────────────────────────────────
    /// A file picked in the dialog or dropped on the window. Validated on
    /// processing; rejected files raise a notice.
    OpenFile(PathBuf),
    UseSample,
    /// Drop the current video and return to the upload screen.
    NewUpload,

    // ── Review ───────────────────────────────────────────────────────────────
    GenerateKeyMoments,

    // ── View / UI ────────────────────────────────────────────────────────────
    ZoomIn,
    ZoomOut,
    DismissNotice,
}
