// crates/loopdesk-core/src/lib.rs
//
// Pure review data and logic. No egui, no ffmpeg, no threads.
// loopdesk-media and loopdesk-ui both build on these types.

pub mod commands;
pub mod error;
pub mod helpers;
pub mod key_moments;
pub mod media_types;
pub mod playback;
pub mod segments;
pub mod source;
pub mod state;
pub mod timeline;
