// crates/loopdesk-media/src/lib.rs
//
// No egui dependency. Talks to loopdesk-ui through channels only.
// `MediaWorker` is the entry point; the other modules are the blocking
// FFmpeg and HTTP jobs it runs on its threads.

pub mod audio;
pub mod decode;
pub mod fetch;
pub mod probe;
pub mod worker;

mod helpers;

pub use worker::MediaWorker;
pub use loopdesk_core::media_types::{MediaResult, PlaybackFrame};
