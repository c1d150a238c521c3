// crates/loopdesk-media/src/probe.rs
//
// In-process FFmpeg probing: duration and video dimensions. This is what
// decides whether a source counts as loaded.

use std::path::Path;

use anyhow::{anyhow, Result};
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeInfo {
    pub duration:  f64,
    pub width:     u32,
    pub height:    u32,
    pub has_audio: bool,
}

/// Open `path` and read its duration and video size.
///
/// Fails when the file can't be opened, has no video stream, or reports no
/// usable duration in either the container or the video stream.
pub fn probe(path: &Path) -> Result<ProbeInfo> {
    let ictx = input(path)?;

    let video = ictx.streams().best(Type::Video)
        .ok_or_else(|| anyhow!("no video stream"))?;
    let has_audio = ictx.streams().best(Type::Audio).is_some();

    let (width, height) = {
        let ctx = ffmpeg::codec::context::Context::from_parameters(video.parameters())?;
        let dec = ctx.decoder().video()?;
        (dec.width(), dec.height())
    };

    let mut duration = ictx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
    if !(duration > 0.0) {
        // Fall back to the stream's own duration (raw elementary streams,
        // some WebM muxers).
        let tb = video.time_base();
        if tb.denominator() != 0 {
            duration = video.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64;
        }
    }
    if !(duration > 0.0) || !duration.is_finite() {
        return Err(anyhow!("duration unknown"));
    }

    eprintln!("[media] probed {duration:.2}s {width}x{height} ← {}", path.display());
    Ok(ProbeInfo { duration, width, height, has_audio })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_fails() {
        let _ = ffmpeg::init();
        assert!(probe(Path::new("/definitely/not/here.mp4")).is_err());
    }

    #[test]
    fn non_media_file_fails() {
        let _ = ffmpeg::init();
        let mut f = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        std::io::Write::write_all(&mut f, b"this is not a video").unwrap();
        assert!(probe(f.path()).is_err());
    }
}
