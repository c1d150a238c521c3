// crates/loopdesk-media/src/helpers/seek.rs
//
// All container seeks route through here so the soft-fail policy is the same
// for the scrub decoder and the playback decoder.

use ffmpeg_the_third as ffmpeg;

/// Seek `ictx` to the keyframe at or before `target_secs`.
///
/// Returns `false` when the demuxer refused the seek. Decoding then continues
/// from the current position and the caller's PTS skip discards pre-roll, so
/// this is logged, never fatal.
///
/// A target of 0 skips the seek entirely: the demuxer already starts there,
/// and `avformat_seek_file(max_ts = 0)` returns EPERM on some platforms.
pub fn seek_to_secs(
    ictx:        &mut ffmpeg::format::context::Input,
    target_secs: f64,
    label:       &str,
) -> bool {
    if target_secs <= 0.0 {
        return true;
    }

    let seek_ts = (target_secs * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;
    match ictx.seek(seek_ts, ..=seek_ts) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("[seek] soft-fail in {label} at {target_secs:.3}s: {e}");
            false
        }
    }
}
