// crates/loopdesk-media/src/decode.rs
//
// LiveDecoder: stateful decoder that avoids a re-open + seek per frame.
// Shared by the scrub thread and the playback thread in worker.rs.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};
use ffmpeg::util::frame::video::Video as VideoFrame;

use crate::helpers::seek::seek_to_secs;

/// Longest side of frames handed to the UI. The canvas is rarely bigger and
/// each frame becomes a fresh texture upload.
pub const MAX_FRAME_SIDE: u32 = 960;

/// Output size for a `raw_w × raw_h` stream: scaled down so neither side
/// exceeds `max_side`, aspect preserved, both sides even (swscale wants that
/// for subsampled inputs).
///
/// ```
/// use loopdesk_media::decode::output_size;
/// assert_eq!(output_size(1920, 1080, 640), (640, 360));
/// assert_eq!(output_size(1080, 1920, 640), (360, 640));
/// assert_eq!(output_size(320, 240, 640), (320, 240));
/// ```
pub fn output_size(raw_w: u32, raw_h: u32, max_side: u32) -> (u32, u32) {
    if raw_w == 0 || raw_h == 0 {
        let side = max_side.max(2) & !1;
        return (side, side);
    }
    let scale = (max_side as f64 / raw_w.max(raw_h) as f64).min(1.0);
    let w = ((raw_w as f64 * scale).round() as u32).max(2) & !1;
    let h = ((raw_h as f64 * scale).round() as u32).max(2) & !1;
    (w, h)
}

pub struct LiveDecoder {
    pub path:      PathBuf,
    ictx:          ffmpeg::format::context::Input,
    decoder:       ffmpeg::decoder::video::Video,
    scaler:        SwsContext,
    video_idx:     usize,
    tb_num:        i32,
    tb_den:        i32,
    pub last_pts:  i64,
    /// Frames before this PTS are decoded but never scaled or returned.
    pub skip_until_pts: i64,
    pub out_w:     u32,
    pub out_h:     u32,
}

impl LiveDecoder {
    /// Open `path` positioned at the keyframe before `timestamp`.
    pub fn open(path: &Path, timestamp: f64, max_side: u32) -> Result<Self> {
        let mut ictx = input(path)?;

        let (video_idx, tb_num, tb_den, dec_ctx) = {
            let stream = ictx.streams().best(Type::Video)
                .ok_or_else(|| anyhow!("no video stream"))?;
            let tb = stream.time_base();
            let ctx = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?;
            (stream.index(), tb.numerator(), tb.denominator(), ctx)
        };
        if tb_num <= 0 || tb_den <= 0 {
            return Err(anyhow!("invalid stream time base {tb_num}/{tb_den}"));
        }
        let decoder = dec_ctx.decoder().video()?;

        seek_to_secs(&mut ictx, timestamp, "LiveDecoder::open");

        let (out_w, out_h) = output_size(decoder.width(), decoder.height(), max_side);
        let scaler = SwsContext::get(
            decoder.format(), decoder.width(), decoder.height(),
            Pixel::RGBA, out_w, out_h, Flags::BILINEAR,
        )?;

        let mut d = Self {
            path: path.to_path_buf(),
            ictx, decoder, scaler, video_idx, tb_num, tb_den,
            last_pts: 0, skip_until_pts: 0, out_w, out_h,
        };
        d.last_pts = d.ts_to_pts(timestamp);
        Ok(d)
    }

    pub fn ts_to_pts(&self, t: f64) -> i64 {
        (t * self.tb_den as f64 / self.tb_num as f64) as i64
    }

    pub fn pts_to_secs(&self, pts: i64) -> f64 {
        pts as f64 * self.tb_num as f64 / self.tb_den as f64
    }

    /// Decode the next frame at or past `skip_until_pts`.
    /// Returns `(rgba, w, h, ts_secs)` or `None` at EOF.
    pub fn next_frame(&mut self) -> Option<(Vec<u8>, u32, u32, f64)> {
        let mut decoded = VideoFrame::empty();
        loop {
            // Drain frames the decoder already holds before feeding more.
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                if pts < self.skip_until_pts {
                    continue;
                }
                let data = self.scale(&decoded)?;
                return Some((data, self.out_w, self.out_h, self.pts_to_secs(pts)));
            }

            let next = self.ictx.packets().next();
            let (stream, packet) = match next {
                Some(Ok(p))  => p,
                Some(Err(_)) => continue,
                None => {
                    let _ = self.decoder.send_eof();
                    let pts = self.drain_one(&mut decoded)?;
                    let data = self.scale(&decoded)?;
                    return Some((data, self.out_w, self.out_h, self.pts_to_secs(pts)));
                }
            };
            if stream.index() != self.video_idx { continue; }
            let _ = self.decoder.send_packet(&packet);
        }
    }

    /// After EOF, pull one buffered frame out of the decoder.
    fn drain_one(&mut self, decoded: &mut VideoFrame) -> Option<i64> {
        self.decoder.receive_frame(decoded).ok()?;
        let pts = decoded.pts().unwrap_or(self.last_pts + 1);
        self.last_pts = pts;
        Some(pts)
    }

    /// Decode forward to the first frame at or past `target_pts`. Falls back to
    /// the last frame decoded when the stream ends first.
    pub fn advance_to(&mut self, target_pts: i64) -> Option<(Vec<u8>, u32, u32)> {
        let mut last_good = None;
        while let Some((data, w, h, _)) = self.next_frame() {
            if self.last_pts >= target_pts {
                return Some((data, w, h));
            }
            last_good = Some((data, w, h));
        }
        last_good
    }

    /// Scale to RGBA and copy out the visible rows, dropping stride padding.
    fn scale(&mut self, decoded: &VideoFrame) -> Option<Vec<u8>> {
        let mut out = VideoFrame::empty();
        if let Err(e) = self.scaler.run(decoded, &mut out) {
            eprintln!("[media] scale failed for {}: {e}", self.path.display());
            return None;
        }
        let stride    = out.stride(0);
        let row_bytes = self.out_w as usize * 4;
        let raw       = out.data(0);
        let data = (0..self.out_h as usize)
            .flat_map(|row| &raw[row * stride..row * stride + row_bytes])
            .copied()
            .collect();
        Some(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_even() {
        let (w, h) = output_size(1001, 333, 640);
        assert_eq!(w % 2, 0);
        assert_eq!(h % 2, 0);
        assert_eq!(w, 640);
    }

    #[test]
    fn never_upscales() {
        assert_eq!(output_size(176, 144, MAX_FRAME_SIDE), (176, 144));
    }

    #[test]
    fn unknown_size_falls_back_to_square() {
        assert_eq!(output_size(0, 0, 641), (640, 640));
    }

    #[test]
    fn tiny_streams_keep_minimum_size() {
        assert_eq!(output_size(1, 1, 640), (2, 2));
    }

    #[test]
    fn open_missing_file_is_an_error() {
        let _ = ffmpeg::init();
        assert!(LiveDecoder::open(Path::new("/definitely/not/here.mp4"), 0.0, 640).is_err());
    }
}
