// crates/loopdesk-media/src/audio.rs
//
// Audio extraction to a temp WAV that rodio can seek in. The container audio
// (AAC in most MP4s) isn't decodable by rodio's default feature set, so the
// track is decoded and resampled here with the statically linked FFmpeg.
//
// The WAV is returned as a `TempPath`: it is deleted when the UI drops it,
// which happens on source change, New Upload and exit.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context as _, Result};
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::format::sample::{Sample, Type as SampleType};
use ffmpeg::media::Type as MediaType;
use ffmpeg::software::resampling;
use ffmpeg::util::channel_layout::ChannelLayout;
use ffmpeg::util::frame::audio::Audio as AudioFrame;
use tempfile::TempPath;

// ── Constants ─────────────────────────────────────────────────────────────────

const OUT_RATE: u32 = 44_100;

/// Packed (interleaved) f32le. WAV format tag 3 = IEEE_FLOAT.
const OUT_FMT: Sample = Sample::F32(SampleType::Packed);

const OUT_LAYOUT: ChannelLayout = ChannelLayout::STEREO;

const OUT_CHANNELS: u16 = 2;

// ── Public API ────────────────────────────────────────────────────────────────

/// Decode the audio track of `path` to a 44.1 kHz stereo f32 WAV temp file.
pub fn extract_audio(path: &Path) -> Result<TempPath> {
    let pcm = decode_pcm(path)?;

    let mut file = tempfile::Builder::new()
        .prefix("loopdesk_audio_")
        .suffix(".wav")
        .tempfile()
        .context("create temp WAV")?;
    let bytes = write_wav(file.as_file_mut(), &pcm).context("write WAV")?;
    eprintln!("[media] audio WAV written ({bytes} bytes) ← {}", path.display());

    Ok(file.into_temp_path())
}

// ── Decode + resample ─────────────────────────────────────────────────────────

fn decode_pcm(src: &Path) -> Result<Vec<f32>> {
    let mut ictx = input(src).context("open")?;

    let (audio_idx, dec_ctx) = {
        let stream = ictx.streams().best(MediaType::Audio)
            .ok_or_else(|| anyhow!("no audio stream"))?;
        let ctx = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
            .context("codec context")?;
        (stream.index(), ctx)
    };
    let mut decoder = dec_ctx.decoder().audio().context("audio decoder")?;

    // Built on the first frame, once the real source format is known.
    let mut resampler: Option<resampling::Context> = None;
    let mut pcm: Vec<f32> = Vec::new();
    let mut frame = AudioFrame::empty();

    for (stream, packet) in ictx.packets().flatten() {
        if stream.index() != audio_idx { continue; }
        if decoder.send_packet(&packet).is_err() { continue; }
        while decoder.receive_frame(&mut frame).is_ok() {
            append_resampled(&frame, &mut resampler, &mut pcm)?;
        }
    }

    let _ = decoder.send_eof();
    while decoder.receive_frame(&mut frame).is_ok() {
        append_resampled(&frame, &mut resampler, &mut pcm)?;
    }

    if pcm.is_empty() {
        return Err(anyhow!("no audio samples decoded"));
    }
    Ok(pcm)
}

fn append_resampled(
    frame:     &AudioFrame,
    resampler: &mut Option<resampling::Context>,
    out:       &mut Vec<f32>,
) -> Result<()> {
    let src_channels = frame.ch_layout().channels();
    let needs_resample = frame.format() != OUT_FMT
        || frame.rate()                != OUT_RATE
        || src_channels                != 2;

    if !needs_resample {
        append_packed_f32(frame, out);
        return Ok(());
    }

    if resampler.is_none() {
        // Mono sources must be declared MONO explicitly or swr misreads the
        // channel count.
        let src_layout = if src_channels >= 2 { frame.ch_layout() } else { ChannelLayout::MONO };
        let ctx = resampling::Context::get2(
            frame.format(), src_layout, frame.rate(),
            OUT_FMT,        OUT_LAYOUT, OUT_RATE,
        ).context("create audio resampler")?;
        *resampler = Some(ctx);
    }

    if let Some(rs) = resampler.as_mut() {
        let mut resampled = AudioFrame::empty();
        if rs.run(frame, &mut resampled).is_ok() && resampled.samples() > 0 {
            append_packed_f32(&resampled, out);
        }
    }
    Ok(())
}

/// Packed layout keeps every channel in plane 0.
fn append_packed_f32(frame: &AudioFrame, out: &mut Vec<f32>) {
    out.extend(
        frame.data(0)
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
    );
}

// ── WAV writer ────────────────────────────────────────────────────────────────

/// Write interleaved stereo f32le PCM as a WAV. Returns total bytes written.
fn write_wav<W: Write>(w: W, samples: &[f32]) -> std::io::Result<u64> {
    const BITS:         u16 = 32;
    const FORMAT_FLOAT: u16 = 3;
    const BLOCK_ALIGN:  u16 = OUT_CHANNELS * (BITS / 8);

    let data_size = (samples.len() * 4) as u32;
    let byte_rate = OUT_RATE * BLOCK_ALIGN as u32;

    let mut w = std::io::BufWriter::new(w);

    w.write_all(b"RIFF")?;
    w.write_all(&(36u32 + data_size).to_le_bytes())?;
    w.write_all(b"WAVE")?;

    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&FORMAT_FLOAT.to_le_bytes())?;
    w.write_all(&OUT_CHANNELS.to_le_bytes())?;
    w.write_all(&OUT_RATE.to_le_bytes())?;
    w.write_all(&byte_rate.to_le_bytes())?;
    w.write_all(&BLOCK_ALIGN.to_le_bytes())?;
    w.write_all(&BITS.to_le_bytes())?;

    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    for s in samples {
        w.write_all(&s.to_le_bytes())?;
    }
    w.flush()?;

    Ok(44 + data_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_layout() {
        let mut buf = Vec::new();
        let n = write_wav(&mut buf, &[0.0, 0.5, -0.5, 1.0]).unwrap();
        assert_eq!(n, 44 + 16);
        assert_eq!(buf.len(), 60);
        assert_eq!(&buf[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]), 52);
        assert_eq!(&buf[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes([buf[20], buf[21]]), 3);
        assert_eq!(u16::from_le_bytes([buf[22], buf[23]]), 2);
        assert_eq!(u32::from_le_bytes([buf[24], buf[25], buf[26], buf[27]]), 44_100);
        assert_eq!(&buf[36..40], b"data");
        assert_eq!(f32::from_le_bytes([buf[48], buf[49], buf[50], buf[51]]), 0.5);
    }

    #[test]
    fn missing_file_is_an_error() {
        let _ = ffmpeg::init();
        assert!(extract_audio(Path::new("/definitely/not/here.mp4")).is_err());
    }
}
