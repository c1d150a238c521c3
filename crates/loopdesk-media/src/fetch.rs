// crates/loopdesk-media/src/fetch.rs
//
// Blocking HTTP download of a remote clip into a temp file, so the decoder
// and the audio extractor can treat it like any local source.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context as _, Result};
use tempfile::TempPath;

const CHUNK: usize = 64 * 1024;
const REPORT_EVERY: Duration = Duration::from_millis(200);

/// Suffix for the temp file, taken from the URL path so FFmpeg's format
/// probing gets a useful hint. Falls back to `.mp4`.
///
/// ```
/// use loopdesk_media::fetch::temp_suffix;
/// assert_eq!(temp_suffix("https://a.example/v/clip.webm?x=1"), ".webm");
/// assert_eq!(temp_suffix("https://a.example/stream"), ".mp4");
/// ```
pub fn temp_suffix(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => ".mp4".into(),
    }
}

/// Download `url` into a fresh temp file. `progress(received, total)` is
/// called at most every 200 ms while bytes arrive, and once at the end.
/// `cancelled` is polled between chunks.
pub fn download_to_temp(
    url:       &str,
    mut progress: impl FnMut(u64, Option<u64>),
    cancelled: impl Fn() -> bool,
) -> Result<TempPath> {
    let resp = ureq::get(url).call().with_context(|| format!("GET {url}"))?;

    let total = resp.headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());

    let mut file = tempfile::Builder::new()
        .prefix("loopdesk_sample_")
        .suffix(&temp_suffix(url))
        .tempfile()
        .context("create temp file")?;

    let mut body     = resp.into_body();
    let mut reader   = body.as_reader();
    let mut buf      = vec![0u8; CHUNK];
    let mut received = 0u64;
    let mut last     = Instant::now();

    loop {
        if cancelled() {
            return Err(anyhow!("download cancelled"));
        }
        let n = reader.read(&mut buf).context("download read")?;
        if n == 0 { break; }
        file.write_all(&buf[..n]).context("write temp file")?;
        received += n as u64;
        if last.elapsed() >= REPORT_EVERY {
            last = Instant::now();
            progress(received, total);
        }
    }
    file.flush()?;

    if received == 0 {
        return Err(anyhow!("empty response body"));
    }
    progress(received, total);
    eprintln!("[fetch] {received} bytes ← {url}");
    Ok(file.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_ignores_query_and_fragment() {
        assert_eq!(temp_suffix("https://x/y/sample-mp4-file.mp4#t=3"), ".mp4");
        assert_eq!(temp_suffix("https://x/y/CLIP.MOV?sig=abc.def"), ".mov");
    }

    #[test]
    fn suffix_rejects_odd_extensions() {
        assert_eq!(temp_suffix("https://x/y/.hidden"), ".mp4");
        assert_eq!(temp_suffix("https://x/y/file.toolongext"), ".mp4");
        assert_eq!(temp_suffix("https://x/y/"), ".mp4");
    }

    #[test]
    fn bad_url_is_an_error() {
        assert!(download_to_temp("not a url", |_, _| {}, || false).is_err());
    }
}
