// crates/loopdesk-media/src/worker.rs
//
// MediaWorker: owns the background threads that stand in for a video
// element. All public API that loopdesk-ui calls lives here.
//
// Threads:
//   scrub     — latest-wins slot, one frame per request
//   playback  — sequential decode into a bounded channel (backpressure)
//   per load  — probe, then audio extraction
//   per fetch — HTTP download of a remote source

use std::path::{Path, PathBuf};
use std::sync::{atomic::{AtomicBool, AtomicU64, Ordering}, Arc};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use parking_lot::{Condvar, Mutex};
use uuid::Uuid;

use loopdesk_core::media_types::{MediaResult, PlaybackFrame};

use crate::audio::extract_audio;
use crate::decode::{LiveDecoder, MAX_FRAME_SIDE};
use crate::fetch::download_to_temp;
use crate::probe::probe;

// ── Internal types ────────────────────────────────────────────────────────────

struct FrameRequest {
    id:        Uuid,
    path:      PathBuf,
    timestamp: f64,
}

enum PlaybackCmd {
    Start { id: Uuid, generation: u64, path: PathBuf, ts: f64 },
    Stop,
}

type FrameSlot = Arc<(Mutex<Option<FrameRequest>>, Condvar)>;

// ── MediaWorker ───────────────────────────────────────────────────────────────

pub struct MediaWorker {
    /// Shared result channel: fetch, probe, audio and error results.
    pub rx:       Receiver<MediaResult>,
    tx:           Sender<MediaResult>,

    /// Scrub frames get their own channel so a busy download or probe never
    /// delays them.
    pub scrub_rx: Receiver<MediaResult>,

    frame_req:    FrameSlot,
    pb_tx:        Sender<PlaybackCmd>,
    pub pb_rx:    Receiver<PlaybackFrame>,
    pb_gen:       AtomicU64,
    shutdown:     Arc<AtomicBool>,
}

impl Default for MediaWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaWorker {
    pub fn new() -> Self {
        let (tx, rx)             = bounded(256);
        let (scrub_tx, scrub_rx) = bounded(8);
        let frame_req: FrameSlot = Arc::new((Mutex::new(None), Condvar::new()));

        spawn_scrub_thread(Arc::clone(&frame_req), scrub_tx);

        // 4 commands is plenty: Start/Stop are edge-triggered by the UI.
        // 32 frames ≈ 1 s of look-ahead at 30 fps.
        let (pb_tx, pb_cmd_rx)   = bounded::<PlaybackCmd>(4);
        let (pb_frame_tx, pb_rx) = bounded::<PlaybackFrame>(32);
        spawn_playback_thread(pb_cmd_rx, pb_frame_tx, tx.clone());

        Self {
            rx, tx, scrub_rx, frame_req, pb_tx, pb_rx,
            pb_gen:   AtomicU64::new(0),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop accepting work and wake the scrub thread with a poison pill.
    /// The playback thread exits once this worker (and its `pb_tx`) drops.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let (lock, cvar) = &*self.frame_req;
        *lock.lock() = Some(FrameRequest {
            id:        Uuid::nil(),
            path:      PathBuf::new(),
            timestamp: 0.0,
        });
        cvar.notify_one();
    }

    /// Download a remote source. Sends `FetchProgress` while running, then
    /// `Fetched` or `Error`.
    pub fn fetch(&self, id: Uuid, url: String) {
        let tx = self.tx.clone();
        let sd = Arc::clone(&self.shutdown);
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = download_to_temp(
                &url,
                |received, total| {
                    let _ = progress_tx.try_send(MediaResult::FetchProgress { id, received, total });
                },
                || sd.load(Ordering::Relaxed),
            );
            match result {
                Ok(file) => { let _ = tx.send(MediaResult::Fetched { id, file }); }
                Err(e) => {
                    eprintln!("[fetch] {url}: {e:#}");
                    let _ = tx.send(MediaResult::Error { id, msg: format!("{e:#}") });
                }
            }
        });
    }

    /// Probe a local file. Sends `Loaded` or `Error`, then, when the file
    /// has an audio track, `AudioPath`.
    pub fn load(&self, id: Uuid, path: PathBuf) {
        let tx = self.tx.clone();
        let sd = Arc::clone(&self.shutdown);
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) { return; }
            let info = match probe(&path) {
                Ok(info) => info,
                Err(e) => {
                    eprintln!("[media] probe failed for {}: {e:#}", path.display());
                    let _ = tx.send(MediaResult::Error { id, msg: format!("{e:#}") });
                    return;
                }
            };
            let _ = tx.send(MediaResult::Loaded {
                id,
                duration: info.duration,
                width:    info.width,
                height:   info.height,
            });

            if !info.has_audio || sd.load(Ordering::Relaxed) { return; }
            match extract_audio(&path) {
                Ok(file) => { let _ = tx.send(MediaResult::AudioPath { id, file }); }
                // Video still plays without sound; not worth a notice.
                Err(e) => eprintln!("[media] audio extract failed for {}: {e:#}", path.display()),
            }
        });
    }

    /// Ask for the frame at `timestamp`. Overwrites any request the scrub
    /// thread hasn't picked up yet.
    pub fn request_frame(&self, id: Uuid, path: &Path, timestamp: f64) {
        let (lock, cvar) = &*self.frame_req;
        *lock.lock() = Some(FrameRequest { id, path: path.to_path_buf(), timestamp });
        cvar.notify_one();
    }

    /// Generation of the current playback session. Frames stamped with any
    /// other value were decoded before the last start or stop.
    pub fn playback_generation(&self) -> u64 {
        self.pb_gen.load(Ordering::Acquire)
    }

    /// Start the playback pipeline at `ts` seconds into `path`.
    ///
    /// The decode thread may still push a frame or two from the previous
    /// session after the flush below; they carry the old generation.
    pub fn start_playback(&self, id: Uuid, path: &Path, ts: f64) {
        let generation = self.pb_gen.fetch_add(1, Ordering::AcqRel) + 1;
        while self.pb_rx.try_recv().is_ok() {}
        let _ = self.pb_tx.try_send(PlaybackCmd::Start { id, generation, path: path.to_path_buf(), ts });
    }

    pub fn stop_playback(&self) {
        self.pb_gen.fetch_add(1, Ordering::AcqRel);
        let _ = self.pb_tx.try_send(PlaybackCmd::Stop);
        while self.pb_rx.try_recv().is_ok() {}
    }
}

// ── Scrub thread ──────────────────────────────────────────────────────────────

fn spawn_scrub_thread(slot: FrameSlot, scrub_tx: Sender<MediaResult>) {
    thread::spawn(move || {
        let mut live: Option<LiveDecoder> = None;
        loop {
            let req = {
                let (lock, cvar) = &*slot;
                let mut guard = lock.lock();
                loop {
                    if let Some(req) = guard.take() { break req; }
                    cvar.wait(&mut guard);
                }
            };

            if req.id.is_nil() { return; }

            // Re-open on a different file, any backward move, or a forward
            // jump over 2 s (decoding forward that far is slower than a seek).
            let needs_reset = live.as_ref().map(|d| {
                let target = d.ts_to_pts(req.timestamp);
                d.path != req.path
                    || target <= d.last_pts
                    || target > d.last_pts + d.ts_to_pts(2.0)
            }).unwrap_or(true);

            if needs_reset {
                live = match LiveDecoder::open(&req.path, req.timestamp, MAX_FRAME_SIDE) {
                    Ok(d) => Some(d),
                    Err(e) => {
                        eprintln!("[media] scrub open {}: {e:#}", req.path.display());
                        None
                    }
                };
            }

            let Some(d) = live.as_mut() else { continue };
            let target = d.ts_to_pts(req.timestamp);
            if let Some((data, width, height)) = d.advance_to(target) {
                let _ = scrub_tx.send(MediaResult::VideoFrame { id: req.id, width, height, data });
            }
        }
    });
}

// ── Playback thread ───────────────────────────────────────────────────────────

fn spawn_playback_thread(
    cmd_rx:   Receiver<PlaybackCmd>,
    frame_tx: Sender<PlaybackFrame>,
    err_tx:   Sender<MediaResult>,
) {
    let open = move |id: Uuid, generation: u64, path: &Path, ts: f64| -> Option<(Uuid, u64, LiveDecoder)> {
        match LiveDecoder::open(path, ts, MAX_FRAME_SIDE) {
            Ok(mut d) => {
                // First frame sent is the one at `ts`, not the keyframe before it.
                d.skip_until_pts = d.ts_to_pts(ts);
                Some((id, generation, d))
            }
            Err(e) => {
                eprintln!("[pb] open {}: {e:#}", path.display());
                let _ = err_tx.send(MediaResult::Error { id, msg: format!("{e:#}") });
                None
            }
        }
    };

    thread::spawn(move || {
        let mut decoder: Option<(Uuid, u64, LiveDecoder)> = None;
        loop {
            let cmd = if decoder.is_some() {
                match cmd_rx.try_recv() {
                    Ok(cmd) => Some(cmd),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => return,
                }
            } else {
                match cmd_rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => return,
                }
            };

            match cmd {
                Some(PlaybackCmd::Start { id, generation, path, ts }) => {
                    decoder = open(id, generation, &path, ts);
                    continue;
                }
                Some(PlaybackCmd::Stop) => {
                    decoder = None;
                    continue;
                }
                None => {}
            }

            let Some((id, generation, d)) = decoder.as_mut() else { continue };
            // send() blocks while the channel is full; that is the rate limiter.
            match d.next_frame() {
                Some((data, width, height, timestamp)) => {
                    let f = PlaybackFrame { id: *id, generation: *generation, timestamp, width, height, data };
                    if frame_tx.send(f).is_err() { return; }
                }
                None => decoder = None, // EOF
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn load_of_missing_file_reports_error() {
        let _ = ffmpeg_the_third::init();
        let w  = MediaWorker::new();
        let id = Uuid::new_v4();
        w.load(id, PathBuf::from("/definitely/not/here.mp4"));
        match w.rx.recv_timeout(Duration::from_secs(5)) {
            Ok(MediaResult::Error { id: got, .. }) => assert_eq!(got, id),
            other => panic!("expected Error, got {other:?}"),
        }
        w.shutdown();
    }

    #[test]
    fn playback_of_missing_file_reports_error() {
        let _ = ffmpeg_the_third::init();
        let w  = MediaWorker::new();
        let id = Uuid::new_v4();
        w.start_playback(id, Path::new("/definitely/not/here.mp4"), 0.0);
        match w.rx.recv_timeout(Duration::from_secs(5)) {
            Ok(MediaResult::Error { id: got, .. }) => assert_eq!(got, id),
            other => panic!("expected Error, got {other:?}"),
        }
        assert!(w.pb_rx.try_recv().is_err());
        w.shutdown();
    }

    #[test]
    fn restart_and_stop_advance_generation() {
        let _ = ffmpeg_the_third::init();
        let w    = MediaWorker::new();
        let id   = Uuid::new_v4();
        let path = Path::new("/definitely/not/here.mp4");
        assert_eq!(w.playback_generation(), 0);

        w.start_playback(id, path, 40.0);
        let first = w.playback_generation();
        w.start_playback(id, path, 10.0);
        let second = w.playback_generation();
        assert!(second > first);

        w.stop_playback();
        assert!(w.playback_generation() > second);
        w.shutdown();
    }
}
