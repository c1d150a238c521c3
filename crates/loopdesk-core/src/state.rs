// crates/loopdesk-core/src/state.rs
// Review session data. No egui, no ffmpeg, no runtime handles.
// Only `ReviewPrefs` is serialized; everything else lives for one session.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SourceError;
use crate::key_moments::{generate_key_moments, KeyMoment};
use crate::playback::PlaybackState;
use crate::segments::{sample_segments, VideoSegment, SAMPLE_VIDEO_URL};
use crate::source::{validate_video_file, VideoSource};
use crate::timeline::{clamp_zoom, zoom_in, zoom_out, ZOOM_DEFAULT};

/// User preferences restored across launches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewPrefs {
    #[serde(default = "default_zoom")]
    pub timeline_zoom: f32,
    #[serde(default = "default_volume")]
    pub volume:        f32,
    #[serde(default)]
    pub muted:         bool,
}

fn default_zoom() -> f32 { ZOOM_DEFAULT }
fn default_volume() -> f32 { 1.0 }

impl Default for ReviewPrefs {
    fn default() -> Self {
        Self { timeline_zoom: default_zoom(), volume: default_volume(), muted: false }
    }
}

impl ReviewPrefs {
    /// Pull values from an older or hand-edited store back into range.
    pub fn sanitized(mut self) -> Self {
        self.timeline_zoom = clamp_zoom(self.timeline_zoom);
        self.volume = if self.volume.is_finite() { self.volume.clamp(0.0, 1.0) } else { 1.0 };
        self
    }
}

/// Alert shown in a modal until dismissed.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub title:   String,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ReviewState {
    pub playback:    PlaybackState,
    /// Static annotations overlaid on the timeline.
    pub segments:    Vec<VideoSegment>,
    pub key_moments: Vec<KeyMoment>,
    /// Upload screen visible instead of the review layout.
    pub show_upload: bool,
    pub prefs:       ReviewPrefs,
    pub notice:      Option<Notice>,
    /// The current source failed; cleared when it is replaced.
    pub load_failed: bool,
    /// Loads queued for the media worker, drained by app.rs each frame.
    pub pending_fetches: Vec<(Uuid, String)>,
    pub pending_loads:   Vec<(Uuid, PathBuf)>,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self::new(ReviewPrefs::default())
    }
}

impl ReviewState {
    pub fn new(prefs: ReviewPrefs) -> Self {
        Self {
            playback:        PlaybackState::default(),
            segments:        sample_segments(),
            key_moments:     Vec::new(),
            show_upload:     true,
            prefs:           prefs.sanitized(),
            notice:          None,
            load_failed:     false,
            pending_fetches: Vec::new(),
            pending_loads:   Vec::new(),
        }
    }

    // ── Source ───────────────────────────────────────────────────────────────

    /// Validate and load a local file. A rejected file leaves the current
    /// source untouched and raises a notice.
    pub fn open_file(&mut self, path: &Path) -> Result<Uuid, SourceError> {
        let path = match validate_video_file(path) {
            Ok(p) => p,
            Err(e) => {
                self.notice = Some(Notice { title: "Invalid file".into(), message: e.to_string() });
                return Err(e);
            }
        };
        let id = self.replace_source(VideoSource::File(path.clone()));
        self.pending_loads.push((id, path));
        Ok(id)
    }

    /// Load the built-in sample clip. It has to be downloaded first.
    pub fn use_sample(&mut self) -> Uuid {
        let id = self.replace_source(VideoSource::Url(SAMPLE_VIDEO_URL.into()));
        self.pending_fetches.push((id, SAMPLE_VIDEO_URL.into()));
        id
    }

    fn replace_source(&mut self, source: VideoSource) -> Uuid {
        self.pending_fetches.clear();
        self.pending_loads.clear();
        self.key_moments.clear();
        self.load_failed = false;
        self.show_upload = false;
        // set_source always yields an id for Some(_).
        self.playback.set_source(Some(source)).unwrap_or_else(Uuid::nil)
    }

    /// Clear the source and return to the upload screen.
    pub fn new_upload(&mut self) {
        self.playback.set_source(None);
        self.pending_fetches.clear();
        self.pending_loads.clear();
        self.key_moments.clear();
        self.load_failed = false;
        self.show_upload = true;
    }

    /// The worker finished downloading `id`; queue it for probing.
    pub fn fetched(&mut self, id: Uuid, path: PathBuf) -> bool {
        if !self.playback.attach_path(id, path.clone()) {
            return false;
        }
        self.pending_loads.push((id, path));
        true
    }

    /// The worker could not load `id`. Stale ids are ignored.
    pub fn media_failed(&mut self, id: Uuid, msg: &str) -> bool {
        if !self.playback.on_error(id) {
            return false;
        }
        let name = self.playback.source.as_ref()
            .map(|s| s.source.display_name())
            .unwrap_or_default();
        self.load_failed = true;
        self.notice = Some(Notice {
            title:   "Video failed to load".into(),
            message: format!("Could not play {name}: {msg}"),
        });
        true
    }

    /// A source is set but neither loaded nor failed yet.
    pub fn is_loading(&self) -> bool {
        self.playback.source.is_some() && !self.playback.video_loaded && !self.load_failed
    }

    // ── Review ───────────────────────────────────────────────────────────────

    /// Replace the key-moment list. Only meaningful once a video is loaded.
    pub fn generate_key_moments(&mut self) -> bool {
        if !self.playback.video_loaded {
            return false;
        }
        self.key_moments = generate_key_moments(self.playback.duration);
        true
    }

    // ── View / prefs ─────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.prefs.timeline_zoom = zoom_in(self.prefs.timeline_zoom);
    }

    pub fn zoom_out(&mut self) {
        self.prefs.timeline_zoom = zoom_out(self.prefs.timeline_zoom);
    }

    pub fn set_volume(&mut self, v: f32) {
        if v.is_finite() {
            self.prefs.volume = v.clamp(0.0, 1.0);
        }
    }

    pub fn toggle_mute(&mut self) {
        self.prefs.muted = !self.prefs.muted;
    }

    /// Effective sink gain.
    pub fn output_volume(&self) -> f32 {
        if self.prefs.muted { 0.0 } else { self.prefs.volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_video() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".mp4").tempfile().unwrap()
    }

    #[test]
    fn starts_on_upload_screen() {
        let s = ReviewState::default();
        assert!(s.show_upload);
        assert!(s.playback.source.is_none());
        assert_eq!(s.segments.len(), 4);
    }

    #[test]
    fn open_file_queues_probe_and_shows_review() {
        let f = temp_video();
        let mut s = ReviewState::default();
        let id = s.open_file(f.path()).unwrap();
        assert!(!s.show_upload);
        assert_eq!(s.pending_loads, vec![(id, f.path().to_path_buf())]);
        assert!(s.notice.is_none());
    }

    #[test]
    fn invalid_file_raises_notice_and_keeps_state() {
        let f = temp_video();
        let mut s = ReviewState::default();
        let id = s.open_file(f.path()).unwrap();
        s.pending_loads.clear();

        assert!(s.open_file(Path::new("/tmp/readme.txt")).is_err());
        assert_eq!(s.playback.source_id(), Some(id));
        assert!(s.pending_loads.is_empty());
        let notice = s.notice.as_ref().unwrap();
        assert_eq!(notice.message, "Please select a valid video file (.mp4, .mov, etc.).");
    }

    #[test]
    fn sample_goes_through_fetch_then_load() {
        let mut s = ReviewState::default();
        let id = s.use_sample();
        assert_eq!(s.pending_fetches, vec![(id, SAMPLE_VIDEO_URL.to_string())]);
        assert!(s.pending_loads.is_empty());
        assert!(s.fetched(id, "/tmp/sample.mp4".into()));
        assert_eq!(s.pending_loads, vec![(id, PathBuf::from("/tmp/sample.mp4"))]);
    }

    #[test]
    fn stale_fetch_is_dropped() {
        let mut s = ReviewState::default();
        let old = s.use_sample();
        s.use_sample();
        assert!(!s.fetched(old, "/tmp/old.mp4".into()));
        assert!(s.pending_loads.is_empty());
    }

    #[test]
    fn new_upload_clears_source_and_moments() {
        let mut s = ReviewState::default();
        let id = s.use_sample();
        s.playback.on_loaded(id, 60.0, 640, 360);
        assert!(s.generate_key_moments());
        s.new_upload();
        assert!(s.show_upload);
        assert!(s.key_moments.is_empty());
        assert!(s.playback.source.is_none());
        assert!(s.pending_fetches.is_empty());
    }

    #[test]
    fn key_moments_need_a_loaded_video() {
        let mut s = ReviewState::default();
        assert!(!s.generate_key_moments());
        let id = s.use_sample();
        assert!(!s.generate_key_moments());
        s.playback.on_loaded(id, 60.0, 640, 360);
        assert!(s.generate_key_moments());
        assert_eq!(s.key_moments.len(), 5);
    }

    #[test]
    fn failure_sets_notice_once() {
        let mut s = ReviewState::default();
        let old = s.use_sample();
        let id = s.use_sample();
        assert!(!s.media_failed(old, "boom"));
        assert!(s.notice.is_none());
        assert!(s.media_failed(id, "404"));
        assert!(s.notice.as_ref().unwrap().message.contains("404"));
        assert!(s.load_failed);
        assert!(!s.is_loading());
    }

    #[test]
    fn loading_until_loaded_or_failed() {
        let mut s = ReviewState::default();
        assert!(!s.is_loading());
        let id = s.use_sample();
        assert!(s.is_loading());
        s.media_failed(id, "timeout");
        assert!(!s.is_loading());
        let id = s.use_sample();
        assert!(!s.load_failed);
        s.playback.on_loaded(id, 12.0, 640, 360);
        assert!(!s.is_loading());
    }

    #[test]
    fn prefs_are_sanitized() {
        let p = ReviewPrefs { timeline_zoom: 40.0, volume: -2.0, muted: true }.sanitized();
        assert_eq!(p.timeline_zoom, 5.0);
        assert_eq!(p.volume, 0.0);
        assert!(p.muted);
    }

    #[test]
    fn volume_and_mute() {
        let mut s = ReviewState::default();
        s.set_volume(0.4);
        assert_eq!(s.output_volume(), 0.4);
        s.toggle_mute();
        assert_eq!(s.output_volume(), 0.0);
        s.set_volume(f32::NAN);
        assert_eq!(s.prefs.volume, 0.4);
    }
}
