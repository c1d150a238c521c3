// crates/loopdesk-core/src/playback.rs
//
// PlaybackState: the single owner of "what is loaded, where is the playhead,
// is it running". The UI changes it through the methods below, either from
// user commands or from media-worker results; nothing writes the fields
// directly.
//
// Every load gets a fresh id. Worker results carry the id they were started
// for, and anything tagged with a replaced id is ignored.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::source::VideoSource;

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedSource {
    pub id:     Uuid,
    pub source: VideoSource,
    /// Local file the decoder reads. `None` while a URL is still downloading.
    pub path:   Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub source:       Option<LoadedSource>,
    pub current_time: f64,
    pub duration:     f64,
    pub is_playing:   bool,
    pub video_loaded: bool,
    pub video_size:   Option<(u32, u32)>,
}

impl PlaybackState {
    // ── Source lifecycle ─────────────────────────────────────────────────────

    /// Replace the source (or clear it with `None`) and reset to unloaded.
    /// Returns the new load id.
    pub fn set_source(&mut self, source: Option<VideoSource>) -> Option<Uuid> {
        self.reset_unloaded();
        self.source = source.map(|source| {
            let path = match &source {
                VideoSource::File(p) => Some(p.clone()),
                VideoSource::Url(_)  => None,
            };
            LoadedSource { id: Uuid::new_v4(), source, path }
        });
        self.source_id()
    }

    pub fn source_id(&self) -> Option<Uuid> {
        self.source.as_ref().map(|s| s.id)
    }

    pub fn is_current(&self, id: Uuid) -> bool {
        self.source_id() == Some(id)
    }

    pub fn playable_path(&self) -> Option<&Path> {
        self.source.as_ref().and_then(|s| s.path.as_deref())
    }

    /// A download finished: the URL source now has a local file.
    pub fn attach_path(&mut self, id: Uuid, path: PathBuf) -> bool {
        match self.source.as_mut() {
            Some(s) if s.id == id => {
                s.path = Some(path);
                true
            }
            _ => false,
        }
    }

    /// Metadata arrived for `id`. A non-positive or non-finite duration is
    /// treated as a load failure.
    pub fn on_loaded(&mut self, id: Uuid, duration: f64, width: u32, height: u32) -> bool {
        if !self.is_current(id) {
            return false;
        }
        if !duration.is_finite() || duration <= 0.0 {
            return self.on_error(id);
        }
        self.duration     = duration;
        self.video_loaded = true;
        self.video_size   = (width > 0 && height > 0).then_some((width, height));
        self.current_time = self.current_time.clamp(0.0, duration);
        true
    }

    /// The source failed to download, probe or decode. Back to unloaded, but
    /// the source reference stays so the UI can still name what failed.
    pub fn on_error(&mut self, id: Uuid) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.reset_unloaded();
        true
    }

    fn reset_unloaded(&mut self) {
        self.current_time = 0.0;
        self.duration     = 0.0;
        self.is_playing   = false;
        self.video_loaded = false;
        self.video_size   = None;
    }

    // ── Transport ────────────────────────────────────────────────────────────

    /// Start playback. Ignored until loaded; restarts from 0 when sitting at
    /// the end.
    pub fn play(&mut self) -> bool {
        if !self.video_loaded {
            return false;
        }
        if self.has_ended() {
            self.current_time = 0.0;
        }
        self.is_playing = true;
        true
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.is_playing {
            self.pause();
            true
        } else {
            self.play()
        }
    }

    /// Jump to `t`. A no-op unless loaded and `0 ≤ t ≤ duration`.
    pub fn seek(&mut self, t: f64) -> bool {
        if !self.video_loaded || !(0.0..=self.duration).contains(&t) {
            return false;
        }
        self.current_time = t;
        true
    }

    /// Advance the clock by `dt` seconds while playing. Returns true on the
    /// tick that reaches the end, which also stops playback.
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.is_playing || !self.video_loaded || !(dt > 0.0) {
            return false;
        }
        self.current_time = (self.current_time + dt).min(self.duration);
        if self.has_ended() {
            self.is_playing = false;
            return true;
        }
        false
    }

    pub fn has_ended(&self) -> bool {
        self.video_loaded && self.current_time >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(duration: f64) -> (PlaybackState, Uuid) {
        let mut p = PlaybackState::default();
        let id = p.set_source(Some(VideoSource::File("/clips/a.mp4".into()))).unwrap();
        assert!(p.on_loaded(id, duration, 1280, 720));
        (p, id)
    }

    #[test]
    fn file_source_is_immediately_playable() {
        let (p, _) = loaded(30.0);
        assert_eq!(p.playable_path(), Some(Path::new("/clips/a.mp4")));
        assert!(p.video_loaded);
        assert_eq!(p.video_size, Some((1280, 720)));
    }

    #[test]
    fn url_source_waits_for_download() {
        let mut p = PlaybackState::default();
        let id = p.set_source(Some(VideoSource::Url("https://x/y.mp4".into()))).unwrap();
        assert_eq!(p.playable_path(), None);
        assert!(p.attach_path(id, "/tmp/y.mp4".into()));
        assert_eq!(p.playable_path(), Some(Path::new("/tmp/y.mp4")));
    }

    #[test]
    fn new_source_resets_transport() {
        let (mut p, _) = loaded(30.0);
        p.seek(12.0);
        p.play();
        p.set_source(Some(VideoSource::File("/clips/b.mp4".into())));
        assert_eq!(p.current_time, 0.0);
        assert!(!p.is_playing);
        assert!(!p.video_loaded);
        assert_eq!(p.duration, 0.0);
    }

    #[test]
    fn clearing_source_resets_everything() {
        let (mut p, _) = loaded(30.0);
        assert_eq!(p.set_source(None), None);
        assert_eq!(p, PlaybackState::default());
    }

    #[test]
    fn seek_outside_range_is_noop() {
        let (mut p, _) = loaded(30.0);
        p.seek(10.0);
        let before = p.clone();
        assert!(!p.seek(-0.1));
        assert!(!p.seek(30.01));
        assert!(!p.seek(f64::NAN));
        assert_eq!(p, before);
        assert!(p.seek(30.0));
        assert!(p.seek(0.0));
    }

    #[test]
    fn seek_and_play_ignored_when_unloaded() {
        let mut p = PlaybackState::default();
        assert!(!p.seek(0.0));
        assert!(!p.play());
        assert!(!p.is_playing);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut p = PlaybackState::default();
        let old = p.set_source(Some(VideoSource::File("/a.mp4".into()))).unwrap();
        let new = p.set_source(Some(VideoSource::File("/b.mp4".into()))).unwrap();
        assert_ne!(old, new);
        assert!(!p.on_loaded(old, 10.0, 640, 360));
        assert!(!p.attach_path(old, "/tmp/x".into()));
        assert!(!p.video_loaded);
        assert!(p.on_loaded(new, 10.0, 640, 360));
        assert!(!p.on_error(old));
        assert!(p.video_loaded);
    }

    #[test]
    fn error_resets_to_unloaded_but_keeps_source() {
        let (mut p, id) = loaded(30.0);
        p.seek(5.0);
        p.play();
        assert!(p.on_error(id));
        assert!(!p.video_loaded);
        assert!(!p.is_playing);
        assert_eq!(p.duration, 0.0);
        assert_eq!(p.current_time, 0.0);
        assert_eq!(p.source_id(), Some(id));
    }

    #[test]
    fn zero_duration_metadata_counts_as_failure() {
        let mut p = PlaybackState::default();
        let id = p.set_source(Some(VideoSource::File("/a.mp4".into()))).unwrap();
        assert!(p.on_loaded(id, 0.0, 640, 360));
        assert!(!p.video_loaded);
    }

    #[test]
    fn advance_clamps_and_stops_at_end() {
        let (mut p, _) = loaded(2.0);
        p.play();
        assert!(!p.advance(1.5));
        assert!(p.advance(1.0));
        assert_eq!(p.current_time, 2.0);
        assert!(!p.is_playing);
        assert!(p.has_ended());
    }

    #[test]
    fn play_at_end_restarts() {
        let (mut p, _) = loaded(2.0);
        p.seek(2.0);
        assert!(p.play());
        assert_eq!(p.current_time, 0.0);
    }

    #[test]
    fn advance_does_nothing_while_paused() {
        let (mut p, _) = loaded(2.0);
        assert!(!p.advance(1.0));
        assert_eq!(p.current_time, 0.0);
    }

    #[test]
    fn toggle_flips() {
        let (mut p, _) = loaded(5.0);
        assert!(p.toggle());
        assert!(p.is_playing);
        assert!(p.toggle());
        assert!(!p.is_playing);
    }
}
