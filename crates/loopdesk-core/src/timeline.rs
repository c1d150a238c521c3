// crates/loopdesk-core/src/timeline.rs
//
// Timeline view logic that doesn't need a painter: ruler tick selection,
// zoom stepping, and the playhead drag throttle.

use crate::helpers::geometry::time_at;

// ── Zoom ──────────────────────────────────────────────────────────────────────

pub const ZOOM_MIN:     f32 = 0.5;
pub const ZOOM_MAX:     f32 = 5.0;
pub const ZOOM_STEP:    f32 = 0.5;
pub const ZOOM_DEFAULT: f32 = 1.0;

pub fn zoom_in(zoom: f32) -> f32 {
    (zoom + ZOOM_STEP).min(ZOOM_MAX)
}

pub fn zoom_out(zoom: f32) -> f32 {
    (zoom - ZOOM_STEP).max(ZOOM_MIN)
}

/// Snap a restored or user-supplied zoom back into range.
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() { zoom.clamp(ZOOM_MIN, ZOOM_MAX) } else { ZOOM_DEFAULT }
}

// ── Ruler ticks ───────────────────────────────────────────────────────────────

/// Seconds between ruler ticks for a given pixel density.
///
/// | px/s    | interval |
/// |---------|----------|
/// | ≥ 10    | 1 s      |
/// | < 10    | 5 s      |
/// | < 3     | 10 s     |
/// | < 1     | 30 s     |
/// | < 0.5   | 60 s     |
///
/// ```
/// use loopdesk_core::timeline::tick_interval;
/// assert_eq!(tick_interval(50.0), 1);
/// assert_eq!(tick_interval(4.0),  5);
/// assert_eq!(tick_interval(0.2),  60);
/// ```
pub fn tick_interval(px_per_sec: f32) -> u32 {
    if px_per_sec < 0.5 {
        60
    } else if px_per_sec < 1.0 {
        30
    } else if px_per_sec < 3.0 {
        10
    } else if px_per_sec < 10.0 {
        5
    } else {
        1
    }
}

/// How many intervals apart labelled ticks sit.
pub fn major_tick_factor(interval: u32) -> u32 {
    if interval == 1 || interval == 5 { 5 } else { 2 }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub time:  f64,
    pub major: bool,
}

/// Ruler ticks for a track `content_width` pixels wide showing `duration`
/// seconds. Ticks fall on whole multiples of the interval, from 0 up to and
/// including `duration`.
pub fn ticks(duration: f64, content_width: f32) -> Vec<Tick> {
    if duration <= 0.0 || content_width <= 0.0 || !duration.is_finite() {
        return Vec::new();
    }
    let interval = tick_interval(content_width / duration as f32);
    let major_every = interval * major_tick_factor(interval);
    let last = duration.floor() as u64;

    (0..=last)
        .step_by(interval as usize)
        .map(|t| Tick { time: t as f64, major: t % major_every as u64 == 0 })
        .collect()
}

// ── Playhead drag ─────────────────────────────────────────────────────────────

/// Tracks a playhead drag and throttles its seeks to one per rendered frame.
///
/// Pointer moves can arrive many times per frame on high-rate mice; only the
/// first one in each frame produces a seek, and later moves in the same frame
/// are folded into the next one.
#[derive(Debug, Default)]
pub struct PlayheadDrag {
    active:      bool,
    last_frame:  Option<u64>,
    last_x:      Option<f32>,
    last_target: Option<f64>,
    duration:    f64,
    resume_play: bool,
}

impl PlayheadDrag {
    /// Start a drag. Refused unless a video is loaded with a real duration.
    /// `was_playing` is remembered so playback can resume on release.
    pub fn begin(&mut self, loaded: bool, duration: f64, was_playing: bool) -> bool {
        if !loaded || duration <= 0.0 {
            return false;
        }
        *self = Self {
            active:      true,
            duration,
            resume_play: was_playing,
            ..Self::default()
        };
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Map a pointer offset to a seek target, at most once per `frame` and
    /// only when the pointer moved since the last target.
    pub fn update(&mut self, x: f32, track_width: f32, duration: f64, frame: u64) -> Option<f64> {
        if !self.active || self.last_frame == Some(frame) || self.last_x == Some(x) {
            return None;
        }
        self.last_frame  = Some(frame);
        self.last_x      = Some(x);
        let t = time_at(x, duration, track_width);
        self.last_target = Some(t);
        Some(t)
    }

    /// End the drag. Returns true when playback was running at `begin` and
    /// the playhead was not dropped at the very end.
    pub fn end(&mut self) -> bool {
        let at_end = self.last_target.is_some_and(|t| t >= self.duration);
        let resume = self.active && self.resume_play && !at_end;
        *self = Self::default();
        resume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_table_boundaries() {
        assert_eq!(tick_interval(10.0), 1);
        assert_eq!(tick_interval(9.99), 5);
        assert_eq!(tick_interval(3.0), 5);
        assert_eq!(tick_interval(2.99), 10);
        assert_eq!(tick_interval(1.0), 10);
        assert_eq!(tick_interval(0.99), 30);
        assert_eq!(tick_interval(0.5), 30);
        assert_eq!(tick_interval(0.49), 60);
    }

    #[test]
    fn major_factor_by_interval() {
        assert_eq!(major_tick_factor(1), 5);
        assert_eq!(major_tick_factor(5), 5);
        assert_eq!(major_tick_factor(10), 2);
        assert_eq!(major_tick_factor(30), 2);
        assert_eq!(major_tick_factor(60), 2);
    }

    #[test]
    fn ticks_at_one_second_density() {
        // 12 s on 600 px = 50 px/s → 1 s ticks, labelled every 5 s.
        let t = ticks(12.0, 600.0);
        assert_eq!(t.len(), 13);
        assert_eq!(t[0], Tick { time: 0.0, major: true });
        assert!(!t[1].major);
        assert!(t[5].major);
        assert!(t[10].major);
        assert_eq!(t.last().map(|k| k.time), Some(12.0));
    }

    #[test]
    fn ticks_at_coarse_density() {
        // 600 s on 300 px = 0.5 px/s → 30 s ticks, labelled every 60 s.
        let t = ticks(600.0, 300.0);
        assert_eq!(t.len(), 21);
        assert!(t.iter().all(|k| k.time % 30.0 == 0.0));
        assert!(t.iter().filter(|k| k.major).all(|k| k.time % 60.0 == 0.0));
        assert!(!t[1].major);
        assert!(t[2].major);
    }

    #[test]
    fn no_ticks_without_duration() {
        assert!(ticks(0.0, 600.0).is_empty());
        assert!(ticks(10.0, 0.0).is_empty());
    }

    #[test]
    fn zoom_steps_stay_in_range() {
        assert_eq!(zoom_in(1.0), 1.5);
        assert_eq!(zoom_in(5.0), 5.0);
        assert_eq!(zoom_out(1.0), 0.5);
        assert_eq!(zoom_out(0.5), 0.5);
        assert_eq!(clamp_zoom(12.0), 5.0);
        assert_eq!(clamp_zoom(f32::NAN), ZOOM_DEFAULT);
    }

    #[test]
    fn drag_refused_when_unloaded() {
        let mut d = PlayheadDrag::default();
        assert!(!d.begin(false, 30.0, false));
        assert!(!d.begin(true, 0.0, false));
        assert!(!d.is_active());
        assert_eq!(d.update(10.0, 100.0, 30.0, 1), None);
    }

    #[test]
    fn drag_emits_once_per_frame() {
        let mut d = PlayheadDrag::default();
        assert!(d.begin(true, 60.0, false));
        assert_eq!(d.update(50.0, 600.0, 60.0, 7), Some(5.0));
        assert_eq!(d.update(60.0, 600.0, 60.0, 7), None);
        assert_eq!(d.update(60.0, 600.0, 60.0, 8), Some(6.0));
    }

    #[test]
    fn still_pointer_emits_no_seek() {
        let mut d = PlayheadDrag::default();
        d.begin(true, 60.0, false);
        assert_eq!(d.update(120.0, 600.0, 60.0, 1), Some(12.0));
        assert_eq!(d.update(120.0, 600.0, 60.0, 2), None);
        assert_eq!(d.update(120.0, 600.0, 60.0, 3), None);
        assert_eq!(d.update(150.0, 600.0, 60.0, 4), Some(15.0));
    }

    #[test]
    fn drop_at_end_does_not_resume() {
        let mut d = PlayheadDrag::default();
        d.begin(true, 60.0, true);
        assert_eq!(d.update(9000.0, 600.0, 60.0, 1), Some(60.0));
        assert!(!d.end());

        d.begin(true, 60.0, true);
        assert_eq!(d.update(300.0, 600.0, 60.0, 2), Some(30.0));
        assert!(d.end());
    }

    #[test]
    fn drag_clamps_pointer_to_track() {
        let mut d = PlayheadDrag::default();
        d.begin(true, 60.0, false);
        assert_eq!(d.update(-25.0, 600.0, 60.0, 1), Some(0.0));
        assert_eq!(d.update(9000.0, 600.0, 60.0, 2), Some(60.0));
    }

    #[test]
    fn drag_end_reports_resume() {
        let mut d = PlayheadDrag::default();
        d.begin(true, 60.0, true);
        assert!(d.end());
        assert!(!d.is_active());
        // A second end without a drag never resumes.
        assert!(!d.end());
    }
}
