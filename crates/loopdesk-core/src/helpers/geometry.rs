// crates/loopdesk-core/src/helpers/geometry.rs
//
// Time ↔ pixel mapping for the timeline track, plus the frame letterbox used
// by the player canvas. Times are seconds (f64), distances are pixels (f32).

/// Narrowest a segment bar is ever drawn, so zero-length spans stay visible.
pub const MIN_SEGMENT_WIDTH_PX: f32 = 2.0;

/// Pixels per second at 1× timeline zoom.
pub const BASE_PX_PER_SEC: f32 = 50.0;

/// Horizontal offset of `time` on a track `track_width` pixels wide.
///
/// Returns 0 when either the duration or the track width is not positive,
/// which is the state before metadata arrives or before the first layout.
///
/// ```
/// use loopdesk_core::helpers::geometry::position;
/// assert_eq!(position(30.0, 60.0, 400.0), 200.0);
/// assert_eq!(position(5.0, 0.0, 400.0), 0.0);
/// ```
pub fn position(time: f64, duration: f64, track_width: f32) -> f32 {
    if duration <= 0.0 || track_width <= 0.0 {
        return 0.0;
    }
    (time / duration * track_width as f64) as f32
}

/// Pixel width of a `span`-second interval, floored at [`MIN_SEGMENT_WIDTH_PX`].
pub fn span_width(span: f64, duration: f64, track_width: f32) -> f32 {
    if duration <= 0.0 || track_width <= 0.0 {
        return 0.0;
    }
    position(span, duration, track_width).max(MIN_SEGMENT_WIDTH_PX)
}

/// Inverse of [`position`]: the time under horizontal offset `x`.
/// `x` is clamped to the track so the result always lies in `[0, duration]`.
pub fn time_at(x: f32, duration: f64, track_width: f32) -> f64 {
    if duration <= 0.0 || track_width <= 0.0 {
        return 0.0;
    }
    let x = x.clamp(0.0, track_width);
    (x as f64 / track_width as f64 * duration).clamp(0.0, duration)
}

/// Width of the scrollable track content: the zoomed duration, never narrower
/// than the visible display.
pub fn content_width(duration: f64, zoom: f32, display_width: f32) -> f32 {
    let zoomed = duration.max(0.0) as f32 * BASE_PX_PER_SEC * zoom;
    zoomed.max(display_width.max(0.0))
}

/// Scroll offset that keeps the playhead centred in the display.
/// Zero when the whole track already fits.
pub fn follow_scroll_offset(
    time:          f64,
    duration:      f64,
    content_width: f32,
    display_width: f32,
) -> f32 {
    if content_width <= display_width {
        return 0.0;
    }
    let max_offset = content_width - display_width;
    (position(time, duration, content_width) - display_width / 2.0).clamp(0.0, max_offset)
}

/// Largest `(w, h)` with the frame's aspect ratio that fits inside
/// `(box_w, box_h)`.
///
/// ```
/// use loopdesk_core::helpers::geometry::letterbox;
/// assert_eq!(letterbox(1920, 1080, 320.0, 320.0), (320.0, 180.0));
/// ```
pub fn letterbox(frame_w: u32, frame_h: u32, box_w: f32, box_h: f32) -> (f32, f32) {
    if frame_w == 0 || frame_h == 0 {
        return (box_w, box_h);
    }
    let ratio = frame_w as f32 / frame_h as f32;
    let h = box_w / ratio;
    if h <= box_h { (box_w, h) } else { (box_h * ratio, box_h) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_to_track_edges() {
        for &(d, w) in &[(1.0, 100.0_f32), (63.5, 812.0), (3600.0, 1.0)] {
            assert_eq!(position(0.0, d, w), 0.0);
            assert!((position(d, d, w) - w).abs() < 1e-3);
        }
    }

    #[test]
    fn zero_width_track_maps_everything_to_zero() {
        assert_eq!(position(10.0, 60.0, 0.0), 0.0);
        assert_eq!(span_width(10.0, 60.0, 0.0), 0.0);
    }

    #[test]
    fn zero_length_span_is_still_visible() {
        assert_eq!(span_width(0.0, 60.0, 600.0), MIN_SEGMENT_WIDTH_PX);
        assert_eq!(span_width(0.01, 3600.0, 300.0), MIN_SEGMENT_WIDTH_PX);
        assert_eq!(span_width(6.0, 60.0, 600.0), 60.0);
    }

    #[test]
    fn time_at_clamps_outside_track() {
        assert_eq!(time_at(-40.0, 60.0, 600.0), 0.0);
        assert_eq!(time_at(900.0, 60.0, 600.0), 60.0);
        assert!((time_at(150.0, 60.0, 600.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn content_never_narrower_than_display() {
        assert_eq!(content_width(2.0, 1.0, 800.0), 800.0);
        assert_eq!(content_width(60.0, 2.0, 800.0), 6000.0);
        assert_eq!(content_width(0.0, 5.0, 640.0), 640.0);
    }

    #[test]
    fn follow_centres_playhead() {
        // 6000 px of content, 800 px visible, playhead at 30 s of 60 s → 3000 px.
        assert_eq!(follow_scroll_offset(30.0, 60.0, 6000.0, 800.0), 2600.0);
        // Near the start the offset never goes negative.
        assert_eq!(follow_scroll_offset(1.0, 60.0, 6000.0, 800.0), 0.0);
        // Near the end it never scrolls past the content.
        assert_eq!(follow_scroll_offset(60.0, 60.0, 6000.0, 800.0), 5200.0);
        // Everything fits: no scrolling.
        assert_eq!(follow_scroll_offset(30.0, 60.0, 800.0, 800.0), 0.0);
    }

    #[test]
    fn letterbox_portrait_in_landscape_box() {
        let (w, h) = letterbox(1080, 1920, 1600.0, 900.0);
        assert!((h - 900.0).abs() < 1e-3);
        assert!((w - 506.25).abs() < 1e-3);
    }
}
