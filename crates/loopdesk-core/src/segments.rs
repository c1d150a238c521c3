// crates/loopdesk-core/src/segments.rs
//
// Pre-supplied timeline annotations. Nothing computes these at runtime; the
// review screen overlays the same static set on whatever video is loaded.

use serde::{Deserialize, Serialize};

use crate::helpers::time::format_seconds;

/// Sample clip offered on the upload screen.
pub const SAMPLE_VIDEO_URL: &str =
    "https://www.learningcontainer.com/wp-content/uploads/2020/05/sample-mp4-file.mp4";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Silent,
    Highlight,
}

impl SegmentKind {
    pub fn label(self) -> &'static str {
        match self {
            SegmentKind::Silent    => "Silent",
            SegmentKind::Highlight => "Highlighted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoSegment {
    pub id:    String,
    pub start: f64,
    pub end:   f64,
    pub kind:  SegmentKind,
}

impl VideoSegment {
    fn new(id: &str, start: f64, end: f64, kind: SegmentKind) -> Self {
        Self { id: id.into(), start, end, kind }
    }

    pub fn span(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Hover text, e.g. `Silent segment: 5s - 10s`.
    pub fn tooltip(&self) -> String {
        format!(
            "{} segment: {}s - {}s",
            self.kind.label(),
            format_seconds(self.start),
            format_seconds(self.end),
        )
    }
}

/// The fixed segment set shown on every timeline.
pub fn sample_segments() -> Vec<VideoSegment> {
    vec![
        VideoSegment::new("s1",  5.0, 10.0, SegmentKind::Silent),
        VideoSegment::new("s2", 20.0, 30.0, SegmentKind::Highlight),
        VideoSegment::new("s3", 50.0, 55.0, SegmentKind::Silent),
        VideoSegment::new("s4", 60.0, 63.0, SegmentKind::Highlight),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_is_ordered_and_non_negative() {
        let s = sample_segments();
        assert_eq!(s.len(), 4);
        for seg in &s {
            assert!(seg.start >= 0.0 && seg.end >= seg.start, "{seg:?}");
        }
        for pair in s.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn tooltip_wording() {
        let s = sample_segments();
        assert_eq!(s[0].tooltip(), "Silent segment: 5s - 10s");
        assert_eq!(s[1].tooltip(), "Highlighted segment: 20s - 30s");
    }

    #[test]
    fn inverted_span_is_zero() {
        let seg = VideoSegment::new("x", 8.0, 3.0, SegmentKind::Silent);
        assert_eq!(seg.span(), 0.0);
    }
}
