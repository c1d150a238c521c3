// crates/loopdesk-core/src/key_moments.rs
//
// Evenly spaced "key moments" derived from the video duration alone.

use serde::{Deserialize, Serialize};

/// How many moments a generation produces.
pub const KEY_MOMENT_COUNT: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    pub id:        String,
    pub title:     String,
    pub timestamp: f64,
}

/// Split `duration` into `KEY_MOMENT_COUNT + 1` equal parts and place one
/// moment on each inner boundary, rounded to the nearest whole second.
///
/// Rounding is skipped when the parts are shorter than a second, otherwise a
/// 3 s clip would collapse several moments onto the same second. Returns an
/// empty list when there is no duration.
///
/// ```
/// use loopdesk_core::key_moments::generate_key_moments;
/// let m = generate_key_moments(60.0);
/// let ts: Vec<f64> = m.iter().map(|k| k.timestamp).collect();
/// assert_eq!(ts, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
/// assert_eq!(m[0].id, "moment-1");
/// assert_eq!(m[4].title, "Key Moment 5");
/// ```
pub fn generate_key_moments(duration: f64) -> Vec<KeyMoment> {
    if !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }
    let part = duration / (KEY_MOMENT_COUNT + 1) as f64;
    (1..=KEY_MOMENT_COUNT)
        .map(|i| {
            let raw = part * i as f64;
            KeyMoment {
                id:        format!("moment-{i}"),
                title:     format!("Key Moment {i}"),
                timestamp: if part >= 1.0 { raw.round() } else { raw },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(duration: f64) {
        let m = generate_key_moments(duration);
        assert_eq!(m.len(), KEY_MOMENT_COUNT, "duration {duration}");
        for pair in m.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp, "duration {duration}: {m:?}");
        }
        for k in &m {
            assert!(k.timestamp > 0.0 && k.timestamp < duration, "duration {duration}: {k:?}");
        }
    }

    #[test]
    fn always_five_strictly_inside() {
        for &d in &[0.3, 1.0, 2.9, 5.99, 6.0, 7.3, 13.0, 59.5, 63.0, 600.0, 7200.25] {
            assert_well_formed(d);
        }
    }

    #[test]
    fn rounds_to_whole_seconds() {
        let ts: Vec<f64> = generate_key_moments(63.0).iter().map(|k| k.timestamp).collect();
        // 63 / 6 = 10.5 → 10.5, 21, 31.5, 42, 52.5 → rounded half away from zero.
        assert_eq!(ts, vec![11.0, 21.0, 32.0, 42.0, 53.0]);
    }

    #[test]
    fn deterministic_across_calls() {
        assert_eq!(generate_key_moments(47.2), generate_key_moments(47.2));
    }

    #[test]
    fn nothing_without_duration() {
        assert!(generate_key_moments(0.0).is_empty());
        assert!(generate_key_moments(-4.0).is_empty());
        assert!(generate_key_moments(f64::NAN).is_empty());
    }

    #[test]
    fn short_clip_keeps_fractional_spacing() {
        let ts: Vec<f64> = generate_key_moments(3.0).iter().map(|k| k.timestamp).collect();
        assert_eq!(ts, vec![0.5, 1.0, 1.5, 2.0, 2.5]);
    }
}
