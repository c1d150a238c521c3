// crates/loopdesk-core/src/helpers/time.rs
//
// Time-formatting utilities shared by the player, timeline and key-moment list.

/// Format seconds as `MM:SS` with floored minutes and seconds.
///
/// Zero, negative and non-finite inputs all render as `00:00` so an unloaded
/// player never shows garbage.
///
/// ```
/// use loopdesk_core::helpers::time::format_time;
/// assert_eq!(format_time(0.0),      "00:00");
/// assert_eq!(format_time(f64::NAN), "00:00");
/// assert_eq!(format_time(61.9),     "01:01");
/// assert_eq!(format_time(3599.0),   "59:59");
/// ```
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "00:00".into();
    }
    let total = secs.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format seconds for segment tooltips: whole seconds print without a
/// fraction, everything else keeps up to two decimals.
///
/// ```
/// use loopdesk_core::helpers::time::format_seconds;
/// assert_eq!(format_seconds(4.0),  "4");
/// assert_eq!(format_seconds(2.5),  "2.5");
/// assert_eq!(format_seconds(1.25), "1.25");
/// ```
pub fn format_seconds(secs: f64) -> String {
    if secs.fract() == 0.0 {
        format!("{}", secs as i64)
    } else {
        let s = format!("{secs:.2}");
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_roll_into_minutes() {
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(7325.4), "122:05");
    }

    #[test]
    fn negative_and_infinite_are_zero() {
        assert_eq!(format_time(-3.0), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn sub_second_floors_to_zero() {
        assert_eq!(format_time(0.99), "00:00");
    }
}
