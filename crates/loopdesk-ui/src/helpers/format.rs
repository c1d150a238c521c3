// crates/loopdesk-ui/src/helpers/format.rs
//
// Display-only string helpers. Time formatting lives in
// loopdesk_core::helpers::time.

/// Truncates `text` to fit within `max_px` using a per-character width
/// heuristic (≈ 6.5 px/char at 11 px proportional). Appends "…" when
/// truncated. Avoids egui font measurement, which needs `&mut Fonts`.
pub fn fit_label(text: &str, max_px: f32) -> String {
    const AVG_CHAR_PX: f32 = 6.5;
    let max_chars = (max_px / AVG_CHAR_PX).max(0.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    // One slot goes to the ellipsis.
    text.chars().take(max_chars - 1).collect::<String>() + "…"
}

/// Download progress for the loading overlay: "12.3 / 45.6 MB" when the size
/// is known, "12.3 MB" otherwise.
pub fn progress_label(received: u64, total: Option<u64>) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    let got = received as f64 / MB;
    match total {
        Some(t) if t > 0 => format!("{got:.1} / {:.1} MB", t as f64 / MB),
        _                => format!("{got:.1} MB"),
    }
}

/// "1.5×" style zoom label.
pub fn zoom_label(zoom: f32) -> String {
    if zoom.fract() == 0.0 {
        format!("Zoom: {zoom:.0}×")
    } else {
        format!("Zoom: {zoom:.1}×")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_unchanged() {
        assert_eq!(fit_label("Silent", 200.0), "Silent");
    }

    #[test]
    fn zero_budget_returns_empty() {
        assert_eq!(fit_label("Highlighted", 0.0), "");
    }

    #[test]
    fn truncated_text_has_ellipsis() {
        let out = fit_label("Highlighted segment", 30.0);
        assert!(out.ends_with('…'));
        assert_eq!(out.chars().count(), 4);
    }

    #[test]
    fn progress_with_and_without_total() {
        assert_eq!(progress_label(1024 * 1024, Some(4 * 1024 * 1024)), "1.0 / 4.0 MB");
        assert_eq!(progress_label(512 * 1024, None), "0.5 MB");
        assert_eq!(progress_label(0, Some(0)), "0.0 MB");
    }

    #[test]
    fn zoom_labels() {
        assert_eq!(zoom_label(1.0), "Zoom: 1×");
        assert_eq!(zoom_label(1.5), "Zoom: 1.5×");
        assert_eq!(zoom_label(0.5), "Zoom: 0.5×");
    }
}
