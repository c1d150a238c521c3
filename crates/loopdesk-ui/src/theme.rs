// src/theme.rs
use egui::{Context, Color32, Stroke, Visuals, Style};

// ── Palette ──────────────────────────────────────────────────────────────────
pub const ACCENT:        Color32 = Color32::from_rgb( 59, 130, 246);
pub const ACCENT_DIM:    Color32 = Color32::from_rgb( 30,  80, 170);
pub const ACCENT_HOVER:  Color32 = Color32::from_rgb( 96, 165, 250);

pub const DARK_BG_0:     Color32 = Color32::from_rgb( 12,  14,  18);
pub const DARK_BG_1:     Color32 = Color32::from_rgb( 18,  20,  26);
pub const DARK_BG_2:     Color32 = Color32::from_rgb( 26,  29,  37);
pub const DARK_BG_3:     Color32 = Color32::from_rgb( 36,  40,  50);
pub const DARK_BG_4:     Color32 = Color32::from_rgb( 48,  53,  66);

pub const DARK_TEXT:     Color32 = Color32::from_rgb(224, 226, 234);
pub const DARK_TEXT_DIM: Color32 = Color32::from_rgb(124, 130, 148);
pub const DARK_BORDER:   Color32 = Color32::from_rgb( 54,  60,  74);

pub const SEG_SILENT:    Color32 = Color32::from_rgb(220,  38,  38);
pub const SEG_HIGHLIGHT: Color32 = Color32::from_rgb( 22, 163,  74);
pub const PLAYHEAD:      Color32 = Color32::from_rgb(250, 250, 250);
pub const DROP_ZONE:     Color32 = Color32::from_rgb( 37,  99, 235);

pub fn configure_style(ctx: &Context) {
    let mut style = Style::default();

    style.spacing.item_spacing     = egui::vec2(6.0, 6.0);
    style.spacing.window_margin    = egui::Margin::same(12);
    style.spacing.button_padding   = egui::vec2(10.0, 5.0);
    style.spacing.scroll.bar_width = 8.0;

    let cr = egui::CornerRadius::same(6);

    let mut v = Visuals::dark();
    v.panel_fill             = DARK_BG_1;
    v.window_fill            = DARK_BG_2;
    v.faint_bg_color         = DARK_BG_0;
    v.extreme_bg_color       = DARK_BG_0;
    v.window_stroke          = Stroke::new(1.0, DARK_BORDER);

    v.selection.bg_fill      = ACCENT;
    v.selection.stroke       = Stroke::new(1.0, Color32::WHITE);
    v.hyperlink_color        = ACCENT_HOVER;

    v.widgets.noninteractive.bg_fill       = DARK_BG_2;
    v.widgets.noninteractive.bg_stroke     = Stroke::new(1.0, DARK_BORDER);
    v.widgets.noninteractive.fg_stroke     = Stroke::new(1.0, DARK_TEXT_DIM);
    v.widgets.noninteractive.corner_radius = cr;

    v.widgets.inactive.bg_fill             = DARK_BG_3;
    v.widgets.inactive.bg_stroke           = Stroke::new(1.0, DARK_BORDER);
    v.widgets.inactive.fg_stroke           = Stroke::new(1.0, DARK_TEXT);
    v.widgets.inactive.corner_radius       = cr;

    v.widgets.hovered.bg_fill              = DARK_BG_4;
    v.widgets.hovered.bg_stroke            = Stroke::new(1.0, ACCENT_DIM);
    v.widgets.hovered.fg_stroke            = Stroke::new(1.5, ACCENT_HOVER);
    v.widgets.hovered.corner_radius        = cr;

    v.widgets.active.bg_fill               = ACCENT_DIM;
    v.widgets.active.bg_stroke             = Stroke::new(1.0, ACCENT);
    v.widgets.active.fg_stroke             = Stroke::new(2.0, Color32::WHITE);
    v.widgets.active.corner_radius         = cr;

    v.override_text_color = Some(DARK_TEXT);

    ctx.set_visuals(v);
    ctx.set_style(style);

    ctx.style_mut(|s| {
        s.visuals.window_corner_radius = cr;
        s.visuals.menu_corner_radius   = cr;
    });
}

/// Accented call-to-action button (Browse, Generate).
pub fn primary_btn(label: impl Into<egui::WidgetText>) -> egui::Button<'static> {
    egui::Button::new(label)
        .fill(ACCENT_DIM)
        .stroke(Stroke::new(1.0, ACCENT))
        .min_size(egui::vec2(0.0, 28.0))
}
