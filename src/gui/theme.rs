use egui::{Color32, FontFamily, FontId};

use periodogram_display::Color32 as TraceColor;

// === Plot Canvas ===
pub const CANVAS_BG: Color32 = Color32::from_rgb(16, 18, 24);
pub const CANVAS_BORDER: Color32 = Color32::from_rgb(70, 74, 86);
pub const GRID_LINE: Color32 = Color32::from_rgb(40, 44, 54);
pub const AXIS_TEXT: Color32 = Color32::from_rgb(170, 176, 190);

// === Interaction ===
pub const ZOOM_BOX_FILL: Color32 = Color32::from_rgba_premultiplied(40, 60, 90, 60);
pub const ZOOM_BOX_STROKE: Color32 = Color32::from_rgb(120, 170, 255);
pub const CURSOR_TEXT: Color32 = Color32::from_rgb(230, 230, 230);

// === Metrics ===
pub const LEGEND_WIDTH: f32 = 160.0;
pub const AXIS_MARGIN_LEFT: f32 = 52.0;
pub const AXIS_MARGIN_BOTTOM: f32 = 34.0;
pub const GRID_DIVISIONS: usize = 10;
/// Minimum drag box size (px) that counts as a zoom
pub const MIN_ZOOM_BOX_PX: f32 = 6.0;
/// A click only picks once it can no longer become a double-click (egui allows 0.3 s)
pub const PICK_DELAY_S: f64 = 0.35;

pub fn axis_font() -> FontId {
    FontId::new(11.0, FontFamily::Proportional)
}

pub fn title_font() -> FontId {
    FontId::new(14.0, FontFamily::Proportional)
}

/// Convert a trace colour to egui::Color32
pub fn to_egui_color(color: TraceColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Round a tick step to 1, 2 or 5 times a power of ten
pub fn nice_step(span: f64, divisions: usize) -> f64 {
    if !(span.is_finite() && span > 0.0) || divisions == 0 {
        return 1.0;
    }
    let raw = span / divisions as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
