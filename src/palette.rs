//! Default trace colours
//!
//! Traces cycle through twelve base colours. The pens are pastelized so
//! overlapping curves stay readable on the dark canvas.

/// Simple RGBA Color (compatible with egui)
///
/// We define our own to avoid depending on egui in the display core
/// (can convert to egui::Color32 in GUI Code)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLUE: Self = Self::from_rgb(0, 0, 255);
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);
    pub const RED: Self = Self::from_rgb(255, 0, 0);
    pub const CYAN: Self = Self::from_rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::from_rgb(255, 0, 255);
    pub const YELLOW: Self = Self::from_rgb(255, 255, 0);
    pub const DARK_BLUE: Self = Self::from_rgb(0, 0, 128);
    pub const DARK_GREEN: Self = Self::from_rgb(0, 128, 0);
    pub const DARK_RED: Self = Self::from_rgb(128, 0, 0);
    pub const DARK_CYAN: Self = Self::from_rgb(0, 128, 128);
    pub const DARK_MAGENTA: Self = Self::from_rgb(128, 0, 128);
    pub const DARK_YELLOW: Self = Self::from_rgb(128, 128, 0);

    /// (hue degrees, saturation 0-1, value 0-1). Hue is `None` for greys.
    pub fn to_hsv(self) -> (Option<f32>, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let saturation = if max > 0.0 { delta / max } else { 0.0 };
        if delta <= 0.0 {
            return (None, saturation, max);
        }

        let hue = if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        (Some(hue), saturation, max)
    }

    /// Build from hue in degrees and saturation/value in 0-1
    pub fn from_hsv(hue: Option<f32>, saturation: f32, value: f32) -> Self {
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);
        let to_u8 = |x: f32| (x * 255.0).round().clamp(0.0, 255.0) as u8;

        let Some(hue) = hue else {
            return Self::from_rgb(to_u8(v), to_u8(v), to_u8(v));
        };

        let chroma = v * s;
        let sector = hue.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let m = v - chroma;
        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        Self::from_rgb(to_u8(r + m), to_u8(g + m), to_u8(b + m))
    }
}

const CURVE_COLORS: [Color32; 12] = [
    Color32::BLUE,
    Color32::GREEN,
    Color32::RED,
    Color32::CYAN,
    Color32::MAGENTA,
    Color32::YELLOW,
    Color32::DARK_BLUE,
    Color32::DARK_GREEN,
    Color32::DARK_RED,
    Color32::DARK_CYAN,
    Color32::DARK_MAGENTA,
    Color32::DARK_YELLOW,
];

/// Base colour for the n-th curve (cycles every 12)
pub fn default_curve_color(which: usize) -> Color32 {
    CURVE_COLORS[which % CURVE_COLORS.len()]
}

/// Pastels have high value and low to intermediate saturation
pub fn pastelize(c: Color32) -> Color32 {
    let (hue, saturation, value) = c.to_hsv();
    let s = (saturation * 128.0).floor() / 255.0;
    let v = ((value * 64.0).floor() + 191.0) / 255.0;
    Color32 {
        a: c.a,
        ..Color32::from_hsv(hue, s, v)
    }
}

/// Pen colour used for a newly attached trace
pub fn trace_color(color_index: usize) -> Color32 {
    pastelize(default_curve_color(color_index))
}

// === Tests ====
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_colors_cycle() {
        assert_eq!(default_curve_color(0), Color32::BLUE);
        assert_eq!(default_curve_color(11), Color32::DARK_YELLOW);
        assert_eq!(default_curve_color(12), Color32::BLUE);
        assert_eq!(default_curve_color(14), Color32::RED);
    }

    #[test]
    fn test_hsv_of_primaries() {
        let (h, s, v) = Color32::BLUE.to_hsv();
        assert_eq!(h, Some(240.0));
        assert_eq!(s, 1.0);
        assert_eq!(v, 1.0);

        let (h, _, _) = Color32::YELLOW.to_hsv();
        assert_eq!(h, Some(60.0));

        let (h, s, _) = Color32::from_rgb(90, 90, 90).to_hsv();
        assert_eq!(h, None);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_pastelize_blue() {
        assert_eq!(pastelize(Color32::BLUE), Color32::from_rgb(127, 127, 255));
    }

    #[test]
    fn test_pastelize_dark_colors_are_brightened() {
        let p = pastelize(Color32::DARK_BLUE);
        assert_eq!(p, Color32::from_rgb(111, 111, 223));
        // value floor of 191 keeps every pen bright
        for i in 0..12 {
            let c = trace_color(i);
            assert!(c.r.max(c.g).max(c.b) >= 191, "trace {} too dark: {:?}", i, c);
        }
    }

    #[test]
    fn test_hsv_round_trip() {
        for c in CURVE_COLORS {
            let (h, s, v) = c.to_hsv();
            assert_eq!(Color32::from_hsv(h, s, v), c);
        }
    }
}
