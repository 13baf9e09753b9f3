//! Axis unit normalization
//!
//! Turns raw engineering values (sample rate, center frequency, reference
//! level, dynamic range) into display-ready bounds and a frequency unit that
//! keeps the tick labels readable.

use std::fmt;

use crate::zoom::Rect;

/// Frequency unit shown on the x-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyUnit {
    Hz,
    KHz,
    MHz,
    GHz,
}

impl FrequencyUnit {
    /// Pick the unit for the largest frequency on display.
    ///
    /// Thresholds are inclusive: exactly 2 kHz already reads as "2 kHz".
    /// NaN and negative values fall through to Hz.
    pub fn for_magnitude(magnitude: f64) -> Self {
        if magnitude >= 2e9 {
            FrequencyUnit::GHz
        } else if magnitude >= 2e6 {
            FrequencyUnit::MHz
        } else if magnitude >= 2e3 {
            FrequencyUnit::KHz
        } else {
            FrequencyUnit::Hz
        }
    }

    /// Hz per display unit
    pub fn factor(self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the normalizer looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisInputs {
    pub sample_rate: f64,
    pub center_frequency: f64,
    pub fft_mode_complex: bool,
    pub reference_level: f64,
    pub dynamic_range: f64,
}

/// Output of one axis recompute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedAxes {
    pub unit: FrequencyUnit,
    /// Sample rate expressed in `unit`
    pub sample_rate_norm: f64,
    /// Center frequency expressed in `unit`
    pub center_freq_norm: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl NormalizedAxes {
    /// The unzoomed view these bounds describe
    pub fn base_rect(&self) -> Rect {
        Rect::new(self.x_min, self.y_min, self.x_max, self.y_max)
    }

    /// X-axis title, e.g. "MHz"
    pub fn x_title(&self) -> &'static str {
        self.unit.label()
    }
}

/// Compute display bounds from raw configuration.
///
/// Real spectra start at 0; complex spectra are centered on the center
/// frequency. The y-axis is the fixed window `[ref - range, ref]`.
pub fn normalize(inputs: &AxisInputs) -> NormalizedAxes {
    let unit = FrequencyUnit::for_magnitude(inputs.sample_rate.max(inputs.center_frequency));
    let factor = unit.factor();

    let sample_rate_norm = inputs.sample_rate / factor;
    let center_freq_norm = inputs.center_frequency / factor;

    let x_min = if inputs.fft_mode_complex {
        center_freq_norm - sample_rate_norm / 2.0
    } else {
        0.0
    };
    let x_max = center_freq_norm + sample_rate_norm / 2.0;

    NormalizedAxes {
        unit,
        sample_rate_norm,
        center_freq_norm,
        x_min,
        x_max,
        y_min: inputs.reference_level - inputs.dynamic_range,
        y_max: inputs.reference_level,
    }
}

// =============== Tests ==================
#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(sample_rate: f64, center_frequency: f64, complex: bool) -> AxisInputs {
        AxisInputs {
            sample_rate,
            center_frequency,
            fft_mode_complex: complex,
            reference_level: 0.0,
            dynamic_range: 100.0,
        }
    }

    #[test]
    fn test_unit_thresholds_are_inclusive() {
        assert_eq!(FrequencyUnit::for_magnitude(1999.999), FrequencyUnit::Hz);
        assert_eq!(FrequencyUnit::for_magnitude(2e3), FrequencyUnit::KHz);
        assert_eq!(FrequencyUnit::for_magnitude(2e6 - 1.0), FrequencyUnit::KHz);
        assert_eq!(FrequencyUnit::for_magnitude(2e6), FrequencyUnit::MHz);
        assert_eq!(FrequencyUnit::for_magnitude(2e9 - 1.0), FrequencyUnit::MHz);
        assert_eq!(FrequencyUnit::for_magnitude(2e9), FrequencyUnit::GHz);
        assert_eq!(FrequencyUnit::for_magnitude(5e12), FrequencyUnit::GHz);
    }

    #[test]
    fn test_unit_selection_is_monotonic() {
        let mut last = FrequencyUnit::for_magnitude(0.0).factor();
        let mut magnitude = 0.5;
        while magnitude < 1e11 {
            let factor = FrequencyUnit::for_magnitude(magnitude).factor();
            assert!(factor >= last, "unit went down at {}", magnitude);
            last = factor;
            magnitude *= 1.7;
        }
    }

    #[test]
    fn test_degenerate_magnitudes_use_hz() {
        assert_eq!(FrequencyUnit::for_magnitude(0.0), FrequencyUnit::Hz);
        assert_eq!(FrequencyUnit::for_magnitude(-5e9), FrequencyUnit::Hz);
        assert_eq!(FrequencyUnit::for_magnitude(f64::NAN), FrequencyUnit::Hz);
    }

    #[test]
    fn test_labels_match_factors() {
        assert_eq!(FrequencyUnit::Hz.label(), "Hz");
        assert_eq!(FrequencyUnit::KHz.label(), "kHz");
        assert_eq!(FrequencyUnit::MHz.to_string(), "MHz");
        assert_eq!(FrequencyUnit::GHz.factor(), 1e9);
    }

    #[test]
    fn test_complex_2mhz_centered_on_zero() {
        let axes = normalize(&inputs(2_000_000.0, 0.0, true));
        assert_eq!(axes.unit, FrequencyUnit::MHz);
        assert_eq!(axes.unit.factor(), 1e6);
        assert!((axes.x_min - -1.0).abs() < 1e-12);
        assert!((axes.x_max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_real_1khz_starts_at_zero() {
        let axes = normalize(&inputs(1_000.0, 0.0, false));
        assert_eq!(axes.x_title(), "Hz");
        assert_eq!(axes.x_min, 0.0);
        assert_eq!(axes.x_max, 500.0 + 500.0);
    }

    #[test]
    fn test_center_frequency_drives_unit() {
        // 1 MHz wide window tuned to 2.4 GHz
        let axes = normalize(&inputs(1e6, 2.4e9, true));
        assert_eq!(axes.unit, FrequencyUnit::GHz);
        assert!((axes.center_freq_norm - 2.4).abs() < 1e-12);
        assert!((axes.x_min - 2.3995).abs() < 1e-9);
        assert!((axes.x_max - 2.4005).abs() < 1e-9);
    }

    #[test]
    fn test_y_bounds_follow_reference_and_range() {
        let mut i = inputs(48_000.0, 0.0, false);
        i.reference_level = 10.0;
        i.dynamic_range = 80.0;
        let axes = normalize(&i);
        assert_eq!(axes.y_min, -70.0);
        assert_eq!(axes.y_max, 10.0);

        let rect = axes.base_rect();
        assert_eq!(rect.y_min, -70.0);
        assert_eq!(rect.x_max, axes.x_max);
    }

    #[test]
    fn test_normalize_is_pure() {
        let i = inputs(10e6, 100e6, true);
        assert_eq!(normalize(&i), normalize(&i));
    }
}
