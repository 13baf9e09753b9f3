//! Display configuration
//!
//! Everything a host can set on the display. The UI thread owns the live copy;
//! producers reach it only through [`crate::commands::DisplayHandle`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::axis_units::{AxisInputs, FrequencyUnit};
use crate::error::DisplayError;

/// How the input spectrum should be laid out on the x-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftMode {
    /// One-sided, starting at 0
    Real,
    /// Two-sided, centered on the center frequency
    Complex,
    /// Follow the input stream's kind
    Auto,
}

impl FftMode {
    pub fn is_complex(self) -> bool {
        self != FftMode::Real
    }

    pub fn is_automatic(self) -> bool {
        self == FftMode::Auto
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FftMode::Real => "REAL",
            FftMode::Complex => "COMPLEX",
            FftMode::Auto => "AUTO",
        }
    }
}

impl FromStr for FftMode {
    type Err = DisplayError;

    /// Case-sensitive: only "REAL", "COMPLEX" and "AUTO" are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REAL" => Ok(FftMode::Real),
            "COMPLEX" => Ok(FftMode::Complex),
            "AUTO" => Ok(FftMode::Auto),
            other => Err(DisplayError::InvalidArgument {
                call: "set_fft_mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FftMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window function name plus its parameters, e.g. ("kaiser", [6.0])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub name: String,
    #[serde(default)]
    pub args: Vec<f64>,
}

impl WindowSpec {
    pub fn new(name: impl Into<String>, args: Vec<f64>) -> Self {
        Self { name: name.into(), args }
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::new("hann", Vec::new())
    }
}

/// The part of the configuration that moves the axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    /// Hz
    pub sample_rate: f64,
    /// Hz
    pub center_frequency: f64,
    /// dB at the top of the plot
    pub reference_level: f64,
    /// dB span below the reference level
    pub dynamic_range: f64,
    /// Let the y-axis follow the data when fully zoomed out
    pub auto_scale: bool,
    pub fft_mode_complex: bool,
    pub fft_mode_automatic: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 1.0,
            center_frequency: 0.0,
            reference_level: 0.0,
            dynamic_range: 100.0,
            auto_scale: false,
            fft_mode_complex: true,
            fft_mode_automatic: true,
        }
    }
}

impl AxisConfig {
    /// Derived from `max(sample_rate, center_frequency)`, never stored
    pub fn unit(&self) -> FrequencyUnit {
        FrequencyUnit::for_magnitude(self.sample_rate.max(self.center_frequency))
    }

    pub fn inputs(&self) -> AxisInputs {
        AxisInputs {
            sample_rate: self.sample_rate,
            center_frequency: self.center_frequency,
            fft_mode_complex: self.fft_mode_complex,
            reference_level: self.reference_level,
            dynamic_range: self.dynamic_range,
        }
    }

    pub fn set_fft_mode(&mut self, mode: FftMode) {
        self.fft_mode_complex = mode.is_complex();
        self.fft_mode_automatic = mode.is_automatic();
    }

    pub fn fft_mode(&self) -> FftMode {
        if self.fft_mode_automatic {
            FftMode::Auto
        } else if self.fft_mode_complex {
            FftMode::Complex
        } else {
            FftMode::Real
        }
    }
}

/// Full display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    // === Labels ===
    pub title: String,
    pub y_axis_title: String,
    pub x_axis_enabled: bool,
    pub y_axis_enabled: bool,

    // === Spectrum Settings ===
    /// FFT size the upstream processor uses
    pub num_fft_bins: usize,
    pub window: WindowSpec,
    /// Input amplitude that maps to 0 dBFS
    pub full_scale: f64,
    /// 0.0 disables averaging
    pub average_factor: f64,

    // === Stream Labels ===
    /// Label id that carries a center frequency update
    pub freq_label_id: String,
    /// Label id that carries a sample rate update
    pub rate_label_id: String,

    pub axis: AxisConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            y_axis_title: String::new(),
            x_axis_enabled: true,
            y_axis_enabled: true,

            num_fft_bins: 1024,
            window: WindowSpec::default(),
            full_scale: 1.0,
            average_factor: 0.0,

            freq_label_id: "rxFreq".to_string(),
            rate_label_id: "rxRate".to_string(),

            axis: AxisConfig::default(),
        }
    }
}

// === Tests ====
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_mode_parse() {
        assert_eq!("REAL".parse::<FftMode>().unwrap(), FftMode::Real);
        assert_eq!("COMPLEX".parse::<FftMode>().unwrap(), FftMode::Complex);
        assert_eq!("AUTO".parse::<FftMode>().unwrap(), FftMode::Auto);
    }

    #[test]
    fn test_fft_mode_parse_is_case_sensitive() {
        for bad in ["real", "Complex", "", "BOTH"] {
            let err = bad.parse::<FftMode>().unwrap_err();
            match err {
                DisplayError::InvalidArgument { call, value } => {
                    assert_eq!(call, "set_fft_mode");
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_set_fft_mode_flags() {
        let mut axis = AxisConfig::default();
        axis.set_fft_mode(FftMode::Real);
        assert!(!axis.fft_mode_complex);
        assert!(!axis.fft_mode_automatic);
        assert_eq!(axis.fft_mode(), FftMode::Real);

        axis.set_fft_mode(FftMode::Complex);
        assert!(axis.fft_mode_complex);
        assert!(!axis.fft_mode_automatic);

        axis.set_fft_mode(FftMode::Auto);
        assert!(axis.fft_mode_complex);
        assert!(axis.fft_mode_automatic);
        assert_eq!(axis.fft_mode().to_string(), "AUTO");
    }

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.num_fft_bins, 1024);
        assert_eq!(config.window.name, "hann");
        assert!(config.window.args.is_empty());
        assert_eq!(config.freq_label_id, "rxFreq");
        assert_eq!(config.rate_label_id, "rxRate");
        assert_eq!(config.axis.sample_rate, 1.0);
        assert_eq!(config.axis.dynamic_range, 100.0);
        assert!(!config.axis.auto_scale);
        assert_eq!(config.axis.fft_mode(), FftMode::Auto);
        assert_eq!(config.axis.unit(), FrequencyUnit::Hz);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let json = r#"{"title":"RX","axis":{"sample_rate":2000000.0}}"#;
        let config: DisplayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.title, "RX");
        assert_eq!(config.axis.sample_rate, 2e6);
        assert_eq!(config.axis.dynamic_range, 100.0);
        assert_eq!(config.axis.unit(), FrequencyUnit::MHz);
        assert_eq!(config.num_fft_bins, 1024);
    }
}
