//! Producer-side configuration hand-off
//!
//! Setters may be called from any thread. They only enqueue a
//! [`ConfigCommand`]; the UI loop drains the queue, keeps the latest value per
//! field and recomputes the axes at most once per drain.

use crossbeam_channel::Sender;

use crate::display_config::{DisplayConfig, FftMode, WindowSpec};
use crate::error::DisplayError;

/// One configuration change
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigCommand {
    Title(String),
    SampleRate(f64),
    CenterFrequency(f64),
    NumFftBins(usize),
    WindowType(WindowSpec),
    FullScale(f64),
    FftMode(FftMode),
    ReferenceLevel(f64),
    DynamicRange(f64),
    AutoScale(bool),
    AverageFactor(f64),
    XAxisEnabled(bool),
    YAxisEnabled(bool),
    YAxisTitle(String),
    FreqLabelId(String),
    RateLabelId(String),
    /// Tagged value seen on the input stream
    StreamLabel { id: String, value: f64 },
    /// Input stream turned out to be complex (true) or real (false)
    InputComplex(bool),
}

/// Cloneable, thread-safe setter handle
///
/// Every setter is a non-blocking send. Nothing happens until the owning
/// controller runs `process_commands`.
#[derive(Debug, Clone)]
pub struct DisplayHandle {
    tx: Sender<ConfigCommand>,
}

impl DisplayHandle {
    pub(crate) fn new(tx: Sender<ConfigCommand>) -> Self {
        Self { tx }
    }

    /// Enqueue a raw command. Sending to a dropped controller is a no-op.
    pub fn send(&self, command: ConfigCommand) {
        if let Err(e) = self.tx.send(command) {
            tracing::debug!("[Display] Controller gone, dropping {:?}", e.into_inner());
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.send(ConfigCommand::Title(title.into()));
    }

    pub fn set_sample_rate(&self, hz: f64) {
        self.send(ConfigCommand::SampleRate(hz));
    }

    pub fn set_center_frequency(&self, hz: f64) {
        self.send(ConfigCommand::CenterFrequency(hz));
    }

    pub fn set_num_fft_bins(&self, bins: usize) {
        self.send(ConfigCommand::NumFftBins(bins));
    }

    pub fn set_window_type(&self, name: impl Into<String>, args: Vec<f64>) {
        self.send(ConfigCommand::WindowType(WindowSpec::new(name, args)));
    }

    pub fn set_full_scale(&self, scale: f64) {
        self.send(ConfigCommand::FullScale(scale));
    }

    /// Validated here, on the caller's thread. An unknown mode sends nothing.
    pub fn set_fft_mode(&self, mode: &str) -> Result<(), DisplayError> {
        let mode: FftMode = mode.parse()?;
        self.send(ConfigCommand::FftMode(mode));
        Ok(())
    }

    pub fn set_reference_level(&self, db: f64) {
        self.send(ConfigCommand::ReferenceLevel(db));
    }

    pub fn set_dynamic_range(&self, db: f64) {
        self.send(ConfigCommand::DynamicRange(db));
    }

    pub fn set_auto_scale(&self, enabled: bool) {
        self.send(ConfigCommand::AutoScale(enabled));
    }

    pub fn set_average_factor(&self, factor: f64) {
        self.send(ConfigCommand::AverageFactor(factor));
    }

    pub fn enable_x_axis(&self, enabled: bool) {
        self.send(ConfigCommand::XAxisEnabled(enabled));
    }

    pub fn enable_y_axis(&self, enabled: bool) {
        self.send(ConfigCommand::YAxisEnabled(enabled));
    }

    pub fn set_y_axis_title(&self, title: impl Into<String>) {
        self.send(ConfigCommand::YAxisTitle(title.into()));
    }

    pub fn set_freq_label_id(&self, id: impl Into<String>) {
        self.send(ConfigCommand::FreqLabelId(id.into()));
    }

    pub fn set_rate_label_id(&self, id: impl Into<String>) {
        self.send(ConfigCommand::RateLabelId(id.into()));
    }

    /// Forward a stream label; frequency and rate labels retune the axes
    pub fn post_stream_label(&self, id: impl Into<String>, value: f64) {
        self.send(ConfigCommand::StreamLabel { id: id.into(), value });
    }

    /// Tell an AUTO-mode display what kind of input it is receiving
    pub fn report_input_complex(&self, complex: bool) {
        self.send(ConfigCommand::InputComplex(complex));
    }
}

/// Latest value per field seen during one drain
#[derive(Debug, Default)]
pub(crate) struct PendingConfig {
    title: Option<String>,
    sample_rate: Option<f64>,
    center_frequency: Option<f64>,
    num_fft_bins: Option<usize>,
    window: Option<WindowSpec>,
    full_scale: Option<f64>,
    fft_mode: Option<FftMode>,
    reference_level: Option<f64>,
    dynamic_range: Option<f64>,
    auto_scale: Option<bool>,
    average_factor: Option<f64>,
    x_axis_enabled: Option<bool>,
    y_axis_enabled: Option<bool>,
    y_axis_title: Option<String>,
    freq_label_id: Option<String>,
    rate_label_id: Option<String>,
    input_complex: Option<bool>,
}

impl PendingConfig {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.sample_rate.is_none()
            && self.center_frequency.is_none()
            && self.num_fft_bins.is_none()
            && self.window.is_none()
            && self.full_scale.is_none()
            && self.fft_mode.is_none()
            && self.reference_level.is_none()
            && self.dynamic_range.is_none()
            && self.auto_scale.is_none()
            && self.average_factor.is_none()
            && self.x_axis_enabled.is_none()
            && self.y_axis_enabled.is_none()
            && self.y_axis_title.is_none()
            && self.freq_label_id.is_none()
            && self.rate_label_id.is_none()
            && self.input_complex.is_none()
    }

    /// Fold one command in. `current` resolves label ids and the FFT mode
    /// for fields not yet touched in this drain.
    pub fn merge(&mut self, command: ConfigCommand, current: &DisplayConfig) {
        match command {
            ConfigCommand::Title(v) => self.title = Some(v),
            ConfigCommand::SampleRate(v) => self.sample_rate = Some(v),
            ConfigCommand::CenterFrequency(v) => self.center_frequency = Some(v),
            ConfigCommand::NumFftBins(v) => self.num_fft_bins = Some(v),
            ConfigCommand::WindowType(v) => self.window = Some(v),
            ConfigCommand::FullScale(v) => self.full_scale = Some(v),
            ConfigCommand::FftMode(v) => {
                // an explicit mode supersedes earlier input-kind reports
                self.fft_mode = Some(v);
                self.input_complex = None;
            }
            ConfigCommand::ReferenceLevel(v) => self.reference_level = Some(v),
            ConfigCommand::DynamicRange(v) => self.dynamic_range = Some(v),
            ConfigCommand::AutoScale(v) => self.auto_scale = Some(v),
            ConfigCommand::AverageFactor(v) => self.average_factor = Some(v),
            ConfigCommand::XAxisEnabled(v) => self.x_axis_enabled = Some(v),
            ConfigCommand::YAxisEnabled(v) => self.y_axis_enabled = Some(v),
            ConfigCommand::YAxisTitle(v) => self.y_axis_title = Some(v),
            ConfigCommand::FreqLabelId(v) => self.freq_label_id = Some(v),
            ConfigCommand::RateLabelId(v) => self.rate_label_id = Some(v),
            ConfigCommand::StreamLabel { id, value } => {
                let freq_id = self.freq_label_id.as_deref().unwrap_or(&current.freq_label_id);
                let rate_id = self.rate_label_id.as_deref().unwrap_or(&current.rate_label_id);
                if id == freq_id {
                    self.center_frequency = Some(value);
                } else if id == rate_id {
                    self.sample_rate = Some(value);
                } else {
                    tracing::trace!("[Display] Ignoring stream label {}={}", id, value);
                }
            }
            ConfigCommand::InputComplex(complex) => {
                let automatic = match self.fft_mode {
                    Some(mode) => mode.is_automatic(),
                    None => current.axis.fft_mode_automatic,
                };
                if automatic {
                    self.input_complex = Some(complex);
                }
            }
        }
    }

    /// Write everything into `config`. Returns true if an axis field was
    /// touched and the axes need a recompute.
    pub fn apply_to(self, config: &mut DisplayConfig) -> bool {
        let mut recompute = false;

        if let Some(v) = self.title {
            config.title = v;
        }
        if let Some(v) = self.num_fft_bins {
            config.num_fft_bins = v;
        }
        if let Some(v) = self.window {
            config.window = v;
        }
        if let Some(v) = self.full_scale {
            config.full_scale = v;
        }
        if let Some(v) = self.average_factor {
            config.average_factor = v;
        }
        if let Some(v) = self.x_axis_enabled {
            config.x_axis_enabled = v;
        }
        if let Some(v) = self.y_axis_enabled {
            config.y_axis_enabled = v;
        }
        if let Some(v) = self.y_axis_title {
            config.y_axis_title = v;
        }
        if let Some(v) = self.freq_label_id {
            config.freq_label_id = v;
        }
        if let Some(v) = self.rate_label_id {
            config.rate_label_id = v;
        }

        // === Axis Fields ===
        let axis = &mut config.axis;
        if let Some(v) = self.sample_rate {
            axis.sample_rate = v;
            recompute = true;
        }
        if let Some(v) = self.center_frequency {
            axis.center_frequency = v;
            recompute = true;
        }
        if let Some(v) = self.reference_level {
            axis.reference_level = v;
            recompute = true;
        }
        if let Some(v) = self.dynamic_range {
            axis.dynamic_range = v;
            recompute = true;
        }
        if let Some(v) = self.auto_scale {
            axis.auto_scale = v;
            recompute = true;
        }
        if let Some(mode) = self.fft_mode {
            axis.set_fft_mode(mode);
            recompute = true;
        }
        if let Some(complex) = self.input_complex {
            if axis.fft_mode_automatic && axis.fft_mode_complex != complex {
                tracing::debug!(
                    "[Display] Input is {}, switching layout",
                    if complex { "complex" } else { "real" }
                );
                axis.fft_mode_complex = complex;
                recompute = true;
            }
        }

        recompute
    }
}
