//! Top-level display controller
//!
//! Owned by the UI thread. Producers talk to it through a [`DisplayHandle`];
//! the UI loop calls [`SpectrumDisplayController::process_commands`] once per
//! frame, forwards plot gestures and attaches traces as data shows up.

use crossbeam_channel::{unbounded, Receiver};

use crate::axis_units::{normalize, NormalizedAxes};
use crate::commands::{ConfigCommand, DisplayHandle, PendingConfig};
use crate::display_config::{DisplayConfig, FftMode, WindowSpec};
use crate::error::DisplayError;
use crate::events::{DisplayEvent, EventHub};
use crate::selection::{picked_frequency_hz, PlotPoint};
use crate::trace::{Trace, TraceId};
use crate::view_state::ViewState;
use crate::visibility::VisibilitySynchronizer;
use crate::zoom::{Rect, YAxisScale, ZoomState};

#[derive(Debug)]
pub struct SpectrumDisplayController {
    config: DisplayConfig,
    axes: NormalizedAxes,
    zoom: ZoomState,
    y_scale: YAxisScale,
    traces: Vec<Trace>,
    visibility: VisibilitySynchronizer,
    events: EventHub,

    // === Command Hand-off ===
    commands: Receiver<ConfigCommand>,
    handle: DisplayHandle,
}

impl SpectrumDisplayController {
    /// Build the controller and run the initial axis computation
    pub fn new(config: DisplayConfig) -> Self {
        let (tx, rx) = unbounded();
        let axes = normalize(&config.axis.inputs());
        let zoom = ZoomState::new(axes.base_rect());

        let mut controller = Self {
            config,
            axes,
            zoom,
            y_scale: YAxisScale::Fixed { min: axes.y_min, max: axes.y_max },
            traces: Vec::new(),
            visibility: VisibilitySynchronizer::new(),
            events: EventHub::new(),
            commands: rx,
            handle: DisplayHandle::new(tx),
        };
        controller.refresh_y_scale();

        tracing::info!(
            "[Display] Created: {} [{}, {}] {}, y [{}, {}] dB",
            if controller.config.title.is_empty() { "<untitled>" } else { controller.config.title.as_str() },
            axes.x_min,
            axes.x_max,
            axes.unit,
            axes.y_min,
            axes.y_max
        );
        controller
    }

    /// Setter handle for other threads
    pub fn handle(&self) -> DisplayHandle {
        self.handle.clone()
    }

    /// Drain queued setters, keep the latest value per field and recompute the
    /// axes at most once.
    ///
    /// Returns true if at least one command was applied.
    pub fn process_commands(&mut self) -> bool {
        let mut pending = PendingConfig::default();
        let mut count = 0usize;
        for command in self.commands.try_iter() {
            pending.merge(command, &self.config);
            count += 1;
        }
        if count == 0 {
            return false;
        }

        let recompute = !pending.is_empty() && pending.apply_to(&mut self.config);
        tracing::debug!("[Display] Drained {} command(s), recompute: {}", count, recompute);
        if recompute {
            self.update_axis();
        }
        true
    }

    /// Re-derive unit and bounds, reset the zoom history to the new base
    fn update_axis(&mut self) {
        self.axes = normalize(&self.config.axis.inputs());
        self.zoom.reset_base(self.axes.base_rect());
        tracing::debug!(
            "[Axis] {} x [{}, {}], y [{}, {}]",
            self.axes.unit,
            self.axes.x_min,
            self.axes.x_max,
            self.axes.y_min,
            self.axes.y_max
        );
        self.handle_zoomed();
    }

    fn refresh_y_scale(&mut self) {
        self.y_scale = if self.zoom.is_at_base() && self.config.axis.auto_scale {
            YAxisScale::Auto
        } else {
            let rect = self.zoom.current();
            YAxisScale::Fixed { min: rect.y_min, max: rect.y_max }
        };
    }

    /// Common tail of every zoom change
    fn handle_zoomed(&mut self) {
        let was_auto = self.y_scale.is_auto();
        self.refresh_y_scale();
        if was_auto != self.y_scale.is_auto() {
            tracing::debug!("[Zoom] Y-axis autoscale {}", if was_auto { "off" } else { "on" });
        }
        self.emit_state_changed();
    }

    fn emit_state_changed(&mut self) {
        let state = self.capture_state();
        self.events.emit(DisplayEvent::StateChanged(state));
    }

    // === Zoom Gestures ===

    pub fn zoom_to(&mut self, rect: Rect) -> bool {
        self.after_zoom(|zoom| zoom.zoom_to(rect))
    }

    pub fn zoom_out(&mut self) -> bool {
        self.after_zoom(ZoomState::zoom_out)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.after_zoom(ZoomState::zoom_in)
    }

    pub fn zoom_to_base(&mut self) -> bool {
        self.after_zoom(ZoomState::zoom_to_base)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        self.after_zoom(|zoom| zoom.pan_by(dx, dy))
    }

    fn after_zoom(&mut self, op: impl FnOnce(&mut ZoomState) -> bool) -> bool {
        let changed = op(&mut self.zoom);
        if changed {
            self.handle_zoomed();
        }
        changed
    }

    // === Traces ===

    /// Register a trace created by the data path.
    ///
    /// Traces get the next colour in the cycle. A stashed visibility vector
    /// is applied once the trace count matches it.
    pub fn attach_trace(&mut self, label: impl Into<String>) -> TraceId {
        let id = TraceId(self.traces.len());
        let trace = Trace::new(label, id.0);
        tracing::debug!("[Display] Attached trace {} '{}'", id.0, trace.label);
        self.traces.push(trace);

        if self.visibility.on_trace_attached(&mut self.traces) {
            self.emit_state_changed();
        }
        id
    }

    /// Legend checkbox flipped by the user
    pub fn set_legend_checked(&mut self, id: TraceId, checked: bool) -> bool {
        let Some(trace) = self.traces.get_mut(id.0) else {
            tracing::warn!("[Display] Legend toggle for unknown trace {}", id.0);
            return false;
        };
        VisibilitySynchronizer::on_checkbox_toggled(trace, checked);
        self.emit_state_changed();
        true
    }

    /// Programmatic visibility change; the legend follows
    pub fn set_trace_visible(&mut self, id: TraceId, visible: bool) -> bool {
        let Some(trace) = self.traces.get_mut(id.0) else {
            tracing::warn!("[Display] Visibility change for unknown trace {}", id.0);
            return false;
        };
        trace.set_visible(visible);
        self.emit_state_changed();
        true
    }

    // === Selection ===

    /// Translate a picked point to Hz and raise `FrequencySelected`
    pub fn pick(&mut self, point: PlotPoint) -> f64 {
        let hz = picked_frequency_hz(point.x, self.axes.unit);
        tracing::debug!("[Display] Picked {} {} -> {} Hz", point.x, self.axes.unit, hz);
        self.events.emit(DisplayEvent::FrequencySelected(hz));
        hz
    }

    // === View State ===

    pub fn capture_state(&self) -> ViewState {
        ViewState::new(self.zoom.snapshot(), VisibilitySynchronizer::capture(&self.traces))
    }

    /// Replace zoom history and visibility wholesale.
    ///
    /// Visibility that does not match the trace count yet is held until
    /// enough traces are attached.
    pub fn restore_state(&mut self, state: ViewState) {
        let zoom_changed = self.zoom.load(state.zoom_stack, state.zoom_index);
        let applied = self.visibility.restore(state.visibility, &mut self.traces);
        tracing::debug!(
            "[ViewState] Restored: zoom changed {}, visibility applied {}",
            zoom_changed,
            applied
        );
        self.refresh_y_scale();
        if zoom_changed || applied {
            self.emit_state_changed();
        }
    }

    /// Decode and restore. A malformed blob changes nothing.
    pub fn restore_state_blob(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let state = ViewState::from_blob(bytes)?;
        self.restore_state(state);
        Ok(())
    }

    // === Listeners ===

    pub fn on_state_changed(&mut self, callback: impl FnMut(&ViewState) + 'static) {
        self.events.on_state_changed(callback);
    }

    pub fn on_frequency_selected(&mut self, callback: impl FnMut(f64) + 'static) {
        self.events.on_frequency_selected(callback);
    }

    pub fn subscribe(&mut self) -> Receiver<DisplayEvent> {
        self.events.subscribe()
    }

    // === Queries ===

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn sample_rate(&self) -> f64 {
        self.config.axis.sample_rate
    }

    pub fn center_frequency(&self) -> f64 {
        self.config.axis.center_frequency
    }

    pub fn num_fft_bins(&self) -> usize {
        self.config.num_fft_bins
    }

    pub fn reference_level(&self) -> f64 {
        self.config.axis.reference_level
    }

    pub fn dynamic_range(&self) -> f64 {
        self.config.axis.dynamic_range
    }

    pub fn auto_scale(&self) -> bool {
        self.config.axis.auto_scale
    }

    pub fn window(&self) -> &WindowSpec {
        &self.config.window
    }

    pub fn full_scale(&self) -> f64 {
        self.config.full_scale
    }

    pub fn average_factor(&self) -> f64 {
        self.config.average_factor
    }

    pub fn fft_mode(&self) -> FftMode {
        self.config.axis.fft_mode()
    }

    pub fn fft_mode_complex(&self) -> bool {
        self.config.axis.fft_mode_complex
    }

    pub fn x_axis_enabled(&self) -> bool {
        self.config.x_axis_enabled
    }

    pub fn y_axis_enabled(&self) -> bool {
        self.config.y_axis_enabled
    }

    pub fn y_axis_title(&self) -> &str {
        &self.config.y_axis_title
    }

    pub fn axes(&self) -> &NormalizedAxes {
        &self.axes
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn y_scale(&self) -> YAxisScale {
        self.y_scale
    }

    /// Concrete y range to draw, given the extent of the visible data
    pub fn y_range(&self, data_extent: Option<(f64, f64)>) -> (f64, f64) {
        self.y_scale.resolve(data_extent, (self.axes.y_min, self.axes.y_max))
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn pending_visibility(&self) -> Option<&[bool]> {
        self.visibility.pending()
    }
}
