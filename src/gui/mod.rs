// src/gui/mod.rs
pub mod plot;
pub mod theme;

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use periodogram_display::{DisplayConfig, DisplayHandle, FftMode, SpectrumDisplayController, TraceId};

use crate::gui::plot::PlotInteraction;
use crate::gui::theme::*;
use crate::signal_source::SpectrumFrame;

// Main Application GUI - owns the display controller and draws it
pub struct PeriodogramApp {
    /// View state, zoom and axes (UI thread only)
    display: SpectrumDisplayController,

    /// Setter handle, same path the source thread uses
    handle: DisplayHandle,

    /// Spectra from the source thread
    frames_rx: Receiver<SpectrumFrame>,

    /// Latest spectrum per trace, indexed like the traces
    spectra: Vec<Option<Vec<f32>>>,

    /// Settings snapshots for the persistence thread
    settings_tx: Sender<DisplayConfig>,

    plot: PlotInteraction,
    show_legend: bool,
    last_pick_hz: Option<f64>,
    picks_rx: Receiver<f64>,
}

impl PeriodogramApp {
    pub fn new(
        display: SpectrumDisplayController,
        frames_rx: Receiver<SpectrumFrame>,
        settings_tx: Sender<DisplayConfig>,
        picks_rx: Receiver<f64>,
    ) -> Self {
        let handle = display.handle();
        Self {
            display,
            handle,
            frames_rx,
            spectra: Vec::new(),
            settings_tx,
            plot: PlotInteraction::default(),
            show_legend: true,
            last_pick_hz: None,
            picks_rx,
        }
    }

    /// Pull every queued frame, attaching traces for channels seen first time
    fn drain_frames(&mut self) {
        for frame in self.frames_rx.try_iter() {
            while self.display.traces().len() <= frame.channel {
                let n = self.display.traces().len();
                self.display.attach_trace(format!("Channel {}", n + 1));
                self.spectra.push(None);
            }
            self.spectra[frame.channel] = Some(frame.bins_db);
        }
    }

    fn legend_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Traces");
        ui.separator();

        if self.display.traces().is_empty() {
            ui.weak("Waiting for data...");
        }

        let entries: Vec<(TraceId, String, bool, egui::Color32)> = self
            .display
            .traces()
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let checked = t.is_checked().unwrap_or(t.visible);
                (TraceId(i), t.label.clone(), checked, to_egui_color(t.color()))
            })
            .collect();

        for (id, label, mut checked, color) in entries {
            ui.horizontal(|ui| {
                let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(swatch, 2.0, color);
                if ui.checkbox(&mut checked, label).changed() {
                    self.display.set_legend_checked(id, checked);
                }
            });
        }

        if let Some(pending) = self.display.pending_visibility() {
            ui.separator();
            ui.weak(format!("Restoring {} trace state(s)...", pending.len()));
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.toggle_value(&mut self.show_legend, "Legend");
            ui.separator();

            let zoom = self.display.zoom();
            let depth = zoom.index();
            let can_forward = depth + 1 < zoom.stack().len();
            if ui.add_enabled(depth > 0, egui::Button::new("⏮ Base")).clicked() {
                self.display.zoom_to_base();
            }
            if ui.add_enabled(depth > 0, egui::Button::new("◀ Back")).clicked() {
                self.display.zoom_out();
            }
            if ui.add_enabled(can_forward, egui::Button::new("Fwd ▶")).clicked() {
                self.display.zoom_in();
            }
            ui.separator();

            let mut auto_scale = self.display.auto_scale();
            if ui.checkbox(&mut auto_scale, "Autoscale").changed() {
                self.handle.set_auto_scale(auto_scale);
            }

            let current = self.display.fft_mode();
            egui::ComboBox::from_id_salt("fft_mode")
                .selected_text(current.as_str())
                .show_ui(ui, |ui| {
                    for mode in [FftMode::Auto, FftMode::Complex, FftMode::Real] {
                        if ui.selectable_label(mode == current, mode.as_str()).clicked() {
                            if let Err(e) = self.handle.set_fft_mode(mode.as_str()) {
                                tracing::error!("[GUI] {}", e);
                            }
                        }
                    }
                });

            let mut reference = self.display.reference_level();
            if ui
                .add(egui::DragValue::new(&mut reference).speed(1.0).suffix(" dB ref"))
                .changed()
            {
                self.handle.set_reference_level(reference);
            }
            let mut range = self.display.dynamic_range();
            if ui
                .add(egui::DragValue::new(&mut range).speed(1.0).range(10.0..=200.0).suffix(" dB range"))
                .changed()
            {
                self.handle.set_dynamic_range(range);
            }

            ui.separator();
            if let Some(hz) = self.last_pick_hz {
                ui.label(format!("Tuned: {:.0} Hz", hz));
            }
        });
    }
}

impl eframe::App for PeriodogramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Apply queued configuration (one axis recompute at most) ---
        if self.display.process_commands() {
            let _ = self.settings_tx.send(self.display.config().clone());
        }

        self.drain_frames();
        if let Some(hz) = self.picks_rx.try_iter().last() {
            self.last_pick_hz = Some(hz);
        }

        let title = if self.display.title().is_empty() {
            "Periodogram".to_string()
        } else {
            self.display.title().to_string()
        };

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(title).font(title_font()).strong());
                ui.weak(format!(
                    "{} | {} bins | {} window",
                    self.display.axes().unit,
                    self.display.num_fft_bins(),
                    self.display.window().name
                ));
            });
            self.toolbar(ui);
        });

        if self.show_legend {
            egui::SidePanel::right("legend")
                .resizable(false)
                .exact_width(LEGEND_WIDTH)
                .show(ctx, |ui| self.legend_panel(ui));
        }

        let frame = egui::Frame::central_panel(&ctx.style()).fill(CANVAS_BG).inner_margin(0.0);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            plot::show(ui, &mut self.display, &self.spectra, &mut self.plot);
        });

        // new spectra arrive every ~50ms
        ctx.request_repaint_after(Duration::from_millis(30));
    }
}
