use egui::{Align2, PointerButton, Pos2, Sense, Shape, Stroke};

use periodogram_display::{PlotPoint, Rect as ViewRect, SpectrumDisplayController};

use crate::gui::theme::*;

/// Gesture state carried between frames
#[derive(Default)]
pub struct PlotInteraction {
    drag_start: Option<Pos2>,
    /// Click time and point, held until it can't be half of a double-click
    pending_pick: Option<(f64, PlotPoint)>,
}

impl PlotInteraction {
    fn queue_pick(&mut self, now: f64, point: PlotPoint) {
        self.pending_pick = Some((now, point));
    }

    fn cancel_pick(&mut self) {
        self.pending_pick = None;
    }

    fn due_pick(&mut self, now: f64) -> Option<PlotPoint> {
        match self.pending_pick {
            Some((at, point)) if now - at >= PICK_DELAY_S => {
                self.pending_pick = None;
                Some(point)
            }
            _ => None,
        }
    }
}

/// Maps between display units and screen pixels for one frame
struct Transform {
    screen: egui::Rect,
    view: ViewRect,
}

impl Transform {
    fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        let fx = (x - self.view.x_min) / self.view.width();
        let fy = (y - self.view.y_min) / self.view.height();
        Pos2::new(
            self.screen.left() + fx as f32 * self.screen.width(),
            self.screen.bottom() - fy as f32 * self.screen.height(),
        )
    }

    fn from_screen(&self, pos: Pos2) -> (f64, f64) {
        let fx = ((pos.x - self.screen.left()) / self.screen.width()) as f64;
        let fy = ((self.screen.bottom() - pos.y) / self.screen.height()) as f64;
        (
            self.view.x_min + fx * self.view.width(),
            self.view.y_min + fy * self.view.height(),
        )
    }

    /// Display units per pixel
    fn units_per_px(&self) -> (f64, f64) {
        (
            self.view.width() / self.screen.width().max(1.0) as f64,
            self.view.height() / self.screen.height().max(1.0) as f64,
        )
    }
}

/// Draw the spectrum canvas and feed gestures back into the controller.
///
/// Drag = zoom box, middle drag = pan, right click = zoom out,
/// double click = back to base, click = pick a frequency.
pub fn show(
    ui: &mut egui::Ui,
    display: &mut SpectrumDisplayController,
    spectra: &[Option<Vec<f32>>],
    interaction: &mut PlotInteraction,
) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let outer = response.rect;
    let plot_rect = egui::Rect::from_min_max(
        Pos2::new(outer.left() + AXIS_MARGIN_LEFT, outer.top() + 8.0),
        Pos2::new(outer.right() - 8.0, outer.bottom() - AXIS_MARGIN_BOTTOM),
    );
    if plot_rect.width() <= 1.0 || plot_rect.height() <= 1.0 {
        return;
    }

    // === Resolve the view ===
    let current = display.zoom().current();
    let axes = *display.axes();
    let extent = visible_extent(display, spectra, current.x_min, current.x_max);
    let (y_min, y_max) = display.y_range(extent);
    let view = ViewRect::new(current.x_min, y_min, current.x_max, y_max);
    let transform = Transform { screen: plot_rect, view };

    // === Background + grid ===
    painter.rect_filled(outer, 0.0, CANVAS_BG);
    draw_grid(&painter, &transform, display);

    // === Traces ===
    let clipped = painter.with_clip_rect(plot_rect);
    for (trace, spectrum) in display.traces().iter().zip(spectra.iter()) {
        let Some(bins) = spectrum else { continue };
        if !trace.visible || bins.is_empty() {
            continue;
        }
        let n = bins.len() as f64;
        let span = axes.x_max - axes.x_min;
        let points: Vec<Pos2> = bins
            .iter()
            .enumerate()
            .map(|(i, &db)| {
                let x = axes.x_min + (i as f64 + 0.5) / n * span;
                transform.to_screen(x, db as f64)
            })
            .collect();
        clipped.add(Shape::line(points, Stroke::new(1.5, to_egui_color(trace.color()))));
    }
    painter.rect_stroke(plot_rect, 0.0, Stroke::new(1.0, CANVAS_BORDER));

    // === Gestures ===
    if response.drag_started_by(PointerButton::Primary) {
        interaction.drag_start = response.interact_pointer_pos();
    }

    if let (Some(start), Some(now)) = (interaction.drag_start, response.interact_pointer_pos()) {
        if response.dragged_by(PointerButton::Primary) {
            let zoom_box = egui::Rect::from_two_pos(start, now);
            painter.rect_filled(zoom_box, 0.0, ZOOM_BOX_FILL);
            painter.rect_stroke(zoom_box, 0.0, Stroke::new(1.0, ZOOM_BOX_STROKE));
        }
    }

    if response.drag_stopped_by(PointerButton::Primary) {
        if let (Some(start), Some(end)) = (interaction.drag_start.take(), response.interact_pointer_pos()) {
            let zoom_box = egui::Rect::from_two_pos(start, end).intersect(plot_rect);
            if zoom_box.width() >= MIN_ZOOM_BOX_PX && zoom_box.height() >= MIN_ZOOM_BOX_PX {
                let (x0, y0) = transform.from_screen(zoom_box.left_bottom());
                let (x1, y1) = transform.from_screen(zoom_box.right_top());
                display.zoom_to(ViewRect::new(x0, y0, x1, y1));
            }
        }
    }

    if response.dragged_by(PointerButton::Middle) {
        let delta = response.drag_delta();
        let (ux, uy) = transform.units_per_px();
        display.pan_by(-(delta.x as f64) * ux, delta.y as f64 * uy);
    }

    let now = ui.input(|i| i.time);
    if response.double_clicked() {
        interaction.cancel_pick();
        display.zoom_to_base();
    } else if response.secondary_clicked() {
        display.zoom_out();
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if plot_rect.contains(pos) {
                let (x, y) = transform.from_screen(pos);
                interaction.queue_pick(now, PlotPoint::new(x, y));
            }
        }
    }
    if let Some(point) = interaction.due_pick(now) {
        display.pick(point);
    }

    // === Cursor readout ===
    if let Some(pos) = response.hover_pos() {
        if plot_rect.contains(pos) {
            let (x, y) = transform.from_screen(pos);
            painter.text(
                plot_rect.right_top() + egui::vec2(-6.0, 6.0),
                Align2::RIGHT_TOP,
                format!("{:.4} {}  {:.1} dB", x, axes.unit, y),
                axis_font(),
                CURSOR_TEXT,
            );
        }
    }
}

/// (min, max) of the visible traces inside the displayed x span
fn visible_extent(
    display: &SpectrumDisplayController,
    spectra: &[Option<Vec<f32>>],
    x_min: f64,
    x_max: f64,
) -> Option<(f64, f64)> {
    let axes = display.axes();
    let span = axes.x_max - axes.x_min;
    let mut extent: Option<(f64, f64)> = None;

    for (trace, spectrum) in display.traces().iter().zip(spectra.iter()) {
        let Some(bins) = spectrum else { continue };
        if !trace.visible {
            continue;
        }
        let n = bins.len() as f64;
        for (i, &db) in bins.iter().enumerate() {
            let x = axes.x_min + (i as f64 + 0.5) / n * span;
            if x < x_min || x > x_max {
                continue;
            }
            let db = db as f64;
            extent = Some(match extent {
                Some((lo, hi)) => (lo.min(db), hi.max(db)),
                None => (db, db),
            });
        }
    }
    extent
}

fn draw_grid(painter: &egui::Painter, transform: &Transform, display: &SpectrumDisplayController) {
    let view = transform.view;
    let screen = transform.screen;
    let grid = Stroke::new(1.0, GRID_LINE);
    let font = axis_font();

    // vertical lines + frequency labels
    let step = nice_step(view.width(), GRID_DIVISIONS);
    let mut x = (view.x_min / step).ceil() * step;
    while x <= view.x_max {
        let top = transform.to_screen(x, view.y_max);
        let bottom = transform.to_screen(x, view.y_min);
        painter.line_segment([top, bottom], grid);
        if display.x_axis_enabled() {
            painter.text(
                bottom + egui::vec2(0.0, 4.0),
                Align2::CENTER_TOP,
                format_tick(x, step),
                font.clone(),
                AXIS_TEXT,
            );
        }
        x += step;
    }

    // horizontal lines + dB labels
    let step = nice_step(view.height(), GRID_DIVISIONS);
    let mut y = (view.y_min / step).ceil() * step;
    while y <= view.y_max {
        let left = transform.to_screen(view.x_min, y);
        let right = transform.to_screen(view.x_max, y);
        painter.line_segment([left, right], grid);
        if display.y_axis_enabled() {
            painter.text(
                left - egui::vec2(4.0, 0.0),
                Align2::RIGHT_CENTER,
                format_tick(y, step),
                font.clone(),
                AXIS_TEXT,
            );
        }
        y += step;
    }

    // axis titles
    if display.x_axis_enabled() {
        painter.text(
            Pos2::new(screen.center().x, screen.bottom() + 18.0),
            Align2::CENTER_TOP,
            display.axes().x_title(),
            font.clone(),
            AXIS_TEXT,
        );
    }
    if display.y_axis_enabled() && !display.y_axis_title().is_empty() {
        painter.text(
            screen.left_top() + egui::vec2(4.0, 4.0),
            Align2::LEFT_TOP,
            display.y_axis_title(),
            font,
            AXIS_TEXT,
        );
    }
}

/// Enough decimals to tell neighbouring ticks apart
fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10()).ceil() as usize };
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_round_trip() {
        let t = Transform {
            screen: egui::Rect::from_min_max(Pos2::new(50.0, 10.0), Pos2::new(450.0, 310.0)),
            view: ViewRect::new(-1.0, -100.0, 1.0, 0.0),
        };
        let p = t.to_screen(0.0, -50.0);
        assert_eq!(p, Pos2::new(250.0, 160.0));
        let (x, y) = t.from_screen(p);
        assert!(x.abs() < 1e-6);
        assert!((y + 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_pick_waits_out_double_click() {
        let mut interaction = PlotInteraction::default();
        interaction.queue_pick(10.0, PlotPoint::new(0.25, -40.0));
        assert_eq!(interaction.due_pick(10.1), None);
        assert_eq!(interaction.due_pick(11.0), Some(PlotPoint::new(0.25, -40.0)));
        assert_eq!(interaction.due_pick(20.0), None);

        // second click arrives in time: no pick at all
        interaction.queue_pick(30.0, PlotPoint::new(0.1, -10.0));
        interaction.cancel_pick();
        assert_eq!(interaction.due_pick(31.0), None);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(-80.0, 10.0), "-80");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(99.5, 0.2), "99.5");
    }
}
