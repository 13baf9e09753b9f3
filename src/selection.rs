use crate::axis_units::FrequencyUnit;

/// A point picked on the plot, in display units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Convert a picked x value back to Hz using the unit active at pick time.
///
/// No center-frequency offset is applied.
pub fn picked_frequency_hz(picked_x: f64, unit: FrequencyUnit) -> f64 {
    picked_x * unit.factor()
}
