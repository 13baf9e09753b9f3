//! View-state and axis-normalization core for a real-time periodogram display.
//!
//! The [`SpectrumDisplayController`] turns engineering values into axis bounds
//! and a readable frequency unit, keeps a zoom history, keeps legend checkboxes
//! and trace visibility in sync when traces show up late, and captures the
//! whole view as a transportable [`ViewState`].

pub mod axis_units;
pub mod commands;
pub mod controller;
pub mod display_config;
pub mod error;
pub mod events;
pub mod palette;
pub mod selection;
pub mod trace;
pub mod view_state;
pub mod visibility;
pub mod zoom;

pub use axis_units::{normalize, AxisInputs, FrequencyUnit, NormalizedAxes};
pub use commands::{ConfigCommand, DisplayHandle};
pub use controller::SpectrumDisplayController;
pub use display_config::{AxisConfig, DisplayConfig, FftMode, WindowSpec};
pub use error::DisplayError;
pub use events::{DisplayEvent, EventHub};
pub use palette::Color32;
pub use selection::{picked_frequency_hz, PlotPoint};
pub use trace::{LegendCell, Trace, TraceId};
pub use view_state::ViewState;
pub use visibility::VisibilitySynchronizer;
pub use zoom::{Rect, YAxisScale, ZoomSnapshot, ZoomState};
