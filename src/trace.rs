//! Renderable traces as the display core sees them
//!
//! The core only cares about a trace's visibility and its legend checkbox.
//! Identity is positional: the n-th attached trace is trace n.

use crate::palette::{trace_color, Color32};

/// Index of a trace in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId(pub usize);

/// Legend entry attached to a trace at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendCell {
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: String,
    pub visible: bool,
    pub color_index: usize,
    /// `None` for traces that never show up in the legend
    pub legend: Option<LegendCell>,
}

impl Trace {
    /// Visible, legend-checkable trace
    pub fn new(label: impl Into<String>, color_index: usize) -> Self {
        Self {
            label: label.into(),
            visible: true,
            color_index,
            legend: Some(LegendCell { checked: true }),
        }
    }

    pub fn without_legend(label: impl Into<String>, color_index: usize) -> Self {
        Self {
            legend: None,
            ..Self::new(label, color_index)
        }
    }

    /// Set visibility and mirror it into the legend checkbox
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(cell) = self.legend.as_mut() {
            cell.checked = visible;
        }
    }

    pub fn is_checked(&self) -> Option<bool> {
        self.legend.map(|cell| cell.checked)
    }

    /// Default pen colour for this trace
    pub fn color(&self) -> Color32 {
        trace_color(self.color_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trace_is_visible_and_checked() {
        let trace = Trace::new("ch0", 0);
        assert!(trace.visible);
        assert_eq!(trace.is_checked(), Some(true));
    }

    #[test]
    fn test_set_visible_mirrors_legend() {
        let mut trace = Trace::new("ch0", 0);
        trace.set_visible(false);
        assert!(!trace.visible);
        assert_eq!(trace.legend, Some(LegendCell { checked: false }));

        let mut bare = Trace::without_legend("grid", 1);
        bare.set_visible(false);
        assert!(!bare.visible);
        assert_eq!(bare.is_checked(), None);
    }

    #[test]
    fn test_color_follows_index() {
        assert_eq!(Trace::new("a", 2).color(), trace_color(2));
        assert_eq!(Trace::new("b", 14).color(), trace_color(2));
    }
}
