//! Zoom history
//!
//! A back/forward stack of view rectangles. Element 0 is the zoom base: the
//! full unzoomed view established by the last axis recompute.

use serde::{Deserialize, Serialize};

/// Bounding box in display units (not raw Hz)
///
/// Serialized as `[x_min, y_min, x_max, y_max]`. Non-finite bounds are
/// written as the strings `"NaN"`, `"inf"` and `"-inf"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[WireBound; 4]", into = "[WireBound; 4]")]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Same box with min/max swapped where they were inverted
    pub fn normalized(self) -> Self {
        Self {
            x_min: self.x_min.min(self.x_max),
            y_min: self.y_min.min(self.y_max),
            x_max: self.x_min.max(self.x_max),
            y_max: self.y_min.max(self.y_max),
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x_min + dx, self.y_min + dy, self.x_max + dx, self.y_max + dy)
    }
}

/// One rect bound as stored in JSON, which has no NaN or infinity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireBound {
    Number(f64),
    Text(String),
}

impl From<f64> for WireBound {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            WireBound::Number(v)
        } else if v.is_nan() {
            WireBound::Text("NaN".to_string())
        } else if v > 0.0 {
            WireBound::Text("inf".to_string())
        } else {
            WireBound::Text("-inf".to_string())
        }
    }
}

impl WireBound {
    fn value(self) -> Result<f64, String> {
        match self {
            WireBound::Number(v) => Ok(v),
            WireBound::Text(text) => match text.parse::<f64>() {
                Ok(v) if !v.is_finite() => Ok(v),
                _ => Err(format!("invalid rect bound {:?}", text)),
            },
        }
    }
}

impl From<Rect> for [WireBound; 4] {
    fn from(r: Rect) -> Self {
        [r.x_min.into(), r.y_min.into(), r.x_max.into(), r.y_max.into()]
    }
}

impl TryFrom<[WireBound; 4]> for Rect {
    type Error = String;

    fn try_from(v: [WireBound; 4]) -> Result<Self, Self::Error> {
        let [x_min, y_min, x_max, y_max] = v;
        Ok(Rect::new(x_min.value()?, y_min.value()?, x_max.value()?, y_max.value()?))
    }
}

/// How the y-axis is scaled right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YAxisScale {
    /// Fixed window, either `[ref - range, ref]` or a zoom rect's y-range
    Fixed { min: f64, max: f64 },
    /// Follow the live data extent
    Auto,
}

impl YAxisScale {
    /// Resolve to a concrete range.
    ///
    /// `data_extent` is the (min, max) of the visible data; `fallback` is used
    /// for `Auto` when there is no data yet (or it is flat).
    pub fn resolve(&self, data_extent: Option<(f64, f64)>, fallback: (f64, f64)) -> (f64, f64) {
        match *self {
            YAxisScale::Fixed { min, max } => (min, max),
            YAxisScale::Auto => match data_extent {
                Some((lo, hi)) if lo < hi => (lo, hi),
                _ => fallback,
            },
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, YAxisScale::Auto)
    }
}

/// Copy of the stack plus the current index
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomSnapshot {
    pub stack: Vec<Rect>,
    pub index: usize,
}

/// Zoom stack with a cursor
///
/// Invariants: the stack is never empty and `index < stack.len()`.
#[derive(Debug, Clone)]
pub struct ZoomState {
    stack: Vec<Rect>,
    index: usize,
}

impl ZoomState {
    pub fn new(base: Rect) -> Self {
        Self {
            stack: vec![base],
            index: 0,
        }
    }

    /// Drop all history and start over from a new base (axis recompute)
    pub fn reset_base(&mut self, base: Rect) {
        self.stack.clear();
        self.stack.push(base);
        self.index = 0;
    }

    pub fn base(&self) -> Rect {
        self.stack[0]
    }

    /// Rect currently on display
    pub fn current(&self) -> Rect {
        self.stack[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stack(&self) -> &[Rect] {
        &self.stack
    }

    /// Displayed rect equals the base by value (not by index)
    pub fn is_at_base(&self) -> bool {
        self.current() == self.base()
    }

    /// Push a new zoom rect, discarding forward history.
    ///
    /// Returns false (and changes nothing) when the rect is already displayed.
    pub fn zoom_to(&mut self, rect: Rect) -> bool {
        let rect = rect.normalized();
        if rect == self.current() {
            return false;
        }
        self.stack.truncate(self.index + 1);
        self.stack.push(rect);
        self.index = self.stack.len() - 1;
        tracing::debug!("[Zoom] Pushed {:?} (depth {})", rect, self.index);
        true
    }

    /// Move through the history, clamped to the stack
    pub fn zoom_by(&mut self, offset: isize) -> bool {
        let last = (self.stack.len() - 1) as isize;
        let target = (self.index as isize).saturating_add(offset).clamp(0, last) as usize;
        if target == self.index {
            return false;
        }
        self.index = target;
        true
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-1)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(1)
    }

    pub fn zoom_to_base(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index = 0;
        true
    }

    /// Shift the displayed rect.
    ///
    /// The base is never moved: panning from index 0 pushes the moved rect as a
    /// new zoom level. Deeper levels are moved in place.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        let moved = self.current().translated(dx, dy);
        if self.index == 0 {
            return self.zoom_to(moved);
        }
        self.stack[self.index] = moved;
        true
    }

    pub fn snapshot(&self) -> ZoomSnapshot {
        ZoomSnapshot {
            stack: self.stack.clone(),
            index: self.index,
        }
    }

    /// Replace the whole history.
    ///
    /// An empty stack is rejected and the current history kept. An index past
    /// the end lands on the last entry. Returns whether the displayed rect
    /// changed.
    pub fn load(&mut self, stack: Vec<Rect>, index: usize) -> bool {
        if stack.is_empty() {
            tracing::warn!("[Zoom] Ignoring empty zoom stack");
            return false;
        }
        let before = self.current();
        self.index = if index >= stack.len() { stack.len() - 1 } else { index };
        self.stack = stack;
        self.current() != before
    }
}
