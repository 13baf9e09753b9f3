//! Transportable view state
//!
//! Zoom history plus per-trace visibility, independent of the data. The blob
//! is JSON: `{"stack": [[x0, y0, x1, y1], ...], "index": n, "visible": [..]}`.

use serde::{Deserialize, Serialize};

use crate::error::DisplayError;
use crate::zoom::{Rect, ZoomSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(rename = "stack")]
    pub zoom_stack: Vec<Rect>,
    #[serde(rename = "index")]
    pub zoom_index: usize,
    #[serde(rename = "visible")]
    pub visibility: Vec<bool>,
}

impl ViewState {
    pub fn new(zoom: ZoomSnapshot, visibility: Vec<bool>) -> Self {
        Self {
            zoom_stack: zoom.stack,
            zoom_index: zoom.index,
            visibility,
        }
    }

    pub fn to_blob(&self) -> Result<Vec<u8>, DisplayError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_blob(bytes: &[u8]) -> Result<Self, DisplayError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
