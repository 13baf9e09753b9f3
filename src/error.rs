use thiserror::Error;

/// Errors surfaced by the display core
///
/// Only two things can go wrong: an FFT mode string outside the known set,
/// and a view-state blob that does not decode. Everything else is accepted
/// as-is and flows into the axis bounds.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// A setter was handed a value it does not understand. Nothing was changed.
    #[error("{call}({value}): unknown mode")]
    InvalidArgument { call: &'static str, value: String },

    /// A state blob could not be decoded
    #[error("malformed view state: {0}")]
    MalformedState(#[from] serde_json::Error),
}
