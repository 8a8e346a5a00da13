//! Errors raised while bringing a widget instance up.
//!
//! Once a widget is running nothing is fallible: bad input is clamped or
//! ignored, never surfaced.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WidgetError>;

#[derive(Error, Debug)]
pub enum WidgetError {
    /// The host passed a config the widget could not parse.
    #[error("invalid widget config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// The hosting page did not provide a drawing surface.
    #[error("no drawing surface for widget {0:?}")]
    MissingSurface(String),

    /// A call referenced an instance that was never created or was disposed.
    #[error("unknown widget instance {0}")]
    UnknownInstance(u32),

    /// Every handle is taken by a live instance.
    #[error("no free widget handle")]
    HandlesExhausted,
}
