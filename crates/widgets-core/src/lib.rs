pub mod api;
pub mod bridge;
pub mod chart;
pub mod controls;
pub mod core;
pub mod extensions;
pub mod input;
#[cfg(feature = "vectors")]
pub mod paint;
pub mod theme;

// Re-export key types at crate root for convenience
#[cfg(feature = "vectors")]
pub use api::widget::RenderContext;
pub use api::error::{Result, WidgetError};
pub use api::types::WidgetEvent;
pub use api::widget::{Widget, WidgetConfig, WidgetContext};
pub use bridge::protocol::{FrameHeader, ProtocolLayout};
pub use chart::{stack_bands, PlotRect, RollingWindow, Tick};
pub use controls::{ControlBinder, ValueTransform};
pub use core::surface::{SurfaceSize, SurfaceSpec};
pub use core::time::FrameClock;
pub use input::gesture::{CaptureChange, Cursor, GestureAdapter, PointerEvent, PointerPhase};
pub use input::queue::{InputEvent, InputQueue};
#[cfg(feature = "vectors")]
pub use paint::Painter;
pub use theme::{Color, Palette, Scheme, SubscriptionId, ThemeResolver, Token};

// Optional helpers
pub use extensions::{ease, Easing};
