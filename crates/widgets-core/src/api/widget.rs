use glam::DVec2;

use crate::api::error::Result;
use crate::api::types::WidgetEvent;
use crate::core::surface::{SurfaceSize, SurfaceSpec};
use crate::core::time::DEFAULT_STEP_DT;
use crate::input::queue::InputEvent;
#[cfg(feature = "vectors")]
use crate::paint::Painter;
#[cfg(feature = "vectors")]
use crate::theme::Palette;

/// Runtime configuration, provided by the widget.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Fixed simulation step in seconds (default: 1/60).
    pub step_dt: f64,
    /// How the drawing surface is sized against its container.
    pub surface: SurfaceSpec,
    /// Maximum painted vertices per frame (default: 32768).
    pub max_vertices: usize,
    /// Maximum widget events per frame (default: 16).
    pub max_events: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            step_dt: DEFAULT_STEP_DT,
            surface: SurfaceSpec::default(),
            max_vertices: 32768,
            max_events: 16,
        }
    }
}

/// The contract every widget fulfils.
///
/// The runner calls, once per animation frame and never interleaved:
/// `handle_input` with everything queued since the last frame, `step` zero or
/// more times at the fixed step, `end_frame`, then `render`. `resize` runs
/// between frames.
pub trait Widget {
    /// Build an instance from the host's JSON config.
    fn from_config_json(json: &str) -> Result<Self>
    where
        Self: Sized;

    /// Runtime configuration. Called once before init.
    fn config(&self) -> WidgetConfig {
        WidgetConfig::default()
    }

    /// Called once, after the first layout has been applied to `ctx.surface`.
    fn init(&mut self, ctx: &mut WidgetContext);

    /// The surface was laid out again. `ctx.surface` already holds the new size.
    fn resize(&mut self, _ctx: &mut WidgetContext) {}

    /// Gate for new drags, evaluated on pointer-down only.
    fn hit_test(&self, _pos: DVec2) -> bool {
        true
    }

    /// Apply this frame's input.
    fn handle_input(&mut self, ctx: &mut WidgetContext, events: &[InputEvent]);

    /// Advance one fixed step of `dt` seconds.
    fn step(&mut self, ctx: &mut WidgetContext, dt: f64);

    /// After the last step of a frame. Per-frame events go here.
    fn end_frame(&mut self, _ctx: &mut WidgetContext) {}

    /// Draw the current state. Must depend on state only, so redrawing
    /// without a step (after a resize or theme change) gives the same frame.
    #[cfg(feature = "vectors")]
    fn render(&self, ctx: &mut RenderContext);

    /// Current UI value of a bound control, for mirroring slider and number box.
    fn control_value(&self, _kind: u32) -> Option<f64> {
        None
    }
}

/// Mutable per-instance state shared between the runner and the widget.
pub struct WidgetContext {
    /// Current layout. Widgets simulate in its CSS pixel space.
    pub surface: SurfaceSize,
    /// Events emitted this frame.
    pub events: Vec<WidgetEvent>,
    announcement: Option<String>,
}

impl WidgetContext {
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            surface,
            events: Vec::new(),
            announcement: None,
        }
    }

    /// Emit an event to be forwarded to the host page.
    pub fn emit_event(&mut self, event: WidgetEvent) {
        self.events.push(event);
    }

    /// Post a message for the polite live region. A newer message replaces
    /// one the host has not read yet.
    pub fn announce(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("announce: {}", message);
        self.announcement = Some(message);
    }

    /// Hand the pending announcement to the host.
    pub fn take_announcement(&mut self) -> Option<String> {
        self.announcement.take()
    }

    pub fn pending_announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    /// Clear per-frame transient data. Announcements survive until read.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for WidgetContext {
    fn default() -> Self {
        Self::new(SurfaceSize::EMPTY)
    }
}

/// Read-only inputs plus the painter for a render pass.
#[cfg(feature = "vectors")]
pub struct RenderContext<'a> {
    pub painter: &'a mut Painter,
    pub palette: &'a Palette,
    pub surface: SurfaceSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement_replaced_until_taken() {
        let mut ctx = WidgetContext::default();
        ctx.announce("first");
        ctx.announce("second");
        assert_eq!(ctx.pending_announcement(), Some("second"));
        assert_eq!(ctx.take_announcement().as_deref(), Some("second"));
        assert_eq!(ctx.take_announcement(), None);
    }

    #[test]
    fn clear_frame_data_keeps_announcement() {
        let mut ctx = WidgetContext::default();
        ctx.emit_event(WidgetEvent::new(1, 2.0, 3.0, 4.0));
        ctx.announce("hello");
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
        assert!(ctx.pending_announcement().is_some());
    }
}
