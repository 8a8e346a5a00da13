/// Frame buffer layout shared with the host page.
/// Must stay in sync with the TypeScript reader.
///
/// Layout (all values f32 / 4 bytes):
/// ```text
/// [Header: 12 floats]
/// [Vertices: max_vertices × 6 floats]   x, y, r, g, b, a (backing-store pixels)
/// [Events: max_events × 4 floats]       kind, a, b, c
/// ```
///
/// Capacities are written into the header every frame so the reader can
/// compute offsets without sharing constants.

use crate::api::widget::WidgetConfig;
use crate::core::surface::SurfaceSize;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 12;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_CSS_WIDTH: usize = 2;
pub const HEADER_CSS_HEIGHT: usize = 3;
pub const HEADER_PIXEL_RATIO: usize = 4;
pub const HEADER_BACKING_WIDTH: usize = 5;
pub const HEADER_BACKING_HEIGHT: usize = 6;
pub const HEADER_MAX_VERTICES: usize = 7;
pub const HEADER_VERTEX_COUNT: usize = 8;
pub const HEADER_MAX_EVENTS: usize = 9;
pub const HEADER_EVENT_COUNT: usize = 10;
pub const HEADER_RUNNING: usize = 11;

pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per painted vertex (wire format, never changes).
pub const VERTEX_FLOATS: usize = 6;

/// Floats per widget event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_vertices: usize,
    pub max_events: usize,

    pub vertex_data_floats: usize,
    pub event_data_floats: usize,

    pub vertex_data_offset: usize,
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_vertices: usize, max_events: usize) -> Self {
        let vertex_data_floats = max_vertices * VERTEX_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let vertex_data_offset = HEADER_FLOATS;
        let event_data_offset = vertex_data_offset + vertex_data_floats;
        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_vertices,
            max_events,
            vertex_data_floats,
            event_data_floats,
            vertex_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.max_vertices, config.max_events)
    }
}

/// Per-frame header values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHeader {
    pub frame: u32,
    pub surface: SurfaceSize,
    pub vertex_count: usize,
    pub event_count: usize,
    pub running: bool,
}

impl FrameHeader {
    /// Write into the first `HEADER_FLOATS` slots of `buf`.
    pub fn write(&self, layout: &ProtocolLayout, buf: &mut [f32]) {
        let header = &mut buf[..HEADER_FLOATS];
        // f32 counts exactly up to 2^24 frames, about three days at 60 fps.
        header[HEADER_FRAME_COUNTER] = (self.frame % (1 << 24)) as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_CSS_WIDTH] = self.surface.css_width as f32;
        header[HEADER_CSS_HEIGHT] = self.surface.css_height as f32;
        header[HEADER_PIXEL_RATIO] = self.surface.pixel_ratio as f32;
        header[HEADER_BACKING_WIDTH] = self.surface.backing_width as f32;
        header[HEADER_BACKING_HEIGHT] = self.surface.backing_height as f32;
        header[HEADER_MAX_VERTICES] = layout.max_vertices as f32;
        header[HEADER_VERTEX_COUNT] = self.vertex_count.min(layout.max_vertices) as f32;
        header[HEADER_MAX_EVENTS] = layout.max_events as f32;
        header[HEADER_EVENT_COUNT] = self.event_count.min(layout.max_events) as f32;
        header[HEADER_RUNNING] = if self.running { 1.0 } else { 0.0 };
    }
}
