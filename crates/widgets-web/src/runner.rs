use std::cell::Cell;
use std::rc::Rc;

use widgets_core::bridge::protocol::{EVENT_FLOATS, HEADER_FLOATS, VERTEX_FLOATS};
use widgets_core::{
    CaptureChange, Cursor, FrameClock, FrameHeader, GestureAdapter, InputEvent, InputQueue,
    Painter, Palette, PointerEvent, ProtocolLayout, RenderContext, SurfaceSize, Widget,
    WidgetConfig, WidgetContext,
};

/// Generic runner that drives one widget instance.
///
/// Each frame runs strictly in order: queued input, fixed physics steps,
/// end of frame, render, pack. Pointer events only ever touch the queue, so nothing the
/// host does between frames can interleave with a step.
pub struct WidgetRunner<W: Widget> {
    widget: W,
    ctx: WidgetContext,
    input: InputQueue,
    gestures: GestureAdapter,
    clock: FrameClock,
    config: WidgetConfig,
    layout: ProtocolLayout,
    painter: Painter,
    palette: Palette,
    theme_dirty: Rc<Cell<bool>>,
    /// Header + vertices + events, read by the host after each frame.
    frame_buffer: Vec<f32>,
    frame: u32,
    running: bool,
    warned_overflow: bool,
}

impl<W: Widget> WidgetRunner<W> {
    /// Lay out the surface, then initialize the widget.
    pub fn new(
        widget: W,
        container_width: Option<f64>,
        device_pixel_ratio: f64,
        palette: Palette,
    ) -> Self {
        let config = widget.config();
        let layout = ProtocolLayout::from_config(&config);
        let surface = config.surface.layout(container_width, device_pixel_ratio);

        let mut painter = Painter::new();
        painter.set_pixel_ratio(surface.pixel_ratio);

        let mut runner = Self {
            widget,
            ctx: WidgetContext::new(surface),
            input: InputQueue::new(),
            gestures: GestureAdapter::new(),
            clock: FrameClock::new(config.step_dt),
            frame_buffer: vec![0.0; layout.buffer_total_floats],
            layout,
            config,
            painter,
            palette,
            theme_dirty: Rc::new(Cell::new(false)),
            frame: 0,
            running: true,
            warned_overflow: false,
        };
        runner.widget.init(&mut runner.ctx);
        runner.render();
        runner
    }

    /// Flag the theme subscription sets; the palette is refreshed on the next frame.
    pub fn theme_dirty_flag(&self) -> Rc<Cell<bool>> {
        self.theme_dirty.clone()
    }

    /// Feed a raw pointer event through the gesture adapter.
    pub fn push_pointer(&mut self, event: PointerEvent) -> CaptureChange {
        if !self.running {
            return CaptureChange::default();
        }
        let widget = &self.widget;
        self.gestures.handle(event, |pos| widget.hit_test(pos), &mut self.input)
    }

    /// A bound control changed (UI units).
    pub fn push_control(&mut self, kind: u32, ui_value: f64) {
        self.input.push(InputEvent::Control { kind, value: ui_value });
    }

    pub fn push_custom(&mut self, kind: u32, a: f64, b: f64, c: f64) {
        self.input.push(InputEvent::Custom { kind, a, b, c });
    }

    /// Re-run surface layout after the container changed size.
    pub fn relayout(&mut self, container_width: Option<f64>, device_pixel_ratio: f64) {
        let surface = self.config.surface.layout(container_width, device_pixel_ratio);
        if surface == self.ctx.surface {
            return;
        }
        log::debug!(
            "relayout: {}x{} css @{}",
            surface.css_width,
            surface.css_height,
            surface.pixel_ratio
        );
        self.ctx.surface = surface;
        self.painter.set_pixel_ratio(surface.pixel_ratio);
        self.widget.resize(&mut self.ctx);
        self.render();
    }

    /// Run one animation frame. Returns `false` once stopped, so the host
    /// stops requesting frames.
    pub fn tick(&mut self, frame_dt: f64) -> bool {
        if !self.running {
            return false;
        }

        self.ctx.clear_frame_data();
        self.refresh_palette();

        let events = self.input.drain();
        if !events.is_empty() {
            self.widget.handle_input(&mut self.ctx, &events);
        }

        let steps = self.clock.accumulate(frame_dt);
        for _ in 0..steps {
            self.widget.step(&mut self.ctx, self.clock.step_dt());
        }
        self.widget.end_frame(&mut self.ctx);

        self.render();
        self.frame = self.frame.wrapping_add(1);
        true
    }

    /// Repaint from current state without stepping.
    pub fn redraw(&mut self) {
        self.refresh_palette();
        self.render();
    }

    /// Stop the frame loop and drop any open drag.
    /// Returns the pointer the host must release, if one was captured.
    pub fn stop(&mut self) -> Option<i32> {
        if !self.running {
            return None;
        }
        self.running = false;
        let released = self.gestures.cancel(&mut self.input);
        let events = self.input.drain();
        self.widget.handle_input(&mut self.ctx, &events);
        self.render();
        released
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cursor(&self) -> Cursor {
        self.gestures.cursor()
    }

    pub fn control_value(&self, kind: u32) -> Option<f64> {
        self.widget.control_value(kind)
    }

    pub fn take_announcement(&mut self) -> Option<String> {
        self.ctx.take_announcement()
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn surface(&self) -> SurfaceSize {
        self.ctx.surface
    }

    /// Palette used by the last render.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn frame_data(&self) -> &[f32] {
        &self.frame_buffer
    }

    // ---- Pointer accessors for host-side buffer reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame_buffer.len() as u32
    }

    fn refresh_palette(&mut self) {
        if self.theme_dirty.replace(false) {
            self.palette = crate::with_theme(|theme| theme.palette());
        }
    }

    fn render(&mut self) {
        self.painter.clear();
        // A detached or collapsed surface draws nothing but still reports its header.
        if !self.ctx.surface.is_empty() {
            let mut render_ctx = RenderContext {
                painter: &mut self.painter,
                palette: &self.palette,
                surface: self.ctx.surface,
            };
            self.widget.render(&mut render_ctx);
        }
        self.pack();
    }

    fn pack(&mut self) {
        let vertex_count = self.painter.vertex_count().min(self.layout.max_vertices);
        if vertex_count < self.painter.vertex_count() && !self.warned_overflow {
            log::warn!(
                "frame has {} vertices, only {} fit; raise max_vertices",
                self.painter.vertex_count(),
                self.layout.max_vertices
            );
            self.warned_overflow = true;
        }
        let vertex_floats = vertex_count * VERTEX_FLOATS;
        let start = self.layout.vertex_data_offset;
        self.frame_buffer[start..start + vertex_floats]
            .copy_from_slice(&self.painter.vertices()[..vertex_floats]);

        let event_count = self.ctx.events.len().min(self.layout.max_events);
        let start = self.layout.event_data_offset;
        for (i, event) in self.ctx.events.iter().take(event_count).enumerate() {
            let at = start + i * EVENT_FLOATS;
            self.frame_buffer[at..at + EVENT_FLOATS]
                .copy_from_slice(&[event.kind, event.a, event.b, event.c]);
        }

        FrameHeader {
            frame: self.frame,
            surface: self.ctx.surface,
            vertex_count,
            event_count,
            running: self.running,
        }
        .write(&self.layout, &mut self.frame_buffer[..HEADER_FLOATS]);
    }
}
