use bytemuck::{Pod, Zeroable};

/// A numeric event from widget logic to the host page, read back each frame
/// (readouts, mode indicators). `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WidgetEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WidgetEvent {
    pub fn new(kind: u32, a: f64, b: f64, c: f64) -> Self {
        Self {
            kind: kind as f32,
            a: a as f32,
            b: b as f32,
            c: c as f32,
        }
    }
}
