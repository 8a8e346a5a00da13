use glam::DVec2;

/// Input event types a widget understands.
/// Pointer traffic has already been folded into drag sessions by the gesture adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A drag began at surface-local CSS pixel coordinates. The hit-test accepted it.
    DragStart { pos: DVec2 },
    /// The captured pointer moved.
    DragMove { pos: DVec2 },
    /// The captured pointer was released.
    DragEnd { pos: DVec2 },
    /// The drag was aborted (pointer cancel, lost capture, teardown).
    DragCancel,
    /// A bound control (slider or number box) changed. `value` is in UI
    /// units; the widget's binder maps it to the model.
    Control { kind: u32, value: f64 },
    /// A custom event from the host page (buttons etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f64, b: f64, c: f64 },
}

/// A queue of input events.
/// Event handlers push into the queue; the runner hands it to the widget once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::DragStart { pos: DVec2::new(10.0, 20.0) });
        q.push(InputEvent::DragCancel);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        match q.drain()[0] {
            InputEvent::Custom { kind, a, b, c } => {
                assert_eq!(kind, 7);
                assert_eq!((a, b, c), (1.5, 2.5, 3.5));
            }
            other => panic!("Expected Custom event, got {:?}", other),
        }
    }
}
