//! Pointer gesture adapter.
//!
//! Folds mouse/touch/pen pointer events into a single drag session per
//! surface. The hit-test predicate runs once, on pointer-down; after that the
//! session owns the pointer (capture) until it is released or cancelled.

use glam::DVec2;

use super::queue::{InputEvent, InputQueue};

/// Lifecycle phase of a raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerPhase {
    /// Wire code used by the host: 0 down, 1 move, 2 up, 3 cancel.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PointerPhase::Down),
            1 => Some(PointerPhase::Move),
            2 => Some(PointerPhase::Up),
            3 => Some(PointerPhase::Cancel),
            _ => None,
        }
    }
}

/// A raw pointer event in surface-local CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i32,
    pub phase: PointerPhase,
    pub pos: DVec2,
}

impl PointerEvent {
    pub fn new(pointer_id: i32, phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            phase,
            pos: DVec2::new(x, y),
        }
    }
}

/// Cursor the host should show over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` keyword.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// Capture changes the host must apply after an event.
/// `release` is always applied before `capture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureChange {
    pub release: Option<i32>,
    pub capture: Option<i32>,
}

impl CaptureChange {
    pub fn is_none(&self) -> bool {
        self.release.is_none() && self.capture.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    pointer_id: i32,
    last: DVec2,
}

/// Turns raw pointer events into `DragStart/DragMove/DragEnd/DragCancel`.
#[derive(Debug, Default)]
pub struct GestureAdapter {
    session: Option<DragSession>,
}

impl GestureAdapter {
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Pointer currently captured by the session, if any.
    pub fn captured_pointer(&self) -> Option<i32> {
        self.session.map(|s| s.pointer_id)
    }

    pub fn cursor(&self) -> Cursor {
        if self.session.is_some() {
            Cursor::Grabbing
        } else {
            Cursor::Default
        }
    }

    /// Feed one pointer event. Drag events land in `out`; the returned
    /// change tells the host which pointer to capture or release.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        hit_test: impl FnOnce(DVec2) -> bool,
        out: &mut InputQueue,
    ) -> CaptureChange {
        let mut change = CaptureChange::default();

        let positioned = matches!(event.phase, PointerPhase::Down | PointerPhase::Move);
        if positioned && !event.pos.is_finite() {
            return change;
        }

        match event.phase {
            PointerPhase::Down => {
                // A second down while a session is open means we missed an
                // up/cancel somewhere; never leave the old capture dangling.
                if let Some(stale) = self.session.take() {
                    log::debug!("gesture: pointer {} never ended, cancelling", stale.pointer_id);
                    out.push(InputEvent::DragCancel);
                    change.release = Some(stale.pointer_id);
                }
                if hit_test(event.pos) {
                    self.session = Some(DragSession {
                        pointer_id: event.pointer_id,
                        last: event.pos,
                    });
                    out.push(InputEvent::DragStart { pos: event.pos });
                    change.capture = Some(event.pointer_id);
                }
            }
            PointerPhase::Move => {
                if let Some(session) = self.session.as_mut() {
                    if session.pointer_id == event.pointer_id && session.last != event.pos {
                        session.last = event.pos;
                        out.push(InputEvent::DragMove { pos: event.pos });
                    }
                }
            }
            PointerPhase::Up => {
                if let Some(session) = self.session {
                    if session.pointer_id == event.pointer_id {
                        self.session = None;
                        // A bad release point ends the drag where it was last seen.
                        let pos = if event.pos.is_finite() { event.pos } else { session.last };
                        out.push(InputEvent::DragEnd { pos });
                        change.release = Some(session.pointer_id);
                    }
                }
            }
            PointerPhase::Cancel => {
                if let Some(session) = self.session {
                    if session.pointer_id == event.pointer_id {
                        change.release = self.cancel(out);
                    }
                }
            }
        }

        change
    }

    /// Abort any open session. Returns the pointer that must be released.
    pub fn cancel(&mut self, out: &mut InputQueue) -> Option<i32> {
        let session = self.session.take()?;
        out.push(InputEvent::DragCancel);
        Some(session.pointer_id)
    }
}
