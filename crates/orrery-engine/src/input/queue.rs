/// Pointer and UI events forwarded by the host, in client (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Wheel scroll; positive `delta` scrolls away (zooms out).
    Wheel { delta: f32 },
    /// The render surface moved or changed size.
    Resize { left: f32, top: f32, width: f32, height: f32 },
    KeyDown { key_code: u32 },
    /// The host's close button was pressed.
    ClosePopup,
}

impl InputEvent {
    pub const KEY_ESCAPE: u32 = 27;
}

/// Events collected between two ticks.
///
/// Browsers fire pointer-move, wheel and resize far more often than the loop
/// ticks. Runs of the same kind are folded on push: moves and resizes keep the
/// latest value, wheel deltas add up. Drag deltas are computed from the last
/// handled position, so folding moves loses no rotation.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        use InputEvent::*;
        match (self.events.last_mut(), event) {
            (Some(last @ PointerMove { .. }), PointerMove { .. })
            | (Some(last @ Resize { .. }), Resize { .. }) => *last = event,
            (Some(Wheel { delta: total }), Wheel { delta }) => *total += delta,
            _ => self.events.push(event),
        }
    }

    /// Take every pending event, leaving the queue empty.
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
