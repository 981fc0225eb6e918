/// Key code the host sends for Escape.
pub const KEY_ESCAPE: u32 = 27;

/// Input events the view understands.
/// Pointer coordinates are CSS pixels relative to the canvas, origin top-left.
/// Timestamps are host milliseconds (`performance.now()`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, time_ms: f64 },
    PointerUp { x: f32, y: f32, time_ms: f64 },
    PointerMove { x: f32, y: f32 },
    /// Wheel scroll; positive `delta_y` zooms out.
    Wheel { delta_y: f32 },
    KeyDown { key_code: u32 },
    /// The canvas changed size.
    Resize { width: f32, height: f32 },
}

/// A queue of input events.
/// The host pushes events as they arrive; the view drains them once per tick.
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

    /// Move pending events into `out`, keeping both allocations alive.
    pub fn drain_into(&mut self, out: &mut Vec<InputEvent>) {
        out.clear();
        out.append(&mut self.events);
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
