use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Visual style of a screen-space label, resolved to CSS by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LabelStyle {
    /// Overview star name, shown on hover.
    #[default]
    Star = 0,
    /// Name of the focused star.
    Focused = 1,
    /// Planet name in a focused system.
    Planet = 2,
}

/// A text overlay anchored to a scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub style: LabelStyle,
    /// Offset from the anchor's world position.
    pub offset: Vec3,
    pub visible: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, style: LabelStyle, offset: Vec3) -> Self {
        Self {
            text: text.into(),
            style,
            offset,
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Per-frame projected label, read by the host overlay.
/// 8 floats = 32 bytes per label.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LabelInstance {
    /// Screen position in CSS pixels, origin top-left.
    pub x: f32,
    pub y: f32,
    /// Distance from the camera, for stacking.
    pub depth: f32,
    pub style: f32,
    /// Label slot; resolve the text through the runner.
    pub slot: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl LabelInstance {
    pub const FLOATS: usize = 8;
}

/// Fixed-capacity label buffer. Labels past capacity are dropped for the frame.
pub struct LabelBuffer {
    labels: Vec<LabelInstance>,
    capacity: usize,
}

impl LabelBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Returns false when the buffer is full.
    pub fn push(&mut self, label: LabelInstance) -> bool {
        if self.labels.len() >= self.capacity {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn as_slice(&self) -> &[LabelInstance] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels_ptr(&self) -> *const f32 {
        self.labels.as_ptr() as *const f32
    }
}
