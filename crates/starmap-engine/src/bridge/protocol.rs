/// Shared-memory layout read by the host page.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 32 floats]
/// [Mesh instances: max_instances × 16 floats]
/// [Labels: max_labels × 8 floats]
/// [Events: max_events × 4 floats]
/// [Starfield: starfield_points × 3 floats, written once at mount]
/// ```
///
/// Capacities are written into the header every frame.
/// TypeScript reads them from the header to compute offsets dynamically.

use glam::Mat4;
use crate::api::config::ViewConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 32;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
/// First translucent instance; instances are ordered opaque, alpha, additive.
pub const HEADER_TRANSLUCENT_START: usize = 4;
pub const HEADER_ADDITIVE_START: usize = 5;
pub const HEADER_MAX_LABELS: usize = 6;
pub const HEADER_LABEL_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
pub const HEADER_VIEWPORT_WIDTH: usize = 10;
pub const HEADER_VIEWPORT_HEIGHT: usize = 11;
pub const HEADER_FOG_DENSITY: usize = 12;
/// 1.0 while the focus light is on.
pub const HEADER_FOCUS_LIGHT: usize = 13;
/// 0.0 overview, 1.0 focused.
pub const HEADER_FOCUSED: usize = 14;
pub const HEADER_STARFIELD_POINTS: usize = 15;
/// 16 floats, column-major.
pub const HEADER_VIEW_PROJECTION: usize = 16;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per mesh instance (wire format — never changes).
pub const MESH_INSTANCE_FLOATS: usize = 16;

/// Floats per label: x, y, depth, style, slot, pad×3.
pub const LABEL_FLOATS: usize = 8;

/// Floats per host event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Floats per starfield point: x, y, z.
pub const STARFIELD_POINT_FLOATS: usize = 3;

/// Host events per frame.
pub const DEFAULT_MAX_EVENTS: usize = 32;

/// Buffer layout computed from capacities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_labels: usize,
    pub max_events: usize,
    pub starfield_points: usize,

    pub instance_data_floats: usize,
    pub label_data_floats: usize,
    pub event_data_floats: usize,
    pub starfield_data_floats: usize,

    pub instance_data_offset: usize,
    pub label_data_offset: usize,
    pub event_data_offset: usize,
    pub starfield_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize, max_labels: usize, max_events: usize, starfield_points: usize) -> Self {
        let instance_data_floats = max_instances * MESH_INSTANCE_FLOATS;
        let label_data_floats = max_labels * LABEL_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;
        let starfield_data_floats = starfield_points * STARFIELD_POINT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let label_data_offset = instance_data_offset + instance_data_floats;
        let event_data_offset = label_data_offset + label_data_floats;
        let starfield_data_offset = event_data_offset + event_data_floats;

        let buffer_total_floats = starfield_data_offset + starfield_data_floats;

        Self {
            max_instances,
            max_labels,
            max_events,
            starfield_points,
            instance_data_floats,
            label_data_floats,
            event_data_floats,
            starfield_data_floats,
            instance_data_offset,
            label_data_offset,
            event_data_offset,
            starfield_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(
            config.max_instances,
            config.max_labels,
            DEFAULT_MAX_EVENTS,
            config.starfield.count,
        )
    }
}

/// Per-frame header block.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameHeader {
    data: [f32; HEADER_FLOATS],
}

impl FrameHeader {
    pub fn new(layout: &ProtocolLayout) -> Self {
        let mut data = [0.0; HEADER_FLOATS];
        data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        data[HEADER_MAX_INSTANCES] = layout.max_instances as f32;
        data[HEADER_MAX_LABELS] = layout.max_labels as f32;
        data[HEADER_MAX_EVENTS] = layout.max_events as f32;
        data[HEADER_STARFIELD_POINTS] = layout.starfield_points as f32;
        let identity = Mat4::IDENTITY.to_cols_array();
        data[HEADER_VIEW_PROJECTION..HEADER_VIEW_PROJECTION + 16].copy_from_slice(&identity);
        Self { data }
    }

    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = value;
        }
    }

    pub fn get(&self, index: usize) -> f32 {
        self.data.get(index).copied().unwrap_or(0.0)
    }

    pub fn set_view_projection(&mut self, matrix: &Mat4) {
        self.data[HEADER_VIEW_PROJECTION..HEADER_VIEW_PROJECTION + 16]
            .copy_from_slice(&matrix.to_cols_array());
    }

    pub fn view_projection(&self) -> Mat4 {
        Mat4::from_cols_slice(&self.data[HEADER_VIEW_PROJECTION..HEADER_VIEW_PROJECTION + 16])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn header_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}
