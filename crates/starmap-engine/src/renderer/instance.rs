use bytemuck::{Pod, Zeroable};

/// Shape codes understood by the host mesh pipeline.
pub const SHAPE_SPHERE: f32 = 0.0;
pub const SHAPE_RING: f32 = 1.0;
pub const SHAPE_POINTS: f32 = 2.0;

/// Per-instance mesh data written to shared memory for the host renderer.
/// World space; the host applies the camera's view-projection.
/// 16 floats = 64 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// One of the `SHAPE_*` codes.
    pub shape: f32,
    /// Sphere radius, ring inner radius or point size.
    pub size_a: f32,
    /// Ring outer radius or point count.
    pub size_b: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    /// Emissive color premultiplied by its intensity.
    pub er: f32,
    pub eg: f32,
    pub eb: f32,
    /// `BlendMode` as float.
    pub blend: f32,
}

impl MeshInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Fixed-capacity instance buffer, rebuilt every frame without reallocating.
pub struct InstanceBuffer {
    instances: Vec<MeshInstance>,
    capacity: usize,
    /// Instances refused this frame because the buffer was full.
    dropped: usize,
}

impl InstanceBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.dropped = 0;
    }

    /// Raise the capacity to at least `capacity`. Never shrinks.
    /// Allocates, so only call it between frames.
    pub fn grow_to(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.instances.reserve(capacity - self.instances.len());
            self.capacity = capacity;
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, instance: MeshInstance) {
        if self.instances.len() < self.capacity {
            self.instances.push(instance);
        } else {
            self.dropped += 1;
        }
    }

    pub fn as_slice(&self) -> &[MeshInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_instance_is_64_bytes() {
        assert_eq!(std::mem::size_of::<MeshInstance>(), 64);
        assert_eq!(MeshInstance::STRIDE_BYTES, 64);
    }

    #[test]
    fn full_buffer_counts_drops() {
        let mut buf = InstanceBuffer::with_capacity(1);
        buf.push(MeshInstance::default());
        buf.push(MeshInstance::default());
        assert_eq!(buf.instance_count(), 1);
        assert_eq!(buf.dropped(), 1);
        buf.clear();
        assert_eq!(buf.dropped(), 0);
    }

    #[test]
    fn grow_only_raises_capacity() {
        let mut buf = InstanceBuffer::with_capacity(2);
        buf.grow_to(8);
        assert_eq!(buf.capacity(), 8);
        buf.grow_to(4);
        assert_eq!(buf.capacity(), 8);
        for _ in 0..8 {
            buf.push(MeshInstance::default());
        }
        assert_eq!(buf.instance_count(), 8);
        assert_eq!(buf.dropped(), 0);
    }
}
