//! Arena of render resources with generation-checked handles.
//!
//! Geometry, material and label slots are allocated here and must be released
//! explicitly. Live counts are the leak detector used by the focus tests.

use std::fmt;
use std::marker::PhantomData;
use crate::components::mesh::{GeometryDesc, MaterialDesc};
use crate::error::ResourceError;
use crate::renderer::labels::Label;

/// Typed handle into a [`Pool`]. Stale after its slot is released.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}:{})", self.index, self.generation)
    }
}

pub type GeometryHandle = Handle<GeometryDesc>;
pub type MaterialHandle = Handle<MaterialDesc>;
pub type LabelHandle = Handle<Label>;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena with a free list. Released slots are reused with a bumped generation.
pub struct Pool<T> {
    kind: &'static str,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Pool<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn alloc(&mut self, value: T) -> Handle<T> {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle { index, generation: slot.generation, _marker: PhantomData };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, value: Some(value) });
        Handle { index, generation: 0, _marker: PhantomData }
    }

    /// Release a slot, returning its value. Fails on stale or foreign handles.
    pub fn release(&mut self, handle: Handle<T>) -> Result<T, ResourceError> {
        let stale = ResourceError::StaleHandle {
            kind: self.kind,
            index: handle.index,
            generation: handle.generation,
        };
        let slot = match self.slots.get_mut(handle.index as usize) {
            Some(slot) if slot.generation == handle.generation => slot,
            _ => return Err(stale),
        };
        let value = slot.value.take().ok_or(stale)?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Ok(value)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// Value by raw slot index, ignoring generation (host-side lookups).
    pub fn get_by_index(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize).and_then(|s| s.value.as_ref())
    }

    pub fn live(&self) -> usize {
        self.live
    }
}

/// Snapshot of live resources, compared before/after focus cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    pub geometries: usize,
    pub materials: usize,
    pub labels: usize,
    pub objects: usize,
}

/// All GPU-side resources owned by the scene.
pub struct ResourcePool {
    pub geometries: Pool<GeometryDesc>,
    pub materials: Pool<MaterialDesc>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self {
            geometries: Pool::new("geometry"),
            materials: Pool::new("material"),
        }
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_release_tracks_live_count() {
        let mut pool: Pool<u32> = Pool::new("test");
        let a = pool.alloc(1);
        let b = pool.alloc(2);
        assert_eq!(pool.live(), 2);
        assert_eq!(pool.release(a), Ok(1));
        assert_eq!(pool.live(), 1);
        assert_eq!(pool.get(b), Some(&2));
    }

    #[test]
    fn released_handle_is_stale() {
        let mut pool: Pool<u32> = Pool::new("test");
        let a = pool.alloc(7);
        pool.release(a).unwrap();
        assert!(pool.get(a).is_none());
        assert!(matches!(pool.release(a), Err(ResourceError::StaleHandle { kind: "test", .. })));
    }

    #[test]
    fn slots_are_reused_with_new_generation() {
        let mut pool: Pool<u32> = Pool::new("test");
        let a = pool.alloc(1);
        pool.release(a).unwrap();
        let b = pool.alloc(2);
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(pool.get(a).is_none());
        assert_eq!(pool.get(b), Some(&2));
    }
}
