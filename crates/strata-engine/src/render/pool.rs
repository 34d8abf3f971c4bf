use crate::scene::ObjectKind;

use super::{BufferId, RenderBackend, Vertex};

#[derive(Debug, Copy, Clone)]
struct Slot {
    buffer: BufferId,
    /// In vertices.
    capacity: usize,
}

/// One reusable vertex buffer per drawable kind.
///
/// Buffers grow to the next power of two (at least [`GeometryPool::MIN_CAPACITY`] vertices)
/// when a frame needs more, and never shrink.
#[derive(Debug, Default)]
pub struct GeometryPool {
    slots: [Option<Slot>; ObjectKind::COUNT],
}

impl GeometryPool {
    pub const MIN_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `vertices` into the buffer for `kind`, growing it first if needed.
    ///
    /// Returns `None` for an empty slice (nothing to draw, nothing allocated).
    pub fn upload<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        kind: ObjectKind,
        vertices: &[Vertex],
    ) -> Option<BufferId> {
        if vertices.is_empty() {
            return None;
        }

        let slot = self.ensure_capacity(backend, kind, vertices.len());
        backend.write_vertex_buffer(slot.buffer, bytemuck::cast_slice(vertices));
        Some(slot.buffer)
    }

    /// Current capacity for `kind`, in vertices (0 when nothing was allocated yet).
    pub fn capacity(&self, kind: ObjectKind) -> usize {
        self.slots[kind.index()].map_or(0, |s| s.capacity)
    }

    /// Destroys every buffer. Safe to call more than once.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for slot in self.slots.iter_mut() {
            if let Some(s) = slot.take() {
                backend.destroy_buffer(s.buffer);
            }
        }
    }

    fn ensure_capacity<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        kind: ObjectKind,
        required: usize,
    ) -> Slot {
        let entry = &mut self.slots[kind.index()];
        if let Some(slot) = *entry {
            if required <= slot.capacity {
                return slot;
            }
            backend.destroy_buffer(slot.buffer);
        }

        let capacity = required.next_power_of_two().max(Self::MIN_CAPACITY);
        let label = format!("strata {} vbo", kind.as_str());
        let buffer = backend.create_vertex_buffer(&label, capacity as u64 * Vertex::STRIDE);
        log::debug!("{} vertex buffer grown to {capacity} vertices", kind.as_str());

        let slot = Slot { buffer, capacity };
        *entry = Some(slot);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    fn verts(n: usize) -> Vec<Vertex> {
        vec![Vertex::default(); n]
    }

    #[test]
    fn empty_upload_allocates_nothing() {
        let mut backend = HeadlessBackend::new(10.0, 10.0, 1.0);
        let mut pool = GeometryPool::new();
        assert_eq!(pool.upload(&mut backend, ObjectKind::Rectangle, &[]), None);
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn first_allocation_uses_minimum_capacity() {
        let mut backend = HeadlessBackend::new(10.0, 10.0, 1.0);
        let mut pool = GeometryPool::new();
        let buf = pool.upload(&mut backend, ObjectKind::Circle, &verts(6)).unwrap();
        assert_eq!(pool.capacity(ObjectKind::Circle), 256);
        assert_eq!(backend.buffer_size(buf), Some(256 * 32));
    }

    #[test]
    fn grows_to_next_power_of_two_and_frees_old_buffer() {
        let mut backend = HeadlessBackend::new(10.0, 10.0, 1.0);
        let mut pool = GeometryPool::new();
        let small = pool.upload(&mut backend, ObjectKind::Rectangle, &verts(10)).unwrap();
        let big = pool.upload(&mut backend, ObjectKind::Rectangle, &verts(1000)).unwrap();

        assert_ne!(small, big);
        assert_eq!(pool.capacity(ObjectKind::Rectangle), 1024);
        assert_eq!(backend.buffer_size(small), None);
        assert_eq!(backend.live_buffers(), 1);
    }

    #[test]
    fn never_shrinks() {
        let mut backend = HeadlessBackend::new(10.0, 10.0, 1.0);
        let mut pool = GeometryPool::new();
        let big = pool.upload(&mut backend, ObjectKind::Path, &verts(600)).unwrap();
        let again = pool.upload(&mut backend, ObjectKind::Path, &verts(3)).unwrap();
        assert_eq!(big, again);
        assert_eq!(pool.capacity(ObjectKind::Path), 1024);
    }

    #[test]
    fn release_frees_every_kind_once() {
        let mut backend = HeadlessBackend::new(10.0, 10.0, 1.0);
        let mut pool = GeometryPool::new();
        for kind in ObjectKind::ALL {
            pool.upload(&mut backend, kind, &verts(3));
        }
        assert_eq!(backend.live_buffers(), ObjectKind::COUNT);
        pool.release(&mut backend);
        pool.release(&mut backend);
        assert_eq!(backend.live_buffers(), 0);
    }
}
