/// Append-only container of drawable objects
use std::fmt;

/// How the vertices of an object are assembled into primitives.
///
/// Only triangle lists are produced; flat normals have no meaning for lines
/// or points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleList,
}

/// Uploaded geometry plus what is needed to issue its draw call.
///
/// `H` is the backend's handle to the uploaded buffers.
#[derive(Debug, Clone)]
pub struct DrawObject<H> {
    pub handle: H,
    pub vertex_count: u32,
    pub index_count: u32,
    pub topology: Topology,
}

impl<H> DrawObject<H> {
    pub fn new(handle: H, vertex_count: u32, topology: Topology) -> Self {
        Self {
            handle,
            vertex_count,
            index_count: 0,
            topology,
        }
    }

    pub fn indexed(handle: H, vertex_count: u32, index_count: u32, topology: Topology) -> Self {
        Self {
            handle,
            vertex_count,
            index_count,
            topology,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.index_count > 0
    }

    /// Number of elements the draw call consumes.
    pub fn element_count(&self) -> u32 {
        if self.is_indexed() {
            self.index_count
        } else {
            self.vertex_count
        }
    }
}

/// Every object drawn each frame, in insertion order.
///
/// Objects are never removed or reordered, so the index returned by
/// [`World::push`] stays valid for the life of the world.
pub struct World<H> {
    objects: Vec<DrawObject<H>>,
}

impl<H> World<H> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.objects.reserve(additional);
    }

    /// Append an object and return its index.
    pub fn push(&mut self, object: DrawObject<H>) -> usize {
        let index = self.objects.len();
        tracing::debug!(
            index,
            vertices = object.vertex_count,
            indices = object.index_count,
            topology = ?object.topology,
            "object added to world"
        );
        self.objects.push(object);
        index
    }

    pub fn get(&self, index: usize) -> Option<&DrawObject<H>> {
        self.objects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawObject<H>> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.objects.capacity()
    }
}

impl<H> Default for World<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for World<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("objects", &self.objects.len())
            .finish()
    }
}

impl<'a, H> IntoIterator for &'a World<H> {
    type Item = &'a DrawObject<H>;
    type IntoIter = std::slice::Iter<'a, DrawObject<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_sequential_indices() {
        let mut world = World::new();
        assert!(world.is_empty());

        assert_eq!(world.push(DrawObject::new("cube", 36, Topology::TriangleList)), 0);
        assert_eq!(world.push(DrawObject::indexed("part", 24, 36, Topology::TriangleList)), 1);

        assert_eq!(world.len(), 2);
        assert_eq!(world.get(0).map(|o| o.handle), Some("cube"));
        assert_eq!(world.get(1).map(|o| o.index_count), Some(36));
        assert!(world.get(2).is_none());
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut world = World::with_capacity(1);
        for i in 0..5u32 {
            world.push(DrawObject::new(i, 3, Topology::TriangleList));
        }
        let handles: Vec<u32> = world.iter().map(|o| o.handle).collect();
        assert_eq!(handles, vec![0, 1, 2, 3, 4]);
        assert!(world.capacity() >= 5);
    }

    #[test]
    fn test_reserve_grows_capacity() {
        let mut world: World<()> = World::new();
        world.reserve(16);
        assert!(world.capacity() >= 16);
    }

    #[test]
    fn test_indexed_metadata() {
        let plain = DrawObject::new((), 36, Topology::TriangleList);
        assert!(!plain.is_indexed());
        assert_eq!(plain.element_count(), 36);

        let indexed = DrawObject::indexed((), 8, 36, Topology::TriangleList);
        assert!(indexed.is_indexed());
        assert_eq!(indexed.element_count(), 36);
    }
}
