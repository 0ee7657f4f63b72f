/// Triangle-soup geometry and flat-normal computation
use nalgebra::{Point3, Vector3};

/// Corner order of a cuboid: bit 2 selects +x, bit 1 selects +y, bit 0 selects +z.
/// Every triangle is wound counter-clockwise when seen from outside.
#[rustfmt::skip]
const CUBOID_INDICES: [usize; 36] = [
    1, 5, 7,  7, 3, 1, // front
    5, 4, 6,  6, 7, 5, // right
    2, 6, 4,  4, 0, 2, // back
    0, 1, 3,  3, 2, 0, // left
    0, 4, 5,  5, 1, 0, // bottom
    3, 7, 6,  6, 2, 3, // top
];

/// A triangle defined by three positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal following the right-hand rule over `v0 -> v1 -> v2`.
    ///
    /// A zero-area triangle has no direction; the result is NaN and is passed
    /// through as-is.
    pub fn normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Compute one flat normal per vertex of a triangle soup.
///
/// Vertices `3i`, `3i + 1` and `3i + 2` form triangle `i`; all three receive
/// that triangle's normal. A trailing incomplete triangle gets no normal, so
/// the output length is always a multiple of three.
pub fn flat_normals(positions: &[Point3<f32>]) -> Vec<Vector3<f32>> {
    let mut normals = Vec::with_capacity(positions.len() - positions.len() % 3);

    for corners in positions.chunks_exact(3) {
        let normal = Triangle::new(corners[0], corners[1], corners[2]).normal();
        normals.extend_from_slice(&[normal; 3]);
    }

    normals
}

/// A flat-shaded triangle soup: `positions[i]` pairs with `normals[i]`.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * 3),
            normals: Vec::with_capacity(triangles * 3),
        }
    }

    /// Build a mesh from triangle-major positions and compute its normals.
    pub fn from_positions(mut positions: Vec<Point3<f32>>) -> Self {
        let remainder = positions.len() % 3;
        if remainder != 0 {
            tracing::warn!(
                vertices = positions.len(),
                "dropping {remainder} trailing vertices that do not form a triangle"
            );
            positions.truncate(positions.len() - remainder);
        }

        let normals = flat_normals(&positions);
        Self { positions, normals }
    }

    /// Append a triangle; its flat normal is computed immediately.
    pub fn add_triangle(&mut self, triangle: Triangle) {
        let normal = triangle.normal();
        self.positions.extend_from_slice(&triangle.vertices);
        self.normals.extend_from_slice(&[normal; 3]);
    }

    /// Recompute every normal from the current positions.
    pub fn recompute_normals(&mut self) {
        self.normals = flat_normals(&self.positions);
    }

    /// Axis-aligned rectangular prism with its minimum corner at `pos` and
    /// extents `dim`, as 12 outward-facing triangles.
    pub fn cuboid(pos: Point3<f32>, dim: Vector3<f32>) -> Self {
        let corner = |i: usize| {
            Point3::new(
                if i & 4 != 0 { pos.x + dim.x } else { pos.x },
                if i & 2 != 0 { pos.y + dim.y } else { pos.y },
                if i & 1 != 0 { pos.z + dim.z } else { pos.z },
            )
        };

        Self::from_positions(CUBOID_INDICES.iter().map(|&i| corner(i)).collect())
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Triangle::new(c[0], c[1], c[2]))
    }
}
