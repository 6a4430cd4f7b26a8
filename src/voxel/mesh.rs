//! Triangle meshes and point containment
//!
//! Containment uses ray parity: a ray cast from the point crosses a closed
//! mesh an odd number of times if and only if the point is inside. Meshes
//! that are not closed give meaningless answers.

use crate::math::{Matrix4x4, Vec3};

use super::SampleError;

/// Direction of the parity ray.
///
/// Not aligned with any axis or face diagonal, so rays from lattice points
/// do not graze the shared edges of axis-aligned meshes.
const PARITY_RAY: Vec3 = Vec3::new(0.3371, 0.8536, 0.397);

/// Relative tolerance of the ray test, scaled by the size of each triangle
const RAY_EPSILON: f32 = 1e-7;

/// A mesh in local space plus the transform placing it in the world
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    indices: Vec<usize>,
    transform: Matrix4x4,
}

impl TriangleMesh {
    /// `indices` lists the vertices of each triangle, three at a time
    pub fn new(
        vertices: Vec<Vec3>,
        indices: Vec<usize>,
        transform: Matrix4x4,
    ) -> Result<Self, SampleError> {
        if indices.len() % 3 != 0 {
            return Err(SampleError::IncompleteTriangle {
                index_count: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(SampleError::IndexOutOfBounds {
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            indices,
            transform,
        })
    }

    /// Closed axis-aligned box, 2 triangles per face, normals pointing out
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        let h = half_extent;
        let vertices = [
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
        ]
        .into_iter()
        .map(|(x, y, z)| Vec3::new(x, y, z))
        .collect();
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // back
            4, 5, 6, 4, 6, 7, // front
            0, 1, 5, 0, 5, 4, // bottom
            3, 6, 2, 3, 7, 6, // top
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        Self {
            vertices,
            indices,
            transform: Matrix4x4::translate(center),
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn transform(&self) -> &Matrix4x4 {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix4x4) {
        self.transform = transform;
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles with the transform applied to every vertex
    pub fn world_triangles(&self) -> Vec<[Vec3; 3]> {
        let world: Vec<Vec3> = self
            .vertices
            .iter()
            .map(|v| self.transform.multiply_point3x4(*v))
            .collect();
        self.indices
            .chunks_exact(3)
            .map(|t| [world[t[0]], world[t[1]], world[t[2]]])
            .collect()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        contains_point(&self.world_triangles(), point)
    }
}

/// Ray parity test against world-space triangles
pub fn contains_point(triangles: &[[Vec3; 3]], point: Vec3) -> bool {
    let crossings = triangles
        .iter()
        .filter(|[a, b, c]| ray_triangle_intersect(point, PARITY_RAY, *a, *b, *c).is_some())
        .count();
    crossings % 2 == 1
}

/// Möller–Trumbore ray/triangle intersection, both faces count.
///
/// Returns the distance along `direction` (in multiples of its length) when
/// the ray hits the triangle in front of `origin`.
pub fn ray_triangle_intersect(
    origin: Vec3,
    direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(edge2);
    let a = edge1.dot(h);

    // a scales with both edges and the direction, compare it relative to them
    let scale = edge1.magnitude() * edge2.magnitude() * direction.magnitude();
    if a.abs() <= RAY_EPSILON * scale {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    // hits closer to the origin than a fraction of the triangle size do not count
    let t = f * edge2.dot(q);
    let min_distance = RAY_EPSILON * edge1.magnitude().max(edge2.magnitude());
    (t * direction.magnitude() > min_distance).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quaternion;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ray_triangle_intersect() {
        let a = Vec3::new(-1.0, -1.0, 5.0);
        let b = Vec3::new(1.0, -1.0, 5.0);
        let c = Vec3::new(0.0, 1.0, 5.0);
        assert_eq!(
            ray_triangle_intersect(Vec3::ZERO, Vec3::FORWARD, a, b, c),
            Some(5.0)
        );
        // back face counts too
        assert_eq!(
            ray_triangle_intersect(Vec3::ZERO, Vec3::FORWARD, a, c, b),
            Some(5.0)
        );
        // behind the origin
        assert_eq!(
            ray_triangle_intersect(Vec3::ZERO, Vec3::BACK, a, b, c),
            None
        );
        // parallel
        assert_eq!(
            ray_triangle_intersect(Vec3::ZERO, Vec3::RIGHT, a, b, c),
            None
        );
        // misses to the side
        assert_eq!(
            ray_triangle_intersect(Vec3::new(3.0, 0.0, 0.0), Vec3::FORWARD, a, b, c),
            None
        );
    }

    #[test]
    fn test_new_validates_indices() {
        let vertices = vec![Vec3::ZERO, Vec3::RIGHT, Vec3::UP];
        assert!(TriangleMesh::new(vertices.clone(), vec![0, 1, 2], Matrix4x4::IDENTITY).is_ok());
        assert_eq!(
            TriangleMesh::new(vertices.clone(), vec![0, 1, 3], Matrix4x4::IDENTITY).err(),
            Some(SampleError::IndexOutOfBounds {
                index: 3,
                vertex_count: 3
            })
        );
        assert_eq!(
            TriangleMesh::new(vertices, vec![0, 1], Matrix4x4::IDENTITY).err(),
            Some(SampleError::IncompleteTriangle { index_count: 2 })
        );
    }

    #[test]
    fn test_cube_is_closed() {
        let cube = TriangleMesh::cube(Vec3::ZERO, 1.0);
        assert_eq!(cube.triangle_count(), 12);
        // every edge is shared by exactly two triangles
        let mut edges = std::collections::HashMap::new();
        for t in cube.indices().chunks_exact(3) {
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                *edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        assert!(edges.values().all(|&n| n == 2));
    }

    #[test]
    fn test_cube_normals_point_out() {
        let cube = TriangleMesh::cube(Vec3::ZERO, 1.0);
        for [a, b, c] in cube.world_triangles() {
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "{a} {b} {c}");
        }
    }

    #[test]
    fn test_contains_point() {
        let cube = TriangleMesh::cube(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(cube.contains_point(Vec3::new(2.0, 0.0, 0.0)));
        assert!(cube.contains_point(Vec3::new(2.9, 0.9, -0.9)));
        assert!(!cube.contains_point(Vec3::ZERO));
        assert!(!cube.contains_point(Vec3::new(2.0, 1.5, 0.0)));
        assert!(!cube.contains_point(Vec3::new(2.0, -1.5, 0.0)));
    }

    #[test]
    fn test_contains_point_at_any_scale() {
        for half_extent in [1e3, 1.0, 1e-2, 1e-4, 1e-6] {
            let cube = TriangleMesh::cube(Vec3::ZERO, half_extent);
            assert!(cube.contains_point(Vec3::ZERO), "{half_extent}");
            let corner = Vec3::ONE * (half_extent * 0.9);
            assert!(cube.contains_point(corner), "{half_extent}");
            let outside = Vec3::new(half_extent * 1.5, 0.0, 0.0);
            assert!(!cube.contains_point(outside), "{half_extent}");
        }
    }

    #[test]
    fn test_ray_triangle_intersect_tiny_triangle() {
        let a = Vec3::new(-1e-5, -1e-5, 5e-5);
        let b = Vec3::new(1e-5, -1e-5, 5e-5);
        let c = Vec3::new(0.0, 1e-5, 5e-5);
        let t = ray_triangle_intersect(Vec3::ZERO, Vec3::FORWARD, a, b, c);
        assert!(t.is_some_and(|t| (t - 5e-5).abs() < 1e-9), "{t:?}");
        assert_eq!(
            ray_triangle_intersect(Vec3::ZERO, Vec3::RIGHT, a, b, c),
            None
        );
    }

    #[test]
    fn test_world_triangles_apply_transform() {
        let mut cube = TriangleMesh::cube(Vec3::ZERO, 1.0);
        cube.set_transform(Matrix4x4::trs(
            Vec3::new(0.0, 10.0, 0.0),
            Quaternion::angle_axis(45.0, Vec3::UP),
            Vec3::new(2.0, 1.0, 1.0),
        ));
        let triangles = cube.world_triangles();
        assert_eq!(triangles.len(), 12);
        assert!(triangles.iter().flatten().all(|v| (v.y - 10.0).abs() <= 1.0 + 1e-5));
        assert!(cube.contains_point(Vec3::new(0.0, 10.0, 0.0)));
        // stretched along the rotated x axis
        let along_x = Quaternion::angle_axis(45.0, Vec3::UP) * Vec3::RIGHT;
        assert!(cube.contains_point(Vec3::new(0.0, 10.0, 0.0) + along_x * 1.8));
        assert!(!cube.contains_point(Vec3::new(0.0, 10.0, 0.0) + along_x * 2.2));
        assert!(!cube.contains_point(Vec3::new(0.0, 10.0, 0.0) + along_x.cross(Vec3::UP) * 1.2));
    }
}
