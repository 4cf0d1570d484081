use serde::{Deserialize, Serialize};
use tube_core::traits::{BoundingBox, Validate};
use tube_core::{Result, TubeError};
use tube_math::aabb::Aabb3;
use tube_math::{Point3, Vector3};

/// One cross-sectional loop of a tube: `sides` consecutive vertices starting
/// at `first_vertex`, placed around `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub center: Point3,
    pub first_vertex: u32,
    pub sides: u32,
    /// Whether this ring is closed off by a cap fan.
    pub capped: bool,
}

impl Ring {
    /// Index of the `k`-th vertex around the ring, wrapping past `sides`.
    pub fn vertex(&self, k: u32) -> u32 {
        self.first_vertex + k % self.sides
    }
}

/// Triangle mesh of one or more tubes.
///
/// Every vertex belongs to exactly one ring. Normals are the outward radial
/// directions of the ring vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub positions: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub indices: Vec<u32>,
    pub rings: Vec<Ring>,
}

impl TriangleMesh {
    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Triangles belonging to end caps (a fan of `sides - 2` per capped ring).
    pub fn cap_triangle_count(&self) -> usize {
        self.rings
            .iter()
            .filter(|r| r.capped)
            .map(|r| r.sides.saturating_sub(2) as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Merge another mesh into this one, offsetting indices appropriately.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
        self.rings.extend(other.rings.iter().map(|r| Ring {
            first_vertex: r.first_vertex + offset,
            ..*r
        }));
    }

    /// Compute the axis-aligned bounding box of all positions.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_points(&self.positions).unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO))
    }
}

impl Validate for TriangleMesh {
    fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(TubeError::Geometry(format!(
                "index buffer length {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if self.normals.len() != self.positions.len() {
            return Err(TubeError::Geometry(format!(
                "{} normals for {} positions",
                self.normals.len(),
                self.positions.len()
            )));
        }
        let n = self.positions.len() as u32;
        if let Some(&bad) = self.indices.iter().find(|&&i| i >= n) {
            return Err(TubeError::Geometry(format!(
                "index {} out of bounds (n={})",
                bad, n
            )));
        }
        for ring in &self.rings {
            if ring.sides < 3 || ring.first_vertex + ring.sides > n {
                return Err(TubeError::Geometry(format!(
                    "ring at vertex {} with {} sides does not fit {} vertices",
                    ring.first_vertex, ring.sides, n
                )));
            }
        }
        Ok(())
    }
}

impl BoundingBox for TriangleMesh {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        let aabb = self.aabb();
        (aabb.min, aabb.max)
    }
}
