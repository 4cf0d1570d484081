//! Sweep a circular cross-section along a polyline.

use std::f64::consts::TAU;

use tracing::debug;
use tube_core::traits::Validate;
use tube_core::{Result, Tolerance, TubeError};
use tube_geometry::Polyline;
use tube_math::{parallel_transport_frames, Point3};

use crate::cap::{push_cap, CapEnd};
use crate::triangulate::{Ring, TriangleMesh};

/// Configuration for tube generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeConfig {
    /// Radius of the tube.
    pub radius: f64,
    /// Number of vertices around each ring.
    pub sides: usize,
    /// Whether to cap the ends of an open tube.
    pub capped: bool,
    /// Used to detect zero-length segments and a repeated closing point.
    pub tolerance: Tolerance,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            sides: 20,
            capped: true,
            tolerance: Tolerance::default(),
        }
    }
}

impl TubeConfig {
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_sides(mut self, sides: usize) -> Self {
        self.sides = sides;
        self
    }

    #[must_use]
    pub fn uncapped(mut self) -> Self {
        self.capped = false;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Validate for TubeConfig {
    fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(TubeError::configuration(format!(
                "tube radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if self.sides < 3 {
            return Err(TubeError::configuration(format!(
                "tube needs at least 3 sides, got {}",
                self.sides
            )));
        }
        Ok(())
    }
}

/// Build one continuous tube along `polyline`.
///
/// Each polyline point gets a ring of `sides` vertices, oriented by a
/// parallel transport frame. Consecutive rings are joined by `2 * sides`
/// outward-facing triangles. An open polyline gets fan caps on its first and
/// last ring when `config.capped` is set. A closed polyline gets no caps:
/// its last ring joins the first ring instead. If a closed polyline repeats
/// its first point at the end, that repeated point does not get its own ring.
///
/// # Errors
/// [`TubeError::Configuration`] for a non-positive radius or fewer than 3
/// sides, checked before anything else; [`TubeError::InsufficientInput`] for
/// fewer than 2 points.
pub fn build_tube(polyline: &Polyline, config: &TubeConfig) -> Result<TriangleMesh> {
    config.validate()?;
    if polyline.len() < 2 {
        return Err(TubeError::InsufficientInput {
            required: 2,
            actual: polyline.len(),
        });
    }

    let tol = config.tolerance;
    let mut points: &[Point3] = &polyline.points;
    let mut closed = polyline.closed;
    if closed {
        if points.len() > 3 && tol.is_zero(points[0].distance(points[points.len() - 1])) {
            points = &points[..points.len() - 1];
        }
        // Two rings cannot form a loop without doubling back on themselves.
        if points.len() < 3 {
            closed = false;
        }
    }

    let sides = config.sides as u32;
    let frames = parallel_transport_frames(points, closed, tol);
    let mut mesh = TriangleMesh {
        positions: Vec::with_capacity(points.len() * config.sides),
        normals: Vec::with_capacity(points.len() * config.sides),
        indices: Vec::with_capacity(points.len() * config.sides * 6),
        rings: Vec::with_capacity(points.len()),
    };

    for (point, frame) in points.iter().zip(&frames) {
        mesh.rings.push(Ring {
            center: *point,
            first_vertex: mesh.positions.len() as u32,
            sides,
            capped: false,
        });
        for k in 0..config.sides {
            let radial = frame.radial(TAU * k as f64 / config.sides as f64);
            mesh.positions.push(*point + radial * config.radius);
            mesh.normals.push(radial);
        }
    }

    for pair in mesh.rings.windows(2) {
        connect_rings(&mut mesh.indices, &pair[0], &pair[1]);
    }
    if closed {
        let (first, last) = (mesh.rings[0], mesh.rings[mesh.rings.len() - 1]);
        connect_rings(&mut mesh.indices, &last, &first);
    } else if config.capped {
        let last = mesh.rings.len() - 1;
        push_cap(&mut mesh.indices, &mesh.rings[0], CapEnd::Start);
        push_cap(&mut mesh.indices, &mesh.rings[last], CapEnd::End);
        mesh.rings[0].capped = true;
        mesh.rings[last].capped = true;
    }

    debug!(
        rings = mesh.ring_count(),
        sides,
        closed,
        triangles = mesh.triangle_count(),
        "Built tube"
    );
    Ok(mesh)
}

/// Build one independently capped tube per consecutive pair of `points` and
/// merge them into a single mesh.
///
/// Every input point stays visible as a ring center (shared by the two
/// tubes meeting there), and each segment is closed off on both ends when
/// `config.capped` is set.
///
/// # Errors
/// Same as [`build_tube`].
pub fn build_segment_tubes(points: &[Point3], config: &TubeConfig) -> Result<TriangleMesh> {
    config.validate()?;
    if points.len() < 2 {
        return Err(TubeError::InsufficientInput {
            required: 2,
            actual: points.len(),
        });
    }

    let mut mesh = TriangleMesh::default();
    for pair in points.windows(2) {
        let segment = build_tube(&Polyline::new(pair.to_vec()), config)?;
        mesh.merge(&segment);
    }
    debug!(
        segments = points.len() - 1,
        triangles = mesh.triangle_count(),
        "Built segment tubes"
    );
    Ok(mesh)
}

/// Join ring `a` to ring `b` with a strip of `2 * sides` triangles.
fn connect_rings(indices: &mut Vec<u32>, a: &Ring, b: &Ring) {
    for k in 0..a.sides {
        let (a0, a1) = (a.vertex(k), a.vertex(k + 1));
        let (b0, b1) = (b.vertex(k), b.vertex(k + 1));
        indices.extend_from_slice(&[a0, a1, b0, a1, b1, b0]);
    }
}
