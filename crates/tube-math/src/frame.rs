//! Moving frames along a polyline for sweeping cross-sections.
//!
//! Frames are propagated by parallel transport (a rotation-minimizing frame),
//! so the cross-section does not twist or flip as the path bends.

use glam::DQuat;
use tube_core::Tolerance;

use crate::{Point3, Vector3};

/// Orthonormal, right-handed frame at one polyline point.
///
/// `binormal == tangent.cross(normal)` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Forward direction along the path.
    pub tangent: Vector3,
    /// First cross-section axis (`u`).
    pub normal: Vector3,
    /// Second cross-section axis (`v`).
    pub binormal: Vector3,
}

impl Frame {
    /// Build an initial frame around `tangent`.
    ///
    /// The normal is taken from the world axis least aligned with the tangent,
    /// which keeps the start orientation stable for axis-aligned paths.
    pub fn from_tangent(tangent: Vector3) -> Self {
        let tangent = tangent.try_normalize().unwrap_or(Vector3::Z);
        let abs = tangent.abs();
        let axis = if abs.x <= abs.y && abs.x <= abs.z {
            Vector3::X
        } else if abs.y <= abs.z {
            Vector3::Y
        } else {
            Vector3::Z
        };
        let normal = (axis - tangent * tangent.dot(axis))
            .try_normalize()
            .unwrap_or_else(|| tangent.any_orthonormal_vector());
        Self {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        }
    }

    /// Carry this frame onto `new_tangent` with the smallest rotation.
    ///
    /// An exact reversal rotates half a turn about the normal, so the normal
    /// survives and the binormal flips with the tangent.
    pub fn transport(&self, new_tangent: Vector3) -> Self {
        let Some(tangent) = new_tangent.try_normalize() else {
            return *self;
        };
        let cos = self.tangent.dot(tangent);
        let normal = if cos <= -1.0 + 1e-12 {
            self.normal
        } else {
            let rotated = DQuat::from_rotation_arc(self.tangent, tangent) * self.normal;
            (rotated - tangent * tangent.dot(rotated))
                .try_normalize()
                .unwrap_or(self.normal)
        };
        Self {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        }
    }

    /// Rotate normal and binormal by `angle` around the tangent.
    pub fn rotate_around_tangent(&self, angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        Self {
            tangent: self.tangent,
            normal: self.normal * cos_a + self.binormal * sin_a,
            binormal: self.binormal * cos_a - self.normal * sin_a,
        }
    }

    /// Cross-section offset direction at angle `theta`.
    pub fn radial(&self, theta: f64) -> Vector3 {
        let (sin_t, cos_t) = theta.sin_cos();
        self.normal * cos_t + self.binormal * sin_t
    }
}

/// Per-point tangents: the normalized sum of unit incoming and outgoing
/// segment directions.
///
/// Zero-length segments contribute nothing; points with no usable direction
/// inherit the nearest preceding tangent (or the first usable one).
fn point_tangents(points: &[Point3], closed: bool, tol: Tolerance) -> Vec<Vector3> {
    let n = points.len();
    let seg_count = if closed { n } else { n - 1 };
    let dirs: Vec<Vector3> = (0..seg_count)
        .map(|i| {
            let d = points[(i + 1) % n] - points[i];
            if tol.is_zero(d.length()) {
                Vector3::ZERO
            } else {
                d.normalize()
            }
        })
        .collect();

    let mut tangents: Vec<Vector3> = (0..n)
        .map(|i| {
            let incoming = match (i, closed) {
                (0, false) => Vector3::ZERO,
                (0, true) => dirs[seg_count - 1],
                _ => dirs[i - 1],
            };
            let outgoing = dirs.get(i).copied().unwrap_or(Vector3::ZERO);
            let sum = incoming + outgoing;
            if tol.is_zero(sum.length()) {
                // Reversal (or isolated point): follow the arriving segment.
                if incoming != Vector3::ZERO {
                    incoming
                } else {
                    outgoing
                }
            } else {
                sum.normalize()
            }
        })
        .collect();

    let fallback = tangents
        .iter()
        .copied()
        .find(|t| *t != Vector3::ZERO)
        .unwrap_or(Vector3::Z);
    let mut previous = fallback;
    for t in &mut tangents {
        if *t == Vector3::ZERO {
            *t = previous;
        }
        previous = *t;
    }
    tangents
}

/// Compute parallel transport frames at every point of a polyline.
///
/// For a closed polyline the twist accumulated around the loop is spread
/// evenly over all frames, so the frame carried past the last point matches
/// the first one and the seam does not shear.
///
/// Returns an empty vector for fewer than 2 points.
pub fn parallel_transport_frames(points: &[Point3], closed: bool, tol: Tolerance) -> Vec<Frame> {
    if points.len() < 2 {
        return Vec::new();
    }

    let tangents = point_tangents(points, closed, tol);
    let mut frames = Vec::with_capacity(points.len());
    frames.push(Frame::from_tangent(tangents[0]));
    for &tangent in &tangents[1..] {
        let prev = frames[frames.len() - 1];
        frames.push(prev.transport(tangent));
    }

    if closed {
        let first = frames[0];
        let wrapped = frames[frames.len() - 1].transport(first.tangent);
        let angle = wrapped
            .normal
            .cross(first.normal)
            .dot(first.tangent)
            .atan2(wrapped.normal.dot(first.normal));
        if !tol.is_zero_angle(angle) {
            let n = frames.len() as f64;
            for (i, frame) in frames.iter_mut().enumerate() {
                *frame = frame.rotate_around_tangent(angle * i as f64 / n);
            }
        }
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec3;

    fn assert_orthonormal(f: &Frame) {
        assert_relative_eq!(f.tangent.length(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(f.normal.length(), 1.0, epsilon = 1e-10);
        assert!(f.tangent.dot(f.normal).abs() < 1e-10);
        assert!((f.tangent.cross(f.normal) - f.binormal).length() < 1e-10);
    }

    #[test]
    fn test_from_tangent_orthonormal() {
        for t in [Vector3::X, Vector3::Y, Vector3::Z, dvec3(1.0, 2.0, -3.0)] {
            assert_orthonormal(&Frame::from_tangent(t));
        }
    }

    #[test]
    fn test_from_zero_tangent_falls_back_to_z() {
        let f = Frame::from_tangent(Vector3::ZERO);
        assert_eq!(f.tangent, Vector3::Z);
        assert_orthonormal(&f);
    }

    #[test]
    fn test_straight_line_frames_constant() {
        let pts: Vec<Point3> = (0..5).map(|i| dvec3(i as f64, 0.0, 0.0)).collect();
        let frames = parallel_transport_frames(&pts, false, Tolerance::default());
        assert_eq!(frames.len(), 5);
        for f in &frames {
            assert!((f.normal - frames[0].normal).length() < 1e-12);
            assert_orthonormal(f);
        }
    }

    #[test]
    fn test_reversal_keeps_normal() {
        let pts = vec![dvec3(0.0, 0.0, 0.0), dvec3(5.0, 0.0, 0.0), dvec3(0.0, 0.0, 0.0)];
        let frames = parallel_transport_frames(&pts, false, Tolerance::default());
        assert!((frames[2].tangent + Vector3::X).length() < 1e-12);
        assert!((frames[2].normal - frames[0].normal).length() < 1e-12);
        assert_orthonormal(&frames[2]);
    }

    #[test]
    fn test_right_angle_turn_rotates_minimally() {
        let pts = vec![dvec3(0.0, 0.0, 0.0), dvec3(10.0, 0.0, 0.0), dvec3(10.0, 10.0, 0.0)];
        let frames = parallel_transport_frames(&pts, false, Tolerance::default());
        // The turn happens in the XY plane, so the Z-aligned axis stays put.
        let z_axis = |f: &Frame| {
            if f.normal.z.abs() > 0.5 {
                f.normal
            } else {
                f.binormal
            }
        };
        assert!((z_axis(&frames[0]) - z_axis(&frames[2])).length() < 1e-10);
        for f in &frames {
            assert_orthonormal(f);
        }
    }

    #[test]
    fn test_coincident_points_do_not_break_frames() {
        let pts = vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(0.0, 0.0, 0.0),
            dvec3(0.0, 3.0, 0.0),
            dvec3(0.0, 3.0, 0.0),
        ];
        let frames = parallel_transport_frames(&pts, false, Tolerance::default());
        assert_eq!(frames.len(), 4);
        for f in &frames {
            assert_orthonormal(f);
            assert!((f.tangent - Vector3::Y).length() < 1e-12);
        }
    }

    #[test]
    fn test_all_points_coincident() {
        let pts = vec![dvec3(1.0, 1.0, 1.0); 3];
        let frames = parallel_transport_frames(&pts, false, Tolerance::default());
        assert_eq!(frames.len(), 3);
        for f in &frames {
            assert_eq!(f.tangent, Vector3::Z);
        }
    }

    #[test]
    fn test_closed_helix_loop_has_no_seam_twist() {
        // A non-planar closed loop accumulates holonomy under pure transport.
        let pts: Vec<Point3> = (0..64)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 64.0;
                dvec3(a.cos() * 5.0, a.sin() * 5.0, (2.0 * a).sin() * 2.0)
            })
            .collect();
        let frames = parallel_transport_frames(&pts, true, Tolerance::default());
        let carried = frames[63].transport(frames[0].tangent);
        assert!((carried.normal - frames[0].normal).length() < 0.2);
        for f in &frames {
            assert_orthonormal(f);
        }
    }

    #[test]
    fn test_too_few_points() {
        assert!(parallel_transport_frames(&[Vector3::ZERO], false, Tolerance::default()).is_empty());
    }
}
