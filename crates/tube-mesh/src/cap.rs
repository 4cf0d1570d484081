//! End-cap triangulation for open tube ends.

use crate::triangulate::Ring;

/// Which end of the tube a cap closes. Determines the fan winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapEnd {
    /// Faces backwards, against the path direction.
    Start,
    /// Faces forwards, along the path direction.
    End,
}

/// Fan-triangulate a ring from its first vertex, appending to `indices`.
///
/// Ring vertices run counterclockwise around the path tangent, so the end
/// cap keeps that order and the start cap reverses it; both then face away
/// from the tube interior. Adds `sides - 2` triangles.
pub fn push_cap(indices: &mut Vec<u32>, ring: &Ring, end: CapEnd) {
    let apex = ring.vertex(0);
    for k in 1..ring.sides.saturating_sub(1) {
        let (b, c) = (ring.vertex(k), ring.vertex(k + 1));
        match end {
            CapEnd::Start => indices.extend_from_slice(&[apex, c, b]),
            CapEnd::End => indices.extend_from_slice(&[apex, b, c]),
        }
    }
}
