//! Ordered point sequences produced by path evaluation.

use serde::{Deserialize, Serialize};
use tube_core::traits::{BoundingBox, Validate};
use tube_core::{Result, TubeError};
use tube_math::{Aabb3, Point3};

/// An ordered sequence of 3D points, optionally wrapping from last to first.
///
/// A non-empty polyline holds at least 2 points. An empty polyline is how the
/// evaluator reports that it did not have enough input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3>,
    pub closed: bool,
}

impl Polyline {
    /// An open polyline.
    pub fn new(points: Vec<Point3>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// A polyline that logically wraps from its last point back to the first.
    pub fn closed_loop(points: Vec<Point3>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point3> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point3> {
        self.points.last().copied()
    }

    /// Consecutive point pairs; a closed polyline also yields `(last, first)`.
    pub fn segments(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        let wrap = if self.closed && self.points.len() > 1 {
            Some((self.points[self.points.len() - 1], self.points[0]))
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(wrap)
    }

    /// Total length along the segments.
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

impl Validate for Polyline {
    fn validate(&self) -> Result<()> {
        if self.points.len() == 1 {
            return Err(TubeError::InsufficientInput {
                required: 2,
                actual: 1,
            });
        }
        if let Some(i) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(TubeError::Geometry(format!(
                "polyline point {} is not finite",
                i
            )));
        }
        Ok(())
    }
}

impl BoundingBox for Polyline {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        let aabb = Aabb3::from_points(&self.points).unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO));
        (aabb.min, aabb.max)
    }
}
