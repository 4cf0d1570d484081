//! Path planners used by the Hermite interpolation mode.

use tube_core::{Result, TubeError};
use tube_math::Point3;

use crate::curve::CardinalSpline;
use crate::tessellate::{resample_by_distance, sample_uniform};

/// External service that turns control points into a smoothed path.
///
/// Failures should be reported as [`TubeError::Collaborator`]; the evaluator
/// converts anything else into that variant before propagating it.
pub trait PathPlanner {
    fn compute_path(&self, control_points: &[Point3]) -> Result<Vec<Point3>>;
}

impl<F> PathPlanner for F
where
    F: Fn(&[Point3]) -> Result<Vec<Point3>>,
{
    fn compute_path(&self, control_points: &[Point3]) -> Result<Vec<Point3>> {
        self(control_points)
    }
}

/// Cubic Hermite path through all control points, resampled at a fixed
/// world-space step.
///
/// Tangents are central differences (one-sided at the ends), which makes the
/// curve a Catmull-Rom spline. The path starts and ends exactly on the first
/// and last control points; consecutive samples are at most `step` apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermitePathPlanner {
    step: f64,
    samples_per_segment: usize,
}

impl HermitePathPlanner {
    pub const DEFAULT_STEP: f64 = 0.5;

    pub fn new(step: f64) -> Result<Self> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(TubeError::configuration(format!(
                "path step must be positive and finite, got {}",
                step
            )));
        }
        Ok(Self {
            step,
            samples_per_segment: 64,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Default for HermitePathPlanner {
    fn default() -> Self {
        Self {
            step: Self::DEFAULT_STEP,
            samples_per_segment: 64,
        }
    }
}

impl PathPlanner for HermitePathPlanner {
    fn compute_path(&self, control_points: &[Point3]) -> Result<Vec<Point3>> {
        if control_points.len() < 2 {
            return Ok(Vec::new());
        }
        let spline = CardinalSpline::from_points(control_points, false);
        let dense = sample_uniform(
            &spline,
            (control_points.len() - 1) * self.samples_per_segment + 1,
        );
        Ok(resample_by_distance(&dense, self.step))
    }
}
