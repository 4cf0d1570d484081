//! Turn control points into a dense polyline according to the interpolation mode.

use serde::{Deserialize, Serialize};
use tracing::debug;
use tube_core::{Result, TubeError};
use tube_math::Point3;

use crate::curve::CardinalSpline;
use crate::planner::PathPlanner;
use crate::polyline::Polyline;
use crate::tessellate::{sample_stepped, sample_uniform};

/// Number of samples taken along a cardinal spline.
pub const CARDINAL_SAMPLE_COUNT: usize = 400;

/// How the path between control points is generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Straight segments between consecutive control points.
    #[default]
    None,
    /// Cardinal spline through every control point.
    CardinalSpline,
    /// Smoothed path from a [`PathPlanner`].
    HermiteSpline,
}

impl InterpolationMode {
    /// Map a legacy integer selector; anything unknown becomes `None`.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Self::CardinalSpline,
            2 => Self::HermiteSpline,
            _ => Self::None,
        }
    }

    pub fn index(self) -> i64 {
        match self {
            Self::None => 0,
            Self::CardinalSpline => 1,
            Self::HermiteSpline => 2,
        }
    }
}

/// Whether the path closes into a loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingMode {
    #[default]
    Open,
    Closed,
}

impl RingMode {
    /// Map a legacy switch value: positive means closed.
    pub fn from_index(index: i64) -> Self {
        if index > 0 {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

/// Produces polylines from control points.
///
/// Hermite mode needs a planner; without one it fails with a
/// collaborator error.
#[derive(Clone, Copy, Default)]
pub struct SplineEvaluator<'a> {
    planner: Option<&'a dyn PathPlanner>,
}

impl<'a> SplineEvaluator<'a> {
    pub fn new() -> Self {
        Self { planner: None }
    }

    pub fn with_planner(planner: &'a dyn PathPlanner) -> Self {
        Self {
            planner: Some(planner),
        }
    }

    /// Evaluate the path for `points`.
    ///
    /// Too few points is not an error: the result is an empty polyline.
    /// Ring mode only applies to the cardinal spline; Hermite paths are
    /// always open.
    ///
    /// # Errors
    /// Returns [`TubeError::Collaborator`] when Hermite mode has no planner,
    /// the planner fails, or it returns non-finite points.
    pub fn evaluate(
        &self,
        points: &[Point3],
        mode: InterpolationMode,
        ring_mode: RingMode,
    ) -> Result<Polyline> {
        let required = match (mode, ring_mode) {
            (InterpolationMode::CardinalSpline, RingMode::Closed) => 3,
            _ => 2,
        };
        if points.len() < required {
            debug!(
                ?mode,
                ?ring_mode,
                actual = points.len(),
                required,
                "Not enough control points, returning empty path"
            );
            return Ok(Polyline::empty());
        }

        let polyline = match (mode, ring_mode) {
            (InterpolationMode::None, _) => Polyline::new(points.to_vec()),
            (InterpolationMode::CardinalSpline, RingMode::Open) => open_cardinal(points),
            (InterpolationMode::CardinalSpline, RingMode::Closed) => closed_cardinal(points),
            (InterpolationMode::HermiteSpline, _) => self.planned(points)?,
        };
        Ok(polyline)
    }

    fn planned(&self, points: &[Point3]) -> Result<Polyline> {
        let planner = self
            .planner
            .ok_or_else(|| TubeError::collaborator("no path planner configured"))?;
        let path = planner.compute_path(points).map_err(|e| match e {
            TubeError::Collaborator(_) => e,
            other => TubeError::Collaborator(other.to_string()),
        })?;
        if let Some(i) = path.iter().position(|p| !p.is_finite()) {
            return Err(TubeError::collaborator(format!(
                "path planner returned a non-finite point at index {}",
                i
            )));
        }
        if path.len() < 2 {
            debug!(actual = path.len(), "Path planner returned too few points");
            return Ok(Polyline::empty());
        }
        Ok(Polyline::new(path))
    }
}

fn open_cardinal(points: &[Point3]) -> Polyline {
    let spline = CardinalSpline::from_points(points, false);
    Polyline::new(sample_uniform(&spline, CARDINAL_SAMPLE_COUNT))
}

/// Step through the periodic spline one sample interval at a time and finish
/// exactly one parameter unit past the last control point, where the loop
/// returns to the first point.
fn closed_cardinal(points: &[Point3]) -> Polyline {
    let spline = CardinalSpline::from_points(points, true);
    let (t_min, t_max) = spline.parametric_range();
    let step = (points.len() as f64 - 1.0) / (CARDINAL_SAMPLE_COUNT as f64 - 1.0);
    Polyline::closed_loop(sample_stepped(&spline, t_min, t_max + 1.0, step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    fn square() -> Vec<Point3> {
        vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(10.0, 0.0, 0.0),
            dvec3(10.0, 10.0, 0.0),
            dvec3(0.0, 10.0, 0.0),
        ]
    }

    #[test]
    fn test_mode_from_index() {
        assert_eq!(InterpolationMode::from_index(0), InterpolationMode::None);
        assert_eq!(InterpolationMode::from_index(1), InterpolationMode::CardinalSpline);
        assert_eq!(InterpolationMode::from_index(2), InterpolationMode::HermiteSpline);
        assert_eq!(InterpolationMode::from_index(3), InterpolationMode::None);
        assert_eq!(InterpolationMode::from_index(-1), InterpolationMode::None);
        assert_eq!(RingMode::from_index(1), RingMode::Closed);
        assert_eq!(RingMode::from_index(0), RingMode::Open);
    }

    #[test]
    fn test_none_is_identity() {
        let pts = square();
        let poly = SplineEvaluator::new()
            .evaluate(&pts, InterpolationMode::None, RingMode::Closed)
            .unwrap();
        assert_eq!(poly.points, pts);
        assert!(!poly.closed);
    }

    #[test]
    fn test_open_cardinal_sample_count() {
        let eval = SplineEvaluator::new();
        for n in 2..7 {
            let pts: Vec<Point3> = (0..n).map(|i| dvec3(i as f64, (i * i) as f64, 0.0)).collect();
            let poly = eval
                .evaluate(&pts, InterpolationMode::CardinalSpline, RingMode::Open)
                .unwrap();
            assert_eq!(poly.len(), CARDINAL_SAMPLE_COUNT);
            assert!(!poly.closed);
            assert!((poly.points[0] - pts[0]).length() < 1e-12);
            assert!((poly.points[399] - pts[n - 1]).length() < 1e-12);
        }
    }

    #[test]
    fn test_closed_cardinal_closes_loop() {
        let poly = SplineEvaluator::new()
            .evaluate(&square(), InterpolationMode::CardinalSpline, RingMode::Closed)
            .unwrap();
        assert!(poly.closed);
        let first = poly.first().unwrap();
        let last = poly.last().unwrap();
        assert!((first - last).length() < 1e-9);
        // Roughly 399 * n / (n - 1) stepped samples plus the closing one.
        assert!(poly.len() > 500 && poly.len() < 540, "got {}", poly.len());
    }

    #[test]
    fn test_insufficient_points_give_empty() {
        let eval = SplineEvaluator::new();
        let one = [dvec3(1.0, 0.0, 0.0)];
        for mode in [
            InterpolationMode::None,
            InterpolationMode::CardinalSpline,
            InterpolationMode::HermiteSpline,
        ] {
            assert!(eval.evaluate(&one, mode, RingMode::Open).unwrap().is_empty());
        }
        let two = [dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0)];
        assert!(eval
            .evaluate(&two, InterpolationMode::CardinalSpline, RingMode::Closed)
            .unwrap()
            .is_empty());
        assert_eq!(
            eval.evaluate(&two, InterpolationMode::CardinalSpline, RingMode::Open)
                .unwrap()
                .len(),
            CARDINAL_SAMPLE_COUNT
        );
    }

    #[test]
    fn test_coincident_points_do_not_fail() {
        let pts = vec![dvec3(2.0, 2.0, 2.0); 4];
        let eval = SplineEvaluator::new();
        for ring in [RingMode::Open, RingMode::Closed] {
            let poly = eval
                .evaluate(&pts, InterpolationMode::CardinalSpline, ring)
                .unwrap();
            assert!(poly.points.iter().all(|p| (*p - pts[0]).length() < 1e-12));
        }
    }

    #[test]
    fn test_hermite_without_planner_fails() {
        let err = SplineEvaluator::new()
            .evaluate(&square(), InterpolationMode::HermiteSpline, RingMode::Open)
            .unwrap_err();
        assert!(matches!(err, TubeError::Collaborator(_)));
    }

    #[test]
    fn test_hermite_ignores_ring_mode() {
        let planner = |pts: &[Point3]| -> Result<Vec<Point3>> { Ok(pts.to_vec()) };
        let poly = SplineEvaluator::with_planner(&planner)
            .evaluate(&square(), InterpolationMode::HermiteSpline, RingMode::Closed)
            .unwrap();
        assert!(!poly.closed);
        assert_eq!(poly.points, square());
    }

    #[test]
    fn test_hermite_planner_errors_become_collaborator_errors() {
        let planner = |_: &[Point3]| -> Result<Vec<Point3>> {
            Err(TubeError::Geometry("solver diverged".into()))
        };
        let err = SplineEvaluator::with_planner(&planner)
            .evaluate(&square(), InterpolationMode::HermiteSpline, RingMode::Open)
            .unwrap_err();
        assert!(matches!(err, TubeError::Collaborator(ref m) if m.contains("solver diverged")));
    }

    #[test]
    fn test_hermite_non_finite_output_is_rejected() {
        let planner = |_: &[Point3]| -> Result<Vec<Point3>> {
            Ok(vec![Point3::ZERO, dvec3(f64::NAN, 0.0, 0.0)])
        };
        let err = SplineEvaluator::with_planner(&planner)
            .evaluate(&square(), InterpolationMode::HermiteSpline, RingMode::Open)
            .unwrap_err();
        assert!(matches!(err, TubeError::Collaborator(_)));
    }

    #[test]
    fn test_hermite_short_output_gives_empty() {
        let planner = |pts: &[Point3]| -> Result<Vec<Point3>> { Ok(vec![pts[0]]) };
        let poly = SplineEvaluator::with_planner(&planner)
            .evaluate(&square(), InterpolationMode::HermiteSpline, RingMode::Open)
            .unwrap();
        assert!(poly.is_empty());
    }
}
