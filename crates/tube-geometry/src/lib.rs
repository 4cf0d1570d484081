//! TubeEngine geometry: cardinal splines, polylines, and path evaluation.

pub mod curve;
pub mod evaluator;
pub mod planner;
pub mod polyline;
pub mod tessellate;

pub use curve::{CardinalSpline, CardinalSpline1D, Curve};
pub use evaluator::{InterpolationMode, RingMode, SplineEvaluator, CARDINAL_SAMPLE_COUNT};
pub use planner::{HermitePathPlanner, PathPlanner};
pub use polyline::Polyline;
