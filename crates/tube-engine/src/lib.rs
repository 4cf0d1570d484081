//! TubeEngine orchestration.
//!
//! [`CurveEngine`] watches a [`ControlPointSource`], turns its points into a
//! tube mesh whenever they or the curve parameters change, and hands the
//! result to a [`MeshSink`].

pub mod engine;
pub mod params;
pub mod sink;
pub mod source;

pub use engine::{CurveEngine, SharedMeshSink};
pub use params::CurveParameters;
pub use sink::{MemoryMeshSink, MeshSink};
pub use source::{ChangeCallback, ControlPointList, ControlPointSource, Subscription, SubscriptionId};

pub use tube_geometry::{HermitePathPlanner, InterpolationMode, PathPlanner, Polyline, RingMode};
pub use tube_mesh::TriangleMesh;
