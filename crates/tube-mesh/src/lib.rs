pub mod cap;
pub mod triangulate;
pub mod tube;

pub use triangulate::{Ring, TriangleMesh};
pub use tube::{build_segment_tubes, build_tube, TubeConfig};
