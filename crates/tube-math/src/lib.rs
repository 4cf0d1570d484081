pub mod aabb;
pub mod frame;

pub use glam::{DQuat, DVec3};
pub use aabb::Aabb3;
pub use frame::{parallel_transport_frames, Frame};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
