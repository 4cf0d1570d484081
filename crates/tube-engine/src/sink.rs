//! Receivers for generated meshes.

use tube_mesh::TriangleMesh;

/// Destination for generated meshes (a model node, a renderer buffer, ...).
pub trait MeshSink {
    /// Replace the displayed mesh.
    fn set_mesh(&mut self, mesh: TriangleMesh);

    /// Whether the sink is already registered with its display context.
    fn is_attached(&self) -> bool;

    /// Register the sink with its display context. Called by the engine after
    /// delivering a mesh to a sink that is not attached yet.
    fn attach(&mut self) {}
}

/// Sink that keeps the latest mesh in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMeshSink {
    mesh: Option<TriangleMesh>,
    attached: bool,
    deliveries: usize,
}

impl MemoryMeshSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }

    /// Number of meshes received so far.
    pub fn deliveries(&self) -> usize {
        self.deliveries
    }
}

impl MeshSink for MemoryMeshSink {
    fn set_mesh(&mut self, mesh: TriangleMesh) {
        self.mesh = Some(mesh);
        self.deliveries += 1;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn attach(&mut self) {
        self.attached = true;
    }
}
