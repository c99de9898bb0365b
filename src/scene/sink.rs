use glam::{Mat4, Vec2, Vec3, Vec4};

/// Renderable triangle mesh produced by a node's geometry factory. The scene
/// graph treats it as opaque data and hands it to the sink untouched.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Index triples; length is always a multiple of three.
    pub indices: Vec<u32>,
    pub uvs: Option<Vec<Vec2>>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Render collaborator invoked once per visible node during traversal, with
/// the node's accumulated world transform. Implementations must tolerate being
/// called several times per user gesture.
pub trait RenderSink {
    fn draw(&mut self, world: Mat4, mesh: &MeshData, color: Vec4);
}

/// Sink that records draw calls without rendering, used by tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<(Mat4, usize, Vec4)>,
}

impl RenderSink for RecordingSink {
    fn draw(&mut self, world: Mat4, mesh: &MeshData, color: Vec4) {
        self.calls.push((world, mesh.triangle_count(), color));
    }
}
