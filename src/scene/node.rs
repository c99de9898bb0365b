use glam::{Mat4, Vec3, Vec4};
use std::sync::Arc;

use super::sink::MeshData;

/// Opaque callback producing a node's renderable mesh.
pub type GeometryFactory = Arc<dyn Fn() -> MeshData + Send + Sync>;

/// Integer handle into the scene graph's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// One rigid-body element of the hierarchy. The rest transform is authored at
/// construction and never changes; the dynamic transform is layered on top at
/// render time and is what poses and animation drive.
#[derive(Clone)]
pub struct Node {
    pub name: String,
    pub rest_translation: Vec3,
    /// Euler rotation in degrees, applied Z then Y then X.
    pub rest_rotation: Vec3,
    pub rest_scale: Vec3,
    pub dynamic_translation: Vec3,
    pub dynamic_rotation: Vec3,
    pub dynamic_scale: Vec3,
    pub geometry: Option<GeometryFactory>,
    pub color: Vec4,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        rest_translation: Vec3,
        rest_rotation: Vec3,
        rest_scale: Vec3,
    ) -> Self {
        Self {
            name: name.into(),
            rest_translation,
            rest_rotation,
            rest_scale,
            dynamic_translation: Vec3::ZERO,
            dynamic_rotation: Vec3::ZERO,
            dynamic_scale: Vec3::ONE,
            geometry: None,
            color: Vec4::new(0.7, 0.7, 0.7, 1.0),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_geometry(mut self, factory: GeometryFactory, color: Vec4) -> Self {
        self.geometry = Some(factory);
        self.color = color;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Local transform relative to the parent. Rest and dynamic Euler angles
    /// are summed in degrees before one Z->Y->X rotation is built; translation
    /// is additive and scale multiplicative. This matches the poses authored
    /// against the engine and is not equivalent to composing two rotation
    /// matrices.
    pub fn local_matrix(&self) -> Mat4 {
        let rotation = self.rest_rotation + self.dynamic_rotation;
        Mat4::from_translation(self.rest_translation + self.dynamic_translation)
            * Mat4::from_rotation_z(rotation.z.to_radians())
            * Mat4::from_rotation_y(rotation.y.to_radians())
            * Mat4::from_rotation_x(rotation.x.to_radians())
            * Mat4::from_scale(self.rest_scale * self.dynamic_scale)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("rest_translation", &self.rest_translation)
            .field("rest_rotation", &self.rest_rotation)
            .field("dynamic_rotation", &self.dynamic_rotation)
            .field("has_geometry", &self.geometry.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}
