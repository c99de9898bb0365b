use glam::Vec3;

use super::config::{Axis, JointId, Pose};
use crate::scene::SceneGraph;

/// Drives the scene graph's dynamic rotations from a complete, clamped joint
/// rotation mapping. Every configured joint always has an entry; there is no
/// partial state.
#[derive(Debug, Clone)]
pub struct PoseController {
    rotations: Pose,
}

impl Default for PoseController {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseController {
    pub fn new() -> Self {
        Self {
            rotations: super::config::neutral_pose(),
        }
    }

    pub fn joint_rotation(&self, joint: JointId) -> Vec3 {
        self.rotations.get(&joint).copied().unwrap_or(Vec3::ZERO)
    }

    /// Sets one axis of one joint, clamped to the joint's configured range,
    /// then re-applies the whole mapping to the graph. Locked axes are a
    /// silent no-op.
    pub fn set_joint_rotation(
        &mut self,
        graph: &mut SceneGraph,
        joint: JointId,
        axis: Axis,
        degrees: f32,
    ) {
        let Some((min, max)) = joint.config().limits[axis.index()] else {
            log::debug!("{joint:?} axis {axis:?} is not editable");
            return;
        };
        let clamped = degrees.clamp(min, max);
        if let Some(rotation) = self.rotations.get_mut(&joint) {
            rotation[axis.index()] = clamped;
        }
        self.apply_all(graph);
    }

    pub fn reset_joint(&mut self, graph: &mut SceneGraph, joint: JointId) {
        self.rotations.insert(joint, Vec3::ZERO);
        self.apply_all(graph);
    }

    /// Zeroes every joint (total reset, unlike the partial-safe `set_pose`).
    pub fn reset_all(&mut self, graph: &mut SceneGraph) {
        for rotation in self.rotations.values_mut() {
            *rotation = Vec3::ZERO;
        }
        self.apply_all(graph);
    }

    /// Snapshot of the full mapping.
    pub fn current_pose(&self) -> Pose {
        self.rotations.clone()
    }

    /// Restores joints present in `pose`, leaving absent joints untouched.
    /// Values are clamped per axis; locked axes are forced to zero.
    pub fn set_pose(&mut self, graph: &mut SceneGraph, pose: &Pose) {
        for (&joint, &requested) in pose {
            let config = joint.config();
            let mut value = Vec3::ZERO;
            for axis in Axis::ALL {
                if let Some((min, max)) = config.limits[axis.index()] {
                    value[axis.index()] = requested[axis.index()].clamp(min, max);
                }
            }
            self.rotations.insert(joint, value);
        }
        self.apply_all(graph);
    }

    /// Pushes every joint's rotation into the graph's dynamic transforms.
    /// Full re-application keeps the graph and mapping trivially consistent.
    pub fn apply_all(&self, graph: &mut SceneGraph) {
        for (&joint, &rotation) in &self.rotations {
            graph.set_dynamic_rotation(joint.node_name(), rotation);
        }
    }
}
