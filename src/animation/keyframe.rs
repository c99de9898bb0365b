use glam::Vec3;

use crate::camera::CameraState;
use crate::lighting::Lighting;
use crate::pose::{JointId, Pose};

/// Tolerance for deciding that two scene snapshots are materially the same.
pub const SNAPSHOT_EPSILON: f32 = 0.001;

/// Full capture of everything a keyframe anchors: joint rotations, camera
/// state, and lighting.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub pose: Pose,
    pub camera: CameraState,
    pub lighting: Lighting,
}

impl Snapshot {
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let poses_match = JointId::ALL.iter().all(|joint| {
            let a = self.pose.get(joint).copied().unwrap_or(Vec3::ZERO);
            let b = other.pose.get(joint).copied().unwrap_or(Vec3::ZERO);
            a.abs_diff_eq(b, epsilon)
        });
        poses_match
            && self.camera.approx_eq(&other.camera, epsilon)
            && self.lighting.approx_eq(&other.lighting, epsilon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeRole {
    Start,
    Interior,
    End,
}

/// One anchor on the timeline. `id` is unique in creation order; times are
/// non-decreasing across the ordered keyframe list.
#[derive(Debug, Clone)]
pub struct Keyframe {
    pub id: u64,
    pub time_ms: f32,
    pub name: String,
    pub role: KeyframeRole,
    pub snapshot: Snapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::pose::neutral_pose;

    fn snapshot() -> Snapshot {
        Snapshot {
            pose: neutral_pose(),
            camera: Camera::default().state(),
            lighting: Lighting::default(),
        }
    }

    #[test]
    fn identical_snapshots_compare_equal() {
        let a = snapshot();
        let b = a.clone();
        assert!(a.approx_eq(&b, SNAPSHOT_EPSILON));
    }

    #[test]
    fn a_single_joint_nudge_breaks_equality() {
        let a = snapshot();
        let mut b = a.clone();
        b.pose.insert(JointId::Head, Vec3::new(0.01, 0.0, 0.0));
        assert!(!a.approx_eq(&b, SNAPSHOT_EPSILON));
    }

    #[test]
    fn sub_epsilon_noise_is_ignored() {
        let a = snapshot();
        let mut b = a.clone();
        b.pose.insert(JointId::Head, Vec3::new(0.0005, 0.0, 0.0));
        b.lighting.shininess += 0.0005;
        assert!(a.approx_eq(&b, SNAPSHOT_EPSILON));
    }
}
