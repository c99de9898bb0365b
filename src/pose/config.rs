use glam::Vec3;
use std::collections::HashMap;

/// Rotation axis of a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Per-axis angle limits in degrees. `None` locks the axis.
#[derive(Debug, Clone, Copy)]
pub struct JointConfig {
    pub limits: [Option<(f32, f32)>; 3],
}

impl JointConfig {
    const fn all(min: f32, max: f32) -> Self {
        Self {
            limits: [Some((min, max)); 3],
        }
    }

    const fn hinge_x(min: f32, max: f32) -> Self {
        Self {
            limits: [Some((min, max)), None, None],
        }
    }
}

/// The fixed set of poseable joints. Each maps to one node of the standard
/// human rig built by `scene::human`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointId {
    Torso,
    Head,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
}

impl JointId {
    pub const ALL: [JointId; 14] = [
        JointId::Torso,
        JointId::Head,
        JointId::LeftUpperArm,
        JointId::LeftLowerArm,
        JointId::LeftHand,
        JointId::RightUpperArm,
        JointId::RightLowerArm,
        JointId::RightHand,
        JointId::LeftUpperLeg,
        JointId::LeftLowerLeg,
        JointId::LeftFoot,
        JointId::RightUpperLeg,
        JointId::RightLowerLeg,
        JointId::RightFoot,
    ];

    pub fn node_name(self) -> &'static str {
        match self {
            JointId::Torso => "torso",
            JointId::Head => "head",
            JointId::LeftUpperArm => "left_upper_arm",
            JointId::LeftLowerArm => "left_lower_arm",
            JointId::LeftHand => "left_hand",
            JointId::RightUpperArm => "right_upper_arm",
            JointId::RightLowerArm => "right_lower_arm",
            JointId::RightHand => "right_hand",
            JointId::LeftUpperLeg => "left_upper_leg",
            JointId::LeftLowerLeg => "left_lower_leg",
            JointId::LeftFoot => "left_foot",
            JointId::RightUpperLeg => "right_upper_leg",
            JointId::RightLowerLeg => "right_lower_leg",
            JointId::RightFoot => "right_foot",
        }
    }

    pub fn config(self) -> JointConfig {
        match self {
            JointId::Torso => JointConfig::all(-45.0, 45.0),
            JointId::Head => JointConfig {
                limits: [Some((-60.0, 60.0)), Some((-80.0, 80.0)), Some((-45.0, 45.0))],
            },
            JointId::LeftUpperArm | JointId::RightUpperArm => JointConfig::all(-180.0, 180.0),
            JointId::LeftLowerArm | JointId::RightLowerArm => JointConfig::hinge_x(-150.0, 0.0),
            JointId::LeftHand | JointId::RightHand => JointConfig::all(-90.0, 90.0),
            JointId::LeftUpperLeg | JointId::RightUpperLeg => JointConfig::all(-120.0, 120.0),
            JointId::LeftLowerLeg | JointId::RightLowerLeg => JointConfig::hinge_x(0.0, 150.0),
            JointId::LeftFoot | JointId::RightFoot => JointConfig {
                limits: [Some((-45.0, 45.0)), None, Some((-20.0, 20.0))],
            },
        }
    }
}

/// Complete joint-name to rotation-triple mapping, in degrees.
pub type Pose = HashMap<JointId, Vec3>;

/// All joints at zero rotation, the standing pose.
pub fn neutral_pose() -> Pose {
    JointId::ALL.iter().map(|&j| (j, Vec3::ZERO)).collect()
}

/// Canned mid-stride running pose with asymmetric arm and leg swing.
pub fn running_pose() -> Pose {
    let mut pose = neutral_pose();
    pose.insert(JointId::Torso, Vec3::new(12.0, 0.0, 0.0));
    pose.insert(JointId::Head, Vec3::new(-8.0, 0.0, 0.0));
    pose.insert(JointId::LeftUpperArm, Vec3::new(50.0, 0.0, 5.0));
    pose.insert(JointId::LeftLowerArm, Vec3::new(-70.0, 0.0, 0.0));
    pose.insert(JointId::RightUpperArm, Vec3::new(-40.0, 0.0, -5.0));
    pose.insert(JointId::RightLowerArm, Vec3::new(-95.0, 0.0, 0.0));
    pose.insert(JointId::LeftUpperLeg, Vec3::new(-35.0, 0.0, 0.0));
    pose.insert(JointId::LeftLowerLeg, Vec3::new(80.0, 0.0, 0.0));
    pose.insert(JointId::LeftFoot, Vec3::new(20.0, 0.0, 0.0));
    pose.insert(JointId::RightUpperLeg, Vec3::new(45.0, 0.0, 0.0));
    pose.insert(JointId::RightLowerLeg, Vec3::new(25.0, 0.0, 0.0));
    pose.insert(JointId::RightFoot, Vec3::new(-10.0, 0.0, 0.0));
    pose
}
