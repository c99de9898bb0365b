//! Construction of the standard jointed human rig. Node names match
//! `pose::JointId::node_name`, one poseable node per joint.

use glam::{Vec3, Vec4};
use std::sync::Arc;

use super::graph::SceneGraph;
use super::node::{Node, NodeId};
use super::primitives;

const TORSO_COLOR: Vec4 = Vec4::new(0.25, 0.4, 0.75, 1.0);
const HEAD_COLOR: Vec4 = Vec4::new(0.9, 0.75, 0.6, 1.0);
const ARM_COLOR: Vec4 = Vec4::new(0.35, 0.6, 0.45, 1.0);
const LEG_COLOR: Vec4 = Vec4::new(0.45, 0.45, 0.5, 1.0);

fn limb(name: &str, pivot: Vec3, half_extents: Vec3, center: Vec3, color: Vec4) -> Node {
    Node::new(name, pivot, Vec3::ZERO, Vec3::ONE).with_geometry(
        Arc::new(move || primitives::cuboid(half_extents, center)),
        color,
    )
}

/// Builds the figure under a fresh root and returns the torso's node id.
/// The torso pivot sits at the pelvis; limbs hang below their joint pivots so
/// dynamic rotations articulate naturally.
pub fn build(graph: &mut SceneGraph) -> Option<NodeId> {
    let torso = graph.set_root(limb(
        "torso",
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.24, 0.35, 0.13),
        Vec3::new(0.0, 0.35, 0.0),
        TORSO_COLOR,
    ))?;

    graph.add_child(
        torso,
        Node::new("head", Vec3::new(0.0, 0.88, 0.0), Vec3::ZERO, Vec3::ONE).with_geometry(
            Arc::new(|| primitives::sphere(0.15, 16, 12)),
            HEAD_COLOR,
        ),
    )?;

    for side in [-1.0_f32, 1.0] {
        let prefix = if side < 0.0 { "left" } else { "right" };

        let upper_arm = graph.add_child(
            torso,
            limb(
                &format!("{prefix}_upper_arm"),
                Vec3::new(side * 0.32, 0.62, 0.0),
                Vec3::new(0.06, 0.17, 0.06),
                Vec3::new(0.0, -0.17, 0.0),
                ARM_COLOR,
            ),
        )?;
        let lower_arm = graph.add_child(
            upper_arm,
            limb(
                &format!("{prefix}_lower_arm"),
                Vec3::new(0.0, -0.36, 0.0),
                Vec3::new(0.05, 0.15, 0.05),
                Vec3::new(0.0, -0.15, 0.0),
                ARM_COLOR,
            ),
        )?;
        graph.add_child(
            lower_arm,
            limb(
                &format!("{prefix}_hand"),
                Vec3::new(0.0, -0.32, 0.0),
                Vec3::new(0.05, 0.07, 0.03),
                Vec3::new(0.0, -0.07, 0.0),
                HEAD_COLOR,
            ),
        )?;

        let upper_leg = graph.add_child(
            torso,
            limb(
                &format!("{prefix}_upper_leg"),
                Vec3::new(side * 0.13, 0.0, 0.0),
                Vec3::new(0.08, 0.22, 0.08),
                Vec3::new(0.0, -0.22, 0.0),
                LEG_COLOR,
            ),
        )?;
        let lower_leg = graph.add_child(
            upper_leg,
            limb(
                &format!("{prefix}_lower_leg"),
                Vec3::new(0.0, -0.46, 0.0),
                Vec3::new(0.06, 0.2, 0.06),
                Vec3::new(0.0, -0.2, 0.0),
                LEG_COLOR,
            ),
        )?;
        graph.add_child(
            lower_leg,
            limb(
                &format!("{prefix}_foot"),
                Vec3::new(0.0, -0.42, 0.0),
                Vec3::new(0.06, 0.04, 0.12),
                Vec3::new(0.0, -0.04, 0.06),
                LEG_COLOR,
            ),
        )?;
    }

    Some(torso)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::JointId;

    #[test]
    fn every_joint_has_a_node() {
        let mut graph = SceneGraph::new();
        let root = build(&mut graph).unwrap();
        assert_eq!(graph.root(), Some(root));
        for joint in JointId::ALL {
            assert!(
                graph.node_id(joint.node_name()).is_some(),
                "missing node for {joint:?}"
            );
        }
    }

    #[test]
    fn limbs_parent_back_to_the_torso() {
        let mut graph = SceneGraph::new();
        let torso = build(&mut graph).unwrap();
        let hand = graph.node_id("left_hand").unwrap();

        let mut current = hand;
        let mut hops = 0;
        while let Some(parent) = graph.node(current).unwrap().parent() {
            current = parent;
            hops += 1;
        }
        assert_eq!(current, torso);
        assert_eq!(hops, 3, "hand -> lower arm -> upper arm -> torso");
    }
}
