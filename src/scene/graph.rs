use glam::{Mat4, Vec3, Vec4};
use std::collections::HashMap;
use std::sync::Arc;

use super::node::{GeometryFactory, Node, NodeId};
use super::primitives;
use super::sink::RenderSink;

/// Handle for runtime-created decorative nodes, generated uniquely per graph
/// and tracked separately from the permanent body-part names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Ball,
    Stick,
}

impl AttachmentKind {
    pub fn label(self) -> &'static str {
        match self {
            AttachmentKind::Ball => "ball",
            AttachmentKind::Stick => "stick",
        }
    }

    fn factory(self) -> GeometryFactory {
        match self {
            AttachmentKind::Ball => Arc::new(|| primitives::sphere(0.09, 12, 8)),
            AttachmentKind::Stick => Arc::new(|| primitives::cylinder(0.03, 0.45, 10)),
        }
    }

    fn color(self) -> Vec4 {
        match self {
            AttachmentKind::Ball => Vec4::new(0.85, 0.3, 0.3, 1.0),
            AttachmentKind::Stick => Vec4::new(0.55, 0.4, 0.25, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AttachmentEntry {
    node: NodeId,
    kind: AttachmentKind,
}

/// Default local offset for a fresh attachment, just below its parent's pivot.
pub const ATTACHMENT_DEFAULT_OFFSET: Vec3 = Vec3::new(0.0, -0.1, 0.0);

/// Arena-backed tree of rigid-body nodes. Parents own their child id lists;
/// children keep a non-owning parent backlink for detachment. The tree is
/// acyclic and single-rooted.
#[derive(Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
    names: HashMap<String, NodeId>,
    attachments: HashMap<AttachmentId, AttachmentEntry>,
    root: Option<NodeId>,
    next_node_id: u32,
    next_attachment_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Installs `node` as the tree root. Only valid on an empty graph.
    pub fn set_root(&mut self, node: Node) -> Option<NodeId> {
        if self.root.is_some() {
            log::warn!("scene graph already has a root");
            return None;
        }
        let id = self.alloc_id();
        self.names.insert(node.name.clone(), id);
        self.nodes.insert(id, node);
        self.root = Some(id);
        Some(id)
    }

    /// Attaches a freshly constructed, parentless node under `parent` and
    /// registers its name. Returns `None` if the parent is unknown.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            log::warn!("add_child: unknown parent node {:?}", parent);
            return None;
        }
        let id = self.alloc_id();
        self.names.insert(node.name.clone(), id);
        let mut node = node;
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Detaches `id` and removes it along with every descendant, purging the
    /// name and attachment indices for the whole subtree.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            log::warn!("remove_node: unknown node {:?}", id);
            return false;
        }

        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != id);
            }
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                pending.extend(node.children.iter().copied());
                self.names.remove(&node.name);
            }
            self.attachments.retain(|_, entry| entry.node != current);
        }

        if self.root == Some(id) {
            self.root = None;
        }
        true
    }

    pub fn set_dynamic_rotation(&mut self, name: &str, rotation: Vec3) -> bool {
        match self.names.get(name).copied() {
            Some(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.dynamic_rotation = rotation;
                    return true;
                }
                false
            }
            None => {
                log::warn!("set_dynamic_rotation: unknown node '{name}'");
                false
            }
        }
    }

    pub fn set_dynamic_translation(&mut self, name: &str, translation: Vec3) -> bool {
        match self.names.get(name).copied() {
            Some(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.dynamic_translation = translation;
                    return true;
                }
                false
            }
            None => {
                log::warn!("set_dynamic_translation: unknown node '{name}'");
                false
            }
        }
    }

    pub fn set_dynamic_scale(&mut self, name: &str, scale: Vec3) -> bool {
        match self.names.get(name).copied() {
            Some(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.dynamic_scale = scale;
                    return true;
                }
                false
            }
            None => {
                log::warn!("set_dynamic_scale: unknown node '{name}'");
                false
            }
        }
    }

    /// World transform of a node under the identity base, computed by walking
    /// the parent chain. The render traversal accumulates the same product.
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.nodes.get(&c)?;
            chain.push(c);
            current = node.parent;
        }
        let mut world = Mat4::IDENTITY;
        for &c in chain.iter().rev() {
            world *= self.nodes[&c].local_matrix();
        }
        Some(world)
    }

    /// Depth-first pre-order traversal. Each node's accumulated transform is
    /// published to the sink alongside its mesh when it has geometry bound;
    /// pure structural nodes propagate their transform and draw nothing.
    pub fn render(&self, base: Mat4, sink: &mut dyn RenderSink) {
        if let Some(root) = self.root {
            self.render_node(root, base, sink);
        }
    }

    fn render_node(&self, id: NodeId, parent_world: Mat4, sink: &mut dyn RenderSink) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let world = parent_world * node.local_matrix();
        if let Some(factory) = &node.geometry {
            let mesh = factory();
            sink.draw(world, &mesh, node.color);
        }
        for &child in &node.children {
            self.render_node(child, world, sink);
        }
    }

    /// Creates a ball or stick node under the named parent at the default
    /// offset. Returns the generated id, or `None` for an unknown parent.
    pub fn add_attachment(&mut self, parent: &str, kind: AttachmentKind) -> Option<AttachmentId> {
        self.add_attachment_at(parent, kind, ATTACHMENT_DEFAULT_OFFSET, Vec3::ZERO)
    }

    pub fn add_attachment_at(
        &mut self,
        parent: &str,
        kind: AttachmentKind,
        local_translation: Vec3,
        local_rotation: Vec3,
    ) -> Option<AttachmentId> {
        let Some(parent_id) = self.names.get(parent).copied() else {
            log::warn!("add_attachment: unknown parent '{parent}'");
            return None;
        };

        let id = AttachmentId(self.next_attachment_id);
        self.next_attachment_id += 1;

        let name = format!("{}#{}", kind.label(), id.0);
        let node = Node::new(name, local_translation, local_rotation, Vec3::ONE)
            .with_geometry(kind.factory(), kind.color());

        let node_id = self.add_child(parent_id, node)?;
        self.attachments.insert(id, AttachmentEntry { node: node_id, kind });
        Some(id)
    }

    /// Removes an attachment and, first, every attachment chained beneath it.
    pub fn remove_attachment(&mut self, id: AttachmentId) -> bool {
        let Some(entry) = self.attachments.get(&id).copied() else {
            log::warn!("remove_attachment: unknown attachment {:?}", id);
            return false;
        };

        let child_attachments: Vec<AttachmentId> = self
            .nodes
            .get(&entry.node)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.attachment_of_node(*child))
                    .collect()
            })
            .unwrap_or_default();
        for child in child_attachments {
            self.remove_attachment(child);
        }

        self.attachments.remove(&id);
        self.remove_node(entry.node)
    }

    /// Removes every attachment, iterating over a snapshot of current ids
    /// since cascading removal mutates the index.
    pub fn remove_all_attachments(&mut self) {
        let ids: Vec<AttachmentId> = self.attachments.keys().copied().collect();
        for id in ids {
            if self.attachments.contains_key(&id) {
                self.remove_attachment(id);
            }
        }
    }

    pub fn attachments(&self) -> Vec<AttachmentId> {
        let mut ids: Vec<AttachmentId> = self.attachments.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn attachment_node(&self, id: AttachmentId) -> Option<NodeId> {
        self.attachments.get(&id).map(|entry| entry.node)
    }

    pub fn attachment_kind(&self, id: AttachmentId) -> Option<AttachmentKind> {
        self.attachments.get(&id).map(|entry| entry.kind)
    }

    /// Node name generated for an attachment, usable as a parent for chaining.
    pub fn attachment_name(&self, id: AttachmentId) -> Option<&str> {
        let entry = self.attachments.get(&id)?;
        self.nodes.get(&entry.node).map(|n| n.name.as_str())
    }

    /// Repositions an attachment relative to its parent.
    pub fn set_attachment_offset(&mut self, id: AttachmentId, offset: Vec3) -> bool {
        let Some(entry) = self.attachments.get(&id).copied() else {
            log::warn!("set_attachment_offset: unknown attachment {:?}", id);
            return false;
        };
        if let Some(node) = self.nodes.get_mut(&entry.node) {
            node.dynamic_translation = offset;
            true
        } else {
            false
        }
    }

    fn attachment_of_node(&self, node: NodeId) -> Option<AttachmentId> {
        self.attachments
            .iter()
            .find(|(_, entry)| entry.node == node)
            .map(|(id, _)| *id)
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("node_count", &self.nodes.len())
            .field("attachment_count", &self.attachments.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::sink::RecordingSink;

    fn two_level_graph() -> (SceneGraph, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph
            .set_root(Node::new(
                "root",
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 30.0),
                Vec3::ONE,
            ))
            .unwrap();
        let child = graph
            .add_child(
                root,
                Node::new(
                    "child",
                    Vec3::new(0.5, 0.0, 0.0),
                    Vec3::new(10.0, 0.0, 0.0),
                    Vec3::ONE,
                ),
            )
            .unwrap();
        (graph, root, child)
    }

    #[test]
    fn world_transform_is_parent_times_rest_when_undisturbed() {
        let (graph, root, child) = two_level_graph();
        let parent_world = graph.world_transform(root).unwrap();
        let child_local = graph.node(child).unwrap().local_matrix();
        let child_world = graph.world_transform(child).unwrap();
        assert!(child_world.abs_diff_eq(parent_world * child_local, 1e-5));
    }

    #[test]
    fn dynamic_rotation_feeds_world_transform() {
        let (mut graph, _, child) = two_level_graph();
        let before = graph.world_transform(child).unwrap();
        assert!(graph.set_dynamic_rotation("child", Vec3::new(45.0, 0.0, 0.0)));
        let after = graph.world_transform(child).unwrap();
        assert!(!before.abs_diff_eq(after, 1e-5));
    }

    #[test]
    fn unknown_names_are_noops() {
        let (mut graph, ..) = two_level_graph();
        let count = graph.node_count();
        assert!(!graph.set_dynamic_rotation("missing", Vec3::ONE));
        assert!(graph.add_attachment("missing", AttachmentKind::Ball).is_none());
        assert!(!graph.remove_attachment(AttachmentId(99)));
        assert_eq!(graph.node_count(), count);
    }

    #[test]
    fn chained_attachment_removal_cascades() {
        let (mut graph, root, _) = two_level_graph();
        let base_count = graph.node_count();

        let first = graph.add_attachment("root", AttachmentKind::Ball).unwrap();
        let first_name = graph.attachment_name(first).unwrap().to_string();
        let second = graph
            .add_attachment(&first_name, AttachmentKind::Stick)
            .unwrap();
        let second_name = graph.attachment_name(second).unwrap().to_string();
        let third = graph
            .add_attachment(&second_name, AttachmentKind::Ball)
            .unwrap();

        assert_eq!(graph.attachments().len(), 3);
        assert_eq!(graph.node_count(), base_count + 3);

        assert!(graph.remove_attachment(first));
        assert!(graph.attachments().is_empty());
        assert_eq!(graph.node_count(), base_count);
        assert!(graph.attachment_node(third).is_none());

        let root_children = graph.node(root).unwrap().children();
        assert_eq!(root_children.len(), 1, "only the body child remains");
    }

    #[test]
    fn remove_all_attachments_clears_the_index() {
        let (mut graph, ..) = two_level_graph();
        graph.add_attachment("root", AttachmentKind::Ball);
        graph.add_attachment("child", AttachmentKind::Stick);
        graph.add_attachment("child", AttachmentKind::Ball);
        graph.remove_all_attachments();
        assert!(graph.attachments().is_empty());
    }

    #[test]
    fn removing_a_subtree_purges_names_and_attachments() {
        let (mut graph, _, child) = two_level_graph();
        graph.add_attachment("child", AttachmentKind::Ball).unwrap();

        assert!(graph.remove_node(child));
        assert!(graph.node_id("child").is_none());
        assert!(graph.attachments().is_empty());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn traversal_draws_geometry_nodes_only() {
        let (mut graph, root, _) = two_level_graph();
        graph
            .add_child(
                root,
                Node::new("visible", Vec3::ZERO, Vec3::ZERO, Vec3::ONE).with_geometry(
                    Arc::new(|| primitives::sphere(1.0, 6, 4)),
                    Vec4::ONE,
                ),
            )
            .unwrap();

        let mut sink = RecordingSink::default();
        graph.render(Mat4::IDENTITY, &mut sink);
        assert_eq!(sink.calls.len(), 1);

        let expected = graph.world_transform(graph.node_id("visible").unwrap()).unwrap();
        assert!(sink.calls[0].0.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn render_respects_external_base_transform() {
        let (mut graph, root, _) = two_level_graph();
        graph
            .add_child(
                root,
                Node::new("visible", Vec3::ZERO, Vec3::ZERO, Vec3::ONE).with_geometry(
                    Arc::new(|| primitives::sphere(1.0, 6, 4)),
                    Vec4::ONE,
                ),
            )
            .unwrap();

        let base = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let mut sink = RecordingSink::default();
        graph.render(base, &mut sink);
        let expected = base * graph.world_transform(graph.node_id("visible").unwrap()).unwrap();
        assert!(sink.calls[0].0.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn attachment_offset_reposition() {
        let (mut graph, ..) = two_level_graph();
        let id = graph.add_attachment("root", AttachmentKind::Ball).unwrap();
        assert!(graph.set_attachment_offset(id, Vec3::new(0.0, -0.4, 0.0)));
        let node = graph.node(graph.attachment_node(id).unwrap()).unwrap();
        assert_eq!(node.dynamic_translation, Vec3::new(0.0, -0.4, 0.0));
    }
}
