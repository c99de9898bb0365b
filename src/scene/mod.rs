//! Scene graph module
//!
//! Rigid-body node hierarchy, runtime attachments, and the render traversal.

pub mod graph;
pub mod human;
pub mod node;
pub mod primitives;
pub mod sink;

pub use graph::{AttachmentId, AttachmentKind, SceneGraph, ATTACHMENT_DEFAULT_OFFSET};
pub use node::{GeometryFactory, Node, NodeId};
pub use sink::{MeshData, RecordingSink, RenderSink};
