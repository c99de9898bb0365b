//! # posegraph
//!
//! A hierarchical scene-graph posing and keyframe animation library with
//! WebGPU rendering support.
//!
//! ## Features
//! - Arena-based scene graph with rest and dynamic transforms
//! - Jointed human rig with per-axis rotation limits
//! - Runtime ball/stick attachments, chainable onto each other
//! - Dual-representation orbit camera (Cartesian + spherical)
//! - Keyframe animation with eased interpolation and looping playback
//!
//! ## Example
//! ```rust,ignore
//! use posegraph::studio::Studio;
//! use posegraph::pose::{Axis, JointId};
//! use posegraph::animation::SystemClock;
//!
//! let mut studio = Studio::new();
//!
//! // Pose the figure and capture keyframes
//! studio.add_keyframe();
//! studio.set_joint_rotation(JointId::LeftUpperArm, Axis::X, 80.0);
//! studio.add_keyframe();
//!
//! // Loop the animation
//! let clock = SystemClock::new();
//! studio.toggle_playback(&clock);
//! studio.tick(&clock);
//! ```

pub mod animation;
pub mod camera;
pub mod lighting;
pub mod pose;
pub mod render;
pub mod scene;
pub mod status;
pub mod studio;

pub use animation::{Animation, Clock, Keyframe, Snapshot, SystemClock};
pub use camera::{Camera, CameraState};
pub use lighting::Lighting;
pub use pose::{Axis, JointId, Pose, PoseController};
pub use scene::{AttachmentId, AttachmentKind, Node, NodeId, SceneGraph};
pub use status::{Status, StatusLevel};
pub use studio::Studio;
