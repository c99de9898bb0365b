//! Pose module
//!
//! The fixed joint set, its per-axis limits, and the controller that drives
//! the scene graph's dynamic rotations.

pub mod config;
pub mod controller;

pub use config::{neutral_pose, running_pose, Axis, JointConfig, JointId, Pose};
pub use controller::PoseController;
