//! Top-level orchestrator. Owns the rig, pose controller, camera, lighting,
//! and animation, and exposes the operations the UI calls. Everything the
//! renderer needs each frame flows out of `tick` and `render`.

use glam::{Mat4, Vec3};

use crate::animation::{Animation, Clock, Keyframe, Snapshot};
use crate::camera::Camera;
use crate::lighting::Lighting;
use crate::pose::{running_pose, Axis, JointId, PoseController};
use crate::scene::{AttachmentId, AttachmentKind, RenderSink, SceneGraph};
use crate::status::Status;

pub struct Studio {
    graph: SceneGraph,
    pose: PoseController,
    camera: Camera,
    lighting: Lighting,
    animation: Animation,
    last_status: Option<Status>,
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}

impl Studio {
    pub fn new() -> Self {
        let mut graph = SceneGraph::new();
        crate::scene::human::build(&mut graph);
        let pose = PoseController::new();
        let mut studio = Self {
            graph,
            pose,
            camera: Camera::default(),
            lighting: Lighting::default(),
            animation: Animation::new(),
            last_status: None,
        };
        studio.pose.apply_all(&mut studio.graph);
        studio
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = lighting;
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn status(&self) -> Option<&Status> {
        self.last_status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.last_status = None;
    }

    fn report(&mut self, status: Status) {
        if status.is_error() {
            log::warn!("{}", status.message);
        } else {
            log::info!("{}", status.message);
        }
        self.last_status = Some(status);
    }

    // ---- pose ----

    pub fn joint_rotation(&self, joint: JointId) -> Vec3 {
        self.pose.joint_rotation(joint)
    }

    pub fn set_joint_rotation(&mut self, joint: JointId, axis: Axis, degrees: f32) {
        self.pose
            .set_joint_rotation(&mut self.graph, joint, axis, degrees);
    }

    pub fn reset_pose(&mut self) {
        self.pose.reset_all(&mut self.graph);
    }

    pub fn apply_running_pose(&mut self) {
        self.pose.set_pose(&mut self.graph, &running_pose());
    }

    // ---- attachments ----

    pub fn add_attachment(&mut self, parent: &str, kind: AttachmentKind) -> Option<AttachmentId> {
        let id = self.graph.add_attachment(parent, kind);
        match id {
            Some(id) => self.report(Status::success(format!(
                "Attached {} to {parent}",
                self.graph.attachment_name(id).unwrap_or(kind.label())
            ))),
            None => self.report(Status::error(format!("No node named '{parent}'"))),
        }
        id
    }

    pub fn remove_attachment(&mut self, id: AttachmentId) {
        if self.graph.remove_attachment(id) {
            self.report(Status::success("Attachment removed"));
        } else {
            self.report(Status::error("Attachment no longer exists"));
        }
    }

    pub fn remove_all_attachments(&mut self) {
        self.graph.remove_all_attachments();
        self.report(Status::info("Removed all attachments"));
    }

    // ---- camera ----

    pub fn orbit_camera(&mut self, delta_theta: f32, delta_phi: f32) {
        self.camera.orbit(delta_theta, delta_phi);
    }

    pub fn set_camera_scale(&mut self, scale: f32) {
        self.camera.set_scale(scale);
    }

    pub fn set_camera_target(&mut self, at: Vec3) {
        self.camera.set_at(at);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    // ---- animation ----

    /// The state every animation starts and ends in.
    fn neutral_snapshot(&self) -> Snapshot {
        Snapshot {
            pose: crate::pose::neutral_pose(),
            camera: Camera::default().state(),
            lighting: Lighting::default(),
        }
    }

    fn current_snapshot(&self) -> Snapshot {
        Snapshot {
            pose: self.pose.current_pose(),
            camera: self.camera.state(),
            lighting: self.lighting,
        }
    }

    pub fn add_keyframe(&mut self) {
        let live = self.current_snapshot();
        let neutral = self.neutral_snapshot();
        let status = self.animation.add_keyframe(&live, &neutral);
        self.report(status);
    }

    pub fn toggle_playback(&mut self, clock: &dyn Clock) {
        let status = self.animation.play(clock);
        self.report(status);
    }

    /// Stops playback and returns the scene to its resting state. The camera
    /// keeps its current aspect ratio across the reset.
    pub fn stop_playback(&mut self) {
        self.animation.stop();
        self.pose.reset_all(&mut self.graph);
        self.camera.set_state(&Camera::default().state());
        self.lighting = Lighting::default();
    }

    pub fn remove_keyframe(&mut self, id: u64) {
        let status = self.animation.remove_keyframe(id);
        self.report(status);
    }

    pub fn drag_keyframe(&mut self, id: u64, new_time_ms: f32) {
        let status = self.animation.drag_keyframe(id, new_time_ms);
        self.report(status);
    }

    pub fn drag_timeline_end(&mut self, new_end_ms: f32) {
        let status = self.animation.drag_end(new_end_ms);
        self.report(status);
    }

    pub fn clear_keyframes(&mut self) {
        let status = self.animation.clear_keyframes();
        self.report(status);
    }

    pub fn load_keyframes(&mut self, keyframes: Vec<Keyframe>) {
        let status = self.animation.load_keyframes(keyframes);
        self.report(status);
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.animation.set_playback_speed(speed);
    }

    /// Advances playback and applies the sampled state to the scene. Returns
    /// whether anything changed, so callers can skip redundant redraws.
    pub fn tick(&mut self, clock: &dyn Clock) -> bool {
        let Some(sampled) = self.animation.tick(clock) else {
            return false;
        };
        self.pose.set_pose(&mut self.graph, &sampled.pose);
        self.camera.set_state(&sampled.camera);
        self.lighting = sampled.lighting;
        true
    }

    pub fn render(&self, base: Mat4, sink: &mut dyn RenderSink) {
        self.graph.render(base, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualClock;
    use crate::scene::RecordingSink;
    use crate::status::StatusLevel;

    #[test]
    fn stop_restores_the_resting_state() {
        let mut studio = Studio::new();
        studio.apply_running_pose();
        studio.orbit_camera(0.8, 0.2);
        studio.set_lighting(Lighting {
            shininess: 5.0,
            ..Lighting::default()
        });

        studio.stop_playback();

        for joint in JointId::ALL {
            assert_eq!(studio.joint_rotation(joint), Vec3::ZERO);
        }
        assert!(studio
            .camera()
            .state()
            .approx_eq(&Camera::default().state(), 1e-5));
        assert!(studio.lighting().approx_eq(&Lighting::default(), 1e-5));
    }

    #[test]
    fn first_keyframe_seeds_then_changes_splice() {
        let mut studio = Studio::new();

        studio.add_keyframe();
        assert_eq!(studio.status().unwrap().level, StatusLevel::Info);
        assert_eq!(studio.animation().keyframe_count(), 2);

        studio.set_joint_rotation(JointId::Head, Axis::Y, 35.0);
        studio.add_keyframe();
        assert_eq!(studio.status().unwrap().level, StatusLevel::Success);
        assert_eq!(studio.animation().keyframe_count(), 3);
    }

    #[test]
    fn tick_drives_the_pose_through_the_graph() {
        let clock = ManualClock::new();
        let mut studio = Studio::new();

        studio.set_joint_rotation(JointId::LeftUpperArm, Axis::X, 90.0);
        studio.add_keyframe();
        studio.toggle_playback(&clock);
        assert!(studio.animation().is_playing());

        // Interior keyframe lands at 1000ms; halfway there the eased blend
        // from 0 to 90 degrees is exactly 45.
        clock.advance(500.0);
        assert!(studio.tick(&clock));
        let angle = studio.joint_rotation(JointId::LeftUpperArm).x;
        assert!((angle - 45.0).abs() < 1e-3, "got {angle}");

        let id = studio.graph().node_id("left_upper_arm").unwrap();
        let node = studio.graph().node(id).unwrap();
        assert!((node.dynamic_rotation.x - 45.0).abs() < 1e-3);
    }

    #[test]
    fn attachment_ops_report_status() {
        let mut studio = Studio::new();
        let id = studio.add_attachment("left_hand", AttachmentKind::Ball);
        assert!(id.is_some());
        assert_eq!(studio.status().unwrap().level, StatusLevel::Success);

        assert!(studio.add_attachment("no_such_part", AttachmentKind::Stick).is_none());
        assert!(studio.status().unwrap().is_error());

        studio.remove_attachment(id.unwrap());
        assert_eq!(studio.graph().attachments().len(), 0);
    }

    #[test]
    fn render_emits_one_call_per_geometry_node() {
        let studio = Studio::new();
        let mut sink = RecordingSink::default();
        studio.render(Mat4::IDENTITY, &mut sink);
        // Torso, head, and four three-segment limbs.
        assert_eq!(sink.calls.len(), 14);
    }
}
