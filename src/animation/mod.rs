//! Animation module
//!
//! Keyframe timeline, playback clock, and the interpolation that drives the
//! pose controller, camera, and lighting each tick.

pub mod easing;
pub mod keyframe;
pub mod player;
pub mod timeline;

pub use keyframe::{Keyframe, KeyframeRole, Snapshot, SNAPSHOT_EPSILON};
pub use player::{Clock, ManualClock, Player, SystemClock};
pub use timeline::{Timeline, TimelineError, DEFAULT_FRAME_DURATION_MS, MIN_KEYFRAME_GAP_MS};

use glam::Vec3;

use crate::camera::{Camera, CameraState};
use crate::lighting::Lighting;
use crate::pose::{JointId, Pose};
use crate::status::Status;
use easing::{ease_in_out_cubic, lerp_angle};
use keyframe::KeyframeRole as Role;

/// State produced for one playback instant, ready to apply to the pose
/// controller, camera, and lighting.
#[derive(Debug, Clone)]
pub struct Sampled {
    pub pose: Pose,
    pub camera: CameraState,
    pub lighting: Lighting,
}

/// Owns the keyframe timeline and the playback head, and interpolates between
/// adjacent keyframes. Pose angles blend along the shortest arc with an eased
/// progress; the camera blends through its own interpolator; lighting is never
/// blended and holds the earlier keyframe's value.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    timeline: Timeline,
    player: Player,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        self.timeline.keyframes()
    }

    pub fn keyframe_count(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn current_time_ms(&self) -> f32 {
        self.player.current_time_ms()
    }

    pub fn playback_speed(&self) -> f32 {
        self.player.speed()
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.player.set_speed(speed);
    }

    /// Captures the live state as a keyframe. The first call seeds the
    /// bracketing start/end pair holding the neutral state; if the live state
    /// still equals neutral, that is all it does and the user is prompted to
    /// change something. Later calls reject snapshots materially unchanged
    /// from the newest keyframe, otherwise splice an interior keyframe and
    /// re-space the interiors evenly.
    pub fn add_keyframe(&mut self, live: &Snapshot, neutral: &Snapshot) -> Status {
        let mut seeded_now = false;
        if self.timeline.is_empty() {
            self.timeline.seed(neutral);
            seeded_now = true;
        }

        let unchanged = {
            let reference = self
                .timeline
                .last_interior()
                .or_else(|| self.timeline.start());
            match reference {
                Some(keyframe) => live.approx_eq(&keyframe.snapshot, SNAPSHOT_EPSILON),
                None => false,
            }
        };

        if unchanged {
            if seeded_now {
                return Status::info(
                    "Added start and end keyframes. Change the pose, camera, or lighting, \
                     then add the next keyframe.",
                );
            }
            return Status::error(
                "Current state matches the last keyframe; change something before adding another.",
            );
        }

        self.timeline.insert_interior(live.clone());
        Status::success(format!("Added keyframe ({} total)", self.timeline.len()))
    }

    /// Starts playback, or toggles pause when already playing. Requires at
    /// least the seeded start/end pair.
    pub fn play(&mut self, clock: &dyn Clock) -> Status {
        if self.timeline.len() < 2 {
            return Status::error("Need at least 2 keyframes to play");
        }
        if self.player.is_playing() {
            self.player.pause();
            return Status::info("Animation paused");
        }
        self.player.play(clock);
        Status::success("Playing animation")
    }

    /// Halts playback and rewinds to zero. The caller restores the neutral
    /// pose, default camera, and default lighting.
    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// One playback step: advances the head by scaled wall time (wrapping at
    /// the last keyframe to loop) and samples the timeline there.
    pub fn tick(&mut self, clock: &dyn Clock) -> Option<Sampled> {
        if !self.player.is_playing() || self.timeline.is_empty() {
            return None;
        }
        let time = self.player.advance(clock, self.timeline.last_time_ms());
        self.sample(time)
    }

    /// Interpolated state at an arbitrary time. Times outside every bracket
    /// snap to the nearest keyframe.
    pub fn sample(&self, time_ms: f32) -> Option<Sampled> {
        let keyframes = self.timeline.keyframes();
        if keyframes.is_empty() {
            return None;
        }

        let Some((i, j)) = self.timeline.bracket(time_ms) else {
            let nearest = &keyframes[self.timeline.nearest(time_ms)?];
            return Some(Sampled {
                pose: nearest.snapshot.pose.clone(),
                camera: nearest.snapshot.camera,
                lighting: nearest.snapshot.lighting,
            });
        };

        let (a, b) = (&keyframes[i], &keyframes[j]);
        let span = b.time_ms - a.time_ms;
        let progress = if span > f32::EPSILON {
            (time_ms - a.time_ms) / span
        } else {
            0.0
        };
        let eased = ease_in_out_cubic(progress);

        let pose = JointId::ALL
            .iter()
            .map(|&joint| {
                let from = a.snapshot.pose.get(&joint).copied().unwrap_or(Vec3::ZERO);
                let to = b.snapshot.pose.get(&joint).copied().unwrap_or(Vec3::ZERO);
                let blended = Vec3::new(
                    lerp_angle(from.x, to.x, eased),
                    lerp_angle(from.y, to.y, eased),
                    lerp_angle(from.z, to.z, eased),
                );
                (joint, blended)
            })
            .collect();

        Some(Sampled {
            pose,
            camera: Camera::interpolate_state(&a.snapshot.camera, &b.snapshot.camera, progress),
            // Lighting holds the earlier keyframe's value until the next one.
            lighting: a.snapshot.lighting,
        })
    }

    pub fn remove_keyframe(&mut self, id: u64) -> Status {
        match self.timeline.remove(id) {
            Ok(()) => Status::success("Keyframe removed"),
            Err(TimelineError::ProtectedKeyframe) => {
                Status::error("Start and end keyframes cannot be deleted")
            }
            Err(TimelineError::UnknownKeyframe) => Status::error("No such keyframe"),
        }
    }

    pub fn drag_keyframe(&mut self, id: u64, new_time_ms: f32) -> Status {
        match self.timeline.drag(id, new_time_ms) {
            Ok(()) => Status::success("Keyframe moved"),
            Err(TimelineError::ProtectedKeyframe) => {
                Status::error("The start keyframe is pinned at the beginning")
            }
            Err(TimelineError::UnknownKeyframe) => Status::error("No such keyframe"),
        }
    }

    pub fn drag_end(&mut self, new_end_ms: f32) -> Status {
        if self.timeline.is_empty() {
            return Status::error("No keyframes to rescale");
        }
        self.timeline.drag_end(new_end_ms);
        Status::success("Timeline rescaled")
    }

    /// Discards every keyframe and halts playback.
    pub fn clear_keyframes(&mut self) -> Status {
        if self.timeline.is_empty() {
            return Status::error("There are no keyframes to clear");
        }
        self.timeline.clear();
        self.player.stop();
        Status::success("Cleared all keyframes")
    }

    /// Replaces the timeline with imported keyframes after validating their
    /// shape, rejecting malformed data instead of feeding it to the render
    /// loop.
    pub fn load_keyframes(&mut self, keyframes: Vec<Keyframe>) -> Status {
        if keyframes.is_empty() {
            return Status::error("Animation data has no keyframes");
        }
        if keyframes.first().map(|k| (k.role, k.time_ms)) != Some((Role::Start, 0.0)) {
            return Status::error("Animation data must begin with a start keyframe at time 0");
        }
        if keyframes.last().map(|k| k.role) != Some(Role::End) {
            return Status::error("Animation data must finish with an end keyframe");
        }
        let ordered = keyframes
            .windows(2)
            .all(|pair| pair[0].time_ms <= pair[1].time_ms);
        if !ordered {
            return Status::error("Animation keyframes are not in time order");
        }

        self.player.stop();
        let count = keyframes.len();
        self.timeline.replace(keyframes);
        Status::success(format!("Loaded {count} keyframes"))
    }
}
