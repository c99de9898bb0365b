use super::keyframe::{Keyframe, KeyframeRole, Snapshot};

/// Seeded start/end spacing: the end keyframe lands at twice this.
pub const DEFAULT_FRAME_DURATION_MS: f32 = 1000.0;
/// Minimum spacing preserved when dragging a keyframe along the timeline.
pub const MIN_KEYFRAME_GAP_MS: f32 = 200.0;
/// Padding added past the last keyframe when reporting total duration.
pub const END_PAD_MS: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineError {
    UnknownKeyframe,
    ProtectedKeyframe,
}

/// Ordered list of keyframes. The start keyframe is pinned at t=0, the end
/// keyframe closes the loop, and interior keyframes stay evenly spaced except
/// while explicitly dragged.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
    next_id: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn find(&self, id: u64) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    pub fn last_time_ms(&self) -> f32 {
        self.keyframes.last().map(|k| k.time_ms).unwrap_or(0.0)
    }

    /// Total duration including the trailing pad.
    pub fn duration_ms(&self) -> f32 {
        if self.keyframes.is_empty() {
            0.0
        } else {
            self.last_time_ms() + END_PAD_MS
        }
    }

    pub fn last_interior(&self) -> Option<&Keyframe> {
        self.keyframes
            .iter()
            .rev()
            .find(|k| k.role == KeyframeRole::Interior)
    }

    pub fn start(&self) -> Option<&Keyframe> {
        self.keyframes.first()
    }

    /// Seeds the bracketing start/end pair on an empty timeline.
    pub fn seed(&mut self, neutral: &Snapshot) {
        debug_assert!(self.keyframes.is_empty());
        let start_id = self.alloc_id();
        self.keyframes.push(Keyframe {
            id: start_id,
            time_ms: 0.0,
            name: "Start".to_string(),
            role: KeyframeRole::Start,
            snapshot: neutral.clone(),
        });
        let end_id = self.alloc_id();
        self.keyframes.push(Keyframe {
            id: end_id,
            time_ms: 2.0 * DEFAULT_FRAME_DURATION_MS,
            name: "End".to_string(),
            role: KeyframeRole::End,
            snapshot: neutral.clone(),
        });
    }

    /// Splices a new interior keyframe immediately before the end keyframe and
    /// re-spaces all interiors evenly. Returns the new keyframe's id.
    pub fn insert_interior(&mut self, snapshot: Snapshot) -> u64 {
        debug_assert!(self.keyframes.len() >= 2);
        let id = self.alloc_id();
        let index = self.keyframes.len() - 1;
        self.keyframes.insert(
            index,
            Keyframe {
                id,
                time_ms: 0.0,
                name: format!("Pose {id}"),
                role: KeyframeRole::Interior,
                snapshot,
            },
        );
        self.respace_interiors();
        id
    }

    /// Deletes one interior keyframe and restores even spacing. Start and end
    /// keyframes are never deletable.
    pub fn remove(&mut self, id: u64) -> Result<(), TimelineError> {
        let index = self
            .keyframes
            .iter()
            .position(|k| k.id == id)
            .ok_or(TimelineError::UnknownKeyframe)?;
        if self.keyframes[index].role != KeyframeRole::Interior {
            return Err(TimelineError::ProtectedKeyframe);
        }
        self.keyframes.remove(index);
        self.respace_interiors();
        Ok(())
    }

    /// Moves one keyframe along the timeline. Interior keyframes are clamped
    /// to a minimum gap against both neighbors; the start keyframe is pinned
    /// at zero; dragging the end keyframe rescales every interior time
    /// proportionally.
    pub fn drag(&mut self, id: u64, new_time_ms: f32) -> Result<(), TimelineError> {
        let index = self
            .keyframes
            .iter()
            .position(|k| k.id == id)
            .ok_or(TimelineError::UnknownKeyframe)?;
        match self.keyframes[index].role {
            KeyframeRole::Start => Err(TimelineError::ProtectedKeyframe),
            KeyframeRole::End => {
                self.drag_end(new_time_ms);
                Ok(())
            }
            KeyframeRole::Interior => {
                let min = self.keyframes[index - 1].time_ms + MIN_KEYFRAME_GAP_MS;
                let max = self.keyframes[index + 1].time_ms - MIN_KEYFRAME_GAP_MS;
                self.keyframes[index].time_ms = new_time_ms.clamp(min, max.max(min));
                Ok(())
            }
        }
    }

    /// Rescales interior keyframe times to a new end time, preserving their
    /// relative spacing.
    pub fn drag_end(&mut self, new_end_ms: f32) {
        let Some(last) = self.keyframes.last() else {
            return;
        };
        let old_end = last.time_ms;
        if old_end <= 0.0 {
            return;
        }
        let interior_count = self.keyframes.len().saturating_sub(2);
        let floor = MIN_KEYFRAME_GAP_MS * (interior_count as f32 + 1.0);
        let new_end = new_end_ms.max(floor);
        let factor = new_end / old_end;
        for keyframe in &mut self.keyframes {
            keyframe.time_ms *= factor;
        }
    }

    /// Indices of the keyframes bracketing `time_ms`, if any pair does.
    pub fn bracket(&self, time_ms: f32) -> Option<(usize, usize)> {
        for i in 0..self.keyframes.len().saturating_sub(1) {
            if self.keyframes[i].time_ms <= time_ms && time_ms <= self.keyframes[i + 1].time_ms {
                return Some((i, i + 1));
            }
        }
        None
    }

    /// Index of the keyframe closest in absolute time distance.
    pub fn nearest(&self, time_ms: f32) -> Option<usize> {
        self.keyframes
            .iter()
            .enumerate()
            .min_by(|a, b| {
                let da = (a.1.time_ms - time_ms).abs();
                let db = (b.1.time_ms - time_ms).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Replaces the timeline's contents with imported keyframes. The caller
    /// validates the data first.
    pub(crate) fn replace(&mut self, keyframes: Vec<Keyframe>) {
        self.next_id = keyframes.iter().map(|k| k.id + 1).max().unwrap_or(0);
        self.keyframes = keyframes;
    }

    fn respace_interiors(&mut self) {
        let len = self.keyframes.len();
        if len < 3 {
            return;
        }
        let end_time = self.keyframes[len - 1].time_ms;
        let interior_count = (len - 2) as f32;
        for (slot, keyframe) in self.keyframes[1..len - 1].iter_mut().enumerate() {
            keyframe.time_ms = end_time * (slot as f32 + 1.0) / (interior_count + 1.0);
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::keyframe::SNAPSHOT_EPSILON;
    use crate::camera::Camera;
    use crate::lighting::Lighting;
    use crate::pose::neutral_pose;

    fn neutral() -> Snapshot {
        Snapshot {
            pose: neutral_pose(),
            camera: Camera::default().state(),
            lighting: Lighting::default(),
        }
    }

    fn seeded() -> Timeline {
        let mut timeline = Timeline::new();
        timeline.seed(&neutral());
        timeline
    }

    #[test]
    fn seed_brackets_at_zero_and_double_duration() {
        let timeline = seeded();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.keyframes()[0].time_ms, 0.0);
        assert_eq!(timeline.keyframes()[0].role, KeyframeRole::Start);
        assert_eq!(timeline.keyframes()[1].time_ms, 2.0 * DEFAULT_FRAME_DURATION_MS);
        assert_eq!(timeline.keyframes()[1].role, KeyframeRole::End);
        assert!(timeline.keyframes()[0]
            .snapshot
            .approx_eq(&neutral(), SNAPSHOT_EPSILON));
    }

    #[test]
    fn interiors_stay_evenly_spaced_and_strictly_increasing() {
        let mut timeline = seeded();
        for _ in 0..3 {
            timeline.insert_interior(neutral());
        }
        let end = timeline.last_time_ms();
        let times: Vec<f32> = timeline.keyframes().iter().map(|k| k.time_ms).collect();
        assert_eq!(times.len(), 5);
        for (i, time) in times.iter().enumerate().take(4).skip(1) {
            let expected = end * i as f32 / 4.0;
            assert!((time - expected).abs() < 1e-3, "slot {i}: {time} != {expected}");
        }
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn removal_respaces_the_remaining_interiors() {
        let mut timeline = seeded();
        let a = timeline.insert_interior(neutral());
        timeline.insert_interior(neutral());
        timeline.insert_interior(neutral());

        timeline.remove(a).unwrap();
        let end = timeline.last_time_ms();
        let times: Vec<f32> = timeline.keyframes().iter().map(|k| k.time_ms).collect();
        assert_eq!(times.len(), 4);
        assert!((times[1] - end / 3.0).abs() < 1e-3);
        assert!((times[2] - 2.0 * end / 3.0).abs() < 1e-3);
        assert!((timeline.duration_ms() - (end + END_PAD_MS)).abs() < 1e-3);
    }

    #[test]
    fn start_and_end_reject_deletion() {
        let mut timeline = seeded();
        let start_id = timeline.keyframes()[0].id;
        let end_id = timeline.keyframes()[1].id;
        assert_eq!(timeline.remove(start_id), Err(TimelineError::ProtectedKeyframe));
        assert_eq!(timeline.remove(end_id), Err(TimelineError::ProtectedKeyframe));
        assert_eq!(timeline.remove(999), Err(TimelineError::UnknownKeyframe));
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn interior_drag_clamps_to_the_neighbor_gap() {
        let mut timeline = seeded();
        let id = timeline.insert_interior(neutral());

        timeline.drag(id, -500.0).unwrap();
        assert_eq!(timeline.find(id).unwrap().time_ms, MIN_KEYFRAME_GAP_MS);

        timeline.drag(id, 10_000.0).unwrap();
        let end = timeline.last_time_ms();
        assert_eq!(timeline.find(id).unwrap().time_ms, end - MIN_KEYFRAME_GAP_MS);
    }

    #[test]
    fn start_is_pinned_at_zero() {
        let mut timeline = seeded();
        let start_id = timeline.keyframes()[0].id;
        assert_eq!(
            timeline.drag(start_id, 300.0),
            Err(TimelineError::ProtectedKeyframe)
        );
        assert_eq!(timeline.keyframes()[0].time_ms, 0.0);
    }

    #[test]
    fn dragging_the_end_rescales_interiors_proportionally() {
        let mut timeline = seeded();
        let id = timeline.insert_interior(neutral());
        assert_eq!(timeline.find(id).unwrap().time_ms, 1000.0);

        timeline.drag_end(4000.0);
        assert_eq!(timeline.find(id).unwrap().time_ms, 2000.0);
        assert_eq!(timeline.last_time_ms(), 4000.0);
        assert_eq!(timeline.keyframes()[0].time_ms, 0.0);
    }

    #[test]
    fn bracket_and_nearest_lookup() {
        let mut timeline = seeded();
        timeline.insert_interior(neutral());

        assert_eq!(timeline.bracket(500.0), Some((0, 1)));
        assert_eq!(timeline.bracket(1500.0), Some((1, 2)));
        assert_eq!(timeline.bracket(99_999.0), None);
        assert_eq!(timeline.nearest(1900.0), Some(2));
        assert_eq!(timeline.nearest(10.0), Some(0));
    }
}
