use glam::{Vec3, Vec4};

/// Scene lighting state captured by keyframes. Playback never blends two
/// lighting states; the animation holds the earlier keyframe's lighting until
/// the next keyframe is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub position: Vec3,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 4.0, 3.0),
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::new(1.0, 1.0, 1.0, 1.0),
            shininess: 40.0,
        }
    }
}

impl Lighting {
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.ambient.abs_diff_eq(other.ambient, epsilon)
            && self.diffuse.abs_diff_eq(other.diffuse, epsilon)
            && self.specular.abs_diff_eq(other.specular, epsilon)
            && (self.shininess - other.shininess).abs() <= epsilon
    }
}
