use std::f32::consts::PI;

/// Cubic in/out blend curve. Accelerates over the first half, decelerates over
/// the second, and maps 0.5 to exactly 0.5.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Normalizes an angle in degrees to (-180, 180].
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    }
    if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Interpolates between two angles in degrees along the shortest signed arc,
/// wrapping through +-180. Shared by joint rotations and the camera's theta.
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    let delta = wrap_degrees(b - a);
    a + delta * t
}

/// Radian variant of `lerp_angle`, wrapping through +-PI.
pub fn lerp_angle_rad(a: f32, b: f32, t: f32) -> f32 {
    let mut delta = (b - a) % (2.0 * PI);
    if delta > PI {
        delta -= 2.0 * PI;
    }
    if delta <= -PI {
        delta += 2.0 * PI;
    }
    a + delta * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        // Out-of-range inputs clamp instead of extrapolating.
        assert_eq!(ease_in_out_cubic(-1.0), 0.0);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn ease_is_symmetric() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let a = ease_in_out_cubic(t);
            let b = 1.0 - ease_in_out_cubic(1.0 - t);
            assert!((a - b).abs() < 1e-5, "asymmetric at t={t}");
        }
    }

    #[test]
    fn lerp_angle_takes_shortest_path_across_the_seam() {
        let mid = lerp_angle(170.0, -170.0, 0.5);
        assert!(
            (wrap_degrees(mid).abs() - 180.0).abs() < 1e-4,
            "expected ~180, got {mid}"
        );
    }

    #[test]
    fn lerp_angle_plain_case() {
        assert!((lerp_angle(0.0, 90.0, 0.5) - 45.0).abs() < 1e-5);
        assert!((lerp_angle(-45.0, 45.0, 0.25) - (-22.5)).abs() < 1e-5);
    }

    #[test]
    fn lerp_angle_rad_wraps() {
        let a = 3.0;
        let b = -3.0;
        let mid = lerp_angle_rad(a, b, 0.5);
        // Shortest path from 3 rad to -3 rad crosses PI, not zero.
        assert!(mid.abs() > 3.0, "expected path through PI, got {mid}");
    }

    #[test]
    fn wrap_degrees_range() {
        assert_eq!(wrap_degrees(-340.0), 20.0);
        assert_eq!(wrap_degrees(540.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
    }
}
