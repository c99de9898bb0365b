//! CPU-side mesh generators used as default geometry factories.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use super::sink::MeshData;

pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let mut uvs = Vec::new();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();

        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let dir = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
            mesh.positions.push(dir * radius);
            mesh.normals.push(dir);
            uvs.push(Vec2::new(
                seg as f32 / segments as f32,
                ring as f32 / rings as f32,
            ));
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let curr = ring * (segments + 1) + seg;
            let next = (ring + 1) * (segments + 1) + seg;

            mesh.indices.extend_from_slice(&[curr, next, next + 1]);
            mesh.indices.extend_from_slice(&[curr, next + 1, curr + 1]);
        }
    }

    mesh.uvs = Some(uvs);
    mesh
}

pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half = height / 2.0;

    for i in 0..=segments {
        let theta = 2.0 * PI * i as f32 / segments as f32;
        let x = theta.cos();
        let z = theta.sin();

        mesh.positions.push(Vec3::new(x * radius, -half, z * radius));
        mesh.normals.push(Vec3::new(x, 0.0, z));
        mesh.positions.push(Vec3::new(x * radius, half, z * radius));
        mesh.normals.push(Vec3::new(x, 0.0, z));
    }

    for i in 0..segments {
        let base = i * 2;
        mesh.indices.extend_from_slice(&[base, base + 1, base + 3]);
        mesh.indices.extend_from_slice(&[base, base + 3, base + 2]);
    }

    for (y, normal) in [(-half, Vec3::NEG_Y), (half, Vec3::Y)] {
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, y, 0.0));
        mesh.normals.push(normal);

        for i in 0..=segments {
            let theta = 2.0 * PI * i as f32 / segments as f32;
            mesh.positions
                .push(Vec3::new(theta.cos() * radius, y, theta.sin() * radius));
            mesh.normals.push(normal);
        }

        for i in 0..segments {
            if normal.y < 0.0 {
                mesh.indices
                    .extend_from_slice(&[center, center + 1 + i + 1, center + 1 + i]);
            } else {
                mesh.indices
                    .extend_from_slice(&[center, center + 1 + i, center + 1 + i + 1]);
            }
        }
    }

    mesh
}

/// Axis-aligned box with the given half extents, centered at `center` in the
/// node's local space. Body parts pass an offset center so the box hangs off
/// its joint pivot.
pub fn cuboid(half_extents: Vec3, center: Vec3) -> MeshData {
    let h = half_extents;
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::X,
            [
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(h.x, h.y, -h.z),
                Vec3::new(h.x, h.y, h.z),
                Vec3::new(h.x, -h.y, h.z),
            ],
        ),
        (
            Vec3::NEG_X,
            [
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(-h.x, h.y, h.z),
                Vec3::new(-h.x, h.y, -h.z),
                Vec3::new(-h.x, -h.y, -h.z),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(-h.x, h.y, -h.z),
                Vec3::new(-h.x, h.y, h.z),
                Vec3::new(h.x, h.y, h.z),
                Vec3::new(h.x, h.y, -h.z),
            ],
        ),
        (
            Vec3::NEG_Y,
            [
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(h.x, -h.y, h.z),
            ],
        ),
        (
            Vec3::Z,
            [
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(h.x, -h.y, h.z),
                Vec3::new(h.x, h.y, h.z),
                Vec3::new(-h.x, h.y, h.z),
            ],
        ),
        (
            Vec3::NEG_Z,
            [
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(-h.x, h.y, -h.z),
                Vec3::new(h.x, h.y, -h.z),
            ],
        ),
    ];

    let mut mesh = MeshData::default();
    for (normal, corners) in faces {
        let base = mesh.positions.len() as u32;
        for corner in corners {
            mesh.positions.push(corner + center);
            mesh.normals.push(normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_indices_are_triples_in_range() {
        let mesh = sphere(1.0, 12, 8);
        assert_eq!(mesh.indices.len() % 3, 0);
        let max = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert!(mesh.uvs.is_some());
    }

    #[test]
    fn cylinder_indices_are_triples_in_range() {
        let mesh = cylinder(0.5, 2.0, 12);
        assert_eq!(mesh.indices.len() % 3, 0);
        let max = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn cuboid_offsets_by_center() {
        let mesh = cuboid(Vec3::splat(0.5), Vec3::new(0.0, -0.5, 0.0));
        let min_y = mesh.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_eq!(min_y, -1.0);
        assert_eq!(max_y, 0.0);
    }
}
