//! Mesh generators for common shapes.
//!
//! Every generator returns [`MeshContents`] with a single part in model
//! `"model"` placed by instance `"main"`, material slot 0, counter-clockwise
//! winding when seen from outside.

use std::f32::consts::PI;

use crate::math::Vec3;

use super::data::{DEFAULT_PART_ID, MeshContents, MeshPart};

/// Generate an axis-aligned box centered at the origin with edge length `size`.
///
/// Each face has its own four vertices so normals stay flat.
pub fn generate_box(size: f32) -> MeshContents {
    let half = size * 0.5;
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::x(), Vec3::y(), Vec3::z()),
        (-Vec3::x(), Vec3::z(), Vec3::y()),
        (Vec3::y(), Vec3::z(), Vec3::x()),
        (-Vec3::y(), Vec3::x(), Vec3::z()),
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), Vec3::y(), Vec3::x()),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        let center = normal * half;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push(center + u * (su * half) + v * (sv * half));
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    MeshContents::single_part(
        MeshPart::new(DEFAULT_PART_ID, 0)
            .with_positions(positions)
            .with_normals(normals)
            .with_triangle_indices(indices),
    )
}

/// Generate a cone standing on the XZ plane, centered at the origin.
///
/// The base sits at `y = -height / 2` and the apex at `y = height / 2`.
///
/// # Arguments
///
/// * `height` - Distance from base to apex
/// * `radius` - Base radius
/// * `segments` - Number of subdivisions around the axis (clamped to at least 3)
pub fn generate_cone(height: f32, radius: f32, segments: u32) -> MeshContents {
    let segments = segments.max(3);
    let half = height * 0.5;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // side: one base vertex and one apex vertex per ring step
    for segment in 0..=segments {
        let phi = segment as f32 * 2.0 * PI / segments as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let normal = Vec3::new(cos_phi * height, radius, sin_phi * height).normalize();

        positions.push(Vec3::new(cos_phi * radius, -half, sin_phi * radius));
        normals.push(normal);
        positions.push(Vec3::new(0.0, half, 0.0));
        normals.push(normal);
    }
    for segment in 0..segments {
        let base = segment * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // base cap
    let center = positions.len() as u32;
    positions.push(Vec3::new(0.0, -half, 0.0));
    normals.push(-Vec3::y());
    for segment in 0..=segments {
        let phi = segment as f32 * 2.0 * PI / segments as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        positions.push(Vec3::new(cos_phi * radius, -half, sin_phi * radius));
        normals.push(-Vec3::y());
    }
    for segment in 0..segments {
        let ring = center + 1 + segment;
        indices.extend_from_slice(&[center, ring, ring + 1]);
    }

    MeshContents::single_part(
        MeshPart::new(DEFAULT_PART_ID, 0)
            .with_positions(positions)
            .with_normals(normals)
            .with_triangle_indices(indices),
    )
}

/// Generate a UV sphere.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments (around the equator)
/// * `rings` - Number of latitudinal rings (from pole to pole)
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> MeshContents {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            positions.push(normal * radius);
            normals.push(normal);
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    MeshContents::single_part(
        MeshPart::new(DEFAULT_PART_ID, 0)
            .with_positions(positions)
            .with_normals(normals)
            .with_triangle_indices(indices),
    )
}
