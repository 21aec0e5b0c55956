//! Math type aliases and helper functions.
//!
//! All scene and mesh math is `f32`. Matrices are column-major nalgebra
//! matrices, so the translation of an affine transform lives in column 3.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 3x3 matrix (f32).
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Use [`quat_from_xyzw`] or `Quaternion::new(w, x, y, z)` to construct.
pub type Quat = nalgebra::Quaternion<f32>;

/// Unit X axis.
pub const AXIS_X: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Unit Y axis, "up" in scene space.
pub const AXIS_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Unit Z axis.
pub const AXIS_Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

// ===== Matrix helpers =====

/// Build a 4x4 TRS matrix from scale, rotation (quaternion), and translation.
pub fn mat4_from_scale_rotation_translation(
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
) -> Mat4 {
    let r = nalgebra::UnitQuaternion::new_normalize(rotation);
    let m = r.to_rotation_matrix();
    let rm = m.matrix();
    #[rustfmt::skip]
    let result = Mat4::new(
        rm[(0, 0)] * scale.x, rm[(0, 1)] * scale.y, rm[(0, 2)] * scale.z, translation.x,
        rm[(1, 0)] * scale.x, rm[(1, 1)] * scale.y, rm[(1, 2)] * scale.z, translation.y,
        rm[(2, 0)] * scale.x, rm[(2, 1)] * scale.y, rm[(2, 2)] * scale.z, translation.z,
        0.0,                  0.0,                  0.0,                  1.0,
    );
    result
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Decompose a 4x4 matrix into (scale, rotation, translation).
pub fn to_scale_rotation_translation(m: &Mat4) -> (Vec3, Quat, Vec3) {
    let translation = mat4_translation(m);
    let col0 = mat4_x_axis(m);
    let col1 = mat4_y_axis(m);
    let col2 = mat4_z_axis(m);
    let sx = col0.norm();
    let sy = col1.norm();
    let sz = col2.norm();
    let scale = Vec3::new(sx, sy, sz);
    let rot_mat = Mat3::from_columns(&[col0 / sx, col1 / sy, col2 / sz]);
    let rotation = nalgebra::UnitQuaternion::from_rotation_matrix(
        &nalgebra::Rotation3::from_matrix_unchecked(rot_mat),
    )
    .into_inner();
    (scale, rotation, translation)
}

/// Translation part (column 3) of an affine matrix.
pub fn mat4_translation(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Replace the translation part of an affine matrix.
pub fn mat4_set_translation(m: &mut Mat4, t: Vec3) {
    m[(0, 3)] = t.x;
    m[(1, 3)] = t.y;
    m[(2, 3)] = t.z;
    m[(3, 3)] = 1.0;
}

/// First basis column of an affine matrix.
pub fn mat4_x_axis(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 0)], m[(1, 0)], m[(2, 0)])
}

/// Second basis column of an affine matrix.
pub fn mat4_y_axis(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 1)], m[(1, 1)], m[(2, 1)])
}

/// Third basis column of an affine matrix.
pub fn mat4_z_axis(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)])
}

/// Upper-left 3x3 block (rotation and scale) of an affine matrix.
pub fn mat4_rotation_matrix(m: &Mat4) -> Mat3 {
    Mat3::from_columns(&[mat4_x_axis(m), mat4_y_axis(m), mat4_z_axis(m)])
}

/// Rotation of an affine matrix as a quaternion.
pub fn mat4_rotation(m: &Mat4) -> Quat {
    to_scale_rotation_translation(m).1
}

/// Transform a point (w = 1) by an affine matrix.
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let h = m * Vec4::new(p.x, p.y, p.z, 1.0);
    Vec3::new(h.x, h.y, h.z)
}

/// Gravity-aligned copy of an affine matrix.
///
/// The Z axis is projected onto the horizontal plane, Y is forced to
/// [`AXIS_UP`], and X is rebuilt from both. Translation is kept.
pub fn mat4_gravity_aligned(m: &Mat4) -> Mat4 {
    let z = mat4_z_axis(m);
    let projected_z = Vec3::new(z.x, 0.0, z.z).normalize();
    let y = AXIS_UP;
    let x = y.cross(&projected_z).normalize();
    let t = mat4_translation(m);

    Mat4::from_columns(&[
        Vec4::new(x.x, x.y, x.z, 0.0),
        Vec4::new(y.x, y.y, y.z, 0.0),
        Vec4::new(projected_z.x, projected_z.y, projected_z.z, 0.0),
        Vec4::new(t.x, t.y, t.z, 1.0),
    ])
}

// ===== Quaternion helpers =====

/// Create a quaternion from x, y, z, w components.
pub fn quat_from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Quat {
    nalgebra::Quaternion::new(w, x, y, z)
}

/// Create a quaternion from rotation around the Y axis.
pub fn quat_from_rotation_y(angle: f32) -> Quat {
    nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Vector3::y_axis(), angle).into_inner()
}

/// Rotate a vector by a quaternion.
pub fn quat_rotate_vec3(q: Quat, v: Vec3) -> Vec3 {
    nalgebra::UnitQuaternion::new_normalize(q) * v
}

// ===== Vector helpers =====

/// Euclidean distance between two points.
pub fn distance(a: &Vec3, b: &Vec3) -> f32 {
    (a - b).norm()
}

/// Format a vector with fixed precision, e.g. `(0.00000000, 1.00000000, 0.00000000)`.
pub fn format_vec3(v: &Vec3) -> String {
    format!("({:.8}, {:.8}, {:.8})", v.x, v.y, v.z)
}

/// z component of the 3D cross product of two 2D vectors.
fn cross_2d(a: &Vec2, b: &Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Barycentric coordinates of `p` relative to the triangle `(v1, v2, v3)`.
///
/// Returns `(u, v, w)` with `w = 1 - u - v`. A degenerate triangle yields
/// non-finite coordinates.
pub fn barycentric_coordinates(p: &Vec2, v1: &Vec2, v2: &Vec2, v3: &Vec2) -> Vec3 {
    let v2_from_v1 = v2 - v1;
    let v3_from_v1 = v3 - v1;
    let p_from_v1 = p - v1;

    let area = cross_2d(&v2_from_v1, &v3_from_v1);
    let u = cross_2d(&p_from_v1, &v3_from_v1) / area;
    let v = cross_2d(&v2_from_v1, &p_from_v1) / area;
    Vec3::new(u, v, 1.0 - u - v)
}

/// Whether `p` lies inside (or on the border of) the triangle `(v1, v2, v3)`.
pub fn point_in_triangle(p: &Vec2, v1: &Vec2, v2: &Vec2, v3: &Vec2) -> bool {
    let c = barycentric_coordinates(p, v1, v2, v3);
    (0.0..=1.0).contains(&c.x) && (0.0..=1.0).contains(&c.y) && (0.0..=1.0).contains(&c.z)
}

// ===== Bounds =====

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl BoundingBox {
    /// Create a box from two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, or `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |mut b, p| {
            b.include(p);
            b
        }))
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: &Vec3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis.
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f32 {
        let e = self.extents();
        e.x * e.y * e.z
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box enclosing this box after transforming it by `m`.
    #[must_use]
    pub fn transformed(&self, m: &Mat4) -> Self {
        let corners = self.corners().map(|c| mat4_transform_point(m, c));
        // eight corners, never empty
        Self::from_points(&corners).unwrap_or(*self)
    }
}
