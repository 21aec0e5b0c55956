//! Local transform component.

use skein_core::math::{
    Mat4, Quat, Vec3, mat4_from_scale_rotation_translation, quat_rotate_vec3,
    to_scale_rotation_translation,
};

/// Local transform describing position, rotation, and scale relative to a parent.
///
/// If the entity has no [`Parent`](super::Parent), this transform is relative
/// to the world origin. Use [`world_matrix`](crate::spatial::world_matrix) for
/// the accumulated world-space matrix.
///
/// # Example
///
/// ```
/// use skein_ecs::components::Transform;
/// use skein_core::math::{Vec3, quat_from_rotation_y};
///
/// let transform = Transform::from_xyz(1.0, 2.0, 3.0)
///     .with_rotation(quat_from_rotation_y(std::f32::consts::FRAC_PI_2))
///     .with_scale(Vec3::new(2.0, 2.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// No translation, no rotation, and uniform scale of 1.
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    #[inline]
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    #[inline]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::identity()
        }
    }

    /// Creates a transform from a 4x4 matrix, extracting translation, rotation, and scale.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = to_scale_rotation_translation(matrix);
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Computes the transformation matrix for this transform.
    #[inline]
    pub fn compute_matrix(&self) -> Mat4 {
        mat4_from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Transforms a point from local space into the parent's space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        quat_rotate_vec3(self.rotation, point.component_mul(&self.scale)) + self.translation
    }

    /// Combines two transforms: the result applies `other` first, then `self`.
    pub fn mul_transform(&self, other: &Transform) -> Transform {
        Transform::from_matrix(&(self.compute_matrix() * other.compute_matrix()))
    }
}

crate::component::impl_component!(Transform);
