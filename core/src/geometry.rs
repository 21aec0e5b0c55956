//! Strided readers over raw geometry buffers.
//!
//! - [`GeometrySource`] - One vertex attribute inside a byte buffer
//! - [`GeometryElement`] - An index buffer grouped into primitives
//! - [`PlaneGeometry`] - Vertices plus faces of a detected plane, convertible to [`MeshContents`]

use std::mem::size_of;
use std::sync::Arc;

use bytemuck::Pod;
use thiserror::Error;

use crate::math::Vec3;
use crate::mesh::{DEFAULT_PART_ID, MeshContents, MeshPart};

/// Geometry buffer decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("cannot read {type_name} ({size} bytes) from a buffer with stride {stride}")]
    StrideMismatch {
        type_name: &'static str,
        size: usize,
        stride: usize,
    },

    #[error("expected {expected:?} data, source holds {actual:?}")]
    FormatMismatch {
        expected: VertexFormat,
        actual: VertexFormat,
    },

    #[error("expected {expected} bytes per index, element has {actual}")]
    IndexWidthMismatch { expected: usize, actual: usize },

    #[error("buffer of {available} bytes is too short, {required} needed")]
    OutOfBounds { required: usize, available: usize },

    #[error("index {index} out of range for {count} entries")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("index value {value} does not fit in {target}")]
    IndexOverflow { value: i32, target: &'static str },
}

pub type GeometryResult<T> = Result<T, GeometryError>;

/// Component format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float,
    Float2,
    Float3,
    Float4,
    Int,
    Uint,
    Ushort,
}

impl VertexFormat {
    /// Size in bytes of one attribute value.
    pub fn size(&self) -> usize {
        match self {
            Self::Float | Self::Int | Self::Uint => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
            Self::Ushort => 2,
        }
    }
}

/// Kind of primitive an element's indices are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryPrimitive {
    Point,
    Line,
    #[default]
    Triangle,
}

impl GeometryPrimitive {
    pub fn index_count(&self) -> usize {
        match self {
            Self::Point => 1,
            Self::Line => 2,
            Self::Triangle => 3,
        }
    }
}

/// Byte position `base + index * stride`, or `OutOfBounds` when it overflows.
fn byte_position(
    buffer: &[u8],
    base: usize,
    index: usize,
    stride: usize,
) -> GeometryResult<usize> {
    index
        .checked_mul(stride)
        .and_then(|step| step.checked_add(base))
        .ok_or(GeometryError::OutOfBounds {
            required: usize::MAX,
            available: buffer.len(),
        })
}

fn read_at<T: Pod>(buffer: &[u8], start: usize) -> GeometryResult<T> {
    let end = start
        .checked_add(size_of::<T>())
        .ok_or(GeometryError::OutOfBounds {
            required: usize::MAX,
            available: buffer.len(),
        })?;
    let bytes = buffer.get(start..end).ok_or(GeometryError::OutOfBounds {
        required: end,
        available: buffer.len(),
    })?;
    Ok(bytemuck::pod_read_unaligned(bytes))
}

/// One vertex attribute stored in a shared byte buffer.
#[derive(Debug, Clone)]
pub struct GeometrySource {
    buffer: Arc<[u8]>,
    pub format: VertexFormat,
    /// Number of attribute values.
    pub count: usize,
    /// Byte offset of the first value.
    pub offset: usize,
    /// Byte distance between consecutive values.
    pub stride: usize,
}

impl GeometrySource {
    pub fn new(
        buffer: impl Into<Arc<[u8]>>,
        format: VertexFormat,
        count: usize,
        offset: usize,
        stride: usize,
    ) -> Self {
        Self {
            buffer: buffer.into(),
            format,
            count,
            offset,
            stride,
        }
    }

    /// Tightly packed float3 source.
    pub fn from_float3(values: &[[f32; 3]]) -> Self {
        let bytes: Vec<u8> = bytemuck::cast_slice(values).to_vec();
        Self::new(bytes, VertexFormat::Float3, values.len(), 0, 12)
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Decodes every value as `T`.
    ///
    /// Requires the source stride to equal `size_of::<T>()`.
    pub fn as_array<T: Pod>(&self) -> GeometryResult<Vec<T>> {
        let size = size_of::<T>();
        if size != self.stride {
            return Err(GeometryError::StrideMismatch {
                type_name: std::any::type_name::<T>(),
                size,
                stride: self.stride,
            });
        }
        (0..self.count)
            .map(|i| {
                let start = byte_position(&self.buffer, self.offset, i, self.stride)?;
                read_at(&self.buffer, start)
            })
            .collect()
    }

    /// Decodes every value as a [`Vec3`].
    pub fn as_vec3_array(&self) -> GeometryResult<Vec<Vec3>> {
        Ok(self
            .as_array::<[f32; 3]>()?
            .into_iter()
            .map(Vec3::from)
            .collect())
    }

    /// Reads value `index` of a float3 source.
    pub fn get(&self, index: usize) -> GeometryResult<[f32; 3]> {
        if self.format != VertexFormat::Float3 {
            return Err(GeometryError::FormatMismatch {
                expected: VertexFormat::Float3,
                actual: self.format,
            });
        }
        if index >= self.count {
            return Err(GeometryError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        read_at(
            &self.buffer,
            byte_position(&self.buffer, self.offset, index, self.stride)?,
        )
    }
}

/// Index buffer grouped into primitives.
#[derive(Debug, Clone)]
pub struct GeometryElement {
    buffer: Arc<[u8]>,
    /// Number of primitives.
    pub count: usize,
    pub bytes_per_index: usize,
    pub primitive: GeometryPrimitive,
}

impl GeometryElement {
    pub fn new(
        buffer: impl Into<Arc<[u8]>>,
        count: usize,
        bytes_per_index: usize,
        primitive: GeometryPrimitive,
    ) -> Self {
        Self {
            buffer: buffer.into(),
            count,
            bytes_per_index,
            primitive,
        }
    }

    /// Packed 32-bit triangle list.
    pub fn from_triangles(triangles: &[[i32; 3]]) -> Self {
        let bytes: Vec<u8> = bytemuck::cast_slice(triangles).to_vec();
        Self::new(bytes, triangles.len(), 4, GeometryPrimitive::Triangle)
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn require_32bit(&self) -> GeometryResult<()> {
        if self.bytes_per_index != 4 {
            return Err(GeometryError::IndexWidthMismatch {
                expected: 4,
                actual: self.bytes_per_index,
            });
        }
        Ok(())
    }

    /// Indices of primitive `index`.
    pub fn primitive_indices(&self, index: usize) -> GeometryResult<Vec<i32>> {
        self.require_32bit()?;
        if index >= self.count {
            return Err(GeometryError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        let per_primitive = self.primitive.index_count();
        let first = byte_position(&self.buffer, 0, index, per_primitive)?;
        (0..per_primitive)
            .map(|i| {
                let position = first.checked_add(i).ok_or(GeometryError::OutOfBounds {
                    required: usize::MAX,
                    available: self.buffer.len(),
                })?;
                read_at(&self.buffer, byte_position(&self.buffer, 0, position, 4)?)
            })
            .collect()
    }

    /// All indices of all primitives, flattened.
    pub fn as_i32_array(&self) -> GeometryResult<Vec<i32>> {
        self.require_32bit()?;
        let total = byte_position(&self.buffer, 0, self.count, self.primitive.index_count())?;
        (0..total)
            .map(|i| read_at(&self.buffer, byte_position(&self.buffer, 0, i, 4)?))
            .collect()
    }

    pub fn as_u32_array(&self) -> GeometryResult<Vec<u32>> {
        self.as_i32_array()?
            .into_iter()
            .map(|value| {
                u32::try_from(value).map_err(|_| GeometryError::IndexOverflow {
                    value,
                    target: "u32",
                })
            })
            .collect()
    }

    pub fn as_u16_array(&self) -> GeometryResult<Vec<u16>> {
        self.as_i32_array()?
            .into_iter()
            .map(|value| {
                u16::try_from(value).map_err(|_| GeometryError::IndexOverflow {
                    value,
                    target: "u16",
                })
            })
            .collect()
    }
}

/// Vertices and triangle faces of a detected plane.
#[derive(Debug, Clone)]
pub struct PlaneGeometry {
    pub vertices: GeometrySource,
    pub faces: GeometryElement,
}

impl PlaneGeometry {
    pub fn new(vertices: GeometrySource, faces: GeometryElement) -> Self {
        Self { vertices, faces }
    }

    /// Builds single-part mesh contents (`main` / `model` / `part`, material 0).
    pub fn to_mesh_contents(&self) -> GeometryResult<MeshContents> {
        let part = MeshPart::new(DEFAULT_PART_ID, 0)
            .with_positions(self.vertices.as_vec3_array()?)
            .with_triangle_indices(self.faces.as_u32_array()?);
        Ok(MeshContents::single_part(part))
    }
}

impl TryFrom<&PlaneGeometry> for MeshContents {
    type Error = GeometryError;

    fn try_from(plane: &PlaneGeometry) -> GeometryResult<Self> {
        plane.to_mesh_contents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshResource;

    fn interleaved() -> GeometrySource {
        // position (12 bytes) + uv (8 bytes)
        let mut bytes = Vec::new();
        for i in 0..3 {
            let f = i as f32;
            bytes.extend_from_slice(bytemuck::cast_slice(&[f, f + 0.5, f + 1.0, -1.0, -2.0]));
        }
        GeometrySource::new(bytes, VertexFormat::Float3, 3, 0, 20)
    }

    #[test]
    fn packed_source_decodes() {
        let source = GeometrySource::from_float3(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(
            source.as_vec3_array().unwrap(),
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]
        );
    }

    #[test]
    fn stride_mismatch_is_rejected() {
        let err = interleaved().as_array::<[f32; 3]>().unwrap_err();
        assert!(matches!(
            err,
            GeometryError::StrideMismatch {
                size: 12,
                stride: 20,
                ..
            }
        ));
    }

    #[test]
    fn float3_accessor_honors_stride() {
        let source = interleaved();
        assert_eq!(source.get(2).unwrap(), [2.0, 2.5, 3.0]);
        assert_eq!(
            source.get(3),
            Err(GeometryError::IndexOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn float3_accessor_requires_format() {
        let source = GeometrySource::new(vec![0u8; 16], VertexFormat::Float4, 1, 0, 16);
        assert_eq!(
            source.get(0),
            Err(GeometryError::FormatMismatch {
                expected: VertexFormat::Float3,
                actual: VertexFormat::Float4,
            })
        );
    }

    #[test]
    fn short_buffer_is_out_of_bounds() {
        let source = GeometrySource::new(vec![0u8; 20], VertexFormat::Float3, 2, 0, 12);
        assert!(matches!(
            source.as_vec3_array(),
            Err(GeometryError::OutOfBounds { required: 24, available: 20 })
        ));
    }

    #[test]
    fn huge_offset_is_out_of_bounds() {
        let source = GeometrySource::new(vec![0u8; 12], VertexFormat::Float3, 1, usize::MAX - 4, 12);
        assert!(matches!(
            source.as_array::<[f32; 3]>(),
            Err(GeometryError::OutOfBounds { available: 12, .. })
        ));
    }

    #[test]
    fn huge_stride_is_out_of_bounds() {
        let source = GeometrySource::new(vec![0u8; 36], VertexFormat::Float3, 3, 0, usize::MAX / 2);
        assert!(matches!(
            source.get(2),
            Err(GeometryError::OutOfBounds { available: 36, .. })
        ));
        let far = GeometrySource::new(vec![0u8; 36], VertexFormat::Float3, 3, 8, usize::MAX / 2);
        assert!(matches!(far.get(2), Err(GeometryError::OutOfBounds { .. })));
    }

    #[test]
    fn huge_primitive_count_is_out_of_bounds() {
        let element =
            GeometryElement::new(vec![0u8; 12], usize::MAX / 2, 4, GeometryPrimitive::Triangle);
        assert!(matches!(
            element.as_i32_array(),
            Err(GeometryError::OutOfBounds { available: 12, .. })
        ));
        assert!(matches!(
            element.primitive_indices(usize::MAX / 2 - 1),
            Err(GeometryError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn element_primitives_and_arrays() {
        let element = GeometryElement::from_triangles(&[[0, 1, 2], [2, 3, 0]]);
        assert_eq!(element.primitive_indices(1).unwrap(), vec![2, 3, 0]);
        assert_eq!(element.as_u32_array().unwrap(), vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(element.as_u16_array().unwrap(), vec![0u16, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn element_requires_32bit_indices() {
        let element = GeometryElement::new(vec![0u8; 12], 2, 2, GeometryPrimitive::Triangle);
        assert_eq!(
            element.primitive_indices(0),
            Err(GeometryError::IndexWidthMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn negative_index_overflows_unsigned() {
        let element = GeometryElement::from_triangles(&[[0, -1, 2]]);
        assert_eq!(
            element.as_u32_array(),
            Err(GeometryError::IndexOverflow {
                value: -1,
                target: "u32"
            })
        );
    }

    #[test]
    fn plane_geometry_to_mesh() {
        let plane = PlaneGeometry::new(
            GeometrySource::from_float3(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]),
            GeometryElement::from_triangles(&[[0, 2, 1]]),
        );
        let contents = MeshContents::try_from(&plane).unwrap();
        assert_eq!(contents.instances[0].id, "main");
        assert_eq!(contents.models[0].id, "model");
        let part = &contents.models[0].parts[0];
        assert_eq!(part.id, "part");
        assert_eq!(part.material_index, 0);
        assert_eq!(part.triangle_indices.as_deref(), Some(&[0, 2, 1][..]));
        assert!(MeshResource::generate(contents).is_ok());
    }
}
