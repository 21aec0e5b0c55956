//! Material data types.
//!
//! Materials use a property-based system where each property has a
//! [`MaterialSemantic`] tag and a typed [`MaterialValue`]. Shader-graph
//! materials expose their named inputs as [`MaterialSemantic::Custom`]
//! properties, which is what the parameter accessors operate on.

use std::fmt;

use super::error::{MaterialError, MaterialResult};

/// Shading model of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialKind {
    /// Metallic-roughness PBR material.
    #[default]
    PhysicallyBased,
    /// Custom shader with named parameters.
    ShaderGraph,
    /// Flat color, no lighting.
    Unlit,
    /// Writes depth only, hiding whatever is behind it.
    Occlusion,
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PhysicallyBased => "physically based",
            Self::ShaderGraph => "shader graph",
            Self::Unlit => "unlit",
            Self::Occlusion => "occlusion",
        };
        f.write_str(name)
    }
}

/// Well-known material property semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaterialSemantic {
    // -- PBR --
    /// Base color `[r, g, b, a]`.
    BaseColor,
    BaseColorTexture,
    /// Metallic factor (0.0–1.0).
    Metallic,
    /// Roughness factor (0.0–1.0).
    Roughness,
    /// Emissive color `[r, g, b]`.
    EmissiveColor,
    EmissiveIntensity,
    NormalTexture,
    AmbientOcclusionTexture,

    // -- Extension --
    /// Named shader-graph parameter.
    Custom(String),
}

impl MaterialSemantic {
    /// PBR inputs carried over by [`Material::copy_parameters_except_base_color`].
    pub const PBR_INPUTS_EXCEPT_BASE_COLOR: [MaterialSemantic; 6] = [
        Self::Roughness,
        Self::Metallic,
        Self::EmissiveColor,
        Self::EmissiveIntensity,
        Self::NormalTexture,
        Self::AmbientOcclusionTexture,
    ];
}

/// A typed material property value.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    /// 3-component vector (emissive color).
    Vec3([f32; 3]),
    /// 4-component vector (colors).
    Vec4([f32; 4]),
    Texture(TextureRef),
}

impl MaterialValue {
    pub fn kind(&self) -> MaterialValueKind {
        match self {
            Self::Float(_) => MaterialValueKind::Float,
            Self::Int(_) => MaterialValueKind::Int,
            Self::Bool(_) => MaterialValueKind::Bool,
            Self::Vec3(_) => MaterialValueKind::Vec3,
            Self::Vec4(_) => MaterialValueKind::Vec4,
            Self::Texture(_) => MaterialValueKind::Texture,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Discriminant of a [`MaterialValue`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialValueKind {
    Float,
    Int,
    Bool,
    Vec3,
    Vec4,
    Texture,
}

impl fmt::Display for MaterialValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reference to a texture by asset name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub name: String,
    /// Texture coordinate set index.
    pub tex_coord: u32,
}

impl TextureRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tex_coord: 0,
        }
    }
}

/// A single material property: semantic tag + typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    pub semantic: MaterialSemantic,
    pub value: MaterialValue,
}

impl MaterialProperty {
    pub fn new(semantic: MaterialSemantic, value: MaterialValue) -> Self {
        Self { semantic, value }
    }
}

/// Alpha rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    /// Fully opaque (alpha ignored).
    #[default]
    Opaque,
    /// Alpha masking with the given cutoff.
    Mask(f32),
    /// Alpha blending with a global opacity multiplier.
    Blend(f32),
}

/// CPU-side material definition.
///
/// All material data is stored as a flat list of [`MaterialProperty`] entries.
///
/// # Example
///
/// ```
/// use skein_core::material::*;
///
/// let mat = Material::shader_graph("glow")
///     .with_parameter("intensity", MaterialValue::Float(0.8));
/// assert_eq!(mat.get_parameter("intensity"), Some(&MaterialValue::Float(0.8)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    pub name: Option<String>,
    pub kind: MaterialKind,
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
    pub properties: Vec<MaterialProperty>,
}

impl Material {
    /// Creates an empty material of the given kind (opaque, single-sided).
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            name: None,
            kind,
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
            properties: Vec::new(),
        }
    }

    pub fn physically_based() -> Self {
        Self::new(MaterialKind::PhysicallyBased)
    }

    /// Creates a named shader-graph material without parameters.
    pub fn shader_graph(name: impl Into<String>) -> Self {
        Self::new(MaterialKind::ShaderGraph).with_name(name)
    }

    /// Creates a PBR material with a base color, roughness and metallic flag.
    pub fn simple(color: [f32; 4], roughness: f32, metallic: bool) -> Self {
        Self::physically_based()
            .with_property(MaterialProperty::new(
                MaterialSemantic::BaseColor,
                MaterialValue::Vec4(color),
            ))
            .with_property(MaterialProperty::new(
                MaterialSemantic::Roughness,
                MaterialValue::Float(roughness),
            ))
            .with_property(MaterialProperty::new(
                MaterialSemantic::Metallic,
                MaterialValue::Float(if metallic { 1.0 } else { 0.0 }),
            ))
    }

    pub fn unlit(color: [f32; 4]) -> Self {
        Self::new(MaterialKind::Unlit).with_property(MaterialProperty::new(
            MaterialSemantic::BaseColor,
            MaterialValue::Vec4(color),
        ))
    }

    /// Opaque material that only writes depth.
    pub fn occlusion() -> Self {
        Self::new(MaterialKind::Occlusion)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }

    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: MaterialProperty) -> Self {
        self.set(property.semantic, property.value);
        self
    }

    /// Declares a named shader-graph parameter with its initial value.
    #[must_use]
    pub fn with_parameter(self, name: impl Into<String>, value: MaterialValue) -> Self {
        self.with_property(MaterialProperty::new(
            MaterialSemantic::Custom(name.into()),
            value,
        ))
    }

    pub fn is_shader_graph(&self) -> bool {
        self.kind == MaterialKind::ShaderGraph
    }

    pub fn is_physically_based(&self) -> bool {
        self.kind == MaterialKind::PhysicallyBased
    }

    /// Find a property value by semantic.
    pub fn get(&self, semantic: &MaterialSemantic) -> Option<&MaterialValue> {
        self.properties
            .iter()
            .find(|p| &p.semantic == semantic)
            .map(|p| &p.value)
    }

    pub fn get_float(&self, semantic: &MaterialSemantic) -> Option<f32> {
        self.get(semantic)?.as_float()
    }

    pub fn get_vec4(&self, semantic: &MaterialSemantic) -> Option<[f32; 4]> {
        match self.get(semantic)? {
            MaterialValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_texture(&self, semantic: &MaterialSemantic) -> Option<&TextureRef> {
        match self.get(semantic)? {
            MaterialValue::Texture(t) => Some(t),
            _ => None,
        }
    }

    pub fn base_color(&self) -> Option<[f32; 4]> {
        self.get_vec4(&MaterialSemantic::BaseColor)
    }

    /// Sets a property, replacing an existing one with the same semantic.
    pub fn set(&mut self, semantic: MaterialSemantic, value: MaterialValue) {
        match self.properties.iter_mut().find(|p| p.semantic == semantic) {
            Some(property) => property.value = value,
            None => self.properties.push(MaterialProperty::new(semantic, value)),
        }
    }

    /// Removes a property, returning its value.
    pub fn unset(&mut self, semantic: &MaterialSemantic) -> Option<MaterialValue> {
        let index = self.properties.iter().position(|p| &p.semantic == semantic)?;
        Some(self.properties.remove(index).value)
    }

    /// Names of the shader-graph parameters declared on this material.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().filter_map(|p| match &p.semantic {
            MaterialSemantic::Custom(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter_names().any(|n| n == name)
    }

    /// Current value of a named shader-graph parameter.
    pub fn get_parameter(&self, name: &str) -> Option<&MaterialValue> {
        self.properties.iter().find_map(|p| match &p.semantic {
            MaterialSemantic::Custom(n) if n == name => Some(&p.value),
            _ => None,
        })
    }

    /// Writes a named shader-graph parameter.
    ///
    /// The parameter must already be declared and the new value must have the
    /// same kind as the current one.
    pub fn set_parameter(&mut self, name: &str, value: MaterialValue) -> MaterialResult<()> {
        if !self.is_shader_graph() {
            return Err(MaterialError::NotShaderGraph(self.kind));
        }
        let slot = self
            .properties
            .iter_mut()
            .find_map(|p| match &p.semantic {
                MaterialSemantic::Custom(n) if n == name => Some(&mut p.value),
                _ => None,
            })
            .ok_or_else(|| MaterialError::UnknownParameter(name.to_string()))?;

        if slot.kind() != value.kind() {
            return Err(MaterialError::TypeMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                actual: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    /// Copies roughness, metallic, emissive, normal, ambient occlusion and
    /// blending from `self` into `target`, leaving the base color of `target`.
    ///
    /// Inputs absent on `self` are removed from `target`.
    pub fn copy_parameters_except_base_color(&self, target: &mut Material) -> MaterialResult<()> {
        for kind in [self.kind, target.kind] {
            if kind != MaterialKind::PhysicallyBased {
                return Err(MaterialError::NotPhysicallyBased(kind));
            }
        }
        for semantic in MaterialSemantic::PBR_INPUTS_EXCEPT_BASE_COLOR {
            match self.get(&semantic) {
                Some(value) => target.set(semantic, value.clone()),
                None => {
                    target.unset(&semantic);
                }
            }
        }
        target.alpha_mode = self.alpha_mode;
        Ok(())
    }
}
