//! Derived-geometry passes over [`MeshContents`].
//!
//! Both passes leave their input untouched and return new contents that can be
//! handed to [`MeshResource::generate`](super::MeshResource::generate):
//!
//! - [`double_sided`] appends a reversed-winding copy of every model
//! - [`outline`] appends, per model, an inflated back-face shell plus an inset
//!   occluder shell

use crate::math::Vec3;

use super::data::{MeshContents, MeshInstance, MeshModel, MeshPart};
use super::error::{MeshError, MeshResult};

/// Suffix appended to ids of back-face copies.
pub const OTHER_SIDE_SUFFIX: &str = "_other_side";
/// Suffix appended to ids of outline shells, outline models and outline instances.
pub const OUTLINE_SUFFIX: &str = "_outline";
/// Suffix appended to ids of occluder shells.
pub const OCCLUDER_SUFFIX: &str = "_outline_occluder";
/// Default ratio between the occluder inset and the outline offset.
pub const DEFAULT_OCCLUDER_INSET_RATIO: f32 = 0.1;

/// Shape parameters of an outline pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineParams {
    /// Distance the outline shell is pushed out along the vertex normals.
    pub offset: f32,
    /// The occluder shell is pulled in by `offset * occluder_inset_ratio`.
    pub occluder_inset_ratio: f32,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            offset: 0.01,
            occluder_inset_ratio: DEFAULT_OCCLUDER_INSET_RATIO,
        }
    }
}

impl OutlineParams {
    pub fn new(offset: f32) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_occluder_inset_ratio(mut self, ratio: f32) -> Self {
        self.occluder_inset_ratio = ratio;
        self
    }

    pub fn validate(&self) -> MeshResult<()> {
        if !self.offset.is_finite() || self.offset <= 0.0 {
            return Err(MeshError::InvalidOffset(self.offset));
        }
        if !self.occluder_inset_ratio.is_finite() || self.occluder_inset_ratio < 0.0 {
            return Err(MeshError::InvalidInsetRatio(self.occluder_inset_ratio));
        }
        Ok(())
    }

    /// Distance the occluder shell is pulled in along the normals.
    pub fn occluder_inset(&self) -> f32 {
        self.offset * self.occluder_inset_ratio
    }
}

fn suffixed(id: &str, suffix: &str) -> String {
    format!("{id}{suffix}")
}

fn reversed_winding(indices: &[u32]) -> Vec<u32> {
    indices.iter().rev().copied().collect()
}

fn require_indices<'a>(model: &MeshModel, part: &'a MeshPart) -> MeshResult<&'a [u32]> {
    part.triangle_indices
        .as_deref()
        .ok_or_else(|| MeshError::MissingTriangleIndices {
            model: model.id.clone(),
            part: part.id.clone(),
        })
}

fn require_normals<'a>(model: &MeshModel, part: &'a MeshPart) -> MeshResult<&'a [Vec3]> {
    let normals = part
        .normals
        .as_deref()
        .ok_or_else(|| MeshError::MissingNormals {
            model: model.id.clone(),
            part: part.id.clone(),
        })?;
    if normals.len() != part.positions.len() {
        return Err(MeshError::AttributeLength {
            part: part.id.clone(),
            attribute: "normals",
            expected: part.positions.len(),
            actual: normals.len(),
        });
    }
    Ok(normals)
}

/// Appends a back-face copy of every model and instance.
///
/// Each part of model `M` is copied into a new model `M_other_side` with its
/// index list reversed, so every triangle faces the other way. Copies use
/// `back_material` when given, otherwise the original part's material slot.
/// For every instance `I` of `M` a new instance `I_other_side` of
/// `M_other_side` with the same transform is appended. The original models
/// and instances are kept as they are.
///
/// Fails without partial output if any part lacks triangle indices.
pub fn double_sided(contents: &MeshContents, back_material: Option<usize>) -> MeshResult<MeshContents> {
    let mut result = contents.clone();

    for model in &contents.models {
        let parts = model
            .parts
            .iter()
            .map(|part| {
                let indices = require_indices(model, part)?;
                Ok(MeshPart {
                    id: suffixed(&part.id, OTHER_SIDE_SUFFIX),
                    material_index: back_material.unwrap_or(part.material_index),
                    triangle_indices: Some(reversed_winding(indices)),
                    ..part.clone()
                })
            })
            .collect::<MeshResult<Vec<_>>>()?;

        result.models.push(MeshModel {
            id: suffixed(&model.id, OTHER_SIDE_SUFFIX),
            parts,
        });
    }

    result.instances.extend(contents.instances.iter().map(|instance| MeshInstance {
        id: suffixed(&instance.id, OTHER_SIDE_SUFFIX),
        model: suffixed(&instance.model, OTHER_SIDE_SUFFIX),
        transform: instance.transform,
    }));

    Ok(result)
}

/// Appends outline geometry for every model.
///
/// For each model `M` a model `M_outline` is appended, containing in order:
/// - one outline shell per part: positions pushed out by `offset` along the
///   normals, normals negated, winding reversed, material `outline_material`
/// - one occluder shell per part: positions pulled in by the occluder inset,
///   normals and winding unchanged, material `occluder_material`
///
/// For every instance `I` an instance `I_outline` of the outline model with
/// the same transform is appended. Original models, instances, skeletons and
/// joint influences are kept unchanged.
///
/// Fails without partial output if the parameters are invalid or any part
/// lacks normals or triangle indices.
pub fn outline(
    contents: &MeshContents,
    params: &OutlineParams,
    outline_material: usize,
    occluder_material: usize,
) -> MeshResult<MeshContents> {
    params.validate()?;
    let offset = params.offset;
    let inset = params.occluder_inset();

    let mut result = contents.clone();
    for model in &contents.models {
        let mut shells = Vec::with_capacity(model.parts.len());
        let mut occluders = Vec::with_capacity(model.parts.len());

        for part in &model.parts {
            let normals = require_normals(model, part)?;
            let indices = require_indices(model, part)?;

            shells.push(MeshPart {
                id: suffixed(&part.id, OUTLINE_SUFFIX),
                material_index: outline_material,
                positions: part
                    .positions
                    .iter()
                    .zip(normals)
                    .map(|(p, n)| p + n * offset)
                    .collect(),
                normals: Some(normals.iter().map(|n| -n).collect()),
                triangle_indices: Some(reversed_winding(indices)),
                joint_influences: part.joint_influences.clone(),
            });

            occluders.push(MeshPart {
                id: suffixed(&part.id, OCCLUDER_SUFFIX),
                material_index: occluder_material,
                positions: part
                    .positions
                    .iter()
                    .zip(normals)
                    .map(|(p, n)| p - n * inset)
                    .collect(),
                normals: Some(normals.to_vec()),
                triangle_indices: Some(indices.to_vec()),
                joint_influences: part.joint_influences.clone(),
            });
        }

        shells.append(&mut occluders);
        result.models.push(MeshModel {
            id: suffixed(&model.id, OUTLINE_SUFFIX),
            parts: shells,
        });
    }

    result.instances.extend(contents.instances.iter().map(|instance| MeshInstance {
        id: suffixed(&instance.id, OUTLINE_SUFFIX),
        model: suffixed(&instance.model, OUTLINE_SUFFIX),
        transform: instance.transform,
    }));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::mat4_from_translation;
    use crate::mesh::MeshResource;
    use crate::mesh::generators::generate_box;
    use rstest::{fixture, rstest};

    fn quad() -> MeshContents {
        let part = MeshPart::new("part", 0)
            .with_positions(vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ])
            .with_normals(vec![Vec3::z(); 4])
            .with_triangle_indices(vec![0, 1, 2, 2, 3, 0]);
        let mut contents = MeshContents::single_part(part);
        contents.instances[0].transform = mat4_from_translation(Vec3::new(0.0, 2.0, 0.0));
        contents
    }

    fn triangle(id: &str, material_index: usize) -> MeshPart {
        MeshPart::new(id, material_index)
            .with_positions(vec![Vec3::zeros(), Vec3::x(), Vec3::y()])
            .with_normals(vec![Vec3::z(); 3])
            .with_triangle_indices(vec![0, 1, 2])
    }

    /// Model `a` with parts `p` (slot 0) and `q` (slot 1), model `b` with
    /// part `r` (slot 0), one instance of each.
    #[fixture]
    fn two_models() -> MeshContents {
        MeshContents::new()
            .with_model(
                MeshModel::new("a")
                    .with_part(triangle("p", 0))
                    .with_part(triangle("q", 1)),
            )
            .with_model(MeshModel::new("b").with_part(triangle("r", 0)))
            .with_instance(MeshInstance::new("ia", "a"))
            .with_instance(
                MeshInstance::new("ib", "b").with_transform(mat4_from_translation(Vec3::x())),
            )
    }

    #[test]
    fn double_sided_appends_reversed_copy() {
        let source = quad();
        let result = double_sided(&source, None).unwrap();

        assert_eq!(result.models.len(), 2);
        assert_eq!(result.models[0], source.models[0]);

        let back = result.model("model_other_side").unwrap();
        let part = &back.parts[0];
        assert_eq!(part.id, "part_other_side");
        assert_eq!(part.material_index, 0);
        assert_eq!(part.triangle_indices.as_deref(), Some(&[0, 3, 2, 2, 1, 0][..]));
        assert_eq!(part.positions, source.models[0].parts[0].positions);

        let instance = result.instance("main_other_side").unwrap();
        assert_eq!(instance.model, "model_other_side");
        assert_eq!(instance.transform, source.instances[0].transform);
    }

    #[test]
    fn double_sided_uses_back_material_slot() {
        let result = double_sided(&quad(), Some(3)).unwrap();
        assert_eq!(result.models[1].parts[0].material_index, 3);
        assert_eq!(result.models[0].parts[0].material_index, 0);
    }

    #[test]
    fn double_sided_requires_indices() {
        let mut source = quad();
        source.models[0].parts[0].triangle_indices = None;
        assert_eq!(
            double_sided(&source, None),
            Err(MeshError::MissingTriangleIndices {
                model: "model".into(),
                part: "part".into()
            })
        );
    }

    #[test]
    fn outline_builds_shell_then_occluder() {
        let source = quad();
        let params = OutlineParams::new(0.5);
        let result = outline(&source, &params, 1, 2).unwrap();

        assert_eq!(result.models.len(), 2);
        assert_eq!(result.models[0], source.models[0]);
        let model = &result.models[1];
        assert_eq!(model.id, "model_outline");
        let ids: Vec<_> = model.parts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["part_outline", "part_outline_occluder"]);

        let shell = &model.parts[0];
        assert_eq!(shell.material_index, 1);
        assert_eq!(shell.positions[1], Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(shell.normals.as_ref().unwrap()[0], -Vec3::z());
        assert_eq!(shell.triangle_indices.as_deref(), Some(&[0, 3, 2, 2, 1, 0][..]));

        let occluder = &model.parts[1];
        assert_eq!(occluder.material_index, 2);
        assert!((occluder.positions[1].z + 0.05).abs() < 1e-6);
        assert_eq!(occluder.normals.as_ref().unwrap()[0], Vec3::z());
        assert_eq!(occluder.triangle_indices.as_deref(), Some(&[0, 1, 2, 2, 3, 0][..]));

        assert_eq!(result.instances.len(), 2);
        let instance = result.instance("main_outline").unwrap();
        assert_eq!(instance.model, "model_outline");
        assert_eq!(instance.transform, source.instances[0].transform);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn outline_requires_normals() {
        let mut source = quad();
        source.models[0].parts[0].normals = None;
        assert!(matches!(
            outline(&source, &OutlineParams::new(0.1), 1, 2),
            Err(MeshError::MissingNormals { .. })
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.1)]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    fn outline_rejects_bad_offset(#[case] offset: f32) {
        assert!(matches!(
            outline(&quad(), &OutlineParams::new(offset), 1, 2),
            Err(MeshError::InvalidOffset(_))
        ));
    }

    #[test]
    fn outline_rejects_negative_inset_ratio() {
        let params = OutlineParams::new(0.1).with_occluder_inset_ratio(-1.0);
        assert_eq!(
            outline(&quad(), &params, 1, 2),
            Err(MeshError::InvalidInsetRatio(-1.0))
        );
    }

    #[test]
    fn outline_of_box_keeps_part_counts() {
        let source = generate_box(1.0);
        let result = outline(&source, &OutlineParams::default(), 1, 2).unwrap();
        let source_part = &source.models[0].parts[0];
        let shell = &result.models[1].parts[0];
        assert_eq!(result.models[1].parts.len(), 2);
        assert_eq!(shell.vertex_count(), source_part.vertex_count());
        assert_eq!(shell.triangle_count(), source_part.triangle_count());
    }

    #[rstest]
    fn double_sided_copies_every_part(two_models: MeshContents) {
        let result = double_sided(&two_models, None).unwrap();

        assert_eq!(result.models.len(), 4);
        assert_eq!(result.parts().count(), 6);
        let a = result.model("a_other_side").unwrap();
        let ids: Vec<_> = a.parts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p_other_side", "q_other_side"]);
        assert_eq!(a.parts[1].material_index, 1);
        assert_eq!(result.model("b_other_side").unwrap().parts.len(), 1);

        assert_eq!(result.instances.len(), 4);
        assert_eq!(result.instance("ia_other_side").unwrap().model, "a_other_side");
        let ib = result.instance("ib_other_side").unwrap();
        assert_eq!(ib.model, "b_other_side");
        assert_eq!(ib.transform, two_models.instances[1].transform);
        assert!(result.validate().is_ok());
    }

    #[rstest]
    fn outline_orders_shells_before_occluders(two_models: MeshContents) {
        let result = outline(&two_models, &OutlineParams::new(0.1), 2, 3).unwrap();

        assert_eq!(result.models.len(), 4);
        let a = result.model("a_outline").unwrap();
        let ids: Vec<_> = a.parts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            ["p_outline", "q_outline", "p_outline_occluder", "q_outline_occluder"]
        );
        let slots: Vec<_> = a.parts.iter().map(|p| p.material_index).collect();
        assert_eq!(slots, [2, 2, 3, 3]);

        let b = result.model("b_outline").unwrap();
        let ids: Vec<_> = b.parts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["r_outline", "r_outline_occluder"]);

        let derived_slots: std::collections::BTreeSet<_> = result.models[2..]
            .iter()
            .flat_map(|m| m.parts.iter().map(|p| p.material_index))
            .collect();
        assert_eq!(derived_slots.into_iter().collect::<Vec<_>>(), [2, 3]);

        assert_eq!(result.instances.len(), 4);
        assert_eq!(result.instance("ia_outline").unwrap().model, "a_outline");
        assert_eq!(result.instance("ib_outline").unwrap().model, "b_outline");
        assert!(result.validate().is_ok());
    }

    #[test]
    fn repeated_double_side_collides() {
        let once = double_sided(&quad(), None).unwrap();
        let twice = double_sided(&once, None).unwrap();
        assert_eq!(
            MeshResource::generate(twice).err(),
            Some(MeshError::DuplicateId {
                kind: "model",
                id: "model_other_side".into()
            })
        );
    }

    #[test]
    fn repeated_outline_collides() {
        let params = OutlineParams::new(0.1);
        let once = outline(&quad(), &params, 1, 2).unwrap();
        let twice = outline(&once, &params, 3, 4).unwrap();
        assert_eq!(
            twice.validate(),
            Err(MeshError::DuplicateId {
                kind: "model",
                id: "model_outline".into()
            })
        );
    }
}
