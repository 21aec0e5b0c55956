use rstest::rstest;

use skein_core::geometry::{GeometryElement, GeometrySource, PlaneGeometry};
use skein_core::material::{Material, MaterialValue};
use skein_core::math::Vec3;
use skein_core::mesh::topology::{OCCLUDER_SUFFIX, OTHER_SIDE_SUFFIX, OUTLINE_SUFFIX};
use skein_core::mesh::{MeshContents, MeshPart, MeshResource, OutlineParams};
use skein_ecs::components::*;
use skein_ecs::hierarchy::{set_enabled, set_parent};
use skein_ecs::materials::{
    ReplaceMaterialOptions, get_material_param, replace_and_save_materials,
    restore_original_materials, save_material_param, set_material_param_weight,
};
use skein_ecs::meshes::{
    DoubleSideOptions, add_double_side, add_mesh_outline, make_mesh_resources_unique,
};
use skein_ecs::traversal::{find_ancestor_with_any, remove_component_from_hierarchy, subtree};
use skein_ecs::{ComponentKind, Entity, World, spatial};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).norm() < 1e-5
}

/// One upward-facing vertex at the origin, as a degenerate triangle.
fn single_vertex_contents() -> MeshContents {
    MeshContents::single_part(
        MeshPart::new("tip", 0)
            .with_positions(vec![Vec3::zeros(); 3])
            .with_normals(vec![Vec3::y(); 3])
            .with_triangle_indices(vec![0, 1, 2]),
    )
}

fn spawn_model(world: &mut World, contents: MeshContents, parent: Option<Entity>) -> Entity {
    let entity = world.spawn();
    let mesh = MeshResource::generate(contents).unwrap();
    world.insert(
        entity,
        ModelComponent::new(mesh, vec![Material::simple([1.0; 4], 0.5, false)]),
    );
    if let Some(parent) = parent {
        set_parent(world, entity, parent).unwrap();
    }
    entity
}

// ---------------------------------------------------------------------------
// Outline: geometry decoded from buffers → scene → outline pass
// ---------------------------------------------------------------------------

#[test]
fn outline_offsets_shell_and_occluder() {
    init_logger();
    let mut world = World::new();
    let entity = spawn_model(&mut world, single_vertex_contents(), None);

    let report = add_mesh_outline(
        &mut world,
        entity,
        &Material::unlit([0.0, 0.0, 0.0, 1.0]),
        &OutlineParams::new(0.05),
    );
    assert!(report.is_ok());

    let model = world.get::<ModelComponent>(entity).unwrap();
    assert_eq!(model.materials.len(), 3);

    let contents = model.mesh.read();
    let derived = contents.model(&format!("model{OUTLINE_SUFFIX}")).unwrap();
    let shell = derived.part(&format!("tip{OUTLINE_SUFFIX}")).unwrap();
    let occluder = derived.part(&format!("tip{OCCLUDER_SUFFIX}")).unwrap();

    assert!(approx(shell.positions[0], Vec3::new(0.0, 0.05, 0.0)));
    assert!(approx(occluder.positions[0], Vec3::new(0.0, -0.005, 0.0)));
    assert_eq!(shell.triangle_indices.as_deref(), Some(&[2, 1, 0][..]));
    assert_eq!(occluder.triangle_indices.as_deref(), Some(&[0, 1, 2][..]));
    assert_eq!(shell.normals.as_ref().unwrap()[0], -Vec3::y());
    assert!(contents.instance(&format!("main{OUTLINE_SUFFIX}")).is_some());
}

#[test]
fn plane_geometry_feeds_outline() {
    init_logger();
    let vertices = GeometrySource::from_float3(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
    ]);
    let faces = GeometryElement::from_triangles(&[[0, 1, 2], [0, 2, 3]]);
    let plane = PlaneGeometry { vertices, faces };

    let mut contents = MeshContents::try_from(&plane).unwrap();
    contents.models[0].parts[0].normals = Some(vec![Vec3::y(); 4]);

    let mut world = World::new();
    let entity = spawn_model(&mut world, contents, None);
    let report = add_mesh_outline(
        &mut world,
        entity,
        &Material::default(),
        &OutlineParams::new(0.1),
    );

    assert_eq!(report.updated, vec![entity]);
    let model = world.get::<ModelComponent>(entity).unwrap();
    let contents = model.mesh.read();
    assert_eq!(contents.models.len(), 2);
    assert_eq!(contents.models[1].parts.len(), 2);
}

// ---------------------------------------------------------------------------
// Double side
// ---------------------------------------------------------------------------

#[test]
fn double_side_keeps_material_count() {
    init_logger();
    let mut world = World::new();
    let entity = spawn_model(&mut world, single_vertex_contents(), None);

    add_double_side(&mut world, entity, &DoubleSideOptions::default());

    let model = world.get::<ModelComponent>(entity).unwrap();
    assert_eq!(model.materials.len(), 1);
    let contents = model.mesh.read();
    let back = contents
        .model(&format!("model{OTHER_SIDE_SUFFIX}"))
        .and_then(|m| m.part(&format!("tip{OTHER_SIDE_SUFFIX}")))
        .unwrap();
    assert_eq!(back.material_index, 0);
    assert_eq!(back.triangle_indices.as_deref(), Some(&[2, 1, 0][..]));
    assert!(contents.instance(&format!("main{OTHER_SIDE_SUFFIX}")).is_some());
}

// ---------------------------------------------------------------------------
// Shared meshes
// ---------------------------------------------------------------------------

#[test]
fn detached_meshes_do_not_leak_replacements() {
    init_logger();
    let mut world = World::new();
    let root = spawn_model(&mut world, single_vertex_contents(), None);
    let shared = world.get::<ModelComponent>(root).unwrap().clone();
    let twin = world.spawn();
    world.insert(twin, shared);

    make_mesh_resources_unique(&mut world, twin);
    world
        .get::<ModelComponent>(twin)
        .unwrap()
        .mesh
        .replace(skein_core::mesh::generators::generate_box(1.0))
        .unwrap();

    let root_mesh = &world.get::<ModelComponent>(root).unwrap().mesh;
    assert_eq!(root_mesh.read().models[0].parts[0].vertex_count(), 3);
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

#[test]
fn highlight_and_restore_scene() {
    init_logger();
    let mut world = World::new();
    let root = world.spawn_named("scene");
    let a = spawn_model(&mut world, single_vertex_contents(), Some(root));
    let b = spawn_model(&mut world, single_vertex_contents(), Some(a));
    let originals: Vec<_> = [a, b]
        .iter()
        .map(|&e| world.get::<ModelComponent>(e).unwrap().materials.clone())
        .collect();

    let highlight = Material::unlit([1.0, 1.0, 0.0, 1.0]);
    replace_and_save_materials(&mut world, root, &highlight, &ReplaceMaterialOptions::default());
    assert!(world.has::<SavedMaterials>(b));

    let first = restore_original_materials(&mut world, root);
    assert_eq!(first.updated, vec![a, b]);
    for (&e, original) in [a, b].iter().zip(&originals) {
        assert_eq!(&world.get::<ModelComponent>(e).unwrap().materials, original);
        assert!(!world.has::<SavedMaterials>(e));
    }

    let second = restore_original_materials(&mut world, root);
    assert!(second.updated.is_empty());
}

#[rstest]
#[case(2.0, 0.5, 1.0)]
#[case(2.0, 0.0, 0.0)]
#[case(0.8, 1.0, 0.8)]
#[case(-1.5, 2.0, -3.0)]
fn weighting_scales_saved_value(#[case] original: f32, #[case] weight: f32, #[case] expected: f32) {
    init_logger();
    let mut world = World::new();
    let entity = world.spawn();
    let mesh = MeshResource::generate(single_vertex_contents()).unwrap();
    let material =
        Material::shader_graph("fade").with_parameter("alpha", MaterialValue::Float(original));
    world.insert(entity, ModelComponent::new(mesh, vec![material]));

    save_material_param(&mut world, entity, "alpha");
    let report = set_material_param_weight(&mut world, entity, "alpha", weight);

    assert!(report.is_ok());
    assert_eq!(
        get_material_param(&world, entity, "alpha"),
        Some(&MaterialValue::Float(expected))
    );
}

#[test]
fn disabled_entity_hides_parameters() {
    init_logger();
    let mut world = World::new();
    let root = world.spawn();
    let mesh = MeshResource::generate(single_vertex_contents()).unwrap();
    let child = world.spawn();
    world.insert(
        child,
        ModelComponent::new(
            mesh,
            vec![Material::shader_graph("fade").with_parameter("alpha", MaterialValue::Float(1.0))],
        ),
    );
    set_parent(&mut world, child, root).unwrap();

    set_enabled(&mut world, root, false);
    assert_eq!(get_material_param(&world, root, "alpha"), None);

    set_enabled(&mut world, root, true);
    assert_eq!(
        get_material_param(&world, root, "alpha"),
        Some(&MaterialValue::Float(1.0))
    );
}

// ---------------------------------------------------------------------------
// Traversal and space
// ---------------------------------------------------------------------------

#[test]
fn marker_lookup_and_cleanup() {
    init_logger();
    let mut world = World::new();
    let root = world.spawn();
    let mid = world.spawn();
    let leaf = world.spawn();
    set_parent(&mut world, mid, root).unwrap();
    set_parent(&mut world, leaf, mid).unwrap();
    world.insert(root, GenerateDoubleSide);
    world.insert(mid, IgnoreOutlineGeneration);

    let kinds = [
        ComponentKind::of::<GenerateDoubleSide>(),
        ComponentKind::of::<IgnoreOutlineGeneration>(),
    ];
    assert_eq!(find_ancestor_with_any(&world, leaf, &kinds), Some(mid));

    assert_eq!(
        remove_component_from_hierarchy::<IgnoreOutlineGeneration>(&mut world, root),
        1
    );
    assert_eq!(find_ancestor_with_any(&world, leaf, &kinds), Some(root));
    assert_eq!(subtree(&world, root).count(), 3);
}

#[test]
fn pivot_fix_keeps_model_in_place() {
    init_logger();
    let mut world = World::new();
    let root = world.spawn();
    let item = spawn_model(
        &mut world,
        skein_core::mesh::generators::generate_box(2.0),
        Some(root),
    );
    world.insert(item, Transform::from_xyz(3.0, 0.0, 0.0));

    let before = spatial::visual_bounds(&world, root, None).unwrap().unwrap();
    let pivot = spatial::fix_object_pivot(&mut world, item).unwrap();
    let after = spatial::visual_bounds(&world, root, None).unwrap().unwrap();

    assert!(approx(before.center(), after.center()));
    assert!(approx(
        spatial::local_transform(&world, pivot).translation,
        Vec3::new(3.0, 0.0, 0.0)
    ));
}
