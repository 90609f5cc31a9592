//! Topology editing end to end: weld-group drags, extrude, bevel, and the
//! dirty flag's effect on the next save.

use glam::Vec3;
use sceneforge_lib::harness::EditorHarness;
use sceneforge_lib::picking::Ray;
use sceneforge_lib::topology::{EditMode, WELD_TOLERANCE};

fn ray_toward(from: Vec3, to: Vec3) -> Ray {
    Ray {
        origin: from,
        direction: (to - from).normalize(),
    }
}

#[test]
fn test_vertex_drag_keeps_coincident_vertices_welded() {
    let mut h = EditorHarness::new();
    let id = h.create_cone("Cone", 0.5, 1.0);
    assert!(h.begin_edit(&id, EditMode::Vertex));

    let camera = h.state.camera.clone();
    let apex = Vec3::new(0.0, 0.5, 0.0);
    let ray = ray_toward(camera.position, apex);

    let session = h.session.as_mut().unwrap();
    session.pointer_move(&mut h.state.scene, &camera, &ray);
    session.primary_press(&mut h.state.scene, &camera, &ray);
    assert!(session.is_dragging());

    let target = apex + Vec3::Y.cross(camera.view_direction()).normalize() * 0.4;
    let ray2 = ray_toward(camera.position, target);
    session.pointer_move(&mut h.state.scene, &camera, &ray2);
    session.primary_release();

    // Every apex duplicate moved together
    let mesh = &h.state.scene.get_entity(&id).unwrap().mesh;
    let weld = h.session.as_ref().unwrap().weld_groups();
    let apex_group = (0..mesh.vertex_count())
        .map(|i| weld.group_of(i))
        .find(|&g| weld.members(g).len() == 16)
        .unwrap();
    let moved = weld.current_position(mesh, apex_group);
    assert!((moved - apex).length() > 0.2);
    for &i in weld.members(apex_group) {
        assert!((mesh.position(i) - moved).length() < WELD_TOLERANCE);
    }
}

#[test]
fn test_extrude_invariant_counts() {
    let mut h = EditorHarness::new();
    let id = h.create_box("Box", 1.0, 1.0, 1.0);
    assert!(h.begin_edit(&id, EditMode::Face));

    let (v0, t0, positions_before) = {
        let mesh = &h.state.scene.get_entity(&id).unwrap().mesh;
        let positions: Vec<Vec3> = (0..mesh.vertex_count()).map(|i| mesh.position(i)).collect();
        (mesh.vertex_count(), mesh.triangle_count(), positions)
    };

    let camera = h.state.camera.clone();
    let ray = Ray {
        origin: Vec3::new(0.1, 5.0, 0.1),
        direction: Vec3::NEG_Y,
    };
    let session = h.session.as_mut().unwrap();
    session.primary_press(&mut h.state.scene, &camera, &ray);
    assert!(session.commit_extrude(&mut h.state.scene, 0.5));

    let mesh = &h.state.scene.get_entity(&id).unwrap().mesh;
    assert_eq!(mesh.vertex_count(), v0 + 3);
    assert_eq!(mesh.triangle_count(), t0 + 4);
    // Non-selected vertices stayed put
    for (i, p) in positions_before.iter().enumerate() {
        assert!((mesh.position(i) - *p).length() < 1e-6);
    }
}

#[test]
fn test_bevel_adds_segments() {
    let mut h = EditorHarness::new();
    let id = h.create_box("Box", 1.0, 1.0, 1.0);
    assert!(h.begin_edit(&id, EditMode::Edge));

    let camera = h.state.camera.clone();
    // Select the top front edge
    let mid = Vec3::new(0.0, 0.5, 0.5);
    let ray = ray_toward(camera.position, mid);
    let (v0, t0) = {
        let mesh = &h.state.scene.get_entity(&id).unwrap().mesh;
        (mesh.vertex_count(), mesh.triangle_count())
    };

    let session = h.session.as_mut().unwrap();
    session.primary_press(&mut h.state.scene, &camera, &ray);
    assert_eq!(session.selection.edges.len(), 1);

    let segments = 3;
    assert!(session.commit_bevel(&mut h.state.scene, 0.1, segments));
    let mesh = &h.state.scene.get_entity(&id).unwrap().mesh;
    assert_eq!(mesh.vertex_count(), v0 + segments as usize + 1);
    assert_eq!(mesh.triangle_count(), t0 + 2 * segments as usize);
}

#[test]
fn test_topology_edit_forces_raw_buffer_on_save() {
    let mut h = EditorHarness::new();
    let id = h.create_box("Box", 1.0, 1.0, 1.0);
    assert!(h.begin_edit(&id, EditMode::Face));

    let camera = h.state.camera.clone();
    let ray = Ray {
        origin: Vec3::new(0.1, 5.0, 0.1),
        direction: Vec3::NEG_Y,
    };
    let session = h.session.as_mut().unwrap();
    session.primary_press(&mut h.state.scene, &camera, &ray);
    session.commit_extrude(&mut h.state.scene, 0.3);
    h.end_edit();

    // The edited shape survives a bundle round trip byte-for-byte
    let json = h.export_bundle_json();
    let mut h2 = EditorHarness::new();
    h2.load_bundle_json(&json).unwrap();

    let original = &h.state.scene.get_entity(&id).unwrap().mesh;
    let restored = &h2.state.scene.get_entity(&id).unwrap().mesh;
    assert_eq!(restored.vertex_count(), original.vertex_count());
    assert_eq!(restored.triangle_count(), original.triangle_count());
    for i in 0..original.vertex_count() {
        assert!((restored.position(i) - original.position(i)).length() < 1e-6);
    }
    assert!(h2.state.scene.get_entity(&id).unwrap().topology_dirty);
}

#[test]
fn test_edge_drag_armed_by_double_click() {
    let mut h = EditorHarness::new();
    let id = h.create_box("Box", 1.0, 1.0, 1.0);
    assert!(h.begin_edit(&id, EditMode::Edge));

    let camera = h.state.camera.clone();
    let mid = Vec3::new(0.0, 0.5, 0.5);
    let ray = ray_toward(camera.position, mid);

    let session = h.session.as_mut().unwrap();
    session.double_click(&h.state.scene, &ray);
    session.pointer_move(&mut h.state.scene, &camera, &ray);
    assert!(session.is_dragging());

    let target = mid + Vec3::Y.cross(camera.view_direction()).normalize() * 0.3;
    session.pointer_move(&mut h.state.scene, &camera, &ray_toward(camera.position, target));

    // A secondary press, not a release, ends an edge drag
    session.primary_release();
    assert!(session.is_dragging());
    session.secondary_press();
    assert!(!session.is_dragging());

    assert!(h.state.scene.get_entity(&id).unwrap().topology_dirty);
}

#[test]
fn test_locked_entity_refuses_edit_session() {
    let mut h = EditorHarness::new();
    let id = h.create_box("Box", 1.0, 1.0, 1.0);
    h.state.scene.toggle_lock(&id);
    assert!(!h.begin_edit(&id, EditMode::Vertex));
    assert!(h.session.is_none());
}
