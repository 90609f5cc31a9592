//! Camera shortcuts and slide playback through the full editor state.

use glam::Vec3;
use sceneforge_lib::camera::AxisView;
use sceneforge_lib::harness::EditorHarness;
use sceneforge_lib::state::EditorMode;

#[test]
fn test_axis_view_toggles_to_antipode() {
    let mut h = EditorHarness::new();
    let dist = h.state.camera.distance();

    h.request_view(AxisView::Front);
    h.run_frames(1.0);
    assert!((h.state.camera.position - Vec3::new(0.0, 0.0, dist)).length() < 1e-2);

    h.request_view(AxisView::Front);
    h.run_frames(1.0);
    assert_eq!(h.state.views.current_view(), Some(AxisView::Back));
    assert!((h.state.camera.position - Vec3::new(0.0, 0.0, -dist)).length() < 1e-2);
}

#[test]
fn test_slide_capture_and_deterministic_return() {
    let mut h = EditorHarness::new();
    h.state.presentation.enter_presentation();

    h.state.camera.position = Vec3::new(3.0, 4.0, 5.0);
    h.state.camera.target = Vec3::new(0.5, 0.0, 0.0);
    let first = h.capture_slide("Front corner");

    h.state.camera.position = Vec3::new(0.0, 9.0, 0.5);
    h.state.camera.target = Vec3::ZERO;
    h.capture_slide("Top");

    // Navigate away and back, waiting out both transitions
    let td = h.state.settings.slide_transition_duration;
    h.state.presentation.go_to(1, td);
    h.run_frames(td + 0.5);
    h.state.presentation.go_to(first, td);
    h.run_frames(td + 0.5);

    assert!((h.state.camera.position - Vec3::new(3.0, 4.0, 5.0)).length() < 1e-3);
    assert!((h.state.camera.target - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-3);
}

#[test]
fn test_playback_locks_camera_until_stop() {
    let mut h = EditorHarness::new();
    h.state.presentation.enter_presentation();
    h.capture_slide("Only");

    h.state.presentation.go_to(0, 1.0);
    assert!(h.state.presentation.is_camera_locked());

    // While locked, manual pose writes are overridden by the machine
    h.run_frames(1.5);
    let settled = h.state.camera.position;
    h.state.camera.position = Vec3::splat(42.0);
    h.state.presentation.go_to(0, 0.0);
    h.run_frames(0.1);
    assert!((h.state.camera.position - settled).length() < 1e-3);

    h.state.presentation.stop();
    assert!(!h.state.presentation.is_camera_locked());
}

#[test]
fn test_autoplay_walks_all_slides() {
    let mut h = EditorHarness::new();
    h.state.presentation.enter_presentation();
    h.capture_slide("One");
    h.capture_slide("Two");
    h.capture_slide("Three");
    for i in 0..3 {
        h.state.presentation.set_slide_duration(i, 0.05);
    }
    // Each slide occupies transition + duration during playback
    h.state.settings.slide_transition_duration = 0.05;

    h.state.presentation.play(0.0);
    h.run_frames(1.0);

    // Ended on the last slide and unlocked
    assert!(!h.state.presentation.is_playing());
    assert_eq!(h.state.presentation.active_slide(), Some(2));
    assert!(!h.state.presentation.is_camera_locked());
}

#[test]
fn test_navigation_idempotent_at_boundaries() {
    let mut h = EditorHarness::new();
    h.state.presentation.enter_presentation();
    h.capture_slide("One");
    h.capture_slide("Two");

    h.state.presentation.go_to(0, 0.0);
    h.state.presentation.previous(0.0);
    h.state.presentation.previous(0.0);
    assert_eq!(h.state.presentation.active_slide(), Some(0));

    h.state.presentation.next(0.0);
    h.state.presentation.next(0.0);
    h.state.presentation.next(0.0);
    assert_eq!(h.state.presentation.active_slide(), Some(1));
}

#[test]
fn test_exit_presentation_resumes_modeling() {
    let mut h = EditorHarness::new();
    h.state.presentation.enter_presentation();
    h.capture_slide("One");
    h.state.presentation.play(1.0);

    h.state.presentation.exit_presentation();
    assert_eq!(h.state.presentation.mode, EditorMode::Modeling);
    assert!(!h.state.presentation.is_camera_locked());

    // Live tracking picks the camera pose back up
    h.state.camera.position = Vec3::new(7.0, 7.0, 7.0);
    h.run_frames(0.05);
    assert_eq!(
        h.state.presentation.current_camera_state().position,
        [7.0, 7.0, 7.0]
    );
}

#[test]
fn test_slides_serialize_by_value() {
    let mut h = EditorHarness::new();
    let id = h.create_box("Box", 1.0, 1.0, 1.0);
    h.capture_slide("With box");
    h.delete(&id);

    // Deleting scene content leaves the slide untouched
    assert_eq!(h.state.presentation.slides.len(), 1);
    let json = h.export_bundle_json();
    let mut h2 = EditorHarness::new();
    h2.load_bundle_json(&json).unwrap();
    assert_eq!(h2.state.presentation.slides.len(), 1);
    assert_eq!(h2.object_count(), 0);
}
