//! Presentation mode and slide playback
//!
//! Modeling and presentation are top-level modes; inside presentation the
//! camera is either free (`Editing`) or driven by the machine
//! (`LockedToSlide`), with autoplay as an additional flag. Slides hold
//! camera poses by value, captured from `current_camera_state` — they never
//! reference live scene entities.

use glam::Vec3;

use shared::{AnnotationKind, AnnotationRecord, SlideRecord};

use crate::camera::{ease_out_cubic, EditorCamera};

/// Seconds a freshly captured slide holds during autoplay
pub const DEFAULT_SLIDE_DURATION: f64 = 5.0;

/// Top-level editor mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Modeling,
    Presentation,
}

/// Camera ownership while in presentation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentationPhase {
    /// Camera free, live pose tracking active
    #[default]
    Editing,
    /// Camera pose driven by the slide machine
    LockedToSlide,
}

/// Position/target pair sampled from the live camera every unlocked frame.
/// Slide capture reads this, never the camera directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPose {
    pub position: [f64; 3],
    pub target: [f64; 3],
}

impl CameraPose {
    fn position_vec(&self) -> Vec3 {
        Vec3::new(
            self.position[0] as f32,
            self.position[1] as f32,
            self.position[2] as f32,
        )
    }

    fn target_vec(&self) -> Vec3 {
        Vec3::new(
            self.target[0] as f32,
            self.target[1] as f32,
            self.target[2] as f32,
        )
    }
}

/// In-flight camera interpolation toward a slide pose
#[derive(Clone, Debug)]
struct SlideTransition {
    from: CameraPose,
    to: CameraPose,
    elapsed: f64,
    duration: f64,
}

/// The presentation state machine. Owns the slide list; per-frame `update`
/// drives pose tracking, slide transitions, and the autoplay timer.
#[derive(Default)]
pub struct PresentationState {
    pub mode: EditorMode,
    pub phase: PresentationPhase,
    playing: bool,
    pub slides: Vec<SlideRecord>,
    active_slide: Option<usize>,
    current_camera_state: CameraPose,
    transition: Option<SlideTransition>,
    /// Seconds spent on the active slide while autoplaying
    autoplay_elapsed: f64,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_camera_locked(&self) -> bool {
        self.mode == EditorMode::Presentation && self.phase == PresentationPhase::LockedToSlide
    }

    pub fn active_slide(&self) -> Option<usize> {
        self.active_slide
    }

    pub fn current_camera_state(&self) -> CameraPose {
        self.current_camera_state
    }

    // ── Mode transitions ───────────────────────────────────────

    pub fn enter_presentation(&mut self) {
        self.mode = EditorMode::Presentation;
        self.phase = PresentationPhase::Editing;
        tracing::info!("entered presentation mode ({} slides)", self.slides.len());
    }

    /// Leave presentation: stops playback, unlocks the camera, drops any
    /// in-flight transition mid-pose.
    pub fn exit_presentation(&mut self) {
        self.mode = EditorMode::Modeling;
        self.phase = PresentationPhase::Editing;
        self.playing = false;
        self.transition = None;
    }

    /// Explicit unlock resumes live pose tracking; playback stops.
    pub fn unlock_camera(&mut self) {
        self.phase = PresentationPhase::Editing;
        self.playing = false;
        self.transition = None;
    }

    // ── Slide CRUD ─────────────────────────────────────────────

    /// Capture a slide from the current camera state, verbatim.
    /// Returns the new slide's index.
    pub fn capture_slide(&mut self, name: &str) -> usize {
        let pose = self.current_camera_state;
        self.slides.push(SlideRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            duration: DEFAULT_SLIDE_DURATION,
            camera_position: pose.position,
            camera_target: pose.target,
            annotations: Vec::new(),
            terrain_type: None,
        });
        tracing::info!("captured slide '{}'", name);
        self.slides.len() - 1
    }

    /// Overwrite a slide's pose with the current camera state
    pub fn recapture_slide(&mut self, index: usize) -> bool {
        let pose = self.current_camera_state;
        let Some(slide) = self.slides.get_mut(index) else {
            return false;
        };
        slide.camera_position = pose.position;
        slide.camera_target = pose.target;
        true
    }

    pub fn rename_slide(&mut self, index: usize, name: &str) -> bool {
        let Some(slide) = self.slides.get_mut(index) else {
            return false;
        };
        slide.name = name.to_string();
        true
    }

    pub fn set_slide_duration(&mut self, index: usize, duration: f64) -> bool {
        let Some(slide) = self.slides.get_mut(index) else {
            return false;
        };
        slide.duration = duration.max(0.0);
        true
    }

    pub fn remove_slide(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        self.slides.remove(index);
        self.active_slide = if self.slides.is_empty() {
            None
        } else {
            self.active_slide
                .map(|a| if a > index { a - 1 } else { a.min(self.slides.len() - 1) })
        };
        true
    }

    /// Move a slide to a new position in the sequence
    pub fn reorder_slide(&mut self, from: usize, to: usize) -> bool {
        if from >= self.slides.len() || to >= self.slides.len() {
            return false;
        }
        let slide = self.slides.remove(from);
        self.slides.insert(to, slide);
        if let Some(a) = self.active_slide {
            self.active_slide = Some(if a == from {
                to
            } else if from < a && to >= a {
                a - 1
            } else if from > a && to <= a {
                a + 1
            } else {
                a
            });
        }
        true
    }

    /// Add an annotation to a slide
    pub fn add_annotation(
        &mut self,
        index: usize,
        text: &str,
        position: [f64; 3],
        kind: AnnotationKind,
    ) -> bool {
        let Some(slide) = self.slides.get_mut(index) else {
            return false;
        };
        slide.annotations.push(AnnotationRecord {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            position,
            kind,
            font_size: None,
            color: None,
        });
        true
    }

    /// Replace the slide list wholesale (bundle load)
    pub fn set_slides(&mut self, slides: Vec<SlideRecord>) {
        self.slides = slides;
        self.active_slide = None;
        self.transition = None;
        self.playing = false;
    }

    // ── Navigation & playback ──────────────────────────────────

    /// Jump to a slide: locks the camera and starts a pose transition over
    /// `transition_duration` seconds. The index clamps to the slide range;
    /// navigation past either end re-targets the boundary slide.
    pub fn go_to(&mut self, index: usize, transition_duration: f64) -> bool {
        if self.slides.is_empty() {
            tracing::warn!("slide navigation with no slides");
            return false;
        }
        let index = index.min(self.slides.len() - 1);
        let slide = &self.slides[index];

        self.phase = PresentationPhase::LockedToSlide;
        self.active_slide = Some(index);
        self.autoplay_elapsed = 0.0;
        self.transition = Some(SlideTransition {
            from: self.current_camera_state,
            to: CameraPose {
                position: slide.camera_position,
                target: slide.camera_target,
            },
            elapsed: 0.0,
            duration: transition_duration.max(0.0),
        });
        true
    }

    pub fn next(&mut self, transition_duration: f64) -> bool {
        let target = self.active_slide.map(|a| a + 1).unwrap_or(0);
        self.go_to(target, transition_duration)
    }

    pub fn previous(&mut self, transition_duration: f64) -> bool {
        let target = self.active_slide.map(|a| a.saturating_sub(1)).unwrap_or(0);
        self.go_to(target, transition_duration)
    }

    /// Start autoplay from the active slide (or the first)
    pub fn play(&mut self, transition_duration: f64) -> bool {
        if self.slides.is_empty() {
            tracing::warn!("play requested with no slides");
            return false;
        }
        self.playing = true;
        let start = self.active_slide.unwrap_or(0);
        self.go_to(start, transition_duration)
    }

    /// Stop playback: camera unlocks, mode stays in presentation editing
    pub fn stop(&mut self) {
        self.playing = false;
        self.unlock_camera();
    }

    // ── Per-frame update ───────────────────────────────────────

    /// Advance the machine by `dt` seconds. While unlocked, samples the live
    /// camera into `current_camera_state`; while locked, drives the camera
    /// through the active transition and the autoplay timer.
    ///
    /// The autoplay timer starts counting a slide's `duration` after its
    /// transition completes, so each slide occupies transition + duration
    /// seconds of playback.
    pub fn update(&mut self, camera: &mut EditorCamera, dt: f64, transition_duration: f64) {
        if !self.is_camera_locked() {
            self.current_camera_state = CameraPose {
                position: [
                    camera.position.x as f64,
                    camera.position.y as f64,
                    camera.position.z as f64,
                ],
                target: [
                    camera.target.x as f64,
                    camera.target.y as f64,
                    camera.target.z as f64,
                ],
            };
            return;
        }

        if let Some(tr) = &mut self.transition {
            tr.elapsed += dt;
            let t = if tr.duration <= 0.0 {
                1.0
            } else {
                (tr.elapsed / tr.duration).min(1.0) as f32
            };
            let t = ease_out_cubic(t);
            camera.position = tr.from.position_vec().lerp(tr.to.position_vec(), t);
            camera.target = tr.from.target_vec().lerp(tr.to.target_vec(), t);
            // The locked camera pose is still the captured state source
            self.current_camera_state = CameraPose {
                position: [
                    camera.position.x as f64,
                    camera.position.y as f64,
                    camera.position.z as f64,
                ],
                target: [
                    camera.target.x as f64,
                    camera.target.y as f64,
                    camera.target.z as f64,
                ],
            };
            if tr.elapsed >= tr.duration {
                camera.position = tr.to.position_vec();
                camera.target = tr.to.target_vec();
                self.transition = None;
            }
            return;
        }

        if self.playing {
            let Some(active) = self.active_slide else {
                return;
            };
            self.autoplay_elapsed += dt;
            if self.autoplay_elapsed >= self.slides[active].duration {
                if active + 1 < self.slides.len() {
                    self.go_to(active + 1, transition_duration);
                } else {
                    // Past the last slide: playback ends, camera unlocks
                    tracing::info!("autoplay finished");
                    self.stop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn settle(state: &mut PresentationState, camera: &mut EditorCamera, seconds: f64) {
        let frames = (seconds / DT).ceil() as usize + 1;
        for _ in 0..frames {
            state.update(camera, DT, 1.0);
        }
    }

    fn machine_with_two_slides(camera: &mut EditorCamera) -> PresentationState {
        let mut state = PresentationState::new();
        state.enter_presentation();

        camera.position = Vec3::new(5.0, 2.0, 5.0);
        camera.target = Vec3::ZERO;
        state.update(camera, DT, 1.0);
        state.capture_slide("Overview");

        camera.position = Vec3::new(0.0, 8.0, 0.5);
        camera.target = Vec3::new(1.0, 0.0, 0.0);
        state.update(camera, DT, 1.0);
        state.capture_slide("Top");

        state
    }

    #[test]
    fn test_capture_copies_current_pose() {
        let mut camera = EditorCamera::new();
        let state = machine_with_two_slides(&mut camera);
        assert_eq!(state.slides[0].camera_position, [5.0, 2.0, 5.0]);
        assert_eq!(state.slides[1].camera_target, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_playback_reaches_slide_pose() {
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);

        state.go_to(0, 1.0);
        assert!(state.is_camera_locked());
        settle(&mut state, &mut camera, 1.5);

        assert!((camera.position - Vec3::new(5.0, 2.0, 5.0)).length() < 1e-4);
        assert!(camera.target.length() < 1e-4);
    }

    #[test]
    fn test_slide_camera_determinism() {
        // Capture at P/T, navigate away and back, wait out the transition
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);

        state.go_to(1, 1.0);
        settle(&mut state, &mut camera, 1.5);
        state.go_to(0, 1.0);
        settle(&mut state, &mut camera, 1.5);

        assert!((camera.position - Vec3::new(5.0, 2.0, 5.0)).length() < 1e-4);
        assert!(camera.target.length() < 1e-4);
    }

    #[test]
    fn test_navigation_clamps_at_boundaries() {
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);

        state.go_to(0, 0.0);
        state.previous(0.0);
        assert_eq!(state.active_slide(), Some(0));

        state.go_to(5, 0.0);
        assert_eq!(state.active_slide(), Some(1));
        state.next(0.0);
        assert_eq!(state.active_slide(), Some(1));
    }

    #[test]
    fn test_autoplay_advances_then_stops() {
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);
        state.set_slide_duration(0, 0.1);
        state.set_slide_duration(1, 0.1);

        state.play(0.0);
        assert!(state.is_playing());
        assert_eq!(state.active_slide(), Some(0));

        settle(&mut state, &mut camera, 0.2);
        assert_eq!(state.active_slide(), Some(1));

        // The advance to slide 1 runs a full 1.0s transition before its
        // 0.1s hold starts counting
        settle(&mut state, &mut camera, 1.5);
        assert!(!state.is_playing());
        assert!(!state.is_camera_locked());
    }

    #[test]
    fn test_unlock_resumes_live_tracking() {
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);

        state.go_to(0, 0.0);
        settle(&mut state, &mut camera, 0.1);
        state.unlock_camera();

        camera.position = Vec3::new(9.0, 9.0, 9.0);
        state.update(&mut camera, DT, 1.0);
        assert_eq!(state.current_camera_state().position, [9.0, 9.0, 9.0]);
    }

    #[test]
    fn test_reorder_tracks_active_slide() {
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);
        state.capture_slide("Third");

        state.go_to(2, 0.0);
        state.reorder_slide(2, 0);
        assert_eq!(state.active_slide(), Some(0));
        assert_eq!(state.slides[0].name, "Third");
    }

    #[test]
    fn test_remove_slide_adjusts_active() {
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);

        state.go_to(1, 0.0);
        state.remove_slide(0);
        assert_eq!(state.active_slide(), Some(0));
        state.remove_slide(0);
        assert_eq!(state.active_slide(), None);
    }

    #[test]
    fn test_exit_presentation_unlocks() {
        let mut camera = EditorCamera::new();
        let mut state = machine_with_two_slides(&mut camera);
        state.play(1.0);
        state.exit_presentation();
        assert_eq!(state.mode, EditorMode::Modeling);
        assert!(!state.is_playing());
        assert!(!state.is_camera_locked());
    }
}
