use glam::{Mat4, Vec3, Vec4};

use crate::picking::Ray;

/// Frames a view-shortcut transition takes
pub const VIEW_TRANSITION_FRAMES: u32 = 30;

/// Easing used for every camera transition: fast start, cubic tail-off
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Free perspective camera driven by explicit position/target
#[derive(Clone, Debug)]
pub struct EditorCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl EditorCamera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(4.0, 3.0, 6.0),
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Unit vector from the camera toward its target
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 200.0)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to pixel coordinates in a viewport of
    /// `width` x `height`. None when behind the camera.
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> Option<[f32; 2]> {
        let vp = self.view_projection(width / height);
        let p = vp * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        Some([
            (ndc.x * 0.5 + 0.5) * width,
            (0.5 - ndc.y * 0.5) * height,
        ])
    }

    /// Cast a ray from a pixel position into the scene
    pub fn screen_ray(&self, pixel: [f32; 2], width: f32, height: f32) -> Ray {
        let ndc_x = pixel[0] / width * 2.0 - 1.0;
        let ndc_y = 1.0 - pixel[1] / height * 2.0;

        let vp_inv = self.view_projection(width / height).inverse();

        let near_world = vp_inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.position,
            direction: (far - near).normalize_or_zero(),
        }
    }
}

impl Default for EditorCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned perspective shortcut
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisView {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
    Free,
}

impl AxisView {
    /// Unit direction from the target toward the camera for this view
    pub fn eye_direction(self) -> Vec3 {
        match self {
            AxisView::Front => Vec3::Z,
            AxisView::Back => Vec3::NEG_Z,
            AxisView::Right => Vec3::X,
            AxisView::Left => Vec3::NEG_X,
            // Nudged off the pole so look_at keeps a stable up vector
            AxisView::Top => Vec3::new(0.0, 1.0, 0.001).normalize(),
            AxisView::Bottom => Vec3::new(0.0, -1.0, 0.001).normalize(),
            AxisView::Free => Vec3::new(0.55, 0.41, 0.72).normalize(),
        }
    }

    /// The opposite view on the same axis
    pub fn antipode(self) -> AxisView {
        match self {
            AxisView::Front => AxisView::Back,
            AxisView::Back => AxisView::Front,
            AxisView::Left => AxisView::Right,
            AxisView::Right => AxisView::Left,
            AxisView::Top => AxisView::Bottom,
            AxisView::Bottom => AxisView::Top,
            AxisView::Free => AxisView::Free,
        }
    }
}

/// In-flight camera pose interpolation
#[derive(Clone, Debug)]
struct ViewTransition {
    from_position: Vec3,
    from_target: Vec3,
    to_position: Vec3,
    to_target: Vec3,
    frame: u32,
}

/// Drives axis-view shortcuts: each axis is a 2-state toggle, re-invoking
/// the current view flips to its antipode. Transitions run over a fixed
/// frame count with the shared cubic ease.
#[derive(Debug, Default)]
pub struct ViewController {
    current: Option<AxisView>,
    transition: Option<ViewTransition>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_view(&self) -> Option<AxisView> {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Request an axis view; toggles to the antipode when the same view is
    /// requested twice in a row.
    pub fn request_view(&mut self, camera: &EditorCamera, view: AxisView) {
        let effective = if self.current == Some(view) {
            view.antipode()
        } else {
            view
        };
        self.current = Some(effective);

        let distance = camera.distance().max(0.5);
        let to_position = camera.target + effective.eye_direction() * distance;

        tracing::info!("camera view -> {:?}", effective);
        self.transition = Some(ViewTransition {
            from_position: camera.position,
            from_target: camera.target,
            to_position,
            to_target: camera.target,
            frame: 0,
        });
    }

    /// Advance the active transition by one frame.
    /// Returns true while a transition is running.
    pub fn tick(&mut self, camera: &mut EditorCamera) -> bool {
        let Some(tr) = &mut self.transition else {
            return false;
        };

        tr.frame += 1;
        let t = ease_out_cubic(tr.frame as f32 / VIEW_TRANSITION_FRAMES as f32);
        camera.position = tr.from_position.lerp(tr.to_position, t);
        camera.target = tr.from_target.lerp(tr.to_target, t);

        if tr.frame >= VIEW_TRANSITION_FRAMES {
            camera.position = tr.to_position;
            camera.target = tr.to_target;
            self.transition = None;
        }
        self.transition.is_some()
    }

    /// A manual camera move invalidates the axis toggle state
    pub fn clear(&mut self) {
        self.current = None;
        self.transition = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(ctrl: &mut ViewController, cam: &mut EditorCamera) {
        for _ in 0..VIEW_TRANSITION_FRAMES + 1 {
            ctrl.tick(cam);
        }
    }

    #[test]
    fn test_view_reaches_axis() {
        let mut cam = EditorCamera::new();
        let mut ctrl = ViewController::new();
        let dist = cam.distance();

        ctrl.request_view(&cam, AxisView::Front);
        settle(&mut ctrl, &mut cam);

        assert!((cam.position - Vec3::new(0.0, 0.0, dist)).length() < 1e-3);
        assert!(!ctrl.is_animating());
    }

    #[test]
    fn test_same_view_toggles_antipode() {
        let mut cam = EditorCamera::new();
        let mut ctrl = ViewController::new();

        ctrl.request_view(&cam, AxisView::Front);
        settle(&mut ctrl, &mut cam);
        let dist = cam.distance();

        ctrl.request_view(&cam, AxisView::Front);
        settle(&mut ctrl, &mut cam);

        assert_eq!(ctrl.current_view(), Some(AxisView::Back));
        assert!((cam.position - Vec3::new(0.0, 0.0, -dist)).length() < 1e-3);
    }

    #[test]
    fn test_distance_preserved_across_views() {
        let mut cam = EditorCamera::new();
        let mut ctrl = ViewController::new();
        let dist = cam.distance();

        ctrl.request_view(&cam, AxisView::Top);
        settle(&mut ctrl, &mut cam);

        assert!((cam.distance() - dist).abs() < 1e-3);
    }

    #[test]
    fn test_screen_ray_center_points_at_target() {
        let cam = EditorCamera::new();
        let ray = cam.screen_ray([400.0, 300.0], 800.0, 600.0);
        let expected = cam.view_direction();
        assert!((ray.direction - expected).length() < 1e-3);
    }

    #[test]
    fn test_project_center() {
        let cam = EditorCamera::new();
        let px = cam.project(cam.target, 800.0, 600.0).unwrap();
        assert!((px[0] - 400.0).abs() < 1.0);
        assert!((px[1] - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_ease_endpoints() {
        assert!(ease_out_cubic(0.0).abs() < 1e-6);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < 1e-6);
    }
}
