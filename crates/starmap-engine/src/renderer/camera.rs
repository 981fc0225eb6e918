use std::f32::consts::PI;
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::api::config::CameraConfig;
use crate::extensions::easing::{lerp_vec3, Easing};
use crate::input::picking::Ray;

/// Keeps the polar angle off the poles, where `look_at` degenerates.
const POLAR_EPSILON: f32 = 1e-4;
/// Per-notch wheel zoom ratio at zoom speed 1.
const ZOOM_STEP: f32 = 0.95;

/// Allowed camera-to-target distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
}

impl ZoomBounds {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, distance: f32) -> f32 {
        distance.clamp(self.min, self.max.max(self.min))
    }
}

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: CameraPose,
    to: CameraPose,
    elapsed: f32,
    duration: f32,
}

/// Perspective camera orbiting a target point.
///
/// Drag input accumulates azimuth/polar deltas which drain into the pose a
/// fraction per step (damping); wheel input scales the distance, clamped to
/// the current zoom bounds.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    viewport: Vec2,
    bounds: ZoomBounds,
    damping: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    easing: Easing,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_scale: f32,
    transition: Option<Transition>,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: config.overview_position,
            target: config.overview_target,
            fov_y: config.fov_y_deg.to_radians(),
            near: config.near,
            far: config.far,
            viewport: Vec2::new(viewport_width.max(1.0), viewport_height.max(1.0)),
            bounds: ZoomBounds::new(config.overview_min_distance, config.overview_max_distance),
            damping: config.damping.clamp(0.0, 1.0),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            easing: config.transition_easing,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_scale: 1.0,
            transition: None,
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.target)
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Jump to a pose, dropping any pending orbit or transition.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
        self.transition = None;
        self.reset_pending();
    }

    /// Move to a pose over `duration` seconds; a non-positive duration snaps.
    pub fn fly_to(&mut self, pose: CameraPose, duration: f32) {
        if duration <= 0.0 {
            self.set_pose(pose);
            return;
        }
        self.reset_pending();
        self.transition = Some(Transition {
            from: self.pose(),
            to: pose,
            elapsed: 0.0,
            duration,
        });
    }

    pub fn set_bounds(&mut self, bounds: ZoomBounds) {
        self.bounds = bounds;
    }

    /// Queue an orbit from a pointer drag, in CSS pixels.
    /// A drag across the full viewport height turns the camera once around.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        if self.transition.is_some() {
            return;
        }
        let per_px = 2.0 * PI / self.viewport.y * self.rotate_speed;
        self.pending_azimuth -= dx * per_px;
        self.pending_polar -= dy * per_px;
    }

    /// Queue a wheel zoom; positive `delta_y` moves away from the target.
    pub fn zoom(&mut self, delta_y: f32) {
        if self.transition.is_some() || delta_y == 0.0 {
            return;
        }
        let step = ZOOM_STEP.powf(self.zoom_speed);
        if delta_y > 0.0 {
            self.pending_scale /= step;
        } else {
            self.pending_scale *= step;
        }
    }

    /// Advance one step: drive a transition, or apply damped orbit and zoom.
    pub fn update(&mut self, dt: f32) {
        if let Some(mut t) = self.transition {
            t.elapsed += dt;
            let progress = (t.elapsed / t.duration).min(1.0);
            let k = self.easing.apply(progress);
            self.position = lerp_vec3(t.from.position, t.to.position, k);
            self.target = lerp_vec3(t.from.target, t.to.target, k);
            self.transition = if progress >= 1.0 { None } else { Some(t) };
            return;
        }

        let idle = self.pending_azimuth == 0.0
            && self.pending_polar == 0.0
            && self.pending_scale == 1.0;
        let radius = self.distance();
        if idle && radius >= self.bounds.min && radius <= self.bounds.max {
            return;
        }

        let offset = self.position - self.target;
        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        let factor = if self.damping > 0.0 { self.damping } else { 1.0 };
        azimuth += self.pending_azimuth * factor;
        polar += self.pending_polar * factor;
        polar = polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = self.bounds.clamp(radius * self.pending_scale);

        let sin_polar = polar.sin();
        self.position = self.target
            + Vec3::new(
                radius * sin_polar * azimuth.sin(),
                radius * polar.cos(),
                radius * sin_polar * azimuth.cos(),
            );

        if self.damping > 0.0 {
            self.pending_azimuth *= 1.0 - self.damping;
            self.pending_polar *= 1.0 - self.damping;
            if self.pending_azimuth.abs() < 1e-6 {
                self.pending_azimuth = 0.0;
            }
            if self.pending_polar.abs() < 1e-6 {
                self.pending_polar = 0.0;
            }
        } else {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
        }
        self.pending_scale = 1.0;
    }

    fn reset_pending(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_scale = 1.0;
    }

    /// Resize the viewport (CSS pixels); updates aspect and the NDC mapping.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Right-handed perspective, depth in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// CSS pixel (origin top-left) to normalized device coordinates.
    pub fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.y * 2.0,
        )
    }

    /// World point to CSS pixels plus distance from the camera.
    /// None when the point is behind the camera or outside the depth range.
    pub fn project_to_screen(&self, world: Vec3) -> Option<(Vec2, f32)> {
        self.project_with(&self.view_projection(), world)
    }

    /// Same as [`project_to_screen`](Self::project_to_screen) with a
    /// precomputed view-projection, for per-frame loops.
    pub fn project_with(&self, view_projection: &Mat4, world: Vec3) -> Option<(Vec2, f32)> {
        let clip = *view_projection * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        let screen = Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        );
        Some((screen, self.position.distance(world)))
    }

    /// World-space ray from the camera through an NDC point.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect();
        let view_dir = Vec3::new(ndc.x * half_w, ndc.y * half_h, -1.0);
        let world_dir = self.view_matrix().inverse().transform_vector3(view_dir);
        Ray::new(self.position, world_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&CameraConfig::default(), 800.0, 600.0)
    }

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    #[test]
    fn starts_at_overview_pose() {
        let cam = camera();
        assert_eq!(cam.position, Vec3::new(0.0, 200.0, 1200.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.bounds(), ZoomBounds::new(10.0, 80_000.0));
    }

    #[test]
    fn idle_update_does_not_drift() {
        let mut cam = camera();
        for _ in 0..120 {
            cam.update(1.0 / 60.0);
        }
        assert_eq!(cam.position, Vec3::new(0.0, 200.0, 1200.0));
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let cam = camera();
        let (screen, depth) = cam.project_to_screen(Vec3::ZERO).unwrap();
        assert!((screen.x - 400.0).abs() < 1e-2);
        assert!((screen.y - 300.0).abs() < 1e-2);
        assert!((depth - cam.distance()).abs() < 1e-2);
    }

    #[test]
    fn point_behind_camera_is_not_projected() {
        let cam = camera();
        assert!(cam.project_to_screen(Vec3::new(0.0, 200.0, 5000.0)).is_none());
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        let expected = (cam.target - cam.position).normalize();
        assert!(approx(ray.direction, expected, 1e-4));
    }

    #[test]
    fn ray_through_projected_point_hits_it() {
        let cam = camera();
        let world = Vec3::new(150.0, -40.0, 80.0);
        let (screen, _) = cam.project_to_screen(world).unwrap();
        let ray = cam.ray_from_ndc(cam.screen_to_ndc(screen));
        let t = (world - ray.origin).dot(ray.direction);
        assert!(approx(ray.at(t), world, 0.5));
    }

    #[test]
    fn screen_to_ndc_corners() {
        let cam = camera();
        assert_eq!(cam.screen_to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(cam.screen_to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn orbit_is_damped_over_several_steps() {
        let mut cam = camera();
        let radius = cam.distance();
        cam.orbit(100.0, 0.0);
        cam.update(1.0 / 60.0);
        let after_one = cam.position;
        assert!(!approx(after_one, Vec3::new(0.0, 200.0, 1200.0), 1e-3));
        for _ in 0..600 {
            cam.update(1.0 / 60.0);
        }
        // orbiting preserves the distance to the target
        assert!((cam.distance() - radius).abs() < 0.5);
        let settled = cam.position;
        cam.update(1.0 / 60.0);
        assert!(approx(cam.position, settled, 1e-3));
    }

    #[test]
    fn zoom_is_clamped_to_bounds() {
        let mut cam = camera();
        cam.set_bounds(ZoomBounds::new(10.0, 1300.0));
        for _ in 0..50 {
            cam.zoom(100.0);
            cam.update(1.0 / 60.0);
        }
        assert!((cam.distance() - 1300.0).abs() < 1e-2);
        for _ in 0..500 {
            cam.zoom(-100.0);
            cam.update(1.0 / 60.0);
        }
        assert!((cam.distance() - 10.0).abs() < 1e-2);
    }

    #[test]
    fn fly_to_with_zero_duration_snaps() {
        let mut cam = camera();
        let pose = CameraPose::new(Vec3::new(0.0, 30.0, 100.0), Vec3::ZERO);
        cam.fly_to(pose, 0.0);
        assert_eq!(cam.pose(), pose);
        assert!(!cam.is_transitioning());
    }

    #[test]
    fn fly_to_eases_and_lands_exactly() {
        let mut cam = camera();
        let pose = CameraPose::new(Vec3::new(0.0, 30.0, 100.0), Vec3::ZERO);
        cam.fly_to(pose, 0.5);
        cam.update(0.25);
        assert!(cam.is_transitioning());
        assert!(cam.position.z < 1200.0 && cam.position.z > 100.0);
        cam.update(0.3);
        assert!(!cam.is_transitioning());
        assert_eq!(cam.pose(), pose);
    }

    #[test]
    fn fly_to_follows_configured_easing() {
        let pose = CameraPose::new(Vec3::new(0.0, 30.0, 100.0), Vec3::ZERO);
        let mut config = CameraConfig::default();
        config.transition_easing = Easing::Linear;
        let mut linear = OrbitCamera::new(&config, 800.0, 600.0);
        let mut eased = camera();
        linear.fly_to(pose, 1.0);
        eased.fly_to(pose, 1.0);
        linear.update(0.25);
        eased.update(0.25);
        // a quarter of the way: 1200 -> 100
        assert!((linear.position.z - 925.0).abs() < 1e-2);
        assert!((eased.position.z - 1131.25).abs() < 1e-2);
    }

    #[test]
    fn resize_changes_aspect() {
        let mut cam = camera();
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(0.0, 0.0);
        assert_eq!(cam.viewport(), Vec2::ONE);
    }
}
