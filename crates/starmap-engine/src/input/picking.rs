//! Ray casting against scene markers.

use glam::Vec3;
use crate::api::types::ObjectId;
use crate::components::group::SceneGroup;
use crate::components::object::ObjectSource;
use crate::core::scene::Scene;

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first surface point of a sphere, if any.
    /// A ray starting inside the sphere hits at its exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let near = -b - sqrt_disc;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + sqrt_disc;
        (far >= 0.0).then_some(far)
    }
}

/// A star marker under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarHit {
    pub object: ObjectId,
    /// Index into the mounted catalog.
    pub star_index: usize,
    pub distance: f32,
}

/// Nearest visible star marker along `ray`. Only the star group is tested;
/// planets, focus objects and the starfield never pick.
pub fn pick_star(ray: &Ray, scene: &Scene) -> Option<StarHit> {
    if !scene.is_group_visible(SceneGroup::Stars) {
        return None;
    }
    let mut best: Option<StarHit> = None;
    for object in scene.objects(SceneGroup::Stars) {
        if !object.visible {
            continue;
        }
        let star_index = match object.source {
            ObjectSource::Star(index) => index,
            _ => continue,
        };
        let radius = match scene.geometry(object.geometry) {
            Some(geometry) => geometry.bounding_radius(),
            None => continue,
        };
        let Some(distance) = ray.intersect_sphere(object.position, radius) else {
            continue;
        };
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(StarHit {
                object: object.id,
                star_index,
                distance,
            });
        }
    }
    best
}
