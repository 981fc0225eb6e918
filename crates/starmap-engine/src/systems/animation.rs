//! Idle motion: starfield drift, planet spin, focused-star spin.

use std::f32::consts::TAU;
use crate::components::group::SceneGroup;
use crate::components::object::SceneObject;
use crate::core::scene::Scene;

/// Advance every object's idle spin by one step.
///
/// Spin is per object (radians per second around local Y). The starfield
/// carries the drift rate, planets and the focused star their spin rates;
/// everything else has zero spin and is left alone. Hidden groups keep
/// turning so nothing jumps when they reappear.
pub fn tick_animations(scene: &mut Scene, dt: f32) {
    for group in SceneGroup::ALL {
        for object in scene.objects_mut(group) {
            spin(object, dt);
        }
    }
}

fn spin(object: &mut SceneObject, dt: f32) {
    if object.spin != 0.0 {
        object.rotation.y = (object.rotation.y + object.spin * dt).rem_euclid(TAU);
    }
    for child in &mut object.children {
        spin(child, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use crate::components::mesh::{GeometryDesc, MaterialDesc};
    use crate::components::object::ObjectDesc;

    fn sphere() -> ObjectDesc {
        ObjectDesc::new(GeometryDesc::sphere(1.0, 8), MaterialDesc::default())
    }

    #[test]
    fn spinning_objects_turn_at_their_rate() {
        let mut scene = Scene::new();
        let planet = scene.add(SceneGroup::Planets, sphere().with_spin(0.6));
        let still = scene.add(SceneGroup::Focus, sphere());
        for _ in 0..60 {
            tick_animations(&mut scene, 1.0 / 60.0);
        }
        assert!((scene.get(planet).unwrap().rotation.y - 0.6).abs() < 1e-4);
        assert_eq!(scene.get(still).unwrap().rotation, Vec3::ZERO);
    }

    #[test]
    fn children_keep_their_own_orientation() {
        let mut scene = Scene::new();
        let ring = sphere().with_rotation(Vec3::new(1.0, 0.0, 0.0));
        let id = scene.add(SceneGroup::Planets, sphere().with_spin(1.0).with_child(ring));
        tick_animations(&mut scene, 0.5);
        let obj = scene.get(id).unwrap();
        assert!((obj.rotation.y - 0.5).abs() < 1e-6);
        assert_eq!(obj.children[0].rotation, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rotation_wraps() {
        let mut scene = Scene::new();
        let id = scene.add(SceneGroup::Starfield, sphere().with_spin(4.0));
        tick_animations(&mut scene, 2.0);
        let y = scene.get(id).unwrap().rotation.y;
        assert!((0.0..TAU).contains(&y));
        assert!((y - (8.0 - TAU)).abs() < 1e-4);
    }

    #[test]
    fn hidden_groups_still_drift() {
        let mut scene = Scene::new();
        let id = scene.add(SceneGroup::Starfield, sphere().with_spin(0.003));
        scene.set_group_visible(SceneGroup::Starfield, false);
        tick_animations(&mut scene, 1.0);
        assert!(scene.get(id).unwrap().rotation.y > 0.0);
    }
}
