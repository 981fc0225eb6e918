use glam::{Mat4, Vec3};
use crate::components::group::SceneGroup;
use crate::components::mesh::{BlendMode, GeometryDesc, MaterialDesc};
use crate::components::object::SceneObject;
use crate::core::scene::Scene;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::instance::{InstanceBuffer, MeshInstance, SHAPE_POINTS, SHAPE_RING, SHAPE_SPHERE};
use crate::renderer::labels::{LabelBuffer, LabelInstance};

/// Where each blend class starts in the instance buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlendSplit {
    pub translucent_start: u32,
    pub additive_start: u32,
}

const PASSES: [BlendMode; 3] = [BlendMode::Opaque, BlendMode::Alpha, BlendMode::Additive];

/// Build the instance buffer from every visible object.
/// Instances are ordered opaque first, then alpha-blended, then additive,
/// so the host can draw each class with one pipeline. Group draw order
/// is kept within a class.
pub fn build_instance_buffer(scene: &Scene, buffer: &mut InstanceBuffer) -> BlendSplit {
    buffer.clear();
    let mut split = BlendSplit::default();
    for pass in PASSES {
        match pass {
            BlendMode::Alpha => split.translucent_start = buffer.instance_count(),
            BlendMode::Additive => split.additive_start = buffer.instance_count(),
            BlendMode::Opaque => {}
        }
        for group in SceneGroup::ALL {
            if !scene.is_group_visible(group) {
                continue;
            }
            for object in scene.objects(group) {
                push_object(scene, object, Vec3::ZERO, pass, buffer);
            }
        }
    }
    split
}

/// Children follow the parent's position; a hidden parent hides its subtree.
fn push_object(scene: &Scene, object: &SceneObject, parent: Vec3, pass: BlendMode, buffer: &mut InstanceBuffer) {
    if !object.visible {
        return;
    }
    let world = parent + object.position;
    if let (Some(geometry), Some(material)) = (scene.geometry(object.geometry), scene.material(object.material)) {
        if material.blend == pass {
            buffer.push(mesh_instance(world, object.rotation, geometry, material));
        }
    }
    for child in &object.children {
        push_object(scene, child, world, pass, buffer);
    }
}

fn mesh_instance(position: Vec3, rotation: Vec3, geometry: &GeometryDesc, material: &MaterialDesc) -> MeshInstance {
    let (shape, size_a, size_b) = match geometry {
        GeometryDesc::Sphere { radius, .. } => (SHAPE_SPHERE, *radius, 0.0),
        GeometryDesc::Ring { inner, outer, .. } => (SHAPE_RING, *inner, *outer),
        GeometryDesc::Points { positions } => (SHAPE_POINTS, material.point_size, positions.len() as f32),
    };
    let k = material.emissive_intensity;
    MeshInstance {
        x: position.x,
        y: position.y,
        z: position.z,
        shape,
        size_a,
        size_b,
        rot_x: rotation.x,
        rot_y: rotation.y,
        r: material.color.r,
        g: material.color.g,
        b: material.color.b,
        opacity: material.opacity,
        er: material.emissive.r * k,
        eg: material.emissive.g * k,
        eb: material.emissive.b * k,
        blend: material.blend as u8 as f32,
    }
}

/// Project every visible label to screen space.
pub fn build_label_buffer(scene: &Scene, camera: &OrbitCamera, buffer: &mut LabelBuffer) {
    buffer.clear();
    let view_projection = camera.view_projection();
    for group in SceneGroup::ALL {
        if !scene.is_group_visible(group) {
            continue;
        }
        for object in scene.objects(group) {
            push_label(scene, camera, &view_projection, object, Vec3::ZERO, buffer);
        }
    }
}

fn push_label(
    scene: &Scene,
    camera: &OrbitCamera,
    view_projection: &Mat4,
    object: &SceneObject,
    parent: Vec3,
    buffer: &mut LabelBuffer,
) {
    if !object.visible {
        return;
    }
    let world = parent + object.position;
    if let Some(handle) = object.label {
        if let Some(label) = scene.label(handle).filter(|l| l.visible) {
            if let Some((screen, depth)) = camera.project_with(view_projection, world + label.offset) {
                buffer.push(LabelInstance {
                    x: screen.x,
                    y: screen.y,
                    depth,
                    style: label.style as u8 as f32,
                    slot: handle.index() as f32,
                    ..Default::default()
                });
            }
        }
    }
    for child in &object.children {
        push_label(scene, camera, view_projection, child, world, buffer);
    }
}
