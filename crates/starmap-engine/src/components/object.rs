use glam::Vec3;
use crate::api::types::ObjectId;
use crate::components::mesh::{GeometryDesc, MaterialDesc};
use crate::core::resources::{GeometryHandle, LabelHandle, MaterialHandle};
use crate::renderer::labels::Label;

/// What catalog record, if any, an object stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectSource {
    #[default]
    None,
    /// Index into the mounted star catalog.
    Star(usize),
    /// Index into the planet list of the focused star.
    Planet(usize),
}

/// A renderable unit: one geometry, one material, an optional label and children.
///
/// Children are positioned relative to their parent's position but do not
/// inherit its rotation, so a glow shell or an orbit ring stays put while
/// the parent spins.
///
/// An object owns pool slots; it must be handed back to
/// [`Scene::dispose_object`](crate::core::scene::Scene::dispose_object)
/// rather than dropped.
#[derive(Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub tag: String,
    pub visible: bool,
    pub position: Vec3,
    /// Euler rotation (x, y, z) in radians.
    pub rotation: Vec3,
    /// Idle spin around the local Y axis, radians per second.
    pub spin: f32,
    pub source: ObjectSource,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub label: Option<LabelHandle>,
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    /// Number of objects in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

/// Everything needed to allocate a [`SceneObject`].
#[derive(Debug, Clone)]
pub struct ObjectDesc {
    pub tag: String,
    pub geometry: GeometryDesc,
    pub material: MaterialDesc,
    pub position: Vec3,
    pub rotation: Vec3,
    pub spin: f32,
    pub source: ObjectSource,
    pub label: Option<Label>,
    pub children: Vec<ObjectDesc>,
}

impl ObjectDesc {
    pub fn new(geometry: GeometryDesc, material: MaterialDesc) -> Self {
        Self {
            tag: String::new(),
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            spin: 0.0,
            source: ObjectSource::None,
            label: None,
            children: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_source(mut self, source: ObjectSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_child(mut self, child: ObjectDesc) -> Self {
        self.children.push(child);
        self
    }
}
