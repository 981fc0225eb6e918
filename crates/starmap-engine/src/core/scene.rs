use std::ops::AddAssign;
use glam::Vec3;
use crate::api::types::ObjectId;
use crate::components::group::SceneGroup;
use crate::components::mesh::{Color, GeometryDesc, MaterialDesc};
use crate::components::object::{ObjectDesc, ObjectSource, SceneObject};
use crate::components::record::Star;
use crate::core::projection::{marker_size, project_star};
use crate::core::resources::{
    GeometryHandle, LabelHandle, MaterialHandle, Pool, ResourceCounts, ResourcePool,
};
use crate::error::ResourceError;
use crate::renderer::labels::{Label, LabelStyle};

pub const STAR_COLOR: Color = Color::hex(0xFFFFCC);
const STAR_EMISSIVE: Color = Color::hex(0xFFEE88);
const STAR_SEGMENTS: u32 = 24;
/// Star label height above the marker, in marker radii.
const STAR_LABEL_LIFT: f32 = 2.0;

/// Global look of the scene that is not tied to an object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Environment {
    /// Exponential fog density; 0 disables fog.
    pub fog_density: f32,
    /// Point light placed near the focused star.
    pub focus_light: bool,
}

/// What a disposal released. `failures` counts handles that were already stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisposalReport {
    pub objects: usize,
    pub geometries: usize,
    pub materials: usize,
    pub labels: usize,
    pub failures: usize,
}

impl AddAssign for DisposalReport {
    fn add_assign(&mut self, rhs: Self) {
        self.objects += rhs.objects;
        self.geometries += rhs.geometries;
        self.materials += rhs.materials;
        self.labels += rhs.labels;
        self.failures += rhs.failures;
    }
}

/// A disposal that hit a stale handle means ownership was broken somewhere.
/// Fatal in debug builds; in release the slot simply leaks.
fn disposal_failed(err: ResourceError) {
    log::error!("scene disposal invariant violated: {}", err);
    debug_assert!(false, "scene disposal invariant violated: {}", err);
}

struct Group {
    objects: Vec<SceneObject>,
    visible: bool,
}

/// Retained scene: four groups of exclusively owned objects plus the
/// resource pools their handles point into.
pub struct Scene {
    groups: [Group; SceneGroup::COUNT],
    resources: ResourcePool,
    labels: Pool<Label>,
    pub environment: Environment,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            groups: std::array::from_fn(|_| Group {
                objects: Vec::new(),
                visible: true,
            }),
            resources: ResourcePool::new(),
            labels: Pool::new("label"),
            environment: Environment::default(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocate the resources for `desc` (and its children) into a detached object.
    pub fn build(&mut self, desc: ObjectDesc) -> SceneObject {
        let id = self.next_id();
        let geometry = self.resources.geometries.alloc(desc.geometry);
        let material = self.resources.materials.alloc(desc.material);
        let label = desc.label.map(|l| self.labels.alloc(l));
        let children = desc.children.into_iter().map(|c| self.build(c)).collect();
        SceneObject {
            id,
            tag: desc.tag,
            visible: true,
            position: desc.position,
            rotation: desc.rotation,
            spin: desc.spin,
            source: desc.source,
            geometry,
            material,
            label,
            children,
        }
    }

    /// Hand a built object to a group, which takes ownership.
    pub fn insert(&mut self, group: SceneGroup, object: SceneObject) -> ObjectId {
        let id = object.id;
        self.groups[group.index()].objects.push(object);
        id
    }

    /// Build and insert in one step.
    pub fn add(&mut self, group: SceneGroup, desc: ObjectDesc) -> ObjectId {
        let object = self.build(desc);
        self.insert(group, object)
    }

    /// Add the overview marker for catalog star `index`.
    /// Stars without a sky position are skipped and return None.
    pub fn add_star_marker(&mut self, index: usize, star: &Star) -> Option<ObjectId> {
        let (ra, dec) = star.sky_position()?;
        let size = marker_size(star.radius);
        let desc = ObjectDesc::new(
            GeometryDesc::sphere(size, STAR_SEGMENTS),
            MaterialDesc::new(STAR_COLOR).with_emissive(STAR_EMISSIVE, 1.0),
        )
        .with_tag("star")
        .with_position(project_star(ra, dec, star.distance_pc))
        .with_source(ObjectSource::Star(index))
        .with_label(
            Label::new(
                star.display_name(),
                LabelStyle::Star,
                Vec3::new(0.0, size * STAR_LABEL_LIFT, 0.0),
            )
            .hidden(),
        );
        Some(self.add(SceneGroup::Stars, desc))
    }

    /// Release every resource owned by `object` and its children.
    pub fn dispose_object(&mut self, object: SceneObject) -> DisposalReport {
        let mut report = DisposalReport {
            objects: 1,
            ..Default::default()
        };
        match self.resources.geometries.release(object.geometry) {
            Ok(_) => report.geometries += 1,
            Err(err) => {
                report.failures += 1;
                disposal_failed(err);
            }
        }
        match self.resources.materials.release(object.material) {
            Ok(_) => report.materials += 1,
            Err(err) => {
                report.failures += 1;
                disposal_failed(err);
            }
        }
        if let Some(label) = object.label {
            match self.labels.release(label) {
                Ok(_) => report.labels += 1,
                Err(err) => {
                    report.failures += 1;
                    disposal_failed(err);
                }
            }
        }
        for child in object.children {
            report += self.dispose_object(child);
        }
        report
    }

    /// Remove and dispose every object in `group`.
    pub fn clear_group(&mut self, group: SceneGroup) -> DisposalReport {
        let objects = std::mem::take(&mut self.groups[group.index()].objects);
        let mut report = DisposalReport::default();
        for object in objects {
            report += self.dispose_object(object);
        }
        report
    }

    /// Teardown: dispose every group.
    pub fn dispose_all(&mut self) -> DisposalReport {
        let mut report = DisposalReport::default();
        for group in SceneGroup::ALL {
            report += self.clear_group(group);
        }
        report
    }

    // -- Queries --

    pub fn objects(&self, group: SceneGroup) -> &[SceneObject] {
        &self.groups[group.index()].objects
    }

    pub fn objects_mut(&mut self, group: SceneGroup) -> &mut [SceneObject] {
        &mut self.groups[group.index()].objects
    }

    /// Top-level object by id.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.groups.iter().flat_map(|g| g.objects.iter()).find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.objects.iter_mut())
            .find(|o| o.id == id)
    }

    pub fn group_len(&self, group: SceneGroup) -> usize {
        self.groups[group.index()].objects.len()
    }

    pub fn is_group_visible(&self, group: SceneGroup) -> bool {
        self.groups[group.index()].visible
    }

    pub fn set_group_visible(&mut self, group: SceneGroup, visible: bool) {
        self.groups[group.index()].visible = visible;
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GeometryDesc> {
        self.resources.geometries.get(handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDesc> {
        self.resources.materials.get(handle)
    }

    pub fn label(&self, handle: LabelHandle) -> Option<&Label> {
        self.labels.get(handle)
    }

    /// Label text by slot index, as exported in the label buffer.
    pub fn label_text(&self, slot: u32) -> Option<&str> {
        self.labels.get_by_index(slot).map(|l| l.text.as_str())
    }

    /// Show or hide the label attached to a top-level object.
    pub fn set_label_visible(&mut self, id: ObjectId, visible: bool) {
        let handle = match self.get(id).and_then(|o| o.label) {
            Some(h) => h,
            None => return,
        };
        if let Some(label) = self.labels.get_mut(handle) {
            label.visible = visible;
        }
    }

    /// Hide every label owned by objects in `group`.
    pub fn hide_labels(&mut self, group: SceneGroup) {
        let labels = &mut self.labels;
        for object in &self.groups[group.index()].objects {
            if let Some(label) = object.label.and_then(|h| labels.get_mut(h)) {
                label.visible = false;
            }
        }
    }

    /// Total objects across all groups, children included.
    pub fn object_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.objects.iter())
            .map(|o| o.subtree_len())
            .sum()
    }

    /// Live resource snapshot for leak checks.
    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.resources.geometries.live(),
            materials: self.resources.materials.live(),
            labels: self.labels.live(),
            objects: self.object_count(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
