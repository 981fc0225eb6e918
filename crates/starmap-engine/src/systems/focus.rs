//! Overview ↔ focused-star state machine.
//!
//! Entering a star hides the overview, builds the enlarged star with its glow
//! shell and label, frames the camera on it and issues a planet request tagged
//! with a fresh generation. Completions carrying any other generation are
//! dropped without touching the scene. Returning to the overview disposes
//! every focus and planet object and restores the overview camera.

use std::f32::consts::FRAC_PI_2;
use glam::{Vec2, Vec3};
use crate::api::config::ViewConfig;
use crate::api::fetch::{FetchCompletion, FetchTicket};
use crate::api::types::{ObjectId, StarId, ViewSignal};
use crate::api::view::ViewContext;
use crate::components::group::SceneGroup;
use crate::components::mesh::{BlendMode, Color, GeometryDesc, MaterialDesc};
use crate::components::object::{ObjectDesc, ObjectSource};
use crate::components::record::{Planet, Star};
use crate::core::rng::Rng;
use crate::core::projection::{marker_size, planet_marker_size, project_planet};
use crate::core::scene::{DisposalReport, STAR_COLOR};
use crate::error::SelectError;
use crate::input::picking::pick_star;
use crate::renderer::camera::{CameraPose, ZoomBounds};
use crate::renderer::labels::{Label, LabelStyle};

const FOCUS_EMISSIVE: Color = Color::hex(0xFFAA00);
const FOCUS_EMISSIVE_INTENSITY: f32 = 1.2;
const FOCUS_SEGMENTS: u32 = 32;
const GLOW_COLOR: Color = Color::hex(0xFFFFAA);
const PLANET_COLOR: Color = Color::hex(0x3399FF);
const PLANET_EMISSIVE: Color = Color::hex(0x0066CC);
const PLANET_EMISSIVE_INTENSITY: f32 = 0.4;
const PLANET_SEGMENTS: u32 = 16;
const ORBIT_COLOR: Color = Color::hex(0x4488FF);
const ORBIT_OPACITY: f32 = 0.4;
const ORBIT_SEGMENTS: u32 = 64;

/// Progress of the planet request for the focused star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Pending,
    /// Resolved with this many planets (0 = star shown alone).
    Loaded(usize),
    /// Failed; the star is shown alone.
    Failed,
}

/// Everything owned by the focused state. Dropped on return to the overview.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusContext {
    pub star_index: usize,
    pub star: Star,
    /// The enlarged star in the focus group.
    pub object: ObjectId,
    /// Radius of the enlarged star; the whole system is scaled from it.
    pub display_radius: f32,
    pub planets: Vec<ObjectId>,
    pub generation: u64,
    pub fetch: FetchStatus,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FocusState {
    #[default]
    Overview,
    Focused(FocusContext),
}

/// Drives focus transitions over a [`ViewContext`].
#[derive(Debug, Default)]
pub struct FocusController {
    state: FocusState,
    generation: u64,
    hovered: Option<ObjectId>,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn focused(&self) -> Option<&FocusContext> {
        match &self.state {
            FocusState::Focused(focus) => Some(focus),
            FocusState::Overview => None,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused().is_some()
    }

    /// Generation of the most recent selection.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Star marker whose label is shown because the pointer is over it.
    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    /// Overview → Focused on catalog star `star_index`.
    ///
    /// Rejected selections are logged and leave the scene untouched.
    pub fn select(&mut self, ctx: &mut ViewContext, star_index: usize) -> Result<(), SelectError> {
        let validated = self.validate(ctx, star_index);
        let (star, star_id) = match validated {
            Ok(valid) => valid,
            Err(err) => {
                log::warn!("ignoring selection: {}", err);
                return Err(err);
            }
        };

        self.clear_hover(ctx);
        ctx.scene.set_group_visible(SceneGroup::Stars, false);
        ctx.scene.set_group_visible(SceneGroup::Starfield, false);
        ctx.scene.hide_labels(SceneGroup::Stars);
        let mut stale = ctx.scene.clear_group(SceneGroup::Planets);
        stale += ctx.scene.clear_group(SceneGroup::Focus);
        if stale.objects > 0 {
            log::debug!("cleared {} leftover focus objects", stale.objects);
        }

        let layout = &ctx.config.layout;
        let display_radius = marker_size(star.radius) * layout.focus_scale;
        let glow = ObjectDesc::new(
            GeometryDesc::sphere(display_radius * layout.glow_scale, FOCUS_SEGMENTS),
            MaterialDesc::new(GLOW_COLOR).with_opacity(layout.glow_opacity, BlendMode::Additive),
        )
        .with_tag("glow");
        let desc = ObjectDesc::new(
            GeometryDesc::sphere(display_radius, FOCUS_SEGMENTS),
            MaterialDesc::new(STAR_COLOR).with_emissive(FOCUS_EMISSIVE, FOCUS_EMISSIVE_INTENSITY),
        )
        .with_tag("focus")
        .with_spin(ctx.config.animation.focused_star_spin)
        .with_source(ObjectSource::Star(star_index))
        .with_label(Label::new(
            star.display_name(),
            LabelStyle::Focused,
            Vec3::new(0.0, display_radius * layout.focus_label_lift, 0.0),
        ))
        .with_child(glow);
        let object = ctx.scene.add(SceneGroup::Focus, desc);

        let distance = display_radius * layout.camera_factor;
        let pose = CameraPose::new(Vec3::new(0.0, distance * layout.camera_lift, distance), Vec3::ZERO);
        let bounds = ZoomBounds::new(
            display_radius * layout.focus_min_zoom_factor,
            distance * layout.focus_max_zoom_factor,
        );
        ctx.camera.fly_to(pose, ctx.config.camera.transition_secs);
        ctx.camera.set_bounds(bounds);
        ctx.scene.environment.fog_density = 0.0;
        ctx.scene.environment.focus_light = true;

        self.generation += 1;
        log::info!(
            "focused {} (#{}), generation {}",
            star.display_name(),
            star_index,
            self.generation
        );
        ctx.fetch_requests.push(FetchTicket {
            generation: self.generation,
            star_index,
            star: star.clone(),
        });
        ctx.emit(ViewSignal::Focused { star_index });
        ctx.emit(ViewSignal::FetchStarted { star: star_id });
        self.state = FocusState::Focused(FocusContext {
            star_index,
            star,
            object,
            display_radius,
            planets: Vec::new(),
            generation: self.generation,
            fetch: FetchStatus::Pending,
        });
        Ok(())
    }

    /// The star and its identity, or why it cannot be focused.
    fn validate(&self, ctx: &ViewContext, star_index: usize) -> Result<(Star, StarId), SelectError> {
        if self.is_focused() {
            return Err(SelectError::AlreadyFocused);
        }
        let star = ctx
            .catalog
            .get(star_index)
            .ok_or(SelectError::OutOfRange(star_index))?;
        let star_id = star
            .star_id()
            .ok_or(SelectError::MissingIdentity(star_index))?;
        if star.sky_position().is_none() {
            return Err(SelectError::Unplaced(star_index));
        }
        Ok((star.clone(), star_id))
    }

    /// Focused → Overview. A no-op in the overview.
    pub fn return_to_overview(&mut self, ctx: &mut ViewContext) -> DisposalReport {
        let focus = match std::mem::take(&mut self.state) {
            FocusState::Focused(focus) => focus,
            FocusState::Overview => return DisposalReport::default(),
        };
        if focus.fetch == FetchStatus::Pending {
            // the request keeps running; its result will be stale
            ctx.emit(ViewSignal::FetchIdle);
        }

        let mut report = ctx.scene.clear_group(SceneGroup::Planets);
        report += ctx.scene.clear_group(SceneGroup::Focus);
        ctx.scene.set_group_visible(SceneGroup::Stars, true);
        ctx.scene.set_group_visible(SceneGroup::Starfield, true);
        ctx.scene.hide_labels(SceneGroup::Stars);
        self.hovered = None;

        ctx.camera.fly_to(ctx.overview_pose(), ctx.config.camera.transition_secs);
        ctx.camera.set_bounds(ctx.overview_bounds());
        ctx.scene.environment.fog_density = ctx.config.layout.overview_fog_density;
        ctx.scene.environment.focus_light = false;

        log::info!(
            "returned to overview from #{} ({} objects disposed)",
            focus.star_index,
            report.objects
        );
        ctx.emit(ViewSignal::Overview);
        report
    }

    /// Apply a planet completion. Returns false when it was stale and dropped.
    pub fn apply_fetch(&mut self, ctx: &mut ViewContext, completion: FetchCompletion) -> bool {
        let focus = match &mut self.state {
            FocusState::Focused(focus)
                if focus.generation == completion.generation
                    && focus.fetch == FetchStatus::Pending =>
            {
                focus
            }
            _ => {
                log::debug!(
                    "dropping stale planet result (generation {}, current {})",
                    completion.generation,
                    self.generation
                );
                return false;
            }
        };
        ctx.emit(ViewSignal::FetchIdle);

        match completion.result {
            Ok(planets) if planets.is_empty() => {
                log::info!("{} has no known planets", focus.star.display_name());
                focus.fetch = FetchStatus::Loaded(0);
            }
            Ok(planets) => {
                // build the whole system before any of it becomes visible
                let descs = planet_descs(&ctx.config, &mut ctx.rng, &planets, focus.display_radius);
                let built: Vec<_> = descs
                    .into_iter()
                    .map(|desc| ctx.scene.build(desc))
                    .collect();
                focus.planets = built
                    .into_iter()
                    .map(|object| ctx.scene.insert(SceneGroup::Planets, object))
                    .collect();
                focus.fetch = FetchStatus::Loaded(planets.len());
                log::info!("placed {} planets around {}", planets.len(), focus.star.display_name());
            }
            Err(err) => {
                log::warn!("showing {} alone: {}", focus.star.display_name(), err);
                focus.fetch = FetchStatus::Failed;
            }
        }
        true
    }

    /// A classified click at `screen` (CSS pixels).
    /// Focused: any click returns to the overview. Overview: select the star under the pointer.
    pub fn handle_click(&mut self, ctx: &mut ViewContext, screen: Vec2) {
        if self.is_focused() {
            self.return_to_overview(ctx);
            return;
        }
        let ray = ctx.camera.ray_from_ndc(ctx.camera.screen_to_ndc(screen));
        match pick_star(&ray, &ctx.scene) {
            Some(hit) => {
                // select logs its own rejections
                let _ = self.select(ctx, hit.star_index);
            }
            None => log::debug!("click at ({:.0}, {:.0}) hit no star", screen.x, screen.y),
        }
    }

    /// Pointer moved without a button held: show the hovered star's label.
    pub fn handle_hover(&mut self, ctx: &mut ViewContext, screen: Vec2) {
        if self.is_focused() {
            return;
        }
        let ray = ctx.camera.ray_from_ndc(ctx.camera.screen_to_ndc(screen));
        let hit = pick_star(&ray, &ctx.scene).map(|hit| hit.object);
        if hit == self.hovered {
            return;
        }
        self.clear_hover(ctx);
        if let Some(id) = hit {
            ctx.scene.set_label_visible(id, true);
        }
        self.hovered = hit;
    }

    fn clear_hover(&mut self, ctx: &mut ViewContext) {
        if let Some(id) = self.hovered.take() {
            ctx.scene.set_label_visible(id, false);
        }
    }
}

/// Planet markers with their orbit rings and labels, evenly spaced.
fn planet_descs(
    config: &ViewConfig,
    rng: &mut Rng,
    planets: &[Planet],
    display_radius: f32,
) -> Vec<ObjectDesc> {
    let layout = &config.layout;
    let base_distance = display_radius * layout.planet_base_factor;
    let count = planets.len();
    planets
        .iter()
        .enumerate()
        .map(|(index, planet)| {
            let lift = if layout.planet_jitter > 0.0 {
                rng.next_centered() * layout.planet_jitter
            } else {
                0.0
            };
            let placement = project_planet(index, count, planet.semi_major_axis, base_distance, lift);
            let size = planet_marker_size(planet.radius);
            // ring is a child: offset back so it stays centred on the star
            let ring = ObjectDesc::new(
                GeometryDesc::ring(
                    placement.orbit_radius - layout.orbit_ring_half_width,
                    placement.orbit_radius + layout.orbit_ring_half_width,
                    ORBIT_SEGMENTS,
                ),
                MaterialDesc::new(ORBIT_COLOR).with_opacity(ORBIT_OPACITY, BlendMode::Alpha),
            )
            .with_tag("orbit")
            .with_position(-placement.position)
            .with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0));
            ObjectDesc::new(
                GeometryDesc::sphere(size, PLANET_SEGMENTS),
                MaterialDesc::new(PLANET_COLOR)
                    .with_emissive(PLANET_EMISSIVE, PLANET_EMISSIVE_INTENSITY),
            )
            .with_tag("planet")
            .with_position(placement.position)
            .with_spin(config.animation.planet_spin)
            .with_source(ObjectSource::Planet(index))
            .with_label(Label::new(
                planet.display_name(index),
                LabelStyle::Planet,
                Vec3::new(0.0, size * layout.planet_label_lift, 0.0),
            ))
            .with_child(ring)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;
    use futures::executor::block_on;
    use proptest::prelude::*;
    use crate::api::fetch::{run_fetch, CatalogSource, FetchInbox};
    use crate::error::FetchError;

    fn catalog() -> Vec<Star> {
        vec![
            Star::new(101, "Alpha").with_sky(0.0, 0.0).with_distance(10.0).with_radius(1.5),
            Star::new(102, "Beta").with_sky(90.0, 5.0).with_distance(10.0),
            Star::new(103, "Gamma").with_sky(180.0, -5.0).with_distance(10.0).with_radius(0.8),
        ]
    }

    fn planets(n: usize) -> Vec<Planet> {
        (0..n).map(|i| Planet::new(i as u64 + 1, format!("p{}", i))).collect()
    }

    fn mounted(stars: Vec<Star>) -> ViewContext {
        let mut ctx = ViewContext::new(ViewConfig::default());
        ctx.load_catalog(stars);
        ctx
    }

    fn completion(generation: u64, result: Result<Vec<Planet>, FetchError>) -> FetchCompletion {
        FetchCompletion { generation, star_index: 0, result }
    }

    fn visible_top_level(ctx: &ViewContext) -> usize {
        SceneGroup::ALL
            .iter()
            .filter(|g| ctx.scene.is_group_visible(**g))
            .flat_map(|g| ctx.scene.objects(*g))
            .filter(|o| o.visible)
            .count()
    }

    fn screen_of(ctx: &ViewContext, star_index: usize) -> Vec2 {
        let object = ctx
            .scene
            .objects(SceneGroup::Stars)
            .iter()
            .find(|o| o.source == ObjectSource::Star(star_index))
            .unwrap();
        ctx.camera.project_to_screen(object.position).unwrap().0
    }

    #[test]
    fn select_enters_focus_with_empty_planet_group() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 0).unwrap();

        let state = focus.focused().unwrap();
        assert_eq!(state.fetch, FetchStatus::Pending);
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 0);
        assert_eq!(ctx.scene.group_len(SceneGroup::Focus), 1);
        assert!(!ctx.scene.is_group_visible(SceneGroup::Stars));
        assert!(!ctx.scene.is_group_visible(SceneGroup::Starfield));
        assert!(ctx.scene.environment.focus_light);

        let ticket = &ctx.fetch_requests[0];
        assert_eq!(ticket.generation, focus.generation());
        assert_eq!(ticket.star.id, Some(101));
        assert!(ctx.signals.contains(&ViewSignal::FetchStarted { star: StarId(101) }));
    }

    #[test]
    fn focus_composition_scales_with_marker() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 0).unwrap();

        let radius = marker_size(Some(1.5)) * 8.0;
        let state = focus.focused().unwrap();
        assert!((state.display_radius - radius).abs() < 1e-5);

        let star = ctx.scene.get(state.object).unwrap();
        assert_eq!(star.children.len(), 1);
        let glow = ctx.scene.geometry(star.children[0].geometry).unwrap();
        assert!((glow.bounding_radius() - radius * 1.3).abs() < 1e-4);
        let glow_mat = ctx.scene.material(star.children[0].material).unwrap();
        assert_eq!(glow_mat.blend, BlendMode::Additive);

        let d = radius * 30.0;
        assert!((ctx.camera.position - Vec3::new(0.0, 0.3 * d, d)).length() < 1e-3);
        assert_eq!(ctx.camera.target, Vec3::ZERO);
        let bounds = ctx.camera.bounds();
        assert!((bounds.min - radius * 2.0).abs() < 1e-4);
        assert!((bounds.max - d * 3.0).abs() < 1e-3);

        let label = ctx.scene.label(star.label.unwrap()).unwrap();
        assert_eq!(label.text, "Alpha");
        assert!((label.offset.y - radius * 1.5).abs() < 1e-4);
    }

    #[test]
    fn planets_are_placed_after_completion() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 0).unwrap();
        let generation = focus.generation();

        let system = vec![
            Planet::new(1, "b").with_semi_major_axis(0.05).with_radius(1.1),
            Planet::new(2, "").with_radius(12.0),
        ];
        assert!(focus.apply_fetch(&mut ctx, completion(generation, Ok(system))));
        assert_eq!(focus.focused().unwrap().fetch, FetchStatus::Loaded(2));
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 2);
        assert_eq!(ctx.signals.last(), Some(&ViewSignal::FetchIdle));

        let planet = &ctx.scene.objects(SceneGroup::Planets)[1];
        let label = ctx.scene.label(planet.label.unwrap()).unwrap();
        assert_eq!(label.text, "Planet 2");
        // ring child is centred on the star
        let ring = &planet.children[0];
        assert!((planet.position + ring.position).length() < 1e-4);
        assert_eq!(ring.rotation, Vec3::new(FRAC_PI_2, 0.0, 0.0));
    }

    #[test]
    fn empty_system_shows_star_alone() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 1).unwrap();
        assert!(focus.apply_fetch(&mut ctx, completion(focus.generation(), Ok(Vec::new()))));
        assert_eq!(focus.focused().unwrap().fetch, FetchStatus::Loaded(0));
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 0);
        assert_eq!(visible_top_level(&ctx), 1);
    }

    #[test]
    fn click_while_focused_returns_to_overview() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 2).unwrap();
        let generation = focus.generation();
        focus.apply_fetch(&mut ctx, completion(generation, Ok(planets(3))));

        focus.handle_click(&mut ctx, Vec2::new(5.0, 5.0));
        assert_eq!(focus.state(), &FocusState::Overview);
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 0);
        assert_eq!(ctx.scene.group_len(SceneGroup::Focus), 0);
        assert!(ctx.scene.is_group_visible(SceneGroup::Stars));
        assert!(ctx.scene.is_group_visible(SceneGroup::Starfield));
        assert_eq!(ctx.camera.pose(), ctx.overview_pose());
        assert_eq!(ctx.camera.bounds(), ZoomBounds::new(10.0, 80_000.0));
        assert!(!ctx.scene.environment.focus_light);
        assert_eq!(ctx.scene.environment.fog_density, 0.000_15);
        assert_eq!(ctx.signals.last(), Some(&ViewSignal::Overview));
    }

    #[test]
    fn returning_with_fetch_outstanding_signals_idle() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 0).unwrap();
        ctx.signals.clear();
        focus.return_to_overview(&mut ctx);
        assert_eq!(ctx.signals, vec![ViewSignal::FetchIdle, ViewSignal::Overview]);
    }

    #[test]
    fn return_in_overview_is_noop() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        assert_eq!(focus.return_to_overview(&mut ctx), DisposalReport::default());
        assert!(ctx.signals.is_empty());
    }

    #[test]
    fn no_direct_focus_to_focus() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 0).unwrap();
        assert_eq!(focus.select(&mut ctx, 1), Err(SelectError::AlreadyFocused));
        assert_eq!(focus.focused().unwrap().star_index, 0);
        assert_eq!(ctx.fetch_requests.len(), 1);
    }

    #[test]
    fn invalid_selection_allocates_nothing() {
        let mut stars = catalog();
        stars.push(Star { id: None, ..Star::new(0, "Anon").with_sky(10.0, 10.0) });
        stars.push(Star::new(105, "Lost"));
        let mut ctx = mounted(stars);
        let before = ctx.scene.counts();
        let mut focus = FocusController::new();

        assert_eq!(focus.select(&mut ctx, 99), Err(SelectError::OutOfRange(99)));
        assert_eq!(focus.select(&mut ctx, 3), Err(SelectError::MissingIdentity(3)));
        assert_eq!(focus.select(&mut ctx, 4), Err(SelectError::Unplaced(4)));
        assert_eq!(ctx.scene.counts(), before);
        assert!(ctx.fetch_requests.is_empty());
        assert!(ctx.signals.is_empty());
        assert!(!focus.is_focused());
    }

    #[test]
    fn no_leaks_over_many_cycles() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        let before = ctx.scene.counts();
        for cycle in 0..25 {
            focus.select(&mut ctx, cycle % 3).unwrap();
            if cycle % 2 == 0 {
                let generation = focus.generation();
                focus.apply_fetch(&mut ctx, completion(generation, Ok(planets(cycle % 6))));
            }
            let report = focus.return_to_overview(&mut ctx);
            assert_eq!(report.failures, 0);
            assert_eq!(ctx.scene.counts(), before, "cycle {}", cycle);
        }
    }

    #[test]
    fn stale_completion_never_reaches_next_star() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 0).unwrap();
        let gen_a = focus.generation();
        focus.return_to_overview(&mut ctx);
        focus.select(&mut ctx, 1).unwrap();
        let gen_b = focus.generation();
        ctx.signals.clear();

        assert!(!focus.apply_fetch(&mut ctx, completion(gen_a, Ok(planets(4)))));
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 0);
        assert!(ctx.signals.is_empty());

        assert!(focus.apply_fetch(&mut ctx, completion(gen_b, Ok(planets(2)))));
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 2);
        // a duplicate of an applied result is also dropped
        assert!(!focus.apply_fetch(&mut ctx, completion(gen_b, Ok(planets(2)))));
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 2);
    }

    #[test]
    fn completion_arriving_in_overview_is_dropped() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.select(&mut ctx, 0).unwrap();
        let generation = focus.generation();
        focus.return_to_overview(&mut ctx);
        let before = ctx.scene.counts();
        assert!(!focus.apply_fetch(&mut ctx, completion(generation, Ok(planets(3)))));
        assert_eq!(ctx.scene.counts(), before);
    }

    #[test]
    fn click_on_star_marker_selects_it() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        let at = screen_of(&ctx, 2);
        focus.handle_click(&mut ctx, at);
        assert_eq!(focus.focused().unwrap().star_index, 2);
    }

    #[test]
    fn click_on_empty_sky_is_noop() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        focus.handle_click(&mut ctx, Vec2::new(3.0, 597.0));
        assert!(!focus.is_focused());
        assert!(ctx.fetch_requests.is_empty());
    }

    #[test]
    fn hover_toggles_star_label() {
        let mut ctx = mounted(catalog());
        let mut focus = FocusController::new();
        let at = screen_of(&ctx, 1);
        focus.handle_hover(&mut ctx, at);
        let id = focus.hovered().unwrap();
        let handle = ctx.scene.get(id).unwrap().label.unwrap();
        assert!(ctx.scene.label(handle).unwrap().visible);

        focus.handle_hover(&mut ctx, Vec2::new(3.0, 597.0));
        assert_eq!(focus.hovered(), None);
        assert!(!ctx.scene.label(handle).unwrap().visible);
    }

    #[test]
    fn end_to_end_focus_scenario() {
        let stars = vec![
            Star::new(1, "Sol-like").with_sky(0.0, 0.0).with_distance(10.0).with_radius(1.0),
            Star::new(2, "Unknown size").with_sky(90.0, 0.0).with_distance(10.0),
            Star::new(3, "Giant").with_sky(180.0, 0.0).with_distance(10.0).with_radius(20.0),
        ];
        let source = CatalogSource::new()
            .with_planets(2, planets(5))
            .with_failure(3, FetchError::Network("offline".into()));
        let inbox = FetchInbox::new();
        let mut ctx = mounted(stars);
        assert_eq!(ctx.scene.group_len(SceneGroup::Stars), 3);
        let mut focus = FocusController::new();

        // null radius focuses with the floor size
        let at = screen_of(&ctx, 1);
        focus.handle_click(&mut ctx, at);
        let state = focus.focused().unwrap();
        assert_eq!(state.display_radius, 8.0);

        for ticket in ctx.fetch_requests.drain(..) {
            block_on(run_fetch(&source, ticket, inbox.clone()));
        }
        while let Some(done) = inbox.pop() {
            focus.apply_fetch(&mut ctx, done);
        }
        let placed = ctx.scene.objects(SceneGroup::Planets);
        assert_eq!(placed.len(), 5);
        for (i, planet) in placed.iter().enumerate() {
            let angle = planet.position.z.atan2(planet.position.x).rem_euclid(TAU);
            let expected = i as f32 / 5.0 * TAU;
            let diff = (angle - expected).abs();
            assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "planet {} at {}", i, angle);
        }

        // failed fetch leaves the star alone
        focus.handle_click(&mut ctx, Vec2::ZERO);
        let at = screen_of(&ctx, 2);
        focus.handle_click(&mut ctx, at);
        assert_eq!(focus.focused().unwrap().star_index, 2);
        for ticket in ctx.fetch_requests.drain(..) {
            block_on(run_fetch(&source, ticket, inbox.clone()));
        }
        while let Some(done) = inbox.pop() {
            focus.apply_fetch(&mut ctx, done);
        }
        assert_eq!(focus.focused().unwrap().fetch, FetchStatus::Failed);
        assert_eq!(visible_top_level(&ctx), 1);
        assert_eq!(ctx.scene.group_len(SceneGroup::Planets), 0);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Select(usize),
        Return,
        /// Deliver the pending result at this position (modulo queue length).
        Deliver(usize),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0usize..3).prop_map(Step::Select),
            Just(Step::Return),
            (0usize..8).prop_map(Step::Deliver),
        ]
    }

    proptest! {
        /// Star i always has i + 2 planets; whatever the order of results,
        /// the planet group only ever holds the focused star's system.
        #[test]
        fn planets_always_belong_to_focused_star(steps in prop::collection::vec(step(), 1..40)) {
            let mut source = CatalogSource::new();
            for (i, star) in catalog().iter().enumerate() {
                source = source.with_planets(star.id.unwrap(), planets(i + 2));
            }
            let inbox = FetchInbox::new();
            let mut pending: Vec<FetchCompletion> = Vec::new();
            let mut ctx = mounted(catalog());
            let baseline = ctx.scene.counts();
            let mut focus = FocusController::new();

            for step in steps {
                match step {
                    Step::Select(i) => {
                        let _ = focus.select(&mut ctx, i);
                        for ticket in ctx.fetch_requests.drain(..) {
                            block_on(run_fetch(&source, ticket, inbox.clone()));
                        }
                        while let Some(done) = inbox.pop() {
                            pending.push(done);
                        }
                    }
                    Step::Return => {
                        focus.return_to_overview(&mut ctx);
                    }
                    Step::Deliver(k) => {
                        if !pending.is_empty() {
                            let done = pending.remove(k % pending.len());
                            focus.apply_fetch(&mut ctx, done);
                        }
                    }
                }

                let planets_now = ctx.scene.group_len(SceneGroup::Planets);
                match focus.focused() {
                    None => {
                        prop_assert_eq!(planets_now, 0);
                        prop_assert_eq!(ctx.scene.counts(), baseline);
                    }
                    Some(f) => match f.fetch {
                        FetchStatus::Loaded(n) => {
                            prop_assert_eq!(n, f.star_index + 2);
                            prop_assert_eq!(planets_now, n);
                        }
                        _ => prop_assert_eq!(planets_now, 0),
                    },
                }
            }
        }
    }
}
