use glam::{Vec2, Vec3};
use crate::api::config::ViewConfig;
use crate::api::fetch::{FetchInbox, FetchTicket};
use crate::api::types::{HostEvent, ObjectId, ViewSignal};
use crate::bridge::protocol::{self, FrameHeader, ProtocolLayout};
use crate::components::group::SceneGroup;
use crate::components::mesh::{BlendMode, Color, GeometryDesc, MaterialDesc};
use crate::components::object::ObjectDesc;
use crate::components::record::Star;
use crate::core::resources::ResourceCounts;
use crate::core::rng::Rng;
use crate::core::scene::{DisposalReport, Scene};
use crate::core::time::FrameClock;
use crate::error::SelectError;
use crate::input::gesture::{GestureClassifier, GestureKind};
use crate::input::queue::{InputEvent, InputQueue, KEY_ESCAPE};
use crate::renderer::camera::{CameraPose, OrbitCamera, ZoomBounds};
use crate::renderer::instance::InstanceBuffer;
use crate::renderer::labels::LabelBuffer;
use crate::systems::animation::tick_animations;
use crate::systems::focus::{FocusController, FocusState};
use crate::systems::render::{build_instance_buffer, build_label_buffer, BlendSplit};

/// Instance slots kept free above the overview markers for the focused
/// star, its glow and planet markers with their orbit rings.
pub const FOCUS_INSTANCE_MARGIN: usize = 256;

/// What the host hands over when the view is shown.
#[derive(Debug, Clone, Default)]
pub struct MountOptions {
    pub stars: Vec<Star>,
    /// Escape asks the host to leave fullscreen.
    pub fullscreen: bool,
}

/// Mutable view state shared by the focus, input and render systems.
pub struct ViewContext {
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub config: ViewConfig,
    /// Mounted stars; `ObjectSource::Star` indexes into this.
    pub catalog: Vec<Star>,
    pub rng: Rng,
    /// Signals raised since they were last published.
    pub signals: Vec<ViewSignal>,
    /// Planet requests the host has not picked up yet.
    pub fetch_requests: Vec<FetchTicket>,
    pub fullscreen: bool,
}

impl ViewContext {
    pub fn new(config: ViewConfig) -> Self {
        let mut scene = Scene::new();
        scene.environment.fog_density = config.layout.overview_fog_density;
        Self {
            camera: OrbitCamera::new(&config.camera, config.viewport_width, config.viewport_height),
            rng: Rng::new(config.seed),
            scene,
            config,
            catalog: Vec::new(),
            signals: Vec::new(),
            fetch_requests: Vec::new(),
            fullscreen: false,
        }
    }

    pub fn emit(&mut self, signal: ViewSignal) {
        self.signals.push(signal);
    }

    pub fn overview_pose(&self) -> CameraPose {
        CameraPose::new(self.config.camera.overview_position, self.config.camera.overview_target)
    }

    pub fn overview_bounds(&self) -> ZoomBounds {
        ZoomBounds::new(
            self.config.camera.overview_min_distance,
            self.config.camera.overview_max_distance,
        )
    }

    /// Replace the catalog and rebuild the star markers.
    /// Returns how many stars could be placed.
    pub fn load_catalog(&mut self, stars: Vec<Star>) -> usize {
        self.scene.clear_group(SceneGroup::Stars);
        self.catalog = stars;
        let mut placed = 0;
        for index in 0..self.catalog.len() {
            if self.scene.add_star_marker(index, &self.catalog[index]).is_some() {
                placed += 1;
            }
        }
        let skipped = self.catalog.len() - placed;
        if skipped > 0 {
            log::debug!("{} stars without a sky position were not placed", skipped);
        }
        placed
    }

    /// Scatter the background points uniformly through a cube.
    pub fn build_starfield(&mut self) -> Option<ObjectId> {
        let cfg = &self.config.starfield;
        if cfg.count == 0 {
            return None;
        }
        let rng = &mut self.rng;
        let positions: Vec<Vec3> = (0..cfg.count)
            .map(|_| {
                Vec3::new(
                    rng.next_centered() * cfg.extent,
                    rng.next_centered() * cfg.extent,
                    rng.next_centered() * cfg.extent,
                )
            })
            .collect();
        let desc = ObjectDesc::new(
            GeometryDesc::Points { positions },
            MaterialDesc::new(Color::WHITE)
                .with_opacity(cfg.opacity, BlendMode::Alpha)
                .with_point_size(cfg.point_size),
        )
        .with_tag("starfield")
        .with_spin(cfg.drift);
        self.scene.clear_group(SceneGroup::Starfield);
        Some(self.scene.add(SceneGroup::Starfield, desc))
    }
}

/// The star map view: owns the scene, the camera and the per-frame buffers.
///
/// The host pushes input, calls [`tick`](Self::tick) once per display
/// refresh, reads the buffers and runs every ticket returned by
/// [`take_fetch_requests`](Self::take_fetch_requests) against its planet
/// source, posting results into [`inbox`](Self::inbox).
pub struct StarMap {
    ctx: ViewContext,
    focus: FocusController,
    gestures: GestureClassifier,
    input: InputQueue,
    pending_input: Vec<InputEvent>,
    inbox: FetchInbox,
    clock: FrameClock,
    layout: ProtocolLayout,
    instances: InstanceBuffer,
    labels: LabelBuffer,
    header: FrameHeader,
    split: BlendSplit,
    frame_signals: Vec<ViewSignal>,
    host_events: Vec<HostEvent>,
    starfield_points: Vec<f32>,
    /// Set once a full instance buffer has been reported for this mount.
    overflow_reported: bool,
    mounted: bool,
}

impl StarMap {
    pub fn new(config: ViewConfig) -> Self {
        let layout = ProtocolLayout::from_config(&config);
        Self {
            focus: FocusController::new(),
            gestures: GestureClassifier::new(config.gesture.clone()),
            input: InputQueue::new(),
            pending_input: Vec::with_capacity(32),
            inbox: FetchInbox::new(),
            clock: FrameClock::new(config.fixed_dt),
            instances: InstanceBuffer::with_capacity(config.max_instances),
            labels: LabelBuffer::with_capacity(config.max_labels),
            header: FrameHeader::new(&layout),
            split: BlendSplit::default(),
            frame_signals: Vec::new(),
            host_events: Vec::with_capacity(layout.max_events),
            starfield_points: Vec::new(),
            layout,
            ctx: ViewContext::new(config),
            overflow_reported: false,
            mounted: false,
        }
    }

    /// Show the view with a star catalog. Remounting first tears down the
    /// previous mount. Returns the number of stars placed.
    pub fn mount(&mut self, options: MountOptions) -> usize {
        if self.mounted {
            self.unmount();
        }
        let total = options.stars.len();
        self.ctx.fullscreen = options.fullscreen;
        self.starfield_points.clear();
        self.overflow_reported = false;
        let starfield = self.ctx.build_starfield();
        if let Some(id) = starfield {
            let geometry = self.ctx.scene.get(id).and_then(|o| self.ctx.scene.geometry(o.geometry));
            if let Some(GeometryDesc::Points { positions }) = geometry {
                self.starfield_points
                    .extend_from_slice(bytemuck::cast_slice::<Vec3, f32>(positions));
            }
        }
        let placed = self.ctx.load_catalog(options.stars);
        self.reserve_instances(placed + usize::from(starfield.is_some()));
        self.mounted = true;
        log::info!(
            "star map mounted: {} of {} stars placed{}",
            placed,
            total,
            if options.fullscreen { " (fullscreen)" } else { "" }
        );
        placed
    }

    /// Grow the instance buffer so `markers` overview instances plus the
    /// focus margin fit. The shared layout and header follow the new size.
    fn reserve_instances(&mut self, markers: usize) {
        let needed = markers + FOCUS_INSTANCE_MARGIN;
        if needed <= self.layout.max_instances {
            return;
        }
        self.instances.grow_to(needed);
        self.layout = ProtocolLayout::new(
            needed,
            self.layout.max_labels,
            self.layout.max_events,
            self.layout.starfield_points,
        );
        self.header = FrameHeader::new(&self.layout);
        log::info!("instance buffer grown to {} for {} markers", needed, markers);
    }

    /// Tear everything down. The returned report accounts for every
    /// released resource; the scene is empty afterwards.
    pub fn unmount(&mut self) -> DisposalReport {
        let mut report = self.focus.return_to_overview(&mut self.ctx);
        report += self.ctx.scene.dispose_all();
        self.ctx.catalog.clear();
        self.ctx.fetch_requests.clear();
        self.ctx.camera.set_pose(self.ctx.overview_pose());
        self.ctx.camera.set_bounds(self.ctx.overview_bounds());
        self.gestures.cancel();
        self.input = InputQueue::new();
        self.starfield_points.clear();
        self.instances.clear();
        self.labels.clear();
        self.publish_signals();
        self.mounted = false;
        log::info!("star map unmounted ({} objects disposed)", report.objects);
        report
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Queue an input event for the next tick. Ignored while unmounted.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.mounted {
            self.input.push(event);
        }
    }

    /// One display refresh: apply finished fetches, handle input, advance
    /// camera and idle animation, then rebuild the frame buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.mounted {
            return;
        }

        // completions land before anything is drawn
        while let Some(done) = self.inbox.pop() {
            self.focus.apply_fetch(&mut self.ctx, done);
        }

        let mut events = std::mem::take(&mut self.pending_input);
        self.input.drain_into(&mut events);
        for event in events.drain(..) {
            self.handle_input(event);
        }
        self.pending_input = events;

        let steps = self.clock.advance(dt);
        let step = self.clock.step();
        for _ in 0..steps {
            self.ctx.camera.update(step);
            tick_animations(&mut self.ctx.scene, step);
        }

        self.split = build_instance_buffer(&self.ctx.scene, &mut self.instances);
        if self.instances.dropped() > 0 && !self.overflow_reported {
            self.overflow_reported = true;
            log::warn!(
                "instance buffer full: {} instances not drawn (capacity {})",
                self.instances.dropped(),
                self.instances.capacity()
            );
        }
        build_label_buffer(&self.ctx.scene, &self.ctx.camera, &mut self.labels);
        self.publish_signals();
        self.write_header();
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y, time_ms } => {
                self.gestures.pointer_down(Vec2::new(x, y), time_ms);
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                match self.gestures.pointer_move(pos) {
                    Some(delta) => self.ctx.camera.orbit(delta.x, delta.y),
                    None => self.focus.handle_hover(&mut self.ctx, pos),
                }
            }
            InputEvent::PointerUp { x, y, time_ms } => {
                let Some(gesture) = self.gestures.pointer_up(Vec2::new(x, y), time_ms) else {
                    return;
                };
                match gesture.kind {
                    GestureKind::Click => self.focus.handle_click(&mut self.ctx, gesture.end),
                    GestureKind::Drag => log::debug!(
                        "drag of {:.1}px over {:.0}ms, not a selection",
                        gesture.distance,
                        gesture.duration_ms
                    ),
                }
            }
            InputEvent::Wheel { delta_y } => self.ctx.camera.zoom(delta_y),
            InputEvent::KeyDown { key_code } => {
                if key_code == KEY_ESCAPE && self.ctx.fullscreen {
                    self.ctx.emit(ViewSignal::ExitRequested);
                }
            }
            InputEvent::Resize { width, height } => self.ctx.camera.resize(width, height),
        }
    }

    fn publish_signals(&mut self) {
        self.frame_signals.clear();
        self.frame_signals.append(&mut self.ctx.signals);
        self.host_events.clear();
        let max_events = self.layout.max_events;
        self.host_events.extend(
            self.frame_signals
                .iter()
                .take(max_events)
                .map(|s| s.to_host_event()),
        );
    }

    fn write_header(&mut self) {
        let camera = &self.ctx.camera;
        let env = self.ctx.scene.environment;
        let h = &mut self.header;
        h.set(protocol::HEADER_FRAME_COUNTER, self.clock.frame() as f32);
        h.set(protocol::HEADER_INSTANCE_COUNT, self.instances.instance_count() as f32);
        h.set(protocol::HEADER_TRANSLUCENT_START, self.split.translucent_start as f32);
        h.set(protocol::HEADER_ADDITIVE_START, self.split.additive_start as f32);
        h.set(protocol::HEADER_LABEL_COUNT, self.labels.len() as f32);
        h.set(protocol::HEADER_EVENT_COUNT, self.host_events.len() as f32);
        h.set(protocol::HEADER_VIEWPORT_WIDTH, camera.viewport().x);
        h.set(protocol::HEADER_VIEWPORT_HEIGHT, camera.viewport().y);
        h.set(protocol::HEADER_FOG_DENSITY, env.fog_density);
        h.set(protocol::HEADER_FOCUS_LIGHT, if env.focus_light { 1.0 } else { 0.0 });
        h.set(protocol::HEADER_FOCUSED, if self.focus.is_focused() { 1.0 } else { 0.0 });
        h.set(protocol::HEADER_STARFIELD_POINTS, (self.starfield_points.len() / 3) as f32);
        h.set_view_projection(&camera.view_projection());
    }

    // -- Programmatic control --

    /// Focus a catalog star directly, as a click on it would.
    pub fn select(&mut self, star_index: usize) -> Result<(), SelectError> {
        self.focus.select(&mut self.ctx, star_index)
    }

    pub fn return_to_overview(&mut self) -> DisposalReport {
        self.focus.return_to_overview(&mut self.ctx)
    }

    /// Planet requests issued since the last call. The host runs each one.
    pub fn take_fetch_requests(&mut self) -> Vec<FetchTicket> {
        std::mem::take(&mut self.ctx.fetch_requests)
    }

    /// Where fetch results are posted. Clones share one queue.
    pub fn inbox(&self) -> FetchInbox {
        self.inbox.clone()
    }

    // -- Queries --

    pub fn state(&self) -> &FocusState {
        self.focus.state()
    }

    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    pub fn scene(&self) -> &Scene {
        &self.ctx.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.ctx.camera
    }

    pub fn config(&self) -> &ViewConfig {
        &self.ctx.config
    }

    pub fn catalog(&self) -> &[Star] {
        &self.ctx.catalog
    }

    pub fn counts(&self) -> ResourceCounts {
        self.ctx.scene.counts()
    }

    /// Signals published by the last tick.
    pub fn signals(&self) -> &[ViewSignal] {
        &self.frame_signals
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn label_text(&self, slot: u32) -> Option<&str> {
        self.ctx.scene.label_text(slot)
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    /// Instances the last tick could not fit in the buffer.
    pub fn dropped_instances(&self) -> usize {
        self.instances.dropped()
    }

    pub fn labels(&self) -> &LabelBuffer {
        &self.labels
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn host_events(&self) -> &[HostEvent] {
        &self.host_events
    }

    /// Background points, xyz per point. Static between mounts.
    pub fn starfield_points(&self) -> &[f32] {
        &self.starfield_points
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.header_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.instances_ptr()
    }

    pub fn labels_ptr(&self) -> *const f32 {
        self.labels.labels_ptr()
    }

    pub fn host_events_ptr(&self) -> *const f32 {
        self.host_events.as_ptr() as *const f32
    }

    pub fn starfield_ptr(&self) -> *const f32 {
        self.starfield_points.as_ptr()
    }
}
