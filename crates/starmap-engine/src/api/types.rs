use bytemuck::{Pod, Zeroable};

/// Unique identifier for an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);

/// Identifier of a catalog star, as assigned by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StarId(pub u64);

/// Signals the view emits for its host (loading spinner, fullscreen shell).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewSignal {
    /// A planet request for `star` is outstanding.
    FetchStarted { star: StarId },
    /// No planet request is outstanding any more.
    FetchIdle,
    /// The user asked to leave fullscreen.
    ExitRequested,
    /// The view entered the focused state on the given catalog index.
    Focused { star_index: usize },
    /// The view returned to the overview.
    Overview,
}

impl ViewSignal {
    pub const KIND_FETCH_STARTED: f32 = 1.0;
    pub const KIND_FETCH_IDLE: f32 = 2.0;
    pub const KIND_EXIT_REQUESTED: f32 = 3.0;
    pub const KIND_FOCUSED: f32 = 4.0;
    pub const KIND_OVERVIEW: f32 = 5.0;

    /// Flatten into the wire event read by the host.
    /// Star ids are split into two f32-exact 24-bit halves.
    pub fn to_host_event(self) -> HostEvent {
        match self {
            ViewSignal::FetchStarted { star } => HostEvent {
                kind: Self::KIND_FETCH_STARTED,
                a: (star.0 & 0xFF_FFFF) as f32,
                b: ((star.0 >> 24) & 0xFF_FFFF) as f32,
                c: 0.0,
            },
            ViewSignal::FetchIdle => HostEvent::of_kind(Self::KIND_FETCH_IDLE),
            ViewSignal::ExitRequested => HostEvent::of_kind(Self::KIND_EXIT_REQUESTED),
            ViewSignal::Focused { star_index } => HostEvent {
                kind: Self::KIND_FOCUSED,
                a: star_index as f32,
                b: 0.0,
                c: 0.0,
            },
            ViewSignal::Overview => HostEvent::of_kind(Self::KIND_OVERVIEW),
        }
    }
}

/// An event communicated from Rust to the host page via shared memory.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct HostEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl HostEvent {
    pub const FLOATS: usize = 4;

    fn of_kind(kind: f32) -> Self {
        Self { kind, ..Default::default() }
    }
}
