pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::config::{AnimationConfig, CameraConfig, LayoutConfig, StarfieldConfig, ViewConfig};
pub use api::fetch::{run_fetch, CatalogSource, FetchCompletion, FetchInbox, FetchTicket, PlanetSource};
pub use api::types::{HostEvent, ObjectId, StarId, ViewSignal};
pub use api::view::{MountOptions, StarMap, ViewContext};
pub use components::group::SceneGroup;
pub use components::mesh::{BlendMode, Color, GeometryDesc, MaterialDesc};
pub use components::object::{ObjectDesc, ObjectSource, SceneObject};
pub use components::record::{planets_from_json, stars_from_json, Planet, Star};
pub use core::projection::{marker_size, planet_marker_size, project_planet, project_star, PlanetPlacement};
pub use core::resources::ResourceCounts;
pub use core::scene::{DisposalReport, Environment, Scene};
pub use core::time::FrameClock;
pub use error::{FetchError, ResourceError, SelectError};
pub use input::gesture::{GestureClassifier, GestureConfig, GestureKind};
pub use input::picking::{pick_star, Ray, StarHit};
pub use input::queue::{InputEvent, InputQueue, KEY_ESCAPE};
pub use renderer::camera::{CameraPose, OrbitCamera, ZoomBounds};
pub use renderer::instance::{InstanceBuffer, MeshInstance};
pub use renderer::labels::{LabelBuffer, LabelInstance, LabelStyle};
pub use bridge::protocol::{FrameHeader, ProtocolLayout};
pub use systems::focus::{FetchStatus, FocusContext, FocusController, FocusState};
