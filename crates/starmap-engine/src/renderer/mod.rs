pub mod camera;
pub mod instance;
pub mod labels;

// Re-export key types for convenient access
pub use camera::{CameraPose, OrbitCamera, ZoomBounds};
pub use instance::{InstanceBuffer, MeshInstance};
pub use labels::{Label, LabelBuffer, LabelInstance, LabelStyle};
