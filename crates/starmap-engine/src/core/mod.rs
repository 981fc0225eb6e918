pub mod projection;
pub mod resources;
pub mod rng;
pub mod scene;
pub mod time;
