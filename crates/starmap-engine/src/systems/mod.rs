pub mod animation;
pub mod focus;
pub mod render;
