// extensions/mod.rs
//
// Helpers that sit outside the scene model.

pub mod easing;

pub use easing::{Easing, lerp_vec3};
