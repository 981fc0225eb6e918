pub mod group;
pub mod mesh;
pub mod object;
pub mod record;
