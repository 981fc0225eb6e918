pub mod gesture;
pub mod picking;
pub mod queue;
