use thiserror::Error;

/// Failure reported by a [`PlanetSource`](crate::api::fetch::PlanetSource).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("no planets found for star {0}")]
    NotFound(String),
    #[error("malformed planet payload: {0}")]
    Decode(String),
}

/// Why a star selection was rejected before any resource was allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    #[error("star index {0} is out of range")]
    OutOfRange(usize),
    #[error("star at index {0} has no identifier")]
    MissingIdentity(usize),
    #[error("star at index {0} has no sky position")]
    Unplaced(usize),
    #[error("a star is already focused; return to the overview first")]
    AlreadyFocused,
}

/// Resource pool misuse. Always a programming error inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("stale {kind} handle (slot {index}, generation {generation})")]
    StaleHandle {
        kind: &'static str,
        index: u32,
        generation: u32,
    },
}
