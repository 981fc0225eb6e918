//! Astronomical coordinates → scene space.
//!
//! Everything here is pure: the same inputs always land on the same position,
//! which keeps re-renders stable. Distances are log-compressed so that catalog
//! distances spanning several orders of magnitude stay on screen together.

use std::f64::consts::TAU;
use glam::Vec3;

/// World units per log-parsec of system distance.
pub const DISTANCE_SCALE: f64 = 200.0;
/// Log-distance used when a star has no usable distance.
pub const NOMINAL_LOG_DISTANCE: f64 = 10.0;

/// Smallest star marker radius.
pub const MARKER_FLOOR: f32 = 1.0;

/// World units per log-AU of planet semi-major axis.
pub const PLANET_LOG_SCALE: f64 = 20.0;
/// Orbit spacing used when a planet has no semi-major axis.
pub const PLANET_INDEX_STEP: f64 = 30.0;
/// Planet marker radius per log of planet radius.
pub const PLANET_SIZE_SCALE: f64 = 3.0;
/// Smallest planet marker radius (also used when the radius is unknown).
pub const PLANET_SIZE_FLOOR: f32 = 2.0;

/// Where a planet sits around its focused star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetPlacement {
    pub position: Vec3,
    pub orbit_radius: f32,
    /// Angle around the star in radians, in [0, 2π).
    pub angle: f32,
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Radius of a star's position shell: log-compressed distance, or the nominal shell.
pub fn star_shell_radius(distance_pc: Option<f64>) -> f64 {
    let log_distance = usable(distance_pc)
        .map(|d| (d + 1.0).ln())
        .unwrap_or(NOMINAL_LOG_DISTANCE);
    log_distance * DISTANCE_SCALE
}

/// Map (ra°, dec°, distance pc) to a scene position. Y is the celestial pole.
pub fn project_star(ra_deg: f64, dec_deg: f64, distance_pc: Option<f64>) -> Vec3 {
    let ra = ra_deg.to_radians();
    let dec = dec_deg.to_radians();
    let r = star_shell_radius(distance_pc);
    Vec3::new(
        (r * dec.cos() * ra.cos()) as f32,
        (r * dec.sin()) as f32,
        (r * dec.cos() * ra.sin()) as f32,
    )
}

/// Star marker radius: `max(ln(r + 1), 1)`; unknown or invalid radii get the floor.
pub fn marker_size(radius: Option<f64>) -> f32 {
    match radius.filter(|r| r.is_finite() && *r >= 0.0) {
        Some(r) => ((r + 1.0).ln() as f32).max(MARKER_FLOOR),
        None => MARKER_FLOOR,
    }
}

/// Planet marker radius: `max(ln(r + 1) * 3, 2)`.
pub fn planet_marker_size(radius: Option<f64>) -> f32 {
    match usable(radius) {
        Some(r) => (((r + 1.0).ln() * PLANET_SIZE_SCALE) as f32).max(PLANET_SIZE_FLOOR),
        None => PLANET_SIZE_FLOOR,
    }
}

/// Orbit distance of a planet from its star.
///
/// Two paths: log of the semi-major axis when known, otherwise a fixed step
/// per index. They are not continuous with each other.
pub fn planet_orbit_radius(index: usize, semi_major_axis: Option<f64>, base_distance: f32) -> f32 {
    let base = base_distance as f64;
    let distance = match usable(semi_major_axis) {
        Some(a) => base + (a + 1.0).ln() * PLANET_LOG_SCALE,
        None => base + (index as f64 + 1.0) * PLANET_INDEX_STEP,
    };
    distance as f32
}

/// Place planet `index` of `count` evenly around the star, lifted by `lift` on Y.
pub fn project_planet(
    index: usize,
    count: usize,
    semi_major_axis: Option<f64>,
    base_distance: f32,
    lift: f32,
) -> PlanetPlacement {
    let angle = if count == 0 {
        0.0
    } else {
        index as f64 / count as f64 * TAU
    };
    let orbit_radius = planet_orbit_radius(index, semi_major_axis, base_distance);
    let r = orbit_radius as f64;
    PlanetPlacement {
        position: Vec3::new((r * angle.cos()) as f32, lift, (r * angle.sin()) as f32),
        orbit_radius,
        angle: angle as f32,
    }
}
