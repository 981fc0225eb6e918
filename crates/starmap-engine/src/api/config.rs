use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::extensions::easing::Easing;
use crate::input::gesture::GestureConfig;

/// How a focused system is composed around its star.
/// All distances scale with the focused star's rendered radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Focused marker radius = overview marker radius × this.
    pub focus_scale: f32,
    /// Glow shell radius relative to the focused marker.
    pub glow_scale: f32,
    pub glow_opacity: f32,
    /// Camera distance = focused radius × this.
    pub camera_factor: f32,
    /// Camera height as a fraction of its distance.
    pub camera_lift: f32,
    /// Zoom bounds while focused: [radius × min, camera distance × max].
    pub focus_min_zoom_factor: f32,
    pub focus_max_zoom_factor: f32,
    /// Innermost orbit = focused radius × this.
    pub planet_base_factor: f32,
    /// Full height of the random vertical planet jitter; 0 disables it.
    pub planet_jitter: f32,
    /// Orbit ring thickness on each side of the orbit radius.
    pub orbit_ring_half_width: f32,
    /// Label heights above their markers, in marker radii.
    pub focus_label_lift: f32,
    pub planet_label_lift: f32,
    /// Fog density shown in the overview.
    pub overview_fog_density: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            focus_scale: 8.0,
            glow_scale: 1.3,
            glow_opacity: 0.3,
            camera_factor: 30.0,
            camera_lift: 0.3,
            focus_min_zoom_factor: 2.0,
            focus_max_zoom_factor: 3.0,
            planet_base_factor: 3.0,
            planet_jitter: 20.0,
            orbit_ring_half_width: 1.0,
            focus_label_lift: 1.5,
            planet_label_lift: 1.5,
            overview_fog_density: 0.000_15,
        }
    }
}

/// Perspective camera and orbit controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub overview_position: Vec3,
    pub overview_target: Vec3,
    pub overview_min_distance: f32,
    pub overview_max_distance: f32,
    /// Fraction of the pending orbit applied per step (0 = undamped).
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Fly-to duration between canonical poses; 0 snaps.
    pub transition_secs: f32,
    pub transition_easing: Easing,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 200_000.0,
            overview_position: Vec3::new(0.0, 200.0, 1200.0),
            overview_target: Vec3::ZERO,
            overview_min_distance: 10.0,
            overview_max_distance: 80_000.0,
            damping: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            transition_secs: 0.0,
            transition_easing: Easing::CubicInOut,
        }
    }
}

/// Background point field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Edge length of the cube the points are scattered in.
    pub extent: f32,
    pub point_size: f32,
    pub opacity: f32,
    /// Azimuthal drift, radians per second.
    pub drift: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            extent: 100_000.0,
            point_size: 10.0,
            opacity: 0.8,
            drift: 0.003,
        }
    }
}

/// Idle rotations, radians per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub planet_spin: f32,
    pub focused_star_spin: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            planet_spin: 0.6,
            focused_star_spin: 0.12,
        }
    }
}

/// Configuration for the view, provided by the host.
/// Every field has a default; a JSON override may name any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub gesture: GestureConfig,
    pub layout: LayoutConfig,
    pub camera: CameraConfig,
    pub starfield: StarfieldConfig,
    pub animation: AnimationConfig,
    /// Seed for the starfield scatter and planet jitter.
    pub seed: u64,
    /// Fixed animation step in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum mesh instances per frame.
    pub max_instances: usize,
    /// Maximum labels per frame.
    pub max_labels: usize,
    /// Initial viewport size in CSS pixels.
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            layout: LayoutConfig::default(),
            camera: CameraConfig::default(),
            starfield: StarfieldConfig::default(),
            animation: AnimationConfig::default(),
            seed: 42,
            fixed_dt: 1.0 / 60.0,
            max_instances: 4096,
            max_labels: 512,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

impl ViewConfig {
    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let cfg = ViewConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ViewConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{
            "seed": 7,
            "gesture": { "click_max_distance_px": 8.0 },
            "camera": { "overview_position": [0.0, 100.0, 600.0] }
        }"#;
        let cfg = ViewConfig::from_json(json).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.gesture.click_max_distance_px, 8.0);
        assert_eq!(cfg.gesture.click_max_duration_ms, 250.0);
        assert_eq!(cfg.camera.overview_position, Vec3::new(0.0, 100.0, 600.0));
        assert_eq!(cfg.camera.fov_y_deg, 75.0);
        assert_eq!(cfg.layout, LayoutConfig::default());
    }

    #[test]
    fn transition_easing_by_name() {
        let cfg = ViewConfig::from_json(r#"{ "camera": { "transition_easing": "sine_in_out" } }"#).unwrap();
        assert_eq!(cfg.camera.transition_easing, Easing::SineInOut);
        assert_eq!(ViewConfig::default().camera.transition_easing, Easing::CubicInOut);
        assert!(ViewConfig::from_json(r#"{ "camera": { "transition_easing": "bounce" } }"#).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ViewConfig::from_json(r#"{ "seed": "many" }"#).is_err());
    }
}
