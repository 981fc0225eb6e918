//! Click-versus-drag classification for pointer gestures.
//!
//! A press that stays put and releases quickly is a click and may select;
//! anything else was the user orbiting the camera and must not select.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Thresholds separating clicks from drags. Both bounds are exclusive:
/// a gesture exactly at either threshold is a drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum pointer travel for a click, in CSS pixels.
    pub click_max_distance_px: f32,
    /// Maximum press duration for a click, in milliseconds.
    pub click_max_duration_ms: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_max_distance_px: 5.0,
            click_max_duration_ms: 250.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Click,
    Drag,
}

/// A completed pointer down → up sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub kind: GestureKind,
    pub start: Vec2,
    pub end: Vec2,
    pub distance: f32,
    pub duration_ms: f64,
}

/// Classify from displacement and elapsed time alone.
pub fn classify(distance: f32, duration_ms: f64, config: &GestureConfig) -> GestureKind {
    // clock skew between events must not turn a click into a drag
    let duration_ms = duration_ms.max(0.0);
    if distance < config.click_max_distance_px && duration_ms < config.click_max_duration_ms {
        GestureKind::Click
    } else {
        GestureKind::Drag
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    pos: Vec2,
    time_ms: f64,
    last: Vec2,
}

/// Tracks one pointer between press and release.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    press: Option<Press>,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config, press: None }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn pointer_down(&mut self, pos: Vec2, time_ms: f64) {
        self.press = Some(Press { pos, time_ms, last: pos });
    }

    /// Movement since the previous move while pressed; None when not pressed.
    pub fn pointer_move(&mut self, pos: Vec2) -> Option<Vec2> {
        let press = self.press.as_mut()?;
        let delta = pos - press.last;
        press.last = pos;
        Some(delta)
    }

    /// Finish the gesture. None if there was no matching press.
    pub fn pointer_up(&mut self, pos: Vec2, time_ms: f64) -> Option<Gesture> {
        let press = self.press.take()?;
        let distance = press.pos.distance(pos);
        let duration_ms = time_ms - press.time_ms;
        Some(Gesture {
            kind: classify(distance, duration_ms, &self.config),
            start: press.pos,
            end: pos,
            distance,
            duration_ms,
        })
    }

    /// Drop a press without classifying it (pointer left the canvas, view reset).
    pub fn cancel(&mut self) {
        self.press = None;
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(dx: f32, dy: f32, ms: f64) -> GestureKind {
        let mut c = GestureClassifier::default();
        c.pointer_down(Vec2::new(100.0, 100.0), 1000.0);
        c.pointer_up(Vec2::new(100.0 + dx, 100.0 + dy), 1000.0 + ms)
            .unwrap()
            .kind
    }

    #[test]
    fn still_quick_press_is_click() {
        assert_eq!(run(0.0, 0.0, 10.0), GestureKind::Click);
        assert_eq!(run(3.0, 3.9, 249.9), GestureKind::Click);
    }

    #[test]
    fn distance_boundary() {
        assert_eq!(run(4.999, 0.0, 50.0), GestureKind::Click);
        assert_eq!(run(5.0, 0.0, 50.0), GestureKind::Drag);
        assert_eq!(run(3.0, 4.0, 50.0), GestureKind::Drag); // hypot = 5
        assert_eq!(run(5.001, 0.0, 50.0), GestureKind::Drag);
    }

    #[test]
    fn duration_boundary() {
        assert_eq!(run(0.0, 0.0, 249.999), GestureKind::Click);
        assert_eq!(run(0.0, 0.0, 250.0), GestureKind::Drag);
        assert_eq!(run(0.0, 0.0, 250.001), GestureKind::Drag);
    }

    #[test]
    fn exceeding_both_is_drag() {
        assert_eq!(run(40.0, 0.0, 900.0), GestureKind::Drag);
    }

    #[test]
    fn negative_duration_is_treated_as_instant() {
        assert_eq!(classify(0.0, -5.0, &GestureConfig::default()), GestureKind::Click);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut c = GestureClassifier::default();
        assert!(c.pointer_up(Vec2::ZERO, 0.0).is_none());
        assert!(c.pointer_move(Vec2::ONE).is_none());
    }

    #[test]
    fn move_reports_incremental_deltas() {
        let mut c = GestureClassifier::default();
        c.pointer_down(Vec2::new(10.0, 10.0), 0.0);
        assert_eq!(c.pointer_move(Vec2::new(13.0, 10.0)), Some(Vec2::new(3.0, 0.0)));
        assert_eq!(c.pointer_move(Vec2::new(13.0, 6.0)), Some(Vec2::new(0.0, -4.0)));
        // classification uses the press origin, not the last move
        let g = c.pointer_up(Vec2::new(10.0, 10.0), 100.0).unwrap();
        assert_eq!(g.kind, GestureKind::Click);
    }

    #[test]
    fn custom_thresholds_apply() {
        let cfg = GestureConfig { click_max_distance_px: 20.0, click_max_duration_ms: 1000.0 };
        assert_eq!(classify(15.0, 800.0, &cfg), GestureKind::Click);
        assert_eq!(classify(20.0, 800.0, &cfg), GestureKind::Drag);
    }
}
