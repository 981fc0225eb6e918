use serde::{Deserialize, Serialize};
use crate::api::types::StarId;

/// A catalog star as delivered by the data source.
/// Field names follow the REST payload; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Star {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Right ascension in degrees.
    #[serde(default)]
    pub ra: Option<f64>,
    /// Declination in degrees.
    #[serde(default)]
    pub dec: Option<f64>,
    /// System distance in parsecs.
    #[serde(default, rename = "sy_dist")]
    pub distance_pc: Option<f64>,
    /// Stellar radius in solar radii.
    #[serde(default, rename = "star_radius")]
    pub radius: Option<f64>,
}

impl Star {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_sky(mut self, ra: f64, dec: f64) -> Self {
        self.ra = Some(ra);
        self.dec = Some(dec);
        self
    }

    pub fn with_distance(mut self, parsecs: f64) -> Self {
        self.distance_pc = Some(parsecs);
        self
    }

    pub fn with_radius(mut self, solar_radii: f64) -> Self {
        self.radius = Some(solar_radii);
        self
    }

    pub fn star_id(&self) -> Option<StarId> {
        self.id.map(StarId)
    }

    /// (ra, dec) when both are present and finite.
    pub fn sky_position(&self) -> Option<(f64, f64)> {
        match (self.ra, self.dec) {
            (Some(ra), Some(dec)) if ra.is_finite() && dec.is_finite() => Some((ra, dec)),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Star")
    }
}

/// A planet record, only ever placed around its focused host star.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Semi-major axis in AU.
    #[serde(default)]
    pub semi_major_axis: Option<f64>,
    /// Planet radius in Earth radii.
    #[serde(default)]
    pub radius: Option<f64>,
}

impl Planet {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_semi_major_axis(mut self, au: f64) -> Self {
        self.semi_major_axis = Some(au);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Name shown on the label; falls back to the 1-based position in the system.
    pub fn display_name(&self, index: usize) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Planet {}", index + 1),
        }
    }
}

/// Parse a planet list from the REST payload.
pub fn planets_from_json(json: &str) -> Result<Vec<Planet>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a star list from the REST payload.
pub fn stars_from_json(json: &str) -> Result<Vec<Star>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rest_star_payload() {
        let json = r#"[
            {"id": 4, "name": "Kepler-22", "ra": 289.2, "dec": 47.9,
             "sy_dist": 190.0, "star_temp": 5518.0, "star_radius": 0.98,
             "user_inputted": false},
            {"id": 5, "name": "Orphan", "ra": null, "dec": 12.0,
             "sy_dist": null, "star_radius": null}
        ]"#;
        let stars = stars_from_json(json).unwrap();
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].star_id(), Some(StarId(4)));
        assert_eq!(stars[0].distance_pc, Some(190.0));
        assert_eq!(stars[0].radius, Some(0.98));
        assert!(stars[1].sky_position().is_none());
    }

    #[test]
    fn parse_rest_planet_payload() {
        let json = r#"[{"id": 9, "star": 4, "name": "Kepler-22 b",
            "semi_major_axis": 0.849, "radius": 2.1, "classification": "CONFIRMED"}]"#;
        let planets = planets_from_json(json).unwrap();
        assert_eq!(planets[0].semi_major_axis, Some(0.849));
        assert_eq!(planets[0].display_name(0), "Kepler-22 b");
    }

    #[test]
    fn display_names_fall_back() {
        assert_eq!(Star::default().display_name(), "Star");
        assert_eq!(Planet::default().display_name(2), "Planet 3");
    }

    #[test]
    fn non_finite_sky_position_is_unplaced() {
        let star = Star::new(1, "x").with_sky(f64::NAN, 10.0);
        assert!(star.sky_position().is_none());
    }
}
