// ============================================================
// Layer 8 — Scene cues
// ============================================================
// Turns /predict and /api/skybox replies into scene changes:
//
//   prediction == "rain" → rain on, exposure boost on (key 3.0)
//   prediction == "snow" → snow on
//   anything else        → both off, exposure off (key 0.0)
//   empty prediction     → nothing changes
//
// Matching is case-insensitive. Skybox ids are trimmed and must
// exist in the local catalog; unknown ids are logged and ignored.

use std::collections::BTreeSet;

use crate::domain::scene::{DEFAULT_SKYBOX, FOGGY_SKY, RAINY_SKY, SNOWY_SKY, SUNNY_SKY};

pub const EXPOSURE_BOOST_KEY: f32 = 3.0;
pub const EXPOSURE_OFF_KEY:   f32 = 0.0;

/// Skybox ids available locally.
#[derive(Debug, Clone)]
pub struct SkyboxCatalog {
    ids: BTreeSet<String>,
}

impl Default for SkyboxCatalog {
    fn default() -> Self {
        Self::new([RAINY_SKY, FOGGY_SKY, SNOWY_SKY, SUNNY_SKY])
    }
}

impl SkyboxCatalog {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { ids: ids.into_iter().map(Into::into).collect() }
    }

    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.ids.get(id.trim()).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exposure {
    pub enabled: bool,
    pub key:     f32,
}

impl Exposure {
    fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.key     = if enabled { EXPOSURE_BOOST_KEY } else { EXPOSURE_OFF_KEY };
    }
}

/// What the scene currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub rain:     bool,
    pub snow:     bool,
    pub exposure: Exposure,
    pub skybox:   String,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            rain:     false,
            snow:     false,
            exposure: Exposure { enabled: false, key: EXPOSURE_OFF_KEY },
            skybox:   DEFAULT_SKYBOX.to_string(),
        }
    }
}

impl SceneState {
    pub fn apply_prediction(&mut self, prediction: &str, skybox: &str, catalog: &SkyboxCatalog) {
        if !prediction.is_empty() {
            let raining = prediction.eq_ignore_ascii_case("rain");
            self.rain = raining;
            self.exposure.set(raining);
            self.snow = prediction.eq_ignore_ascii_case("snow");
            tracing::debug!("Scene cues: rain={} snow={}", self.rain, self.snow);
        }
        if !skybox.is_empty() {
            self.apply_skybox(skybox, catalog);
        }
    }

    /// Returns false when the id is not in the catalog.
    pub fn apply_skybox(&mut self, skybox: &str, catalog: &SkyboxCatalog) -> bool {
        match catalog.lookup(skybox) {
            Some(id) => {
                self.skybox = id.to_string();
                tracing::info!("Skybox set to '{}'", id);
                true
            }
            None => {
                tracing::warn!("Skybox '{}' not found in catalog", skybox.trim());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_enables_exposure_boost() {
        let mut scene = SceneState::default();
        scene.apply_prediction("Rain", "rainySky", &SkyboxCatalog::default());
        assert!(scene.rain);
        assert!(!scene.snow);
        assert_eq!(scene.exposure, Exposure { enabled: true, key: 3.0 });
        assert_eq!(scene.skybox, "rainySky");
    }

    #[test]
    fn test_snow_clears_rain() {
        let catalog = SkyboxCatalog::default();
        let mut scene = SceneState::default();
        scene.apply_prediction("rain", "rainySky", &catalog);
        scene.apply_prediction("snow", " snowySky ", &catalog);
        assert!(!scene.rain);
        assert!(scene.snow);
        assert_eq!(scene.exposure, Exposure { enabled: false, key: 0.0 });
        assert_eq!(scene.skybox, "snowySky");
    }

    #[test]
    fn test_empty_prediction_changes_nothing() {
        let catalog = SkyboxCatalog::default();
        let mut scene = SceneState::default();
        scene.apply_prediction("rain", "rainySky", &catalog);
        let before = scene.clone();
        scene.apply_prediction("", "", &catalog);
        assert_eq!(scene, before);
    }

    #[test]
    fn test_unknown_skybox_is_ignored() {
        let mut scene = SceneState::default();
        assert!(!scene.apply_skybox("stormySky", &SkyboxCatalog::default()));
        assert_eq!(scene.skybox, DEFAULT_SKYBOX);
    }

    #[test]
    fn test_drizzle_maps_to_no_particles() {
        let mut scene = SceneState::default();
        scene.apply_prediction("drizzle", "rainySky", &SkyboxCatalog::default());
        assert!(!scene.rain && !scene.snow);
        assert_eq!(scene.skybox, "rainySky");
    }
}
