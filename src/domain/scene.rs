// ============================================================
// Layer 3 — Weather → Scene Mapping
// ============================================================
// Every predicted category maps to a skybox identifier the
// client uses to pick a scene resource. The mapping is a total
// function over WeatherCategory; drizzle and rain share a sky.
//
//   drizzle → rainySky
//   fog     → foggySky
//   rain    → rainySky
//   snow    → snowySky
//   sun     → sunnySky

use crate::domain::weather::WeatherCategory;

pub const RAINY_SKY: &str = "rainySky";
pub const FOGGY_SKY: &str = "foggySky";
pub const SNOWY_SKY: &str = "snowySky";
pub const SUNNY_SKY: &str = "sunnySky";

/// Value served by `GET /api/skybox`. It does not track predictions.
pub const DEFAULT_SKYBOX: &str = SUNNY_SKY;

pub fn skybox_for(category: WeatherCategory) -> &'static str {
    match category {
        WeatherCategory::Drizzle | WeatherCategory::Rain => RAINY_SKY,
        WeatherCategory::Fog  => FOGGY_SKY,
        WeatherCategory::Snow => SNOWY_SKY,
        WeatherCategory::Sun  => SUNNY_SKY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_sky() {
        for category in WeatherCategory::ALL {
            assert!(!skybox_for(category).is_empty());
        }
    }

    #[test]
    fn test_drizzle_and_rain_share_a_sky() {
        assert_eq!(
            skybox_for(WeatherCategory::Drizzle),
            skybox_for(WeatherCategory::Rain)
        );
    }

    #[test]
    fn test_mapping_is_stable() {
        assert_eq!(skybox_for(WeatherCategory::Fog),  "foggySky");
        assert_eq!(skybox_for(WeatherCategory::Snow), "snowySky");
        assert_eq!(skybox_for(WeatherCategory::Sun),  "sunnySky");
    }
}
