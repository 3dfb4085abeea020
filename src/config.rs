//! Runtime settings for the controller.

use crate::persistence::DEFAULT_KEY;
use std::time::Duration;

pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Zoom used when the map opens and when jumping to a workout.
    pub map_zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
    /// Store key holding the serialized workout list.
    pub storage_key: String,
    /// How long to wait for a position before giving up on the map.
    pub geolocation_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map_zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_ATTRIBUTION.to_string(),
            storage_key: DEFAULT_KEY.to_string(),
            geolocation_timeout: Duration::from_secs(10),
        }
    }
}
