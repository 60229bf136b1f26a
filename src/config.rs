//! Runtime tuning for the scroll engine and the distortion backgrounds.
//!
//! The page embeds an optional JSON blob (`<script type="application/json"
//! id="site-config">`). Every field is optional; anything omitted keeps the
//! default below.

use serde::Deserialize;

use crate::error::SiteError;

/// Element id of the embedded JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Pin window length as a multiple of the viewport height (`+=130%`).
    pub pin_distance: f64,
    /// Seconds the scrubbed progress takes to catch up with the scroll position.
    pub scrub_lag_secs: f64,
    /// Delay after mount before the snap plan is built, so every pin has registered.
    pub snap_settle_ms: u32,
    /// Normalised margin around each pin window inside which snapping engages.
    pub snap_buffer: f64,
    pub snap_duration_min: f64,
    pub snap_duration_max: f64,
    /// Scroll inactivity that counts as "the user stopped scrolling".
    pub scroll_end_ms: f64,
    /// Velocity (px/s) that saturates the distortion.
    pub velocity_scale: f64,
    pub max_intensity: f64,
    pub direction_y: f64,
    /// Per-frame low-pass factors used by the compositors.
    pub intensity_blend: f32,
    pub direction_blend: f32,
    pub max_pixel_ratio: f64,
    /// Rebuild snap ranges on every resize. Off by default: ranges computed at
    /// startup survive resizes and can drift from the live pin geometry.
    pub eager_snap_refresh: bool,
    /// Fraction of the viewport height after which the navigation bar shows.
    pub nav_reveal_ratio: f64,
    /// How long the contact form shows its acknowledgement.
    pub form_ack_ms: f64,
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            pin_distance: 1.3,
            scrub_lag_secs: 0.6,
            snap_settle_ms: 500,
            snap_buffer: 0.02,
            snap_duration_min: 0.15,
            snap_duration_max: 0.35,
            scroll_end_ms: 150.0,
            velocity_scale: 1000.0,
            max_intensity: 0.5,
            direction_y: 0.3,
            intensity_blend: 0.08,
            direction_blend: 0.10,
            max_pixel_ratio: 2.0,
            eager_snap_refresh: false,
            nav_reveal_ratio: 0.5,
            form_ack_ms: 3000.0,
            log_level: "info".to_owned(),
        }
    }
}

impl SiteConfig {
    /// Parses the embedded JSON. Whitespace-only input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Reads the embedded blob, if any. On a parse error the defaults are used
    /// and the error is handed back so it can be logged once a logger exists.
    pub fn load(json: Option<&str>) -> (Self, Option<SiteError>) {
        match json.map(Self::from_json) {
            Some(Ok(config)) => (config, None),
            Some(Err(err)) => (Self::default(), Some(err)),
            None => (Self::default(), None),
        }
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = SiteConfig::from_json(r#"{"snap_buffer":0.05,"eager_snap_refresh":true}"#)
            .unwrap();
        assert_eq!(config.snap_buffer, 0.05);
        assert!(config.eager_snap_refresh);
        assert_eq!(config.pin_distance, 1.3);
        assert_eq!(config.snap_settle_ms, 500);
    }

    #[test]
    fn blank_input_is_default() {
        assert_eq!(SiteConfig::from_json("  \n").unwrap(), SiteConfig::default());
    }

    #[test]
    fn malformed_json_falls_back() {
        assert!(SiteConfig::from_json("{").is_err());
        let (config, err) = SiteConfig::load(Some("{"));
        assert_eq!(config, SiteConfig::default());
        assert!(matches!(err, Some(SiteError::Config(_))));
        assert_eq!(SiteConfig::load(None), (SiteConfig::default(), None));
    }

    #[test]
    fn unknown_log_level_is_info() {
        let config = SiteConfig {
            log_level: "chatty".into(),
            ..SiteConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Info);
        let config = SiteConfig {
            log_level: "debug".into(),
            ..SiteConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Debug);
    }
}
