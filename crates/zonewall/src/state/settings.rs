//! Session settings

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::{SessionMode, DEFAULT_WALL_HEIGHT, DOWNLOAD_Y_OFFSET};

/// Remote zone store endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Published zone is PUT here
    pub upload_url: String,
    /// Zone to rebuild is fetched from here
    pub download_url: String,
    /// Per-request timeout, enforced by the HTTP transport
    pub request_timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            upload_url: "http://localhost:8080/zone.txt".to_string(),
            download_url: "http://localhost:8080/virtual_feedback_zone.txt".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Wall geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSettings {
    /// y of the wall bottom rim
    pub wall_height: f64,
    /// Added to y of every downloaded point
    pub download_y_offset: f64,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            wall_height: DEFAULT_WALL_HEIGHT,
            download_y_offset: DOWNLOAD_Y_OFFSET,
        }
    }
}

/// All session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSettings {
    /// Host scene name, selects the session mode
    pub scene: String,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub walls: WallSettings,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            scene: SessionMode::Placement.scene_name().to_string(),
            remote: RemoteSettings::default(),
            walls: WallSettings::default(),
        }
    }
}

impl ZoneSettings {
    /// Mode picked by the configured scene name
    pub fn mode(&self) -> SessionMode {
        SessionMode::from_scene_name(&self.scene)
    }

    fn settings_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "zonewall", "zonewall")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::settings_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(settings) => match settings.validate() {
                        Ok(()) => return settings,
                        Err(e) => tracing::warn!("Ignoring {}: {e}", path.display()),
                    },
                    Err(e) => tracing::warn!("Ignoring malformed {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
        settings
            .validate()
            .map_err(|e| format!("Invalid {}: {e}", path.display()))?;
        Ok(settings)
    }

    /// Wall geometry values must be finite
    pub fn validate(&self) -> Result<(), String> {
        let walls = &self.walls;
        if !walls.wall_height.is_finite() {
            return Err(format!("walls.wall_height must be finite, got {}", walls.wall_height));
        }
        if !walls.download_y_offset.is_finite() {
            return Err(format!(
                "walls.download_y_offset must be finite, got {}",
                walls.download_y_offset
            ));
        }
        Ok(())
    }

    /// Save settings to the config dir
    pub fn save(&self) {
        if let Some(path) = Self::settings_path() {
            if let Some(config_dir) = path.parent() {
                if std::fs::create_dir_all(config_dir).is_err() {
                    return;
                }
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, json);
            }
        }
    }

    /// Apply `ZONEWALL_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(scene) = lookup("ZONEWALL_SCENE") {
            self.scene = scene;
        }
        if let Some(url) = lookup("ZONEWALL_UPLOAD_URL") {
            self.remote.upload_url = url;
        }
        if let Some(url) = lookup("ZONEWALL_DOWNLOAD_URL") {
            self.remote.download_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = ZoneSettings::default();
        assert_eq!(s.mode(), SessionMode::Placement);
        assert_eq!(s.walls.wall_height, -0.12);
        assert_eq!(s.walls.download_y_offset, -1.5);
        assert_eq!(s.remote.request_timeout_secs, 10);
    }

    #[test]
    fn test_scene_selects_mode() {
        let s = ZoneSettings {
            scene: "PhysicalFeedback".to_string(),
            ..Default::default()
        };
        assert_eq!(s.mode(), SessionMode::RemoteFeedback);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: ZoneSettings = serde_json::from_str(r#"{"scene": "Feedback"}"#).unwrap();
        assert_eq!(s.mode(), SessionMode::Feedback);
        assert_eq!(s.remote, RemoteSettings::default());
        assert_eq!(s.walls, WallSettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut s = ZoneSettings::default();
        s.apply_overrides(|key| match key {
            "ZONEWALL_SCENE" => Some("Feedback".to_string()),
            "ZONEWALL_UPLOAD_URL" => Some("http://store/zone".to_string()),
            _ => None,
        });
        assert_eq!(s.mode(), SessionMode::Feedback);
        assert_eq!(s.remote.upload_url, "http://store/zone");
        assert_eq!(s.remote.download_url, RemoteSettings::default().download_url);
    }

    #[test]
    fn test_validate_rejects_non_finite_walls() {
        assert!(ZoneSettings::default().validate().is_ok());

        let mut s = ZoneSettings::default();
        s.walls.wall_height = f64::NAN;
        assert!(s.validate().unwrap_err().contains("wall_height"));

        let mut s = ZoneSettings::default();
        s.walls.download_y_offset = f64::NEG_INFINITY;
        assert!(s.validate().unwrap_err().contains("download_y_offset"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ZoneSettings::load_from(Path::new("/nonexistent/zonewall.json")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
