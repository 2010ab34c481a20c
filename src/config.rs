use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::data::loader::LoaderConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "DataConfig::default_path")]
    pub path: String,
    /// Earliest release year kept at load time.
    #[serde(default = "DataConfig::default_min_year")]
    pub min_year: i32,
    #[serde(default = "DataConfig::default_undetermined_token")]
    pub undetermined_token: String,
}

impl DataConfig {
    fn default_path() -> String {
        "data/games.csv".to_string()
    }
    fn default_min_year() -> i32 {
        2000
    }
    fn default_undetermined_token() -> String {
        "tbd".to_string()
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            min_year: self.min_year,
            undetermined_token: self.undetermined_token.clone(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            min_year: Self::default_min_year(),
            undetermined_token: Self::default_undetermined_token(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "WindowConfig::default_width")]
    pub width: f32,
    #[serde(default = "WindowConfig::default_height")]
    pub height: f32,
    #[serde(default = "WindowConfig::default_title")]
    pub title: String,
}

impl WindowConfig {
    fn default_width() -> f32 {
        1280.0
    }
    fn default_height() -> f32 {
        860.0
    }
    fn default_title() -> String {
        "Games market dashboard".to_string()
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            title: Self::default_title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DashConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

impl DashConfig {
    /// Read the TOML file at `path`. A missing file gives the defaults;
    /// an unreadable or invalid one is reported and also gives the defaults.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            log::debug!("No config at {path}, using defaults");
            return Self::default();
        }
        match fs::read_to_string(path_obj) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    log::warn!("Failed to parse config {path}: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Failed to read config {path}: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: DashConfig = toml::from_str("[data]\nmin_year = 2005\n").unwrap();
        assert_eq!(cfg.data.min_year, 2005);
        assert_eq!(cfg.data.undetermined_token, "tbd");
        assert_eq!(cfg.window, WindowConfig::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = DashConfig::load_or_default("/nonexistent/dashboard.toml");
        assert_eq!(cfg, DashConfig::default());
    }

    #[test]
    fn invalid_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data\nmin_year = ").unwrap();
        let cfg = DashConfig::load_or_default(file.path().to_str().unwrap());
        assert_eq!(cfg, DashConfig::default());
    }

    #[test]
    fn loads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data]\npath = \"games.parquet\"\n[window]\nwidth = 800.0").unwrap();
        let cfg = DashConfig::load_or_default(file.path().to_str().unwrap());
        assert_eq!(cfg.data.path, "games.parquet");
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.data.loader_config(), LoaderConfig::default());
    }
}
