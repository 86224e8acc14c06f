use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::DEFAULT_PORT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub port: u16,
    #[serde(default)]
    pub auto_open_browser: bool,
    /// Click-anywhere grid readout, an authoring aid - turn off for players
    pub show_grid_probe: bool,
    /// Optional JSON file overriding the built-in location data
    pub locations_file: Option<String>,
    /// Directory holding the world image and location artwork
    pub assets_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auto_open_browser: false,
            show_grid_probe: true,
            locations_file: None,
            assets_dir: "assets".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&config_path).context("Failed to open config file")?;
        Ok(Self::parse(&content))
    }

    fn parse(content: &str) -> Self {
        let mut settings = Settings::default();
        let mut config_map = HashMap::new();

        for line in content.lines() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        if let Some(port_str) = config_map.get("port") {
            if let Ok(port) = port_str.parse::<u16>() {
                settings.port = port;
            }
        }
        if let Some(auto_open_str) = config_map.get("auto_open_browser") {
            if let Ok(auto_open) = auto_open_str.parse::<bool>() {
                settings.auto_open_browser = auto_open;
            }
        }
        if let Some(probe_str) = config_map.get("show_grid_probe") {
            if let Ok(probe) = probe_str.parse::<bool>() {
                settings.show_grid_probe = probe;
            }
        }
        if let Some(locations_file) = config_map.get("locations_file") {
            settings.locations_file = Some(locations_file.trim_matches('"').to_string());
        }
        if let Some(assets_dir) = config_map.get("assets_dir") {
            settings.assets_dir = assets_dir.trim_matches('"').to_string();
        }

        settings
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# LoreMap Configuration File\n");
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));
        content.push_str(&format!("show_grid_probe = {}\n", self.show_grid_probe));
        if let Some(ref locations_file) = self.locations_file {
            content.push_str(&format!("locations_file = \"{}\"\n", locations_file));
        }
        content.push_str(&format!("assets_dir = \"{}\"\n", self.assets_dir));

        std::fs::write(&config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("loremap.ini");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings = Settings::parse("# just a comment\n");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(settings.show_grid_probe);
        assert!(settings.locations_file.is_none());
        assert_eq!(settings.assets_dir, "assets");
    }

    #[test]
    fn parse_reads_every_key() {
        let settings = Settings::parse(
            "port = 8080\n\
             auto_open_browser = true\n\
             show_grid_probe = false\n\
             locations_file = \"data/extra.json\"\n\
             assets_dir = \"art\"\n",
        );
        assert_eq!(settings.port, 8080);
        assert!(settings.auto_open_browser);
        assert!(!settings.show_grid_probe);
        assert_eq!(settings.locations_file.as_deref(), Some("data/extra.json"));
        assert_eq!(settings.assets_dir, "art");
    }

    #[test]
    fn malformed_values_are_ignored() {
        let settings = Settings::parse("port = not-a-number\nshow_grid_probe = maybe\n");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(settings.show_grid_probe);
    }
}
