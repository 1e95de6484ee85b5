use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PORT, MANIFEST_PATH};
use crate::map::MapStyle;
use crate::view::ViewMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory that holds `data/photos.json` and the images it points at.
    pub site_root: String,
    pub port: u16,
    #[serde(default)]
    pub auto_open_browser: bool,
    pub default_view: ViewMode,
    pub map_style: MapStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_root: ".".to_string(),
            port: DEFAULT_PORT,
            auto_open_browser: false,
            default_view: ViewMode::Map,
            map_style: MapStyle::Osm,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = Settings::default();
        if !config_path.exists() {
            return Ok(settings);
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
            }
        }

        if let Some(site_root) = config_map.get("site_root") {
            if !site_root.is_empty() {
                settings.site_root = site_root.clone();
            }
        }
        if let Some(port) = config_map.get("port").and_then(|v| v.parse::<u16>().ok()) {
            settings.port = port;
        }
        if let Some(auto_open) = config_map.get("auto_open_browser").and_then(|v| v.parse::<bool>().ok()) {
            settings.auto_open_browser = auto_open;
        }
        if let Some(view) = config_map.get("default_view").and_then(|v| v.parse::<ViewMode>().ok()) {
            settings.default_view = view;
        }
        if let Some(style) = config_map.get("map_style").and_then(|v| v.parse::<MapStyle>().ok()) {
            settings.map_style = style;
        }

        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# PhotoMap Viewer Configuration File\n");
        content.push_str(&format!("site_root = \"{}\"\n", self.site_root));
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));
        content.push_str(&format!("default_view = {}\n", self.default_view.name()));
        content.push_str(&format!("map_style = {}\n", self.map_style.name()));

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn manifest_path(&self) -> PathBuf {
        Path::new(&self.site_root).join(MANIFEST_PATH)
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("photomap.ini");
        path
    }
}
