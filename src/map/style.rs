use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::layer::TileLayer;
use crate::constants::{TILE_MAX_ZOOM, TILE_OPACITY};

/// Base map selectable from the `.map-btn[data-map]` buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Osm,
}

impl MapStyle {
    pub fn name(&self) -> &'static str {
        match self {
            MapStyle::Osm => "osm",
        }
    }

    // Tiles are dimmed so the markers stand out
    pub fn tile_layer(&self) -> TileLayer {
        match self {
            MapStyle::Osm => TileLayer {
                url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "&copy; OpenStreetMap contributors",
                max_zoom: TILE_MAX_ZOOM,
                opacity: TILE_OPACITY,
            },
        }
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "osm" => Ok(MapStyle::Osm),
            other => anyhow::bail!("Unknown map style: {}", other),
        }
    }
}
