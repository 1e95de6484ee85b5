use serde::{Deserialize, Serialize};

use crate::geo::LatLon;

// One entry of data/photos.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub display: String,
    pub thumb: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub has_gps: bool,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Compass heading of the camera in degrees.
    #[serde(default)]
    pub direction: Option<f64>,
}

impl Photo {
    /// Position on the map. Only GPS photos with both coordinates have one.
    pub fn position(&self) -> Option<LatLon> {
        if !self.has_gps {
            return None;
        }
        Some(LatLon::new(self.lat?, self.lon?))
    }

    /// Trailing segment of the display path, used as the photo title.
    pub fn filename(&self) -> &str {
        self.display.rsplit('/').next().unwrap_or(&self.display)
    }
}

// Top-level manifest document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Manifest {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Photos with `has_gps`, paired with their index in the full collection.
pub fn gps_photos(photos: &[Photo]) -> impl Iterator<Item = (usize, &Photo)> {
    photos.iter().enumerate().filter(|(_, p)| p.has_gps)
}

/// GPS photos that can actually be placed on a map.
pub fn located_photos(photos: &[Photo]) -> impl Iterator<Item = (usize, &Photo, LatLon)> {
    photos
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.position().map(|pos| (i, p, pos)))
}

// Header counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhotoStats {
    pub total: usize,
    pub with_gps: usize,
}

impl PhotoStats {
    // Photos without GPS are never shown, so they are left out of both counters.
    pub fn from_photos(photos: &[Photo]) -> Self {
        let with_gps = gps_photos(photos).count();
        Self { total: with_gps, with_gps }
    }
}
