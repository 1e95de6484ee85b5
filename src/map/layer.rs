use serde::Serialize;

use crate::constants::CLUSTER_RADIUS_PX;
use crate::geo::LatLon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

// Base raster layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
    pub opacity: f64,
}

/// Fixed-pixel-radius circle, the only marker shape the viewer draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub position: LatLon,
    pub radius: f64,
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
    pub popup: String,
    /// Collection index the lightbox opens at when the marker is clicked.
    pub opens: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub points: Vec<LatLon>,
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterOptions {
    pub max_cluster_radius: u32,
    pub spiderfy_on_max_zoom: bool,
    pub show_coverage_on_hover: bool,
    pub zoom_to_bounds_on_click: bool,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            max_cluster_radius: CLUSTER_RADIUS_PX,
            spiderfy_on_max_zoom: true,
            show_coverage_on_hover: false,
            zoom_to_bounds_on_click: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClusterGroup {
    pub options: ClusterOptions,
    pub markers: Vec<CircleMarker>,
}

impl ClusterGroup {
    pub fn new(options: ClusterOptions) -> Self {
        Self { options, markers: Vec::new() }
    }

    pub fn add(&mut self, marker: CircleMarker) {
        self.markers.push(marker);
    }
}

/// Anything drawn above the tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    CircleMarker(CircleMarker),
    Polyline(Polyline),
    Cluster(ClusterGroup),
}
