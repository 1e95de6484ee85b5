use serde::Serialize;

use super::layer::{Layer, LayerId, TileLayer};
#[cfg(test)]
use super::layer::{CircleMarker, ClusterGroup, Polyline};
use super::MapSurface;
use crate::geo::{Bounds, LatLon};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Camera {
    View { center: LatLon, zoom: u8 },
    Fit { bounds: Bounds, padding: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub id: LayerId,
    pub layer: Layer,
}

/// Map instance kept as plain data.
///
/// The browser mirrors a serialised `SceneMap` into Leaflet. Each revision
/// counter moves when the matching part changes, so a client only re-applies
/// the camera, layers or container size when something actually happened.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneMap {
    tiles: Vec<TileLayer>,
    overlays: Vec<Overlay>,
    camera: Option<Camera>,
    camera_rev: u64,
    layers_rev: u64,
    size_rev: u64,
    #[serde(skip)]
    next_id: u64,
}

impl SceneMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch_layers(&mut self) {
        self.layers_rev += 1;
    }
}

// Read side, only inspected by tests. The browser reads the serialised form.
#[cfg(test)]
impl SceneMap {
    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tiles
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn size_rev(&self) -> u64 {
        self.size_rev
    }

    pub fn clusters(&self) -> impl Iterator<Item = &ClusterGroup> {
        self.overlays.iter().filter_map(|o| match &o.layer {
            Layer::Cluster(group) => Some(group),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.overlays.iter().filter_map(|o| match &o.layer {
            Layer::Polyline(line) => Some(line),
            _ => None,
        })
    }

    /// Markers placed directly on the map, clusters excluded.
    pub fn markers(&self) -> impl Iterator<Item = &CircleMarker> {
        self.overlays.iter().filter_map(|o| match &o.layer {
            Layer::CircleMarker(marker) => Some(marker),
            _ => None,
        })
    }
}

impl MapSurface for SceneMap {
    fn set_view(&mut self, center: LatLon, zoom: u8) {
        self.camera = Some(Camera::View { center, zoom });
        self.camera_rev += 1;
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        self.camera = Some(Camera::Fit { bounds, padding: padding_px });
        self.camera_rev += 1;
    }

    fn invalidate_size(&mut self) {
        self.size_rev += 1;
    }

    fn remove_tile_layers(&mut self) {
        self.tiles.clear();
        self.touch_layers();
    }

    fn add_tile_layer(&mut self, layer: TileLayer) {
        self.tiles.push(layer);
        self.touch_layers();
    }

    fn add_layer(&mut self, layer: Layer) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        self.overlays.push(Overlay { id, layer });
        self.touch_layers();
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        let before = self.overlays.len();
        self.overlays.retain(|o| o.id != id);
        if self.overlays.len() != before {
            self.touch_layers();
        }
    }

    fn clear_overlays(&mut self) {
        self.overlays.clear();
        self.touch_layers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapStyle;

    fn line() -> Layer {
        Layer::Polyline(Polyline {
            points: vec![LatLon::new(0.0, 0.0), LatLon::new(1.0, 1.0)],
            color: "red",
            weight: 2.0,
            opacity: 1.0,
        })
    }

    #[test]
    fn layer_ids_are_unique_and_removable() {
        let mut map = SceneMap::new();
        let a = map.add_layer(line());
        let b = map.add_layer(line());
        assert_ne!(a, b);
        map.remove_layer(a);
        assert_eq!(map.overlays().len(), 1);
        assert_eq!(map.overlays()[0].id, b);
        // removing twice is harmless
        map.remove_layer(a);
        assert_eq!(map.overlays().len(), 1);
    }

    #[test]
    fn clear_overlays_keeps_tiles() {
        let mut map = SceneMap::new();
        map.add_tile_layer(MapStyle::Osm.tile_layer());
        map.add_layer(line());
        map.clear_overlays();
        assert!(map.overlays().is_empty());
        assert_eq!(map.tile_layers().len(), 1);
    }

    #[test]
    fn camera_and_size_revisions_advance() {
        let mut map = SceneMap::new();
        map.set_view(LatLon::new(1.0, 2.0), 6);
        map.invalidate_size();
        assert_eq!(map.camera(), Some(&Camera::View { center: LatLon::new(1.0, 2.0), zoom: 6 }));
        assert_eq!(map.size_rev(), 1);

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["camera_rev"], 1);
        assert_eq!(json["camera"]["kind"], "view");
        assert!(json.get("next_id").is_none());
    }
}
