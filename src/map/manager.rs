use tracing::debug;

use super::layer::{CircleMarker, ClusterGroup, ClusterOptions, Layer, LayerId, Polyline};
use super::style::MapStyle;
use super::MapSurface;
use crate::constants::{
    DIRECTION_LINE_M, FALLBACK_CENTER, FIT_PADDING_PX, LIGHTBOX_FOCUS_ZOOM, LIGHTBOX_INITIAL_ZOOM,
    MARKER_BLUE, MARKER_RED, MARKER_STROKE, PRIMARY_INITIAL_ZOOM,
};
use crate::gallery::{escape_html, format_date, format_direction};
use crate::geo::{destination_point, trimmed_bounds, Bounds, LatLon};
use crate::photos::{located_photos, Photo};

/// Owns the two map instances and the layers the viewer puts on the primary one.
pub struct MapManager<M: MapSurface> {
    primary: M,
    lightbox: M,
    cluster: Option<LayerId>,
    direction_lines: Vec<LayerId>,
}

impl<M: MapSurface> MapManager<M> {
    pub fn new(primary: M, lightbox: M) -> Self {
        Self {
            primary,
            lightbox,
            cluster: None,
            direction_lines: Vec::new(),
        }
    }

    pub fn primary(&self) -> &M {
        &self.primary
    }

    pub fn lightbox(&self) -> &M {
        &self.lightbox
    }

    /// First render after the manifest is loaded.
    pub fn init(&mut self, photos: &[Photo], style: MapStyle) {
        let positions: Vec<LatLon> = located_photos(photos).map(|(_, _, pos)| pos).collect();
        let bounds95 = trimmed_bounds(&positions);
        let center = bounds95
            .map(|b| b.center())
            .unwrap_or_else(|| LatLon::new(FALLBACK_CENTER.0, FALLBACK_CENTER.1));

        self.primary.set_view(center, PRIMARY_INITIAL_ZOOM);
        replace_tiles(&mut self.primary, style);

        self.lightbox.set_view(center, LIGHTBOX_INITIAL_ZOOM);
        replace_tiles(&mut self.lightbox, style);

        self.refresh_markers(photos);

        // Outliers should not decide the opening zoom level
        if let Some(bounds) = bounds95 {
            if positions.len() > 1 {
                self.primary.fit_bounds(bounds, FIT_PADDING_PX);
            }
        }
    }

    /// Swap the base layer on both maps, leaving exactly one tile layer on each.
    pub fn apply_tiles(&mut self, style: MapStyle) {
        replace_tiles(&mut self.primary, style);
        replace_tiles(&mut self.lightbox, style);
    }

    pub fn invalidate_primary(&mut self) {
        self.primary.invalidate_size();
    }

    /// Rebuild the clustered markers and direction lines of the primary map.
    pub fn refresh_markers(&mut self, photos: &[Photo]) {
        if let Some(id) = self.cluster.take() {
            self.primary.remove_layer(id);
        }
        for id in self.direction_lines.drain(..) {
            self.primary.remove_layer(id);
        }

        let located: Vec<(usize, &Photo, LatLon)> = located_photos(photos).collect();
        if located.is_empty() {
            return;
        }

        let mut group = ClusterGroup::new(ClusterOptions::default());
        for &(index, photo, position) in &located {
            if let Some(direction) = photo.direction {
                let line = direction_line(position, direction, 2.0, 0.7);
                let id = self.primary.add_layer(Layer::Polyline(line));
                self.direction_lines.push(id);
            }

            group.add(CircleMarker {
                position,
                radius: 10.0,
                fill_color: MARKER_BLUE,
                color: MARKER_STROKE,
                weight: 2.0,
                fill_opacity: 1.0,
                popup: primary_popup(photo, position),
                opens: Some(index),
            });
        }
        debug!(
            "🗺️  {} markers, {} direction lines",
            group.markers.len(),
            self.direction_lines.len()
        );
        self.cluster = Some(self.primary.add_layer(Layer::Cluster(group)));

        if let Some(bounds) = Bounds::from_points(located.iter().map(|&(_, _, pos)| pos)) {
            self.primary.fit_bounds(bounds, FIT_PADDING_PX);
        }
    }

    /// Redraw the lightbox map around the photo at `current`.
    pub fn refresh_lightbox(&mut self, photos: &[Photo], current: usize) {
        self.lightbox.invalidate_size();
        self.lightbox.clear_overlays();

        for (index, photo, position) in located_photos(photos) {
            let popup = lightbox_popup(photo, position);
            if index == current {
                if let Some(direction) = photo.direction {
                    let line = direction_line(position, direction, 3.0, 0.8);
                    self.lightbox.add_layer(Layer::Polyline(line));
                }
                self.lightbox.add_layer(Layer::CircleMarker(CircleMarker {
                    position,
                    radius: 12.0,
                    fill_color: MARKER_RED,
                    color: MARKER_STROKE,
                    weight: 3.0,
                    fill_opacity: 1.0,
                    popup,
                    opens: None,
                }));
            } else {
                self.lightbox.add_layer(Layer::CircleMarker(CircleMarker {
                    position,
                    radius: 8.0,
                    fill_color: MARKER_BLUE,
                    color: MARKER_STROKE,
                    weight: 2.0,
                    fill_opacity: 1.0,
                    popup,
                    opens: Some(index),
                }));
            }
        }

        if let Some(position) = photos.get(current).and_then(Photo::position) {
            self.lightbox.set_view(position, LIGHTBOX_FOCUS_ZOOM);
        }
    }
}

fn replace_tiles<M: MapSurface>(map: &mut M, style: MapStyle) {
    map.remove_tile_layers();
    map.add_tile_layer(style.tile_layer());
}

fn direction_line(position: LatLon, direction: f64, weight: f64, opacity: f64) -> Polyline {
    let end = destination_point(position, DIRECTION_LINE_M, direction);
    Polyline {
        points: vec![position, end],
        color: MARKER_RED,
        weight,
        opacity,
    }
}

fn primary_popup(photo: &Photo, position: LatLon) -> String {
    let title = match photo.date.as_deref() {
        Some(date) if !date.is_empty() => format_date(date),
        _ => "Photo".to_string(),
    };
    let mut popup = format!(
        "<strong>{}</strong><br>Lat: {:.6}<br>Lon: {:.6}",
        escape_html(&title),
        position.lat,
        position.lon
    );
    if let Some(direction) = photo.direction {
        popup.push_str(&format!("<br>Direction: {}", format_direction(direction)));
    }
    popup
}

fn lightbox_popup(photo: &Photo, position: LatLon) -> String {
    format!(
        "<strong>{}</strong><br>Lat: {:.6}<br>Lon: {:.6}",
        escape_html(photo.filename()),
        position.lat,
        position.lon
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::scene::Camera;
    use crate::map::SceneMap;
    use crate::photos::tests::{gps_photo, plain_photo};

    fn sample() -> Vec<Photo> {
        vec![
            gps_photo("a.jpg", 45.0, 9.0, Some(90.0)),
            plain_photo("b.jpg"),
            gps_photo("c.jpg", 45.1, 9.1, None),
            gps_photo("d.jpg", 45.2, 9.2, Some(180.0)),
        ]
    }

    fn manager() -> MapManager<SceneMap> {
        MapManager::new(SceneMap::new(), SceneMap::new())
    }

    #[test]
    fn refresh_builds_one_cluster_and_direction_lines() {
        let photos = sample();
        let mut maps = manager();
        maps.refresh_markers(&photos);

        let clusters: Vec<_> = maps.primary().clusters().collect();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].markers.len(), 3);
        assert_eq!(clusters[0].options.max_cluster_radius, 50);
        assert!(!clusters[0].options.show_coverage_on_hover);
        let opens: Vec<_> = clusters[0].markers.iter().map(|m| m.opens).collect();
        assert_eq!(opens, vec![Some(0), Some(2), Some(3)]);
        assert_eq!(maps.primary().polylines().count(), 2);
    }

    #[test]
    fn refresh_is_idempotent() {
        let photos = sample();
        let mut maps = manager();
        maps.refresh_markers(&photos);
        maps.refresh_markers(&photos);
        assert_eq!(maps.primary().clusters().count(), 1);
        assert_eq!(maps.primary().polylines().count(), 2);
    }

    #[test]
    fn refresh_fits_all_located_photos() {
        let photos = sample();
        let mut maps = manager();
        maps.refresh_markers(&photos);
        match maps.primary().camera() {
            Some(Camera::Fit { bounds, padding }) => {
                assert_eq!(*padding, 50);
                assert_eq!(bounds.min_lat, 45.0);
                assert_eq!(bounds.max_lat, 45.2);
            }
            other => panic!("unexpected camera {other:?}"),
        }
    }

    #[test]
    fn refresh_with_no_located_photos_only_clears() {
        let mut maps = manager();
        maps.refresh_markers(&sample());
        maps.refresh_markers(&[plain_photo("x.jpg")]);
        assert!(maps.primary().overlays().is_empty());
    }

    #[test]
    fn popup_contents() {
        let photo = gps_photo("a.jpg", 45.0, 9.0, Some(89.6));
        let popup = primary_popup(&photo, photo.position().unwrap());
        assert!(popup.contains("<strong>15/07/2021</strong>"));
        assert!(popup.contains("Lat: 45.000000"));
        assert!(popup.contains("Direction: 90°"));

        let mut undated = photo.clone();
        undated.date = None;
        undated.direction = None;
        let popup = primary_popup(&undated, undated.position().unwrap());
        assert!(popup.starts_with("<strong>Photo</strong>"));
        assert!(!popup.contains("Direction"));
    }

    #[test]
    fn init_centres_both_maps_and_fits_trimmed_box() {
        let photos = sample();
        let mut maps = manager();
        maps.init(&photos, MapStyle::Osm);

        assert_eq!(maps.primary().tile_layers().len(), 1);
        assert_eq!(maps.lightbox().tile_layers().len(), 1);
        match maps.lightbox().camera() {
            Some(Camera::View { center, zoom }) => {
                assert_eq!(*zoom, 15);
                assert!((center.lat - 45.1).abs() < 1e-9);
            }
            other => panic!("unexpected camera {other:?}"),
        }
        assert!(matches!(maps.primary().camera(), Some(Camera::Fit { padding: 50, .. })));
    }

    #[test]
    fn init_without_photos_uses_fallback_centre() {
        let mut maps = manager();
        maps.init(&[], MapStyle::Osm);
        assert_eq!(
            maps.primary().camera(),
            Some(&Camera::View { center: LatLon::new(45.4642, 9.19), zoom: 6 })
        );
    }

    #[test]
    fn init_with_single_photo_fits_that_photo() {
        let mut maps = manager();
        maps.init(&[gps_photo("a.jpg", 10.0, 20.0, None)], MapStyle::Osm);
        // refresh_markers fits the single point, the trimmed fit is skipped
        match maps.primary().camera() {
            Some(Camera::Fit { bounds, .. }) => assert_eq!(bounds.center(), LatLon::new(10.0, 20.0)),
            other => panic!("unexpected camera {other:?}"),
        }
    }

    #[test]
    fn repeated_tile_swaps_leave_one_layer() {
        let mut maps = manager();
        maps.init(&sample(), MapStyle::Osm);
        for _ in 0..5 {
            maps.apply_tiles(MapStyle::Osm);
        }
        assert_eq!(maps.primary().tile_layers().len(), 1);
        assert_eq!(maps.lightbox().tile_layers().len(), 1);
    }

    #[test]
    fn lightbox_highlights_current_photo() {
        let photos = sample();
        let mut maps = manager();
        maps.refresh_lightbox(&photos, 0);

        let markers: Vec<_> = maps.lightbox().markers().collect();
        assert_eq!(markers.len(), 3);
        let current = markers.iter().find(|m| m.fill_color == MARKER_RED).unwrap();
        assert_eq!(current.radius, 12.0);
        assert_eq!(current.opens, None);
        let others: Vec<_> = markers.iter().filter(|m| m.fill_color == MARKER_BLUE).collect();
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|m| m.radius == 8.0 && m.opens.is_some()));

        let lines: Vec<_> = maps.lightbox().polylines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].opacity, 0.8);

        assert_eq!(
            maps.lightbox().camera(),
            Some(&Camera::View { center: LatLon::new(45.0, 9.0), zoom: 18 })
        );
        assert_eq!(maps.lightbox().size_rev(), 1);
    }

    #[test]
    fn lightbox_refresh_replaces_previous_layers() {
        let photos = sample();
        let mut maps = manager();
        maps.apply_tiles(MapStyle::Osm);
        maps.refresh_lightbox(&photos, 0);
        maps.refresh_lightbox(&photos, 2);
        assert_eq!(maps.lightbox().markers().count(), 3);
        // photo 2 has no direction
        assert_eq!(maps.lightbox().polylines().count(), 0);
        assert_eq!(maps.lightbox().tile_layers().len(), 1);
    }
}
