pub mod layer;
pub mod manager;
pub mod scene;
pub mod style;

pub use layer::{Layer, LayerId, TileLayer};
pub use manager::MapManager;
pub use scene::SceneMap;
pub use style::MapStyle;

use crate::geo::{Bounds, LatLon};

/// The operations the viewer needs from a map widget.
///
/// Implemented by [`SceneMap`], which records layer state for the browser to mirror.
pub trait MapSurface {
    fn set_view(&mut self, center: LatLon, zoom: u8);
    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32);
    /// Recompute the container size after it was hidden or resized.
    fn invalidate_size(&mut self);

    fn remove_tile_layers(&mut self);
    fn add_tile_layer(&mut self, layer: TileLayer);

    fn add_layer(&mut self, layer: Layer) -> LayerId;
    fn remove_layer(&mut self, id: LayerId);
    /// Remove every layer except the tiles.
    fn clear_overlays(&mut self);
}
