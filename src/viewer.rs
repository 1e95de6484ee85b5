use tracing::{debug, info};

use crate::gallery::{render_gallery, Gallery};
use crate::lightbox::{step_through, Key, Lightbox, LightboxPanel};
use crate::map::{MapManager, MapStyle, MapSurface};
use crate::photos::{gps_photos, Manifest, Photo, PhotoStats};
use crate::view::ViewMode;

/// Work to run once the page layout has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    InvalidatePrimary,
    RefreshLightboxMap(usize),
}

/// All mutable state of the viewer page.
pub struct Viewer<M: MapSurface> {
    photos: Vec<Photo>,
    loaded: bool,
    /// Bumped whenever the gallery markup can have changed.
    gallery_rev: u64,
    view: ViewMode,
    map_style: MapStyle,
    lightbox: Lightbox,
    maps: MapManager<M>,
    deferred: Vec<Deferred>,
}

impl<M: MapSurface> Viewer<M> {
    pub fn new(primary: M, lightbox: M) -> Self {
        Self {
            photos: Vec::new(),
            loaded: false,
            gallery_rev: 0,
            view: ViewMode::default(),
            map_style: MapStyle::default(),
            lightbox: Lightbox::default(),
            maps: MapManager::new(primary, lightbox),
            deferred: Vec::new(),
        }
    }

    pub fn with_defaults(mut self, view: ViewMode, map_style: MapStyle) -> Self {
        self.view = view;
        self.map_style = map_style;
        self
    }

    /// Installs the collection and draws the maps for the first time.
    pub fn load(&mut self, manifest: Manifest) {
        self.photos = manifest.photos;
        self.loaded = true;
        self.gallery_rev += 1;
        let stats = self.stats();
        info!("📸 Loaded {} photos, {} with GPS", self.photos.len(), stats.with_gps);
        self.maps.init(&self.photos, self.map_style);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn stats(&self) -> PhotoStats {
        PhotoStats::from_photos(&self.photos)
    }

    pub fn gallery(&self) -> Gallery {
        render_gallery(&self.photos)
    }

    pub fn gallery_rev(&self) -> u64 {
        self.gallery_rev
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn map_style(&self) -> MapStyle {
        self.map_style
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn maps(&self) -> &MapManager<M> {
        &self.maps
    }

    pub fn switch_view(&mut self, view: ViewMode) {
        self.view = view;
        // The map container may have been hidden while it was laid out
        if view == ViewMode::Map {
            self.deferred.push(Deferred::InvalidatePrimary);
        }
    }

    pub fn switch_map_style(&mut self, style: MapStyle) {
        self.map_style = style;
        self.maps.apply_tiles(style);
    }

    /// Shows the photo at `index`. Returns false, leaving the lightbox as it
    /// was, when there is no such photo or it has no GPS data.
    pub fn open_lightbox(&mut self, index: usize) -> bool {
        let Some(photo) = self.photos.get(index) else {
            debug!("No photo at index {}, lightbox unchanged", index);
            return false;
        };
        if !photo.has_gps {
            debug!("Photo {} has no GPS data, skipping", photo.filename());
            return false;
        }

        self.lightbox.show(LightboxPanel::for_photo(index, photo));
        self.deferred.push(Deferred::RefreshLightboxMap(index));
        true
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox.close();
    }

    /// Moves through the GPS photos, wrapping at both ends.
    pub fn navigate(&mut self, step: isize) {
        let sequence: Vec<usize> = gps_photos(&self.photos).map(|(i, _)| i).collect();
        if let Some(next) = step_through(&sequence, self.lightbox.current, step) {
            self.open_lightbox(next);
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        if !self.lightbox.open {
            return;
        }
        match key {
            Key::Escape => self.close_lightbox(),
            Key::ArrowLeft => self.navigate(-1),
            Key::ArrowRight => self.navigate(1),
            Key::Other => {}
        }
    }

    pub fn take_deferred(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.deferred)
    }

    pub fn run_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::InvalidatePrimary => self.maps.invalidate_primary(),
            Deferred::RefreshLightboxMap(index) => self.maps.refresh_lightbox(&self.photos, index),
        }
    }

    /// Runs every pending task at once, without the layout delay.
    #[cfg(test)]
    pub fn settle(&mut self) {
        for task in self.take_deferred() {
            self.run_deferred(task);
        }
    }
}
