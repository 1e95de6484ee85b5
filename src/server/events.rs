use serde::Serialize;

use crate::lightbox::Lightbox;
use crate::map::{MapStyle, SceneMap};
use crate::photos::PhotoStats;
use crate::view::ViewMode;
use crate::viewer::Viewer;

// SSE event types
#[derive(Debug, Clone, Serialize)]
pub struct ViewerEvent {
    pub event_type: String,
    pub frame: Option<ViewerFrame>,
}

impl ViewerEvent {
    pub fn frame(frame: ViewerFrame) -> Self {
        Self {
            event_type: "frame".to_string(),
            frame: Some(frame),
        }
    }

    pub fn heartbeat() -> Self {
        Self {
            event_type: "heartbeat".to_string(),
            frame: None,
        }
    }
}

/// Everything the browser needs to draw the page.
///
/// `seq` grows with every frame taken under the viewer lock, so a client can
/// drop any frame older than one it has already applied. The gallery markup
/// only rides along in snapshots, other frames just carry its revision.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerFrame {
    pub seq: u64,
    pub loaded: bool,
    pub stats: PhotoStats,
    pub view: ViewMode,
    pub map_style: MapStyle,
    pub gallery_rev: u64,
    pub gallery_html: Option<String>,
    pub lightbox: Lightbox,
    pub primary_map: SceneMap,
    pub lightbox_map: SceneMap,
}

impl ViewerFrame {
    /// Full state, for a client that is starting from scratch.
    pub fn snapshot(viewer: &Viewer<SceneMap>, seq: u64) -> Self {
        Self::build(viewer, seq, true)
    }

    /// State after an action, without the gallery markup.
    pub fn update(viewer: &Viewer<SceneMap>, seq: u64) -> Self {
        Self::build(viewer, seq, false)
    }

    fn build(viewer: &Viewer<SceneMap>, seq: u64, with_gallery: bool) -> Self {
        Self {
            seq,
            loaded: viewer.is_loaded(),
            stats: viewer.stats(),
            view: viewer.view(),
            map_style: viewer.map_style(),
            gallery_rev: viewer.gallery_rev(),
            gallery_html: with_gallery.then(|| viewer.gallery().to_html()),
            lightbox: viewer.lightbox().clone(),
            primary_map: viewer.maps().primary().clone(),
            lightbox_map: viewer.maps().lightbox().clone(),
        }
    }
}
