use axum::http::StatusCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::error;

use super::events::{ViewerEvent, ViewerFrame};
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::map::SceneMap;
use crate::settings::Settings;
use crate::viewer::Viewer;

// Application state shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub viewer: Arc<Mutex<Viewer<SceneMap>>>,
    pub settings: Arc<Settings>,
    pub event_sender: broadcast::Sender<ViewerEvent>,
    frame_seq: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(viewer: Viewer<SceneMap>, settings: Settings) -> Self {
        let (event_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            viewer: Arc::new(Mutex::new(viewer)),
            settings: Arc::new(settings),
            event_sender,
            frame_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn lock_viewer(&self) -> Result<MutexGuard<'_, Viewer<SceneMap>>, StatusCode> {
        self.viewer.lock().map_err(|e| {
            error!("Viewer lock poisoned: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }

    /// Next frame number. Call it while holding the viewer lock so numbering
    /// follows the order in which the viewer changed.
    pub fn next_seq(&self) -> u64 {
        self.frame_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Sends a frame to every open event stream.
    pub fn publish(&self, frame: ViewerFrame) {
        // No subscribers is fine
        let _ = self.event_sender.send(ViewerEvent::frame(frame));
    }
}
