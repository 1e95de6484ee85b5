use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir};
use tracing::{info, warn};

pub mod events;
pub mod handlers;
pub mod state;

use self::state::AppState;
use crate::utils::{local_url, open_browser};
use handlers::{
    close_lightbox, get_state, index_html, navigate_lightbox, open_lightbox, press_key, script_js,
    set_map_style, set_view, style_css, viewer_events_stream,
};

// Create the main application router. Anything not matched is served from the
// site root, which includes data/photos.json and the photos themselves.
pub fn create_app(state: AppState, site_root: &Path) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/state", get(get_state))
        .route("/api/events", get(viewer_events_stream))
        .route("/api/view/:mode", post(set_view))
        .route("/api/map-style/:style", post(set_map_style))
        .route("/api/lightbox/open/:index", post(open_lightbox))
        .route("/api/lightbox/close", post(close_lightbox))
        .route("/api/lightbox/navigate/:step", post(navigate_lightbox))
        .route("/api/key/:key", post(press_key))
        .fallback_service(ServeDir::new(site_root))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let port = state.settings.port;
    let auto_open = state.settings.auto_open_browser;
    let site_root = state.settings.site_root.clone();

    let app = create_app(state, Path::new(&site_root));
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = local_url(port);
    info!("   ✅ HTTP server started successfully at {}", url);
    info!("   📁 Serving site root {}", site_root);

    if auto_open {
        if let Err(e) = open_browser(&url) {
            warn!("⚠️  {:#}", e);
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::SceneMap;
    use crate::photos::tests::{gps_photo, plain_photo};
    use crate::photos::Manifest;
    use crate::settings::Settings;
    use crate::viewer::Viewer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> (AppState, Router) {
        let mut viewer = Viewer::new(SceneMap::new(), SceneMap::new());
        viewer.load(Manifest {
            photos: vec![
                gps_photo("a.jpg", 45.0, 9.0, Some(10.0)),
                plain_photo("b.jpg"),
                gps_photo("c.jpg", 45.1, 9.1, None),
            ],
        });
        let state = AppState::new(viewer, Settings::default());
        let app = create_app(state.clone(), Path::new("."));
        (state, app)
    }

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn state_reports_loaded_viewer() {
        let (_, app) = test_app();
        let (status, frame) = call(app, "GET", "/api/state").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(frame["loaded"], true);
        assert_eq!(frame["stats"]["with_gps"], 2);
        assert_eq!(frame["view"], "map");
        assert_eq!(frame["primary_map"]["tiles"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_view_is_rejected() {
        let (_, app) = test_app();
        let (status, _) = call(app, "POST", "/api/view/list").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn switching_view_updates_frame() {
        let (_, app) = test_app();
        let (status, frame) = call(app, "POST", "/api/view/gallery").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(frame["view"], "gallery");
    }

    #[tokio::test]
    async fn lightbox_open_and_key_navigation() {
        let (state, app) = test_app();
        let (_, frame) = call(app.clone(), "POST", "/api/lightbox/open/1").await;
        assert_eq!(frame["lightbox"]["open"], false);

        let (_, frame) = call(app.clone(), "POST", "/api/lightbox/open/0").await;
        assert_eq!(frame["lightbox"]["open"], true);
        assert_eq!(frame["lightbox"]["panel"]["title"], "a.jpg");

        let (_, frame) = call(app.clone(), "POST", "/api/key/ArrowRight").await;
        assert_eq!(frame["lightbox"]["current"], 2);

        let (status, _) = call(app.clone(), "POST", "/api/lightbox/navigate/sideways").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, frame) = call(app, "POST", "/api/key/Escape").await;
        assert_eq!(frame["lightbox"]["open"], false);
        assert!(!state.viewer.lock().unwrap().lightbox().open);
    }

    #[tokio::test]
    async fn actions_are_broadcast() {
        let (state, app) = test_app();
        let mut events = state.event_sender.subscribe();
        let (status, _) = call(app, "POST", "/api/map-style/osm").await;
        assert_eq!(status, StatusCode::OK);
        let event = events.recv().await.unwrap();
        assert_eq!(event.event_type, "frame");
        assert!(event.frame.is_some());
    }

    #[tokio::test]
    async fn frames_are_numbered_across_deferred_work() {
        let (state, app) = test_app();
        let mut events = state.event_sender.subscribe();

        let (_, snapshot) = call(app.clone(), "GET", "/api/state").await;
        assert!(snapshot["gallery_html"].as_str().unwrap().contains("a.jpg"));

        let (_, frame) = call(app, "POST", "/api/lightbox/open/0").await;
        let opened = frame["seq"].as_u64().unwrap();
        assert!(opened > snapshot["seq"].as_u64().unwrap());
        assert!(frame["gallery_html"].is_null());
        assert_eq!(frame["gallery_rev"], snapshot["gallery_rev"]);

        let broadcast = events.recv().await.unwrap().frame.unwrap();
        assert_eq!(broadcast.seq, opened);

        // The lightbox map refresh lands 100 ms later, in a newer frame
        let deferred = events.recv().await.unwrap().frame.unwrap();
        assert!(deferred.seq > opened);
        let deferred = serde_json::to_value(&deferred).unwrap();
        assert_eq!(deferred["lightbox_map"]["camera"]["zoom"], 18);
        assert_eq!(deferred["lightbox_map"]["camera"]["center"]["lat"], 45.0);
    }

    #[tokio::test]
    async fn serves_embedded_page() {
        let (_, app) = test_app();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
