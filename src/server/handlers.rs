use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::sse::Event as SseEvent,
    response::{Html, IntoResponse, Json, Response, Sse},
};
use rust_embed::RustEmbed;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::{debug, warn};

use super::events::{ViewerEvent, ViewerFrame};
use super::state::AppState;
use crate::constants::{HEARTBEAT_SECS, KEEPALIVE_SECS, LAYOUT_SETTLE_MS};
use crate::lightbox::Key;
use crate::map::{MapStyle, SceneMap};
use crate::view::ViewMode;
use crate::viewer::{Deferred, Viewer};

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

/// Runs `action` against the viewer, publishes the resulting frame and
/// schedules whatever the action deferred.
fn apply<F>(state: &AppState, action: F) -> Result<Json<ViewerFrame>, StatusCode>
where
    F: FnOnce(&mut Viewer<SceneMap>),
{
    let (frame, deferred) = {
        let mut viewer = state.lock_viewer()?;
        action(&mut *viewer);
        let frame = ViewerFrame::update(&viewer, state.next_seq());
        // Sent under the lock so streams see frames in seq order
        state.publish(frame.clone());
        (frame, viewer.take_deferred())
    };

    for task in deferred {
        schedule(state.clone(), task);
    }
    Ok(Json(frame))
}

// Fire-and-forget: runs after the browser had time to lay the page out
fn schedule(state: AppState, task: Deferred) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(LAYOUT_SETTLE_MS)).await;
        match state.viewer.lock() {
            Ok(mut viewer) => {
                viewer.run_deferred(task);
                let frame = ViewerFrame::update(&viewer, state.next_seq());
                state.publish(frame);
            }
            Err(e) => warn!("Skipping {:?}, viewer lock poisoned: {}", task, e),
        }
    });
}

// HTTP API Handlers
pub async fn get_state(State(state): State<AppState>) -> Result<Json<ViewerFrame>, StatusCode> {
    let viewer = state.lock_viewer()?;
    Ok(Json(ViewerFrame::snapshot(&viewer, state.next_seq())))
}

pub async fn set_view(
    State(state): State<AppState>,
    AxumPath(mode): AxumPath<String>,
) -> Result<Json<ViewerFrame>, StatusCode> {
    let view: ViewMode = mode.parse().map_err(|e| {
        debug!("{}", e);
        StatusCode::BAD_REQUEST
    })?;
    apply(&state, |viewer| viewer.switch_view(view))
}

pub async fn set_map_style(
    State(state): State<AppState>,
    AxumPath(style): AxumPath<String>,
) -> Result<Json<ViewerFrame>, StatusCode> {
    let style: MapStyle = style.parse().map_err(|e| {
        debug!("{}", e);
        StatusCode::BAD_REQUEST
    })?;
    apply(&state, |viewer| viewer.switch_map_style(style))
}

pub async fn open_lightbox(
    State(state): State<AppState>,
    AxumPath(index): AxumPath<usize>,
) -> Result<Json<ViewerFrame>, StatusCode> {
    apply(&state, |viewer| {
        viewer.open_lightbox(index);
    })
}

pub async fn close_lightbox(State(state): State<AppState>) -> Result<Json<ViewerFrame>, StatusCode> {
    apply(&state, |viewer| viewer.close_lightbox())
}

pub async fn navigate_lightbox(
    State(state): State<AppState>,
    AxumPath(step): AxumPath<String>,
) -> Result<Json<ViewerFrame>, StatusCode> {
    let step = match step.as_str() {
        "next" => 1,
        "prev" => -1,
        _ => return Err(StatusCode::BAD_REQUEST),
    };
    apply(&state, |viewer| viewer.navigate(step))
}

pub async fn press_key(
    State(state): State<AppState>,
    AxumPath(key): AxumPath<String>,
) -> Result<Json<ViewerFrame>, StatusCode> {
    let key = Key::parse(&key);
    apply(&state, |viewer| viewer.handle_key(key))
}

pub async fn viewer_events_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::channel(100);

    // Subscribe to the main event sender
    let mut event_receiver = state.event_sender.subscribe();

    // Forward frames to this client until it disconnects
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = event_receiver.recv() => match event {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("SSE client lagged, {} frames skipped", skipped);
                        continue;
                    }
                    Err(_) => break, // Channel closed
                },
                _ = tokio::time::sleep(Duration::from_secs(HEARTBEAT_SECS)) => ViewerEvent::heartbeat(),
            };

            let sse_event = SseEvent::default()
                .json_data(&event)
                .unwrap_or_else(|_| SseEvent::default().data("Error serializing event"));

            if tx.send(Ok(sse_event)).await.is_err() {
                break; // Client disconnected
            }
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(KEEPALIVE_SECS))
            .text("keepalive-message"),
    )
}

fn embedded(path: &str, content_type: &'static str) -> Result<Response, StatusCode> {
    let asset = Asset::get(path).ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, content_type)], asset.data.into_owned()).into_response())
}

pub async fn index_html() -> Result<Html<Vec<u8>>, StatusCode> {
    let asset = Asset::get("index.html").ok_or(StatusCode::NOT_FOUND)?;
    Ok(Html(asset.data.into_owned()))
}

pub async fn style_css() -> Result<Response, StatusCode> {
    embedded("style.css", "text/css")
}

pub async fn script_js() -> Result<Response, StatusCode> {
    embedded("script.js", "application/javascript")
}
