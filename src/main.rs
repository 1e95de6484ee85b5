use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Import modules
mod constants;
mod gallery;
mod geo;
mod lightbox;
mod loader;
mod map;
mod photos;
mod server;
mod settings;
mod utils;
mod view;
mod viewer;

use map::SceneMap;
use server::{start_server, state::AppState};
use settings::Settings;
use viewer::Viewer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🗺️  PhotoMap Viewer v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("Failed to load settings")?;
    let config_path = Settings::config_path();
    if !config_path.exists() {
        // Leave an editable copy of the defaults next to the binary
        match settings.save() {
            Ok(()) => info!("⚙️  Wrote default settings to {}", config_path.display()),
            Err(e) => warn!("⚠️  Could not write {}: {:#}", config_path.display(), e),
        }
    } else {
        info!("⚙️  Settings: {}", config_path.display());
    }

    let mut viewer = Viewer::new(SceneMap::new(), SceneMap::new())
        .with_defaults(settings.default_view, settings.map_style);

    // The page stays empty if the manifest cannot be read
    let manifest_path = settings.manifest_path();
    if !loader::load_into(&mut viewer, &manifest_path).await {
        warn!("⚠️  Starting without photos, check site_root in photomap.ini");
    }

    let app_state = AppState::new(viewer, settings);
    start_server(app_state).await?;

    Ok(())
}
