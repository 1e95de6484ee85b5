use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};

use crate::map::MapSurface;
use crate::photos::Manifest;
use crate::viewer::Viewer;

/// Reads and parses the photo manifest.
pub async fn load_manifest(path: &Path) -> Result<Manifest> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest = Manifest::from_json(&json)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    Ok(manifest)
}

/// Loads the manifest into the viewer. On failure the error is logged and the
/// viewer stays empty; there is no retry.
pub async fn load_into<M: MapSurface>(viewer: &mut Viewer<M>, path: &Path) -> bool {
    info!("📂 Loading photo manifest: {}", path.display());
    match load_manifest(path).await {
        Ok(manifest) => {
            viewer.load(manifest);
            true
        }
        Err(e) => {
            error!("❌ Error loading photos: {:#}", e);
            false
        }
    }
}
