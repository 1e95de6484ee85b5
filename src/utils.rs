use anyhow::{Context, Result};
use std::process::Command;

/// Opens `url` in the user's default browser.
pub fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    let result = Command::new("cmd").args(["/C", "start", "", url]).spawn();

    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(url).spawn();

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let result = Command::new("xdg-open").arg(url).spawn();

    result
        .map(|_| ())
        .with_context(|| format!("Failed to open browser at {}", url))
}

/// Local address the viewer is served on.
pub fn local_url(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}
