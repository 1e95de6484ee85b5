use serde::Serialize;

use crate::gallery::{format_date, format_direction};
use crate::photos::Photo;

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn parse(key: &str) -> Self {
        match key {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Text and image shown in the lightbox overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightboxPanel {
    pub index: usize,
    pub image: String,
    pub title: String,
    pub date: String,
    pub camera: String,
    pub gps: String,
    pub direction: String,
}

impl LightboxPanel {
    pub fn for_photo(index: usize, photo: &Photo) -> Self {
        let date = match photo.date.as_deref() {
            Some(date) if !date.is_empty() => format!("📅 {}", format_date(date)),
            _ => String::new(),
        };
        let camera = match photo.camera.as_deref() {
            Some(camera) if !camera.is_empty() => format!("📷 {camera}"),
            _ => String::new(),
        };
        let gps = match (photo.lat, photo.lon) {
            (Some(lat), Some(lon)) => format!("📍 {lat:.6}, {lon:.6}"),
            _ => String::new(),
        };
        let direction = photo
            .direction
            .map(|d| format!("🧭 {}", format_direction(d)))
            .unwrap_or_default();

        Self {
            index,
            image: photo.display.clone(),
            title: photo.filename().to_string(),
            date,
            camera,
            gps,
            direction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lightbox {
    pub open: bool,
    /// Index into the full collection.
    pub current: Option<usize>,
    pub panel: Option<LightboxPanel>,
}

impl Lightbox {
    pub fn show(&mut self, panel: LightboxPanel) {
        self.current = Some(panel.index);
        self.panel = Some(panel);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Collection index reached by moving `step` places through `sequence`.
///
/// `sequence` lists the collection indices of the GPS photos in order. The
/// walk wraps at both ends. A `current` that is not in the sequence counts as
/// position -1, so a forward step lands on the first photo and a backward
/// step on the last.
pub fn step_through(sequence: &[usize], current: Option<usize>, step: isize) -> Option<usize> {
    if sequence.is_empty() {
        return None;
    }
    let len = sequence.len() as isize;
    let position = current
        .and_then(|c| sequence.iter().position(|&i| i == c))
        .map_or(-1, |p| p as isize);

    let mut next = position + step;
    if next < 0 {
        next = len - 1;
    }
    if next >= len {
        next = 0;
    }
    Some(sequence[next as usize])
}
