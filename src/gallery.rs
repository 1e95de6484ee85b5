use crate::photos::{gps_photos, Photo};

const EMPTY_PLACEHOLDER: &str = "No photos with GPS found";

/// Re-formats an EXIF style `YYYY:MM:DD HH:MM:SS` timestamp as `DD/MM/YYYY`.
///
/// Anything whose date part does not split into exactly three `:` separated
/// fields is returned unchanged.
pub fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let date_part = raw.split(' ').next().unwrap_or(raw);
    let parts: Vec<&str> = date_part.split(':').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => raw.to_string(),
    }
}

/// Compass heading rounded to whole degrees, half-up like a browser would.
pub fn format_direction(direction: f64) -> String {
    format!("{}°", (direction + 0.5).floor() as i64)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    /// Index in the full collection, the lightbox opens at this position.
    pub index: usize,
    pub filename: String,
    pub thumb: String,
    pub date: Option<String>,
    pub direction: Option<String>,
}

impl GalleryCard {
    fn from_photo(index: usize, photo: &Photo) -> Self {
        Self {
            index,
            filename: photo.filename().to_string(),
            thumb: photo.thumb.clone(),
            date: photo
                .date
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(format_date),
            direction: photo.direction.map(format_direction),
        }
    }

    fn to_html(&self) -> String {
        let mut meta = String::new();
        if let Some(date) = &self.date {
            meta.push_str(&format!("<span>📅 {}</span>", escape_html(date)));
        }
        meta.push_str(r#"<span class="gps-badge has-gps">📍 GPS</span>"#);
        if let Some(direction) = &self.direction {
            meta.push_str(&format!("<span>🧭 {direction}</span>"));
        }

        let filename = escape_html(&self.filename);
        format!(
            r#"<div class="photo-card" data-index="{index}">
<img src="{thumb}" alt="{filename}" loading="lazy">
<div class="photo-card-info">
<div class="photo-card-name">{filename}</div>
<div class="photo-card-meta">{meta}</div>
</div>
</div>"#,
            index = self.index,
            thumb = escape_html(&self.thumb),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gallery {
    Empty,
    Cards(Vec<GalleryCard>),
}

impl Gallery {
    #[cfg(test)]
    pub fn cards(&self) -> &[GalleryCard] {
        match self {
            Gallery::Empty => &[],
            Gallery::Cards(cards) => cards,
        }
    }

    /// Markup for the `photo-grid` container.
    pub fn to_html(&self) -> String {
        match self {
            Gallery::Empty => format!(r#"<div class="loading">{EMPTY_PLACEHOLDER}</div>"#),
            Gallery::Cards(cards) => cards.iter().map(GalleryCard::to_html).collect::<Vec<_>>().join("\n"),
        }
    }
}

/// One card per GPS photo, in collection order.
pub fn render_gallery(photos: &[Photo]) -> Gallery {
    let cards: Vec<GalleryCard> = gps_photos(photos)
        .map(|(index, photo)| GalleryCard::from_photo(index, photo))
        .collect();
    if cards.is_empty() {
        Gallery::Empty
    } else {
        Gallery::Cards(cards)
    }
}
