//! Visual identity for media items
//!
//! Every media item gets a cover color and a glyph without storing either.
//! The glyph depends only on the media type; the color is either the item's
//! explicit `background_color` or a value derived from its title.
//!
//! The title hash uses 32-bit two's-complement wraparound over UTF-16 code
//! units, so the same title yields the same color on every platform.

use crate::types::{MediaItem, MediaType};

/// Rendered identity of a media item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    /// CSS color string (`#rrggbb` when stored, `hsl(...)` when derived)
    pub color: String,
    pub glyph: &'static str,
}

/// Glyph for a media type
pub fn glyph_for(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Book => "📚",
        MediaType::Movie => "🎬",
        MediaType::TvShow => "📺",
        MediaType::Podcast => "🎙️",
        MediaType::Article => "📰",
        MediaType::Video => "📹",
        MediaType::Music => "🎵",
        MediaType::Other => "📌",
    }
}

/// Rolling hash of a title: `hash = unit + ((hash << 5) - hash)` per UTF-16 unit.
pub fn title_hash(title: &str) -> i32 {
    title.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// HSL color derived from a title.
///
/// Remainders are taken with `rem_euclid`, so negative hashes still land in
/// hue 0..360, saturation 50..70 and lightness 40..60.
pub fn color_from_title(title: &str) -> String {
    let hash = title_hash(title);
    let hue = hash.rem_euclid(360);
    let saturation = 50 + hash.rem_euclid(20);
    let lightness = 40 + hash.rem_euclid(20);
    format!("hsl({}, {}%, {}%)", hue, saturation, lightness)
}

/// Cover for a media item. An explicit non-empty `background_color` wins.
pub fn cover_for(item: &MediaItem) -> Cover {
    let color = match item.background_color.as_deref() {
        Some(color) if !color.is_empty() => color.to_string(),
        _ => color_from_title(&item.title),
    };

    Cover {
        color,
        glyph: glyph_for(item.media_type),
    }
}
