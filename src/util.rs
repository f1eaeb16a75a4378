use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::Color32;

use crate::data::{Category, GraphNode};

/// One entry per category, indexed by [`Category::ordinal`].
pub const CATEGORY_PALETTE: [Color32; 12] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
    Color32::from_rgb(174, 199, 232),
    Color32::from_rgb(255, 152, 150),
    Color32::from_rgb(127, 127, 127),
];

pub fn category_color(category: Option<Category>) -> Color32 {
    let category = category.unwrap_or(Category::Default);
    CATEGORY_PALETTE[category.ordinal() % CATEGORY_PALETTE.len()]
}

/// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`.
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();

    match hex.len() {
        3 => {
            let r = channel(0..1)?;
            let g = channel(1..2)?;
            let b = channel(2..3)?;
            Some(Color32::from_rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

/// Trailing path segment when a path is present, otherwise the bare name.
pub fn display_label(node: &GraphNode) -> &str {
    match node.path.as_deref() {
        Some(path) if !path.trim_end_matches('/').is_empty() => path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(path),
        _ => node.name.as_str(),
    }
}

pub fn stable_pair(key: impl Hash) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_trailing_path_segment() {
        let node = GraphNode::new(1, "Header", Some(Category::Component))
            .with_path("src/components/Header.tsx");
        assert_eq!(display_label(&node), "Header.tsx");

        let bare = GraphNode::new(2, "next.config.js", Some(Category::Config));
        assert_eq!(display_label(&bare), "next.config.js");

        let trailing = GraphNode::new(3, "app", None).with_path("src/app/");
        assert_eq!(display_label(&trailing), "app");
    }

    #[test]
    fn hex_colors_parse_in_short_and_long_form() {
        assert_eq!(parse_hex_color("#fff"), Some(Color32::from_rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#1f77b4"), Some(Color32::from_rgb(31, 119, 180)));
        assert_eq!(parse_hex_color("1f77b4"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn palette_colors_are_stable_per_category() {
        assert_eq!(
            category_color(Some(Category::Config)),
            category_color(Some(Category::Config))
        );
        assert_ne!(
            category_color(Some(Category::Page)),
            category_color(Some(Category::Api))
        );
        assert_eq!(category_color(None), category_color(Some(Category::Default)));
    }
}
