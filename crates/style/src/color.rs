//! Color token resolution.
//!
//! A color token is a name from a fixed table, a six digit hex string with or
//! without `#`, or an `rgb(r, g, b)` expression. Anything else resolves to
//! black: color resolution never fails its caller.

use crate::parsers::{parse_color, run_parser};
use pagescript_types::Color;

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("gray", Color::rgb(128, 128, 128)),
    ("darkgray", Color::rgb(169, 169, 169)),
    ("lightgray", Color::rgb(211, 211, 211)),
    ("orange", Color::rgb(255, 165, 0)),
    ("pink", Color::rgb(255, 192, 203)),
    ("purple", Color::rgb(128, 0, 128)),
    ("brown", Color::rgb(165, 42, 42)),
    ("navy", Color::rgb(0, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("gold", Color::rgb(255, 215, 0)),
    ("silver", Color::rgb(192, 192, 192)),
    ("lime", Color::rgb(0, 255, 0)),
    ("indigo", Color::rgb(75, 0, 130)),
    ("violet", Color::rgb(238, 130, 238)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("olive", Color::rgb(128, 128, 0)),
    ("aqua", Color::rgb(0, 255, 255)),
    ("skyblue", Color::rgb(135, 206, 235)),
    ("hotpink", Color::rgb(255, 105, 180)),
    ("crimson", Color::rgb(220, 20, 60)),
    ("royalblue", Color::rgb(65, 105, 225)),
    ("chartreuse", Color::rgb(127, 255, 0)),
    ("chocolate", Color::rgb(210, 105, 30)),
];

/// Looks up a color by name (case-insensitive).
pub fn named_color(name: &str) -> Option<Color> {
    let name = name.trim().to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| c.clone())
}

/// Resolves a color token to an RGB color, falling back to black.
pub fn resolve_color(token: &str) -> Color {
    let token = token.trim();
    if token.is_empty() {
        return Color::BLACK;
    }
    if let Some(color) = named_color(token) {
        return color;
    }
    match run_parser(parse_color, &token.to_lowercase()) {
        Ok(color) => color,
        Err(e) => {
            log::debug!("Unrecognized color '{}' ({}), using black", token, e);
            Color::BLACK
        }
    }
}
