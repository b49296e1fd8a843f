//! Page geometry primitives: named paper sizes and orientation.
use pagescript_types::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    A3,
}

impl PageSize {
    /// Portrait dimensions in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.2756, 841.8898),
            PageSize::Letter => (612.0, 792.0),
            PageSize::A3 => (841.8898, 1190.5512),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageSize::A4 => "a4",
            PageSize::Letter => "letter",
            PageSize::A3 => "a3",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// Orients a paper size: portrait keeps the short edge horizontal,
    /// landscape the long edge.
    pub fn apply(&self, size: PageSize) -> Size {
        let (w, h) = size.dimensions_pt();
        let (short, long) = if w <= h { (w, h) } else { (h, w) };
        match self {
            PageOrientation::Portrait => Size::new(short, long),
            PageOrientation::Landscape => Size::new(long, short),
        }
    }
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageOrientation::Portrait => "portrait",
            PageOrientation::Landscape => "landscape",
        })
    }
}
