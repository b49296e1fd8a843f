//! Heuristic single-pass text layout.
//!
//! Text is wrapped against a character budget derived from the font size,
//! aligned with a pluggable [`TextMeasurer`], and stacked downwards from a
//! cursor that only ever decreases.

pub mod config;
pub mod flow;
pub mod text;

mod elements;

pub use self::config::LayoutConfig;
pub use self::elements::{ImageElement, LayoutElement, PositionedElement, TextElement};
pub use self::flow::{TextFlow, aligned_x};
pub use self::text::{AverageWidthMeasurer, TextMeasurer};

pub use pagescript_types::geometry::{Rect, Size};
