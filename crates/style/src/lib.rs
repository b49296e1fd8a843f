pub mod cascade;
pub mod color;
pub mod dimension;
pub mod parsers;
pub mod stylesheet;
pub mod text;

pub use cascade::{CommandKind, StyleAttribute, StyleOverride, resolve_style};
pub use color::resolve_color;
pub use dimension::{PageOrientation, PageSize};
pub use parsers::StyleParseError;
pub use stylesheet::{EffectiveStyle, StyleDefaults};
pub use text::TextAlign;
