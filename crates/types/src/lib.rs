pub mod color;
pub mod diagnostics;
pub mod geometry;

pub use color::Color;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use geometry::{Rect, Size};
