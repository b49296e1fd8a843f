//! Core rendering abstractions for PDF generation.
//!
//! - `DocumentRenderer`, the backend-facing capability trait
//! - `RenderError`
//! - metrics for the standard PDF fonts, usable as a `TextMeasurer`
//! - text encoding helpers shared by backends

mod error;
pub mod metrics;
mod traits;
pub mod utils;

pub use error::RenderError;
pub use metrics::{StandardFont, StandardFontMetrics};
pub use traits::DocumentRenderer;
