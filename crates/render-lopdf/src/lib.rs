//! PDF renderer using lopdf.
//!
//! Builds the whole document in memory and serializes it on `finish`. Text
//! is set in the standard Type1 fonts, so no font data is embedded.

mod page;
mod renderer;

pub use renderer::LopdfRenderer;
