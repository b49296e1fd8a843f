use crate::error::RenderError;
use pagescript_layout::PositionedElement;
use pagescript_types::Size;
use std::io::Write;

/// A trait for document renderers, abstracting the PDF-writing primitives.
///
/// Call order: `begin_document`, then any number of `add_image` and
/// `render_page` calls, then `finish` exactly once. Every page of a
/// document has the size given to `begin_document`.
pub trait DocumentRenderer {
    fn begin_document(&mut self, page_size: Size, title: Option<&str>) -> Result<(), RenderError>;

    /// Registers image bytes under `src` so that image elements referring to
    /// `src` can be drawn. Registering the same `src` twice is a no-op.
    fn add_image(&mut self, src: &str, data: &[u8]) -> Result<(), RenderError>;

    /// Draws `elements` in order onto a new page and seals it.
    fn render_page(&mut self, elements: &[PositionedElement]) -> Result<(), RenderError>;

    fn page_count(&self) -> usize;

    /// Serializes the finished document into `writer`.
    fn finish(&mut self, writer: &mut dyn Write) -> Result<(), RenderError>;
}
