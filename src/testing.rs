//! A renderer that records what it is asked to draw, for tests.

use pagescript_layout::PositionedElement;
use pagescript_render_core::{DocumentRenderer, RenderError};
use pagescript_types::Size;
use std::io::Write;

/// Keeps every call in memory and writes a short text summary on `finish`.
/// Image bytes are accepted without decoding.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub page_size: Option<Size>,
    pub title: Option<String>,
    /// Registered image sources, in registration order.
    pub images: Vec<String>,
    pub pages: Vec<Vec<PositionedElement>>,
}

impl DocumentRenderer for RecordingRenderer {
    fn begin_document(&mut self, page_size: Size, title: Option<&str>) -> Result<(), RenderError> {
        self.page_size = Some(page_size);
        self.title = title.map(str::to_string);
        Ok(())
    }

    fn add_image(&mut self, src: &str, _data: &[u8]) -> Result<(), RenderError> {
        if !self.images.iter().any(|s| s == src) {
            self.images.push(src.to_string());
        }
        Ok(())
    }

    fn render_page(&mut self, elements: &[PositionedElement]) -> Result<(), RenderError> {
        if self.page_size.is_none() {
            return Err(RenderError::NotStarted);
        }
        self.pages.push(elements.to_vec());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finish(&mut self, writer: &mut dyn Write) -> Result<(), RenderError> {
        for (i, page) in self.pages.iter().enumerate() {
            writeln!(writer, "page {}", i + 1)?;
            for el in page {
                writeln!(writer, "  {} at ({:.2}, {:.2})", el.element, el.x, el.y)?;
            }
        }
        Ok(())
    }
}
