use pagescript_types::{Color, Rect};

/// A simple, geometry-aware data structure representing a single drawable item.
/// A page is simply an ordered collection of these. `y` is the text baseline
/// (or the bottom edge of an image) in PDF user space, origin bottom-left.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

impl PositionedElement {
    pub fn text(x: f32, y: f32, width: f32, text: TextElement) -> Self {
        Self {
            x,
            y,
            width,
            height: text.font_size,
            element: LayoutElement::Text(text),
        }
    }

    /// An image stretched over `rect`.
    pub fn image(rect: Rect, src: impl Into<String>) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            element: LayoutElement::Image(ImageElement { src: src.into() }),
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.element {
            LayoutElement::Text(t) => Some(t),
            LayoutElement::Image(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    Image(ImageElement),
}

impl std::fmt::Display for LayoutElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutElement::Text(t) => write!(f, "Text(\"{}\")", t.content),
            LayoutElement::Image(i) => write!(f, "Image(src=\"{}\")", i.src),
        }
    }
}

/// One wrapped line of text, carrying the font and color it is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub font: String,
    pub font_size: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageElement {
    /// Resource path, relative to the document's base directory.
    pub src: String,
}
