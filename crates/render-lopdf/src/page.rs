//! Translation of one page of positioned elements into a content stream.

use crate::renderer::ImageXObject;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use pagescript_layout::{ImageElement, LayoutElement, PositionedElement, TextElement};
use pagescript_render_core::StandardFont;
use pagescript_render_core::utils::{rgb_components, to_win_ansi};
use pagescript_types::Color;
use std::collections::{BTreeSet, HashMap};

/// Resource name of a standard font inside a page's `/Font` dictionary.
pub(crate) fn font_resource_name(font: StandardFont) -> String {
    format!("F{}", font as u8 + 1)
}

#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font: Option<(StandardFont, f32)>,
    fill_color: Option<Color>,
}

/// What a finished page needs from the document: its operations plus the
/// fonts and images it refers to.
pub(crate) struct PageOutput {
    pub content: Content,
    pub fonts: BTreeSet<StandardFont>,
    pub images: BTreeSet<String>,
}

pub(crate) struct PageContext<'a> {
    content: Content,
    state: PageRenderState,
    images: &'a HashMap<String, ImageXObject>,
    fonts_used: BTreeSet<StandardFont>,
    images_used: BTreeSet<String>,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(images: &'a HashMap<String, ImageXObject>) -> Self {
        Self {
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
            images,
            fonts_used: BTreeSet::new(),
            images_used: BTreeSet::new(),
        }
    }

    pub(crate) fn finish(self) -> PageOutput {
        PageOutput {
            content: self.content,
            fonts: self.fonts_used,
            images: self.images_used,
        }
    }

    pub(crate) fn draw_element(&mut self, el: &PositionedElement) {
        match &el.element {
            LayoutElement::Text(text) => self.draw_text(text, el),
            LayoutElement::Image(image) => self.draw_image(image, el),
        }
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_font(&mut self, name: &str, size: f32) {
        let font = StandardFont::from_name(name).unwrap_or_else(|| {
            log::debug!("'{}' is not a standard font, drawing with Helvetica", name);
            StandardFont::Helvetica
        });
        if self.state.font != Some((font, size)) {
            self.push(
                "Tf",
                vec![Object::Name(font_resource_name(font).into_bytes()), size.into()],
            );
            self.state.font = Some((font, size));
            self.fonts_used.insert(font);
        }
    }

    fn set_fill_color(&mut self, color: &Color) {
        if self.state.fill_color.as_ref() != Some(color) {
            let [r, g, b] = rgb_components(color);
            self.push("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill_color = Some(color.clone());
        }
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) {
        if text.content.trim().is_empty() {
            return;
        }
        self.push("BT", vec![]);
        self.set_font(&text.font, text.font_size);
        self.set_fill_color(&text.color);
        self.push("Td", vec![el.x.into(), el.y.into()]);
        self.push(
            "Tj",
            vec![Object::String(to_win_ansi(&text.content), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    fn draw_image(&mut self, image: &ImageElement, el: &PositionedElement) {
        let Some(xobject) = self.images.get(&image.src) else {
            log::warn!("Image '{}' was never registered, skipping", image.src);
            return;
        };
        let name = xobject.name.clone().into_bytes();
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                el.width.into(),
                Object::Integer(0),
                Object::Integer(0),
                el.height.into(),
                el.x.into(),
                el.y.into(),
            ],
        );
        self.push("Do", vec![Object::Name(name)]);
        self.push("Q", vec![]);
        self.images_used.insert(image.src.clone());
    }
}
