use crate::page::{PageContext, font_resource_name};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use pagescript_layout::PositionedElement;
use pagescript_render_core::utils::to_win_ansi;
use pagescript_render_core::{DocumentRenderer, RenderError, StandardFont};
use pagescript_types::Size;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

/// A decoded image stored once in the document and referenced by name.
#[derive(Debug, Clone)]
pub(crate) struct ImageXObject {
    pub id: ObjectId,
    pub name: String,
}

/// A PDF renderer using the `lopdf` library. The document is assembled in
/// memory and written out by [`DocumentRenderer::finish`].
pub struct LopdfRenderer {
    doc: Document,
    pages_id: ObjectId,
    page_size: Option<Size>,
    title: Option<String>,
    font_ids: BTreeMap<StandardFont, ObjectId>,
    images: HashMap<String, ImageXObject>,
    page_ids: Vec<ObjectId>,
    finished: bool,
}

impl Default for LopdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfRenderer {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_size: None,
            title: None,
            font_ids: BTreeMap::new(),
            images: HashMap::new(),
            page_ids: Vec::new(),
            finished: false,
        }
    }

    /// The font dictionary for `font`, created on first use.
    fn font_id(&mut self, font: StandardFont) -> ObjectId {
        if let Some(id) = self.font_ids.get(&font) {
            return *id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_ids.insert(font, id);
        id
    }

    fn page_resources(
        &mut self,
        fonts: impl IntoIterator<Item = StandardFont>,
        images: impl IntoIterator<Item = String>,
    ) -> Dictionary {
        let mut font_dict = Dictionary::new();
        for font in fonts {
            let id = self.font_id(font);
            font_dict.set(font_resource_name(font), Object::Reference(id));
        }

        let mut xobject_dict = Dictionary::new();
        for src in images {
            if let Some(xobject) = self.images.get(&src) {
                xobject_dict.set(xobject.name.clone(), Object::Reference(xobject.id));
            }
        }

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_dict));
        if !xobject_dict.is_empty() {
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }
        resources
    }

    fn write_info(&mut self) -> ObjectId {
        let mut info = dictionary! {
            "Producer" => Object::String(b"pagescript".to_vec(), StringFormat::Literal),
        };
        if let Some(title) = &self.title {
            info.set(
                "Title",
                Object::String(to_win_ansi(title), StringFormat::Literal),
            );
        }
        self.doc.add_object(info)
    }
}

impl DocumentRenderer for LopdfRenderer {
    fn begin_document(&mut self, page_size: Size, title: Option<&str>) -> Result<(), RenderError> {
        if self.finished {
            return Err(RenderError::Other("Renderer already finished".into()));
        }
        log::debug!(
            "Beginning PDF document ({:.2} x {:.2} pt)",
            page_size.width,
            page_size.height
        );
        self.page_size = Some(page_size);
        self.title = title.map(str::to_string);
        Ok(())
    }

    fn add_image(&mut self, src: &str, data: &[u8]) -> Result<(), RenderError> {
        if self.images.contains_key(src) {
            return Ok(());
        }
        let decoded = image::load_from_memory(data).map_err(|e| RenderError::Image {
            src: src.to_string(),
            message: e.to_string(),
        })?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
            },
            rgb.into_raw(),
        );
        let id = self.doc.add_object(stream);
        let name = format!("Im{}", self.images.len() + 1);
        log::debug!("Registered image '{}' as /{} ({}x{})", src, name, width, height);
        self.images.insert(
            src.to_string(),
            ImageXObject { id, name },
        );
        Ok(())
    }

    fn render_page(&mut self, elements: &[PositionedElement]) -> Result<(), RenderError> {
        let size = self.page_size.ok_or(RenderError::NotStarted)?;

        let mut ctx = PageContext::new(&self.images);
        for el in elements {
            ctx.draw_element(el);
        }
        let output = ctx.finish();

        let resources = self.page_resources(output.fonts, output.images);
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), output.content.encode()?));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), size.width.into(), size.height.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        log::debug!(
            "Sealed page {} with {} element(s)",
            self.page_ids.len(),
            elements.len()
        );
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn finish(&mut self, writer: &mut dyn Write) -> Result<(), RenderError> {
        if self.finished {
            return Err(RenderError::Other("Renderer already finished".into()));
        }
        if self.page_size.is_none() {
            return Err(RenderError::NotStarted);
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.write_info();
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        let mut writer = writer;
        self.doc.save_to(&mut writer)?;
        writer.flush()?;
        self.finished = true;
        Ok(())
    }
}

impl LopdfRenderer {
    /// Content of every sealed page, decoded. Intended for inspection in tests
    /// and debugging.
    pub fn page_contents(&self) -> Vec<Content> {
        self.page_ids
            .iter()
            .filter_map(|id| self.doc.get_page_content(*id).ok())
            .filter_map(|bytes| Content::decode(&bytes).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use pagescript_layout::TextElement;
    use pagescript_types::{Color, Rect};
    use std::io::Cursor;

    const A4: Size = Size {
        width: 595.2756,
        height: 841.8898,
    };

    fn text(content: &str, font: &str) -> PositionedElement {
        PositionedElement::text(
            50.0,
            741.89,
            100.0,
            TextElement {
                content: content.to_string(),
                font: font.to_string(),
                font_size: 20.0,
                color: Color::rgb(255, 0, 0),
            },
        )
    }

    fn png_bytes() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(2, 2, Rgb([0u8, 128, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn finish(renderer: &mut LopdfRenderer) -> Document {
        let mut bytes = Vec::new();
        renderer.finish(&mut bytes).unwrap();
        Document::load_mem(&bytes).unwrap()
    }

    fn operators(content: &Content) -> Vec<&str> {
        content.operations.iter().map(|op| op.operator.as_str()).collect()
    }

    fn base_font_names(doc: &Document, page_id: ObjectId) -> Vec<Vec<u8>> {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        fonts
            .iter()
            .map(|(_, v)| {
                let font = doc.get_object(v.as_reference().unwrap()).unwrap();
                match font.as_dict().unwrap().get(b"BaseFont").unwrap() {
                    Object::Name(name) => name.clone(),
                    other => panic!("unexpected BaseFont {:?}", other),
                }
            })
            .collect()
    }

    #[test]
    fn test_single_text_page() {
        let mut renderer = LopdfRenderer::new();
        renderer.begin_document(A4, Some("Report")).unwrap();
        renderer.render_page(&[text("Hello world", "Courier")]).unwrap();
        assert_eq!(renderer.page_count(), 1);

        let contents = renderer.page_contents();
        assert_eq!(operators(&contents[0]), vec!["BT", "Tf", "rg", "Td", "Tj", "ET"]);

        let doc = finish(&mut renderer);
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.get(&1).unwrap();
        assert_eq!(base_font_names(&doc, page_id), vec![b"Courier".to_vec()]);

        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
        match info.get(b"Title").unwrap() {
            Object::String(bytes, _) => assert_eq!(bytes, b"Report"),
            other => panic!("unexpected title {:?}", other),
        }
    }

    #[test]
    fn test_font_and_color_are_not_repeated() {
        let mut renderer = LopdfRenderer::new();
        renderer.begin_document(A4, None).unwrap();
        renderer
            .render_page(&[text("one", "Helvetica"), text("two", "Helvetica")])
            .unwrap();
        let contents = renderer.page_contents();
        let ops = operators(&contents[0]);
        assert_eq!(ops.iter().filter(|o| **o == "Tf").count(), 1);
        assert_eq!(ops.iter().filter(|o| **o == "rg").count(), 1);
        assert_eq!(ops.iter().filter(|o| **o == "Tj").count(), 2);
    }

    #[test]
    fn test_unknown_font_falls_back_to_helvetica() {
        let mut renderer = LopdfRenderer::new();
        renderer.begin_document(A4, None).unwrap();
        renderer.render_page(&[text("x", "Papyrus")]).unwrap();
        let doc = finish(&mut renderer);
        let page_id = *doc.get_pages().get(&1).unwrap();
        assert_eq!(base_font_names(&doc, page_id), vec![b"Helvetica".to_vec()]);
    }

    #[test]
    fn test_full_page_image() {
        let mut renderer = LopdfRenderer::new();
        renderer.begin_document(A4, None).unwrap();
        renderer.add_image("bg.png", &png_bytes()).unwrap();
        renderer.add_image("bg.png", &png_bytes()).unwrap();
        renderer
            .render_page(&[
                PositionedElement::image(Rect::from_size(A4), "bg.png"),
                text("on top", "Times-Roman"),
            ])
            .unwrap();

        let contents = renderer.page_contents();
        let ops = operators(&contents[0]);
        assert_eq!(&ops[..4], &["q", "cm", "Do", "Q"]);

        let doc = finish(&mut renderer);
        let page_id = *doc.get_pages().get(&1).unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert_eq!(xobjects.len(), 1);
    }

    #[test]
    fn test_undecodable_image_is_an_error() {
        let mut renderer = LopdfRenderer::new();
        renderer.begin_document(A4, None).unwrap();
        let err = renderer.add_image("bad.png", b"not an image").unwrap_err();
        assert!(matches!(err, RenderError::Image { ref src, .. } if src == "bad.png"));
    }

    #[test]
    fn test_page_before_begin_is_rejected() {
        let mut renderer = LopdfRenderer::new();
        assert!(matches!(
            renderer.render_page(&[]),
            Err(RenderError::NotStarted)
        ));
    }

    #[test]
    fn test_multiple_pages_keep_order() {
        let mut renderer = LopdfRenderer::new();
        renderer.begin_document(A4, None).unwrap();
        renderer.render_page(&[text("first", "Courier")]).unwrap();
        renderer.render_page(&[]).unwrap();
        renderer.render_page(&[text("third", "Courier")]).unwrap();
        let doc = finish(&mut renderer);
        assert_eq!(doc.get_pages().len(), 3);
        assert!(renderer.finish(&mut Vec::new()).is_err());
    }
}
