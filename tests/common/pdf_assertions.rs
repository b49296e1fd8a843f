use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object, ObjectId};

fn page_id(doc: &LopdfDocument, page_num: u32) -> ObjectId {
    *doc.get_pages()
        .get(&page_num)
        .unwrap_or_else(|| panic!("page {} does not exist", page_num))
}

pub fn page_content(doc: &LopdfDocument, page_num: u32) -> Content {
    doc.get_and_decode_page_content(page_id(doc, page_num))
        .expect("page content decodes")
}

/// Every string drawn with `Tj` on the page, in order.
pub fn page_strings(doc: &LopdfDocument, page_num: u32) -> Vec<String> {
    page_content(doc, page_num)
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .collect()
}

/// `(x, y)` of every `Td` on the page.
pub fn text_positions(doc: &LopdfDocument, page_num: u32) -> Vec<(f32, f32)> {
    page_content(doc, page_num)
        .operations
        .iter()
        .filter(|op| op.operator == "Td")
        .map(|op| {
            let x = op.operands[0].as_float().expect("numeric x");
            let y = op.operands[1].as_float().expect("numeric y");
            (x, y)
        })
        .collect()
}

pub fn operators(doc: &LopdfDocument, page_num: u32) -> Vec<String> {
    page_content(doc, page_num)
        .operations
        .iter()
        .map(|op| op.operator.clone())
        .collect()
}

/// BaseFont names referenced from the page's font resources.
pub fn page_font_names(doc: &LopdfDocument, page_num: u32) -> Vec<String> {
    let page = doc
        .get_object(page_id(doc, page_num))
        .and_then(Object::as_dict)
        .expect("page dictionary");
    let Ok(resources) = page.get(b"Resources").and_then(Object::as_dict) else {
        return Vec::new();
    };
    let Ok(fonts) = resources.get(b"Font").and_then(Object::as_dict) else {
        return Vec::new();
    };
    let mut names: Vec<String> = fonts
        .iter()
        .filter_map(|(_, v)| v.as_reference().ok())
        .filter_map(|id| doc.get_object(id).and_then(Object::as_dict).ok())
        .filter_map(|font| font.get(b"BaseFont").and_then(Object::as_name).ok())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();
    names.sort();
    names
}

/// `[width, height]` from the page's MediaBox.
pub fn page_size(doc: &LopdfDocument, page_num: u32) -> (f32, f32) {
    let page = doc
        .get_object(page_id(doc, page_num))
        .and_then(Object::as_dict)
        .expect("page dictionary");
    let media_box = page
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .expect("MediaBox");
    (
        media_box[2].as_float().expect("width"),
        media_box[3].as_float().expect("height"),
    )
}

/// Whether the page's resources name any image XObject.
pub fn page_has_image(doc: &LopdfDocument, page_num: u32) -> bool {
    let page = doc
        .get_object(page_id(doc, page_num))
        .and_then(Object::as_dict)
        .expect("page dictionary");
    page.get(b"Resources")
        .and_then(Object::as_dict)
        .and_then(|r| r.get(b"XObject"))
        .and_then(Object::as_dict)
        .map(|x| !x.is_empty())
        .unwrap_or(false)
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
