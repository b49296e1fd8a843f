pub mod pdf_assertions;

use image::{ImageBuffer, ImageFormat, Rgb};
use lopdf::Document as LopdfDocument;
use pagescript::{EngineConfig, Interpreter, RenderReport};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A document written into a fresh temporary directory, with the PDF
/// written next to it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let _ = env_logger::builder().is_test(true).try_init();
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &[u8]) -> std::io::Result<()> {
        fs::write(self.dir.path().join(name), contents)
    }

    /// Writes `source` as `doc.ddl` and interprets it with output going to
    /// the workspace directory.
    pub fn run(&self, source: &str) -> Result<RenderReport, Box<dyn std::error::Error>> {
        self.write("doc.ddl", source.as_bytes())?;
        let config = EngineConfig::default().with_output_dir(self.dir.path());
        Ok(Interpreter::new(config).run_file(self.dir.path().join("doc.ddl"))?)
    }

    pub fn pdf_files(&self) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.dir.path())? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".pdf") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = fs::read(path)?;
        Ok(Self {
            doc: LopdfDocument::load_mem(&bytes)?,
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }
}

/// A small solid-color PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(4, 4, Rgb([200u8, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("encoding a PNG in memory");
    out.into_inner()
}
