//! Drives one interpretation run: parse, resolve page defaults, lay out and
//! draw every page in document order, then persist the PDF.

use crate::config::EngineConfig;
use crate::error::PipelineError;
use pagescript_ddl::{AddInstruction, Document, PageBlock, parse_document};
use pagescript_layout::{PositionedElement, TextFlow};
use pagescript_render_core::{DocumentRenderer, RenderError, StandardFont, StandardFontMetrics};
use pagescript_render_lopdf::LopdfRenderer;
use pagescript_resource::FilesystemResourceProvider;
use pagescript_style::EffectiveStyle;
use pagescript_traits::{ResourceError, ResourceProvider};
use pagescript_types::{DiagnosticKind, Diagnostics, Rect, Size};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    TitleParsed,
    StyleResolved,
    /// Working on the page with this zero-based index.
    PerPage(usize),
    Saved,
    /// The document had no pages; nothing was written.
    NoPages,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Initializing => f.write_str("initializing"),
            RunState::TitleParsed => f.write_str("title parsed"),
            RunState::StyleResolved => f.write_str("style resolved"),
            RunState::PerPage(i) => write!(f, "page {}", i + 1),
            RunState::Saved => f.write_str("saved"),
            RunState::NoPages => f.write_str("no pages"),
        }
    }
}

/// The outcome of a run that did not fail fatally.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub title: Option<String>,
    pub output_path: Option<PathBuf>,
    pub page_count: usize,
    pub final_state: RunState,
    pub diagnostics: Diagnostics,
}

/// File name of the artifact: the title with a `.pdf` suffix, or `default`
/// when there is no usable title. Path separators become `_`.
pub fn output_file_name(title: Option<&str>, default: &str) -> String {
    let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
        return default.to_string();
    };
    let name: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name
    } else {
        format!("{name}.pdf")
    }
}

/// Runs documents through the parser, the layout flow and a renderer.
///
/// Every run starts from scratch; nothing is shared between runs except the
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: EngineConfig,
    output_path: Option<PathBuf>,
}

impl Interpreter {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            output_path: None,
        }
    }

    /// Writes to exactly this path instead of deriving a name from the title.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Interprets the file at `input`. Images are resolved relative to the
    /// file's directory.
    pub fn run_file<P: AsRef<Path>>(&self, input: P) -> Result<RenderReport, PipelineError> {
        let input = input.as_ref();
        let source = fs::read_to_string(input).map_err(|source| PipelineError::Input {
            path: input.to_path_buf(),
            source,
        })?;
        log::info!("Interpreting {}", input.display());
        let resources = FilesystemResourceProvider::for_document(input)
            .confined(self.config.confine_resources);
        self.run(&source, &resources)
    }

    /// Interprets `source` and writes the PDF. With no pages the report ends
    /// in [`RunState::NoPages`] and no file is created.
    pub fn run(
        &self,
        source: &str,
        resources: &dyn ResourceProvider,
    ) -> Result<RenderReport, PipelineError> {
        let mut renderer = LopdfRenderer::new();
        let mut report = self.render_with(source, resources, &mut renderer)?;
        if report.final_state == RunState::NoPages {
            return Ok(report);
        }

        let path = self.resolve_output_path(report.title.as_deref());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        renderer.finish(&mut writer)?;
        writer.flush()?;

        log::info!(
            "Wrote {} page(s) to {}",
            report.page_count,
            path.display()
        );
        report.final_state = RunState::Saved;
        report.output_path = Some(path);
        Ok(report)
    }

    /// Parses `source` and draws every page onto `renderer` without
    /// finishing it. The caller decides whether and where to persist.
    pub fn render_with<R: DocumentRenderer + ?Sized>(
        &self,
        source: &str,
        resources: &dyn ResourceProvider,
        renderer: &mut R,
    ) -> Result<RenderReport, PipelineError> {
        let mut state = RunState::Initializing;
        let (document, mut diagnostics) = parse_document(source).into_parts();
        advance(&mut state, RunState::TitleParsed);
        log::debug!(
            "Parsed document: title {:?}, {} page(s), {} instruction(s)",
            document.title,
            document.page_count(),
            document.instruction_count()
        );

        let orientation = document.defaults.page_layout;
        let page_size = orientation.apply(document.defaults.page_size);
        let margins = self.config.margins(orientation);
        advance(&mut state, RunState::StyleResolved);

        if document.pages.is_empty() {
            diagnostics.push(
                DiagnosticKind::EmptyDocument,
                "document has no 'create page' blocks, nothing to render",
            );
            advance(&mut state, RunState::NoPages);
            return Ok(RenderReport {
                title: document.title,
                output_path: None,
                page_count: 0,
                final_state: state,
                diagnostics,
            });
        }

        renderer.begin_document(page_size, document.title.as_deref())?;

        let measurer = StandardFontMetrics;
        {
            let mut run = PageRun {
                document: &document,
                resources,
                page_size,
                flow: TextFlow::new(page_size.width, self.config.layout_config(), &measurer),
                x: margins.x,
                start_y: page_size.height - margins.top,
                images: HashMap::new(),
                reported_fonts: HashSet::new(),
                diagnostics: &mut diagnostics,
            };
            for (i, page) in document.pages.iter().enumerate() {
                advance(&mut state, RunState::PerPage(i));
                let elements = run.lay_out_page(page, renderer)?;
                renderer.render_page(&elements)?;
            }
        }

        Ok(RenderReport {
            title: document.title.clone(),
            output_path: None,
            page_count: renderer.page_count(),
            final_state: state,
            diagnostics,
        })
    }

    fn resolve_output_path(&self, title: Option<&str>) -> PathBuf {
        if let Some(path) = &self.output_path {
            return path.clone();
        }
        let name = output_file_name(title, &self.config.default_output_name);
        match &self.config.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

fn advance(state: &mut RunState, next: RunState) {
    log::debug!("Interpreter state: {} -> {}", state, next);
    *state = next;
}

/// Per-run state shared by all pages: geometry, the image registry and the
/// diagnostics sink.
struct PageRun<'a> {
    document: &'a Document,
    resources: &'a dyn ResourceProvider,
    page_size: Size,
    flow: TextFlow<'a>,
    x: f32,
    start_y: f32,
    /// Outcome of registering each image path with the renderer; the
    /// failure is kept so a missing image is reported on every use.
    images: HashMap<String, Result<(), (DiagnosticKind, String)>>,
    reported_fonts: HashSet<String>,
    diagnostics: &'a mut Diagnostics,
}

impl PageRun<'_> {
    fn lay_out_page<R: DocumentRenderer + ?Sized>(
        &mut self,
        page: &PageBlock,
        renderer: &mut R,
    ) -> Result<Vec<PositionedElement>, PipelineError> {
        let document = self.document;
        let mut elements = Vec::new();
        let mut y = self.start_y;

        if let Some(background) = &document.defaults.background_image {
            self.place_full_page_image(background, renderer, &mut elements)?;
        }

        for instruction in &page.instructions {
            log::debug!("Executing {} at y={:.2}", instruction.kind(), y);
            match instruction {
                AddInstruction::Text { content, .. } | AddInstruction::Title { content, .. } => {
                    let style = self.style_for(instruction);
                    y = self.flow.wrap_text(content, self.x, y, &style, &mut elements);
                }
                AddInstruction::Space { amount } => {
                    let style = self.style_for(instruction);
                    y = self.flow.space(*amount, self.x, y, &style, &mut elements);
                }
                AddInstruction::BackgroundImage { path } => {
                    self.place_full_page_image(path, renderer, &mut elements)?;
                }
            }
        }

        if y < 0.0 {
            log::debug!("Page content runs past the bottom edge (cursor {:.2})", y);
        }
        Ok(elements)
    }

    /// Resolves the instruction's style and swaps an unknown font for
    /// Helvetica, reporting each unknown name once.
    fn style_for(&mut self, instruction: &AddInstruction) -> EffectiveStyle {
        let style = instruction.effective_style(&self.document.defaults, self.diagnostics);
        match StandardFont::from_name(&style.font) {
            Some(font) => style.with_font(font.base_font()),
            None => {
                if self.reported_fonts.insert(style.font.clone()) {
                    self.diagnostics.push(
                        DiagnosticKind::UnknownEnumValue,
                        format!("font '{}' is not a standard PDF font, using Helvetica", style.font),
                    );
                }
                style.with_font(StandardFont::Helvetica.base_font())
            }
        }
    }

    fn place_full_page_image<R: DocumentRenderer + ?Sized>(
        &mut self,
        path: &str,
        renderer: &mut R,
        elements: &mut Vec<PositionedElement>,
    ) -> Result<(), PipelineError> {
        if !self.images.contains_key(path) {
            let outcome = self.register_image(path, renderer)?;
            self.images.insert(path.to_string(), outcome);
        }
        match self.images.get(path) {
            Some(Ok(())) => {
                elements.push(PositionedElement::image(Rect::from_size(self.page_size), path));
            }
            Some(Err((kind, message))) => {
                self.diagnostics.push(*kind, message.clone());
            }
            None => {}
        }
        Ok(())
    }

    /// Loads `path` and hands it to the renderer. Only renderer failures
    /// other than an undecodable image are fatal.
    fn register_image<R: DocumentRenderer + ?Sized>(
        &self,
        path: &str,
        renderer: &mut R,
    ) -> Result<Result<(), (DiagnosticKind, String)>, PipelineError> {
        let data = match self.resources.load(path) {
            Ok(data) => data,
            Err(ResourceError::NotFound(_)) => {
                return Ok(Err((
                    DiagnosticKind::MissingResource,
                    format!("image '{}' not found, skipped", path),
                )));
            }
            Err(ResourceError::Rejected(_)) => {
                return Ok(Err((
                    DiagnosticKind::UnsupportedInput,
                    format!("image '{}' is outside the document directory, skipped", path),
                )));
            }
            Err(e) => {
                return Ok(Err((
                    DiagnosticKind::MissingResource,
                    format!("image '{}' could not be read: {}", path, e),
                )));
            }
        };
        match renderer.add_image(path, &data) {
            Ok(()) => Ok(Ok(())),
            Err(RenderError::Image { message, .. }) => Ok(Err((
                DiagnosticKind::MissingResource,
                format!("image '{}' could not be decoded: {}", path, message),
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
