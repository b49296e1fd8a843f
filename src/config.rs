//! Engine configuration, loadable from a JSON file.

use crate::error::PipelineError;
use pagescript_layout::LayoutConfig;
use pagescript_style::PageOrientation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Left margin and distance from the top edge to the first baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub x: f32,
    pub top: f32,
}

impl Margins {
    pub const fn new(x: f32, top: f32) -> Self {
        Self { x, top }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Extra gap between lines, in points.
    pub line_spacing: f32,
    pub char_width_factor: f32,
    pub min_line_chars: usize,
    pub portrait_margins: Margins,
    pub landscape_margins: Margins,
    /// File name used when the document has no title.
    pub default_output_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Refuse images outside the document's directory.
    pub confine_resources: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            line_spacing: 5.0,
            char_width_factor: 0.55,
            min_line_chars: 10,
            portrait_margins: Margins::new(50.0, 100.0),
            landscape_margins: Margins::new(70.0, 80.0),
            default_output_name: "output.pdf".to_string(),
            output_dir: None,
            confine_resources: false,
        }
    }
}

impl EngineConfig {
    /// Reads a configuration file. Fields the file leaves out keep their
    /// defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text)?;
        log::debug!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            char_width_factor: self.char_width_factor,
            min_line_chars: self.min_line_chars,
            line_spacing: self.line_spacing,
        }
    }

    pub fn margins(&self, orientation: PageOrientation) -> Margins {
        match orientation {
            PageOrientation::Portrait => self.portrait_margins,
            PageOrientation::Landscape => self.landscape_margins,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}
