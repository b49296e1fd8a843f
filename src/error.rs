use pagescript_render_core::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// The fatal errors of an interpretation run. Everything recoverable is a
/// diagnostic on the report instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read '{path}': {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration is invalid: {0}")]
    Config(#[from] serde_json::Error),
}
