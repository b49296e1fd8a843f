//! pagescript turns a small document definition language into PDF files.
//!
//! ```no_run
//! use pagescript::{EngineConfig, Interpreter};
//!
//! let report = Interpreter::new(EngineConfig::default()).run_file("report.ddl")?;
//! for diagnostic in report.diagnostics.iter() {
//!     eprintln!("warning: {}", diagnostic);
//! }
//! # Ok::<(), pagescript::PipelineError>(())
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;

#[cfg(test)]
mod testing;

// --- Public API ---
pub use config::{EngineConfig, Margins};
pub use error::PipelineError;
pub use orchestrator::{Interpreter, RenderReport, RunState, output_file_name};

pub use pagescript_ddl::{Document, Parsed, parse_document};
pub use pagescript_types::{Diagnostic, DiagnosticKind, Diagnostics};
