//! Front-end for the pagescript document definition language.
//!
//! A document is a sequence of top-level directives:
//!
//! ```text
//! title "Quarterly Report"
//! page-style { font "Times-Roman" font-size 14 page-layout landscape }
//! create page 1 {
//!     add title "Summary"
//!     add text(text size "12", text color "navy") "Revenue grew."
//!     add space "20"
//!     add background-image "watermark.png"
//! }
//! ```
//!
//! Parsing is total: malformed constructs become diagnostics and are skipped.

pub mod ast;
pub mod lexer;
mod parser;

// --- Public API ---
pub use ast::{AddInstruction, BlockKind, Document, PageBlock};
pub use lexer::{LexError, Span, Token, TokenKind, tokenize};

use pagescript_types::Diagnostics;

/// A value together with the diagnostics recorded while producing it.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
}

impl<T> Parsed<T> {
    pub fn into_parts(self) -> (T, Diagnostics) {
        (self.value, self.diagnostics)
    }
}

/// Parses a complete document. A document with zero pages is a valid result.
pub fn parse_document(source: &str) -> Parsed<Document> {
    let (tokens, mut diagnostics) = tokenize(source);
    let (document, parse_diagnostics) = parser::Parser::new(&tokens).parse();
    diagnostics.extend(parse_diagnostics);
    Parsed {
        value: document,
        diagnostics,
    }
}
