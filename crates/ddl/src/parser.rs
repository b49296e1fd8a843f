//! Recursive-descent parser over the token stream.
//!
//! The parser never aborts. A construct that does not match its grammar is
//! reported and skipped, and parsing resumes at the next top-level keyword
//! (`title`, `page-style`, `create`) or, inside a page block, at the next
//! `add` or closing brace.

use crate::ast::{AddInstruction, BlockKind, Document, PageBlock};
use crate::lexer::{Token, TokenKind};
use pagescript_style::parsers::parse_spacing;
use pagescript_style::{CommandKind, StyleAttribute, StyleDefaults, StyleOverride};
use pagescript_types::{DiagnosticKind, Diagnostics};

const TOP_LEVEL_KEYWORDS: [&str; 3] = ["title", "page-style", "create"];

pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    diagnostics: Diagnostics,
    title: Option<String>,
    defaults: Option<StyleDefaults>,
    pages: Vec<PageBlock>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Diagnostics::new(),
            title: None,
            defaults: None,
            pages: Vec::new(),
        }
    }

    pub(crate) fn parse(mut self) -> (Document, Diagnostics) {
        while let Some(token) = self.peek() {
            if token.is_ident("title") {
                self.parse_title();
            } else if token.is_ident("page-style") {
                self.parse_page_style();
            } else if token.is_ident("create") {
                self.parse_create();
            } else {
                let message = format!(
                    "line {}: unexpected {} at top level",
                    token.line, token.kind
                );
                self.report(DiagnosticKind::GrammarMismatch, message);
                self.recover_top_level();
            }
        }

        let document = Document {
            title: self.title,
            defaults: self.defaults.unwrap_or_default(),
            pages: self.pages,
        };
        log::debug!(
            "Parsed document: {} page(s), {} instruction(s)",
            document.page_count(),
            document.instruction_count()
        );
        (document, self.diagnostics)
    }

    // --- Token cursor ---

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&'t TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// The line of the current token, or of the last token at end of input.
    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn describe_next(&self) -> String {
        self.peek()
            .map_or_else(|| "end of input".to_string(), |t| t.kind.to_string())
    }

    fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.push(kind, message);
    }

    fn at_top_level_keyword(&self) -> bool {
        self.peek()
            .is_some_and(|t| TOP_LEVEL_KEYWORDS.iter().any(|k| t.is_ident(k)))
    }

    /// True when the token after `token` starts exactly where `token` ends and
    /// is a word or string, which is what a quote inside quoted content
    /// tokenizes to.
    fn glued_to_next(&self, token: &Token) -> bool {
        self.peek().is_some_and(|next| {
            next.span.start == token.span.end
                && matches!(next.kind, TokenKind::Ident(_) | TokenKind::Str(_))
        })
    }

    // --- Recovery ---

    /// Skips a `{ ... }` group, including nested groups. The current token
    /// must be the opening brace.
    fn skip_braced(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn skip_parenthesized(&mut self) {
        while let Some(token) = self.advance() {
            if token.kind == TokenKind::RParen {
                return;
            }
        }
    }

    fn recover_top_level(&mut self) {
        while let Some(token) = self.peek() {
            if self.at_top_level_keyword() {
                return;
            }
            match token.kind {
                TokenKind::LBrace => self.skip_braced(),
                TokenKind::LParen => self.skip_parenthesized(),
                _ if token.is_ident("add") => {
                    // `add title ...` outside a page must not read as a title directive.
                    self.pos += 1;
                    if matches!(self.peek_kind(), Some(TokenKind::Ident(_))) {
                        self.pos += 1;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    fn recover_in_page(&mut self) {
        while let Some(token) = self.peek() {
            if token.is_ident("add")
                || token.kind == TokenKind::RBrace
                || token.is_ident("create")
                || token.is_ident("page-style")
            {
                return;
            }
            match token.kind {
                TokenKind::LBrace => self.skip_braced(),
                TokenKind::LParen => self.skip_parenthesized(),
                _ => self.pos += 1,
            }
        }
    }

    // --- Top-level directives ---

    fn parse_title(&mut self) {
        let keyword_line = self.line();
        self.advance();
        let Some(token) = self.peek() else {
            self.report(
                DiagnosticKind::GrammarMismatch,
                format!("line {}: 'title' without a quoted title", keyword_line),
            );
            return;
        };
        let TokenKind::Str(text) = &token.kind else {
            let message = format!(
                "line {}: expected quoted title, found {}",
                token.line, token.kind
            );
            self.report(DiagnosticKind::GrammarMismatch, message);
            self.recover_top_level();
            return;
        };
        self.advance();

        if self.glued_to_next(token) {
            self.report(
                DiagnosticKind::UnsupportedInput,
                format!("line {}: quote inside title text; title dropped", token.line),
            );
            self.recover_top_level();
            return;
        }

        if self.title.is_some() {
            self.report(
                DiagnosticKind::GrammarMismatch,
                format!("line {}: duplicate title ignored", token.line),
            );
        } else {
            self.title = Some(text.clone());
        }
    }

    fn parse_page_style(&mut self) {
        let keyword_line = self.line();
        self.advance();
        if self.peek_kind() != Some(&TokenKind::LBrace) {
            let message = format!(
                "line {}: expected '{{' after 'page-style', found {}",
                keyword_line,
                self.describe_next()
            );
            self.report(DiagnosticKind::GrammarMismatch, message);
            self.recover_top_level();
            return;
        }

        if self.defaults.is_some() {
            self.report(
                DiagnosticKind::GrammarMismatch,
                format!("line {}: duplicate page-style block ignored", keyword_line),
            );
            self.skip_braced();
            return;
        }

        self.advance();
        let mut defaults = StyleDefaults::default();
        loop {
            let Some(token) = self.peek() else {
                self.report(
                    DiagnosticKind::GrammarMismatch,
                    format!("line {}: unterminated page-style block", keyword_line),
                );
                break;
            };
            // A directive in key position means the closing brace is missing.
            if self.at_top_level_keyword() {
                self.report(
                    DiagnosticKind::GrammarMismatch,
                    format!("line {}: unterminated page-style block", keyword_line),
                );
                break;
            }
            match &token.kind {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::Ident(key) => {
                    self.advance();
                    defaults = self.parse_style_entry(defaults, key, token.line);
                }
                other => {
                    let message = format!(
                        "line {}: expected a style key in page-style, found {}",
                        token.line, other
                    );
                    self.report(DiagnosticKind::GrammarMismatch, message);
                    self.advance();
                }
            }
        }
        self.defaults = Some(defaults);
    }

    /// Reads the value of one `page-style` entry and applies it. Bare-word
    /// values must sit on the same line as their key.
    fn parse_style_entry(
        &mut self,
        defaults: StyleDefaults,
        key: &str,
        key_line: usize,
    ) -> StyleDefaults {
        let value = match self.peek() {
            Some(Token {
                kind: TokenKind::Str(v) | TokenKind::Integer(v),
                ..
            }) => Some(v.clone()),
            Some(Token {
                kind: TokenKind::Ident(v),
                line,
                ..
            }) if *line == key_line => Some(v.clone()),
            _ => None,
        };
        let Some(value) = value else {
            self.report(
                DiagnosticKind::GrammarMismatch,
                format!("line {}: page-style key '{}' has no value", key_line, key),
            );
            return defaults;
        };
        self.advance();

        match defaults.apply_entry(key, &value) {
            Ok(next) => {
                log::debug!("page-style {} = {}", key, value);
                next
            }
            Err(e) => {
                self.report(
                    e.diagnostic_kind(),
                    format!("line {}: page-style: {}", key_line, e),
                );
                defaults.with_fallback(key)
            }
        }
    }

    fn parse_create(&mut self) {
        let keyword_line = self.line();
        self.advance();

        let kind = match self.peek_kind() {
            Some(TokenKind::Ident(word)) => {
                self.advance();
                let kind = BlockKind::from_keyword(word);
                if kind.is_none() {
                    self.report(
                        DiagnosticKind::UnknownEnumValue,
                        format!("line {}: unknown block kind '{}'; block skipped", keyword_line, word),
                    );
                }
                kind
            }
            _ => {
                let message = format!(
                    "line {}: expected a block kind after 'create', found {}",
                    keyword_line,
                    self.describe_next()
                );
                self.report(DiagnosticKind::GrammarMismatch, message);
                self.recover_top_level();
                return;
            }
        };

        let index = match self.peek_kind() {
            Some(TokenKind::Integer(digits)) => {
                self.advance();
                match digits.parse::<u32>() {
                    Ok(n) => Some(n),
                    Err(_) => {
                        self.report(
                            DiagnosticKind::InvalidNumericField,
                            format!("line {}: page index '{}' is out of range", keyword_line, digits),
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        if self.peek_kind() != Some(&TokenKind::LBrace) {
            let message = format!(
                "line {}: expected '{{' to open the block, found {}",
                keyword_line,
                self.describe_next()
            );
            self.report(DiagnosticKind::GrammarMismatch, message);
            self.recover_top_level();
            return;
        }

        let Some(kind) = kind else {
            self.skip_braced();
            return;
        };

        self.advance();
        let instructions = self.parse_page_body(keyword_line);
        self.pages.push(PageBlock {
            kind,
            index,
            instructions,
        });
    }

    fn parse_page_body(&mut self, open_line: usize) -> Vec<AddInstruction> {
        let mut instructions = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                self.report(
                    DiagnosticKind::GrammarMismatch,
                    format!("line {}: page block is never closed", open_line),
                );
                break;
            };
            if token.kind == TokenKind::RBrace {
                self.advance();
                break;
            }
            if token.is_ident("create") || token.is_ident("page-style") {
                self.report(
                    DiagnosticKind::GrammarMismatch,
                    format!("line {}: page block is never closed", open_line),
                );
                break;
            }
            if token.is_ident("add") {
                self.advance();
                if let Some(instruction) = self.parse_add(token.line) {
                    instructions.push(instruction);
                }
            } else {
                let message = format!(
                    "line {}: expected 'add', found {}",
                    token.line, token.kind
                );
                self.report(DiagnosticKind::GrammarMismatch, message);
                self.pos += 1;
                self.recover_in_page();
            }
        }
        instructions
    }

    // --- add instructions ---

    fn parse_add(&mut self, line: usize) -> Option<AddInstruction> {
        let Some(TokenKind::Ident(word)) = self.peek_kind() else {
            let message = format!(
                "line {}: expected a command after 'add', found {}",
                line,
                self.describe_next()
            );
            self.report(DiagnosticKind::GrammarMismatch, message);
            self.recover_in_page();
            return None;
        };
        self.advance();

        let Some(kind) = CommandKind::from_keyword(word) else {
            self.report(
                DiagnosticKind::UnknownEnumValue,
                format!("line {}: unknown command '{}' dropped", line, word),
            );
            self.recover_in_page();
            return None;
        };

        let overrides = if self.eat(&TokenKind::LParen) {
            let overrides = self.parse_style_clause(line)?;
            if !overrides.is_empty() && !kind.accepts_style_clause() {
                self.report(
                    DiagnosticKind::GrammarMismatch,
                    format!("line {}: style clause on '{}' ignored", line, kind),
                );
                Vec::new()
            } else {
                overrides
            }
        } else {
            Vec::new()
        };

        let content_token = match self.peek() {
            Some(t) if matches!(t.kind, TokenKind::Str(_)) => t,
            Some(t) if matches!(t.kind, TokenKind::Integer(_)) && kind == CommandKind::Space => t,
            _ => {
                let message = format!(
                    "line {}: 'add {}' needs quoted content, found {}",
                    line,
                    kind,
                    self.describe_next()
                );
                self.report(DiagnosticKind::GrammarMismatch, message);
                self.recover_in_page();
                return None;
            }
        };
        self.advance();
        let content = match &content_token.kind {
            TokenKind::Str(s) | TokenKind::Integer(s) => s.clone(),
            _ => String::new(),
        };

        if self.glued_to_next(content_token) {
            self.report(
                DiagnosticKind::UnsupportedInput,
                format!(
                    "line {}: quote inside 'add {}' content; instruction dropped",
                    content_token.line, kind
                ),
            );
            self.recover_in_page();
            return None;
        }

        self.build_instruction(kind, content, overrides, line)
    }

    fn build_instruction(
        &mut self,
        kind: CommandKind,
        content: String,
        overrides: Vec<StyleOverride>,
        line: usize,
    ) -> Option<AddInstruction> {
        match kind {
            CommandKind::Text => Some(AddInstruction::Text { content, overrides }),
            CommandKind::Title => Some(AddInstruction::Title { content, overrides }),
            CommandKind::Space => match parse_spacing(&content) {
                Ok(amount) => Some(AddInstruction::Space { amount }),
                Err(e) => {
                    self.report(
                        e.diagnostic_kind(),
                        format!("line {}: {}; space dropped", line, e),
                    );
                    None
                }
            },
            CommandKind::BackgroundImage => {
                let path = content.trim();
                if path.is_empty() {
                    self.report(
                        DiagnosticKind::GrammarMismatch,
                        format!("line {}: background-image with an empty path dropped", line),
                    );
                    None
                } else {
                    Some(AddInstruction::BackgroundImage {
                        path: path.to_string(),
                    })
                }
            }
        }
    }

    /// Parses the triples of an inline style clause up to the closing
    /// parenthesis. Returns `None` when the clause is never closed.
    fn parse_style_clause(&mut self, line: usize) -> Option<Vec<StyleOverride>> {
        let mut overrides = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                self.report(
                    DiagnosticKind::GrammarMismatch,
                    format!("line {}: unterminated style clause", line),
                );
                return None;
            };
            match &token.kind {
                TokenKind::RParen => {
                    self.advance();
                    return Some(overrides);
                }
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::Ident(target) => {
                    self.advance();
                    if let Some(ov) = self.parse_style_triple(target, token.line) {
                        overrides.push(ov);
                    }
                }
                TokenKind::RBrace => {
                    self.report(
                        DiagnosticKind::GrammarMismatch,
                        format!("line {}: unterminated style clause", line),
                    );
                    return None;
                }
                other => {
                    let message = format!(
                        "line {}: expected a style target, found {}",
                        token.line, other
                    );
                    self.report(DiagnosticKind::GrammarMismatch, message);
                    self.advance();
                }
            }
        }
    }

    /// `<target> <attribute>? "<value>"`, with the target already consumed.
    fn parse_style_triple(&mut self, target: &str, line: usize) -> Option<StyleOverride> {
        let attribute = match self.peek_kind() {
            Some(TokenKind::Ident(word)) => {
                self.advance();
                Some(word.as_str())
            }
            _ => None,
        };

        let value = match self.peek_kind() {
            Some(TokenKind::Str(v) | TokenKind::Integer(v)) => {
                self.advance();
                v.clone()
            }
            _ => {
                let message = format!(
                    "line {}: style override '{}' has no quoted value, found {}",
                    line,
                    target,
                    self.describe_next()
                );
                self.report(DiagnosticKind::GrammarMismatch, message);
                return None;
            }
        };

        let Some(target_kind) = CommandKind::from_keyword(target) else {
            self.report(
                DiagnosticKind::UnknownEnumValue,
                format!("line {}: unknown style target '{}' dropped", line, target),
            );
            return None;
        };

        Some(StyleOverride::new(
            target_kind,
            StyleAttribute::from_keyword(attribute),
            value,
        ))
    }
}
