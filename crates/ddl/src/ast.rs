//! The structured document model produced by the parser.

use pagescript_style::{CommandKind, EffectiveStyle, StyleDefaults, StyleOverride, resolve_style};
use pagescript_types::Diagnostics;
use serde::Serialize;

/// A parsed document. Immutable once the parser returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: Option<String>,
    pub defaults: StyleDefaults,
    pub pages: Vec<PageBlock>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn instruction_count(&self) -> usize {
        self.pages.iter().map(|p| p.instructions.len()).sum()
    }
}

/// The kinds of `create` block. Only pages exist today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Page,
}

impl BlockKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        keyword.eq_ignore_ascii_case("page").then_some(BlockKind::Page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageBlock {
    pub kind: BlockKind,
    /// Decorative; has no effect on ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub instructions: Vec<AddInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum AddInstruction {
    Text {
        content: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        overrides: Vec<StyleOverride>,
    },
    Title {
        content: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        overrides: Vec<StyleOverride>,
    },
    Space {
        amount: f32,
    },
    BackgroundImage {
        path: String,
    },
}

impl AddInstruction {
    pub fn kind(&self) -> CommandKind {
        match self {
            AddInstruction::Text { .. } => CommandKind::Text,
            AddInstruction::Title { .. } => CommandKind::Title,
            AddInstruction::Space { .. } => CommandKind::Space,
            AddInstruction::BackgroundImage { .. } => CommandKind::BackgroundImage,
        }
    }

    pub fn overrides(&self) -> &[StyleOverride] {
        match self {
            AddInstruction::Text { overrides, .. } | AddInstruction::Title { overrides, .. } => {
                overrides
            }
            AddInstruction::Space { .. } | AddInstruction::BackgroundImage { .. } => &[],
        }
    }

    /// The style this instruction is drawn with.
    pub fn effective_style(
        &self,
        defaults: &StyleDefaults,
        diagnostics: &mut Diagnostics,
    ) -> EffectiveStyle {
        resolve_style(defaults, self.kind(), self.overrides(), diagnostics)
    }
}
