use std::ops::Range;

use super::document::{FontSize, ImagePosition, Template};
use crate::app::services::export::ExportFormat;
use crate::app::services::formatting::FormatTool;

/// A single typed change to the document. Replaces free-form field paths:
/// each variant names exactly one settable leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    // Meta
    Title(String),
    Author(String),
    Date(String),

    // Content
    Footer(String),
    PageContent { index: usize, text: String },

    // Style
    Template(Template),
    FontTitle(String),
    FontBody(String),
    ColorTitle(String),
    ColorBody(String),
    FontSize(FontSize),
    Goal(u32),
}

impl Mutation {
    pub fn is_style(&self) -> bool {
        matches!(
            self,
            Self::Template(_)
                | Self::FontTitle(_)
                | Self::FontBody(_)
                | Self::ColorTitle(_)
                | Self::ColorBody(_)
                | Self::FontSize(_)
        )
    }
}

/// What a state change requires the view to redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    /// Re-apply style settings to the existing composition.
    Style,
    /// Recompose page content and refresh stats.
    Content,
    /// Everything, including field values and page inputs.
    Full,
}

/// A text field the user can type into and that may hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Title,
    Author,
    Footer,
    Page(usize),
}

/// All commands the editor controller accepts. Each UI event maps to one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Editing
    Edit(Mutation),
    Focus(FieldTarget),
    Blur,
    Format {
        target: FieldTarget,
        tool: FormatTool,
        selection: Range<usize>,
    },
    InsertTable {
        rows: usize,
        cols: usize,
    },

    // Pages
    AddPage,
    DeletePage(usize),

    // Images
    UploadImage {
        name: String,
        bytes: Vec<u8>,
    },
    RemoveImage(u64),
    SetImagePosition(u64, ImagePosition),

    // Document
    ResetStyle,
    NewDocument,
    RestoreVersion(usize),
    Save,

    // Output
    Export(ExportFormat),
    CopyText,
    Print,
}
