use serde::{Deserialize, Serialize};

use crate::app::infrastructure::clock::today_iso;
use crate::app::infrastructure::error::ValidationError;

/// Average reading speed used for the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub meta: Meta,
    pub settings: StyleSettings,
    pub content: Content,
    #[serde(default)]
    pub images: Vec<Image>,
    /// Derived from the pages; kept in the serialized form but recomputed on load.
    #[serde(default)]
    pub stats: Stats,
    /// Word-count goal, 0 when unset.
    #[serde(default)]
    pub goal: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "today_iso")]
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Professional,
    Modern,
    Minimal,
    Creative,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Modern => "modern",
            Self::Minimal => "minimal",
            Self::Creative => "creative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    Xl,
}

impl FontSize {
    /// Body size in CSS pixels for the on-screen preview.
    pub fn preview_px(&self) -> u32 {
        match self {
            Self::Small => 12,
            Self::Medium => 15,
            Self::Large => 18,
            Self::Xl => 22,
        }
    }

    /// Body size in points for PDF output.
    pub fn pdf_pt(&self) -> f32 {
        match self {
            Self::Small => 10.0,
            Self::Medium => 12.0,
            Self::Large => 14.0,
            Self::Xl => 16.0,
        }
    }
}

/// A `#rrggbb` color. Accepts `#rgb` shorthand and any case on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidColor(value.to_string());
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };
        Ok(Self(format!("#{}", expanded.to_ascii_lowercase())))
    }

    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSettings {
    #[serde(default)]
    pub template: Template,
    #[serde(default = "default_font_title")]
    pub font_title: String,
    #[serde(default = "default_font_body")]
    pub font_body: String,
    #[serde(default = "HexColor::black")]
    pub color_title: HexColor,
    #[serde(default = "HexColor::black")]
    pub color_body: HexColor,
    #[serde(default)]
    pub font_size: FontSize,
}

fn default_font_title() -> String {
    "Orbitron".to_string()
}

fn default_font_body() -> String {
    "Rajdhani".to_string()
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            template: Template::default(),
            font_title: default_font_title(),
            font_body: default_font_body(),
            color_title: HexColor::black(),
            color_body: HexColor::black(),
            font_size: FontSize::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub pages: Vec<Page>,
    #[serde(default)]
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub content: String,
}

impl Page {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    #[default]
    Inline,
    Header,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub name: String,
    /// `data:<mime>;base64,<payload>` URL.
    pub data: String,
    #[serde(default)]
    pub position: ImagePosition,
}

impl Image {
    /// The literal token that binds page text to this image.
    pub fn placeholder(&self) -> String {
        placeholder_for(&self.name)
    }
}

pub fn placeholder_for(name: &str) -> String {
    format!("[IMG:{}]", name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub words: usize,
    pub chars: usize,
    /// Minutes, rounded up.
    pub reading_time: usize,
    #[serde(default)]
    pub pages: usize,
}

impl Stats {
    pub fn compute(pages: &[Page]) -> Self {
        let text = pages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let words = text.split_whitespace().count();
        Self {
            words,
            chars: text.chars().count(),
            reading_time: words.div_ceil(WORDS_PER_MINUTE),
            pages: pages.len(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self {
            meta: Meta {
                title: String::new(),
                author: String::new(),
                date: today_iso(),
            },
            settings: StyleSettings::default(),
            content: Content {
                pages: vec![Page::empty("page_1")],
                footer: String::new(),
            },
            images: Vec::new(),
            stats: Stats {
                pages: 1,
                ..Stats::default()
            },
            goal: 0,
        }
    }
}

impl Document {
    pub fn recompute_stats(&mut self) {
        self.stats = Stats::compute(&self.content.pages);
    }

    /// A document must always hold at least one page.
    pub fn is_well_formed(&self) -> bool {
        !self.content.pages.is_empty()
    }

    pub fn images_at(&self, position: ImagePosition) -> impl Iterator<Item = &Image> {
        self.images.iter().filter(move |i| i.position == position)
    }

    /// First inline image registered under `name`.
    pub fn inline_image(&self, name: &str) -> Option<&Image> {
        self.images_at(ImagePosition::Inline).find(|i| i.name == name)
    }

    pub fn image_mut(&mut self, id: u64) -> Option<&mut Image> {
        self.images.iter_mut().find(|i| i.id == id)
    }

    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.content.pages.iter().position(|p| p.id == id)
    }

    /// Fraction of the word goal reached, capped at 1.0. None when no goal is set.
    pub fn goal_progress(&self) -> Option<f32> {
        if self.goal == 0 {
            return None;
        }
        Some((self.stats.words as f32 / self.goal as f32).min(1.0))
    }

    /// Title used for file names and history labels.
    pub fn display_title(&self) -> &str {
        if self.meta.title.is_empty() {
            "Untitled"
        } else {
            &self.meta.title
        }
    }
}
