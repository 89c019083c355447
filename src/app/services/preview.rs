//! Composed preview: one "paper" per page, built from the document, then
//! styled in a separate pass.

use super::markdown;
use crate::app::domain::{Document, ImagePosition, StyleSettings, Template};

pub const UNTITLED_DOCUMENT: &str = "Untitled Document";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBlock {
    pub title: String,
    pub meta_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPage {
    /// Zero-based page index.
    pub index: usize,
    pub total: usize,
    /// Data URLs of header images, repeated on every page.
    pub header_images: Vec<String>,
    /// Present on the first page only.
    pub title_block: Option<TitleBlock>,
    /// Rendered body markup.
    pub body: String,
    pub footer_images: Vec<String>,
    pub footer_text: String,
}

impl ComposedPage {
    /// The `n/total` page marker.
    pub fn marker(&self) -> String {
        format!("{}/{}", self.index + 1, self.total)
    }
}

/// Visual attributes resolved from the style settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStyle {
    pub template: Template,
    pub title_font: String,
    pub title_color: String,
    pub body_font: String,
    pub body_color: String,
    pub body_size_px: u32,
}

impl AppliedStyle {
    pub fn from_settings(settings: &StyleSettings) -> Self {
        Self {
            template: settings.template,
            title_font: settings.font_title.clone(),
            title_color: settings.color_title.as_str().to_string(),
            body_font: settings.font_body.clone(),
            body_color: settings.color_body.as_str().to_string(),
            body_size_px: settings.font_size.preview_px(),
        }
    }

    fn title_attr(&self) -> String {
        format!(
            " style=\"font-family:'{}'; color:{};\"",
            escape_attr(&self.title_font),
            self.title_color
        )
    }

    fn body_attr(&self) -> String {
        format!(
            " style=\"font-family:'{}'; color:{}; font-size:{}px;\"",
            escape_attr(&self.body_font),
            self.body_color,
            self.body_size_px
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composition {
    pub pages: Vec<ComposedPage>,
    style: Option<AppliedStyle>,
}

/// Build the unstyled composition for every page, in order.
pub fn compose(doc: &Document) -> Composition {
    let header_images: Vec<String> = doc
        .images_at(ImagePosition::Header)
        .map(|i| i.data.clone())
        .collect();
    let footer_images: Vec<String> = doc
        .images_at(ImagePosition::Footer)
        .map(|i| i.data.clone())
        .collect();
    let total = doc.content.pages.len();

    let pages = doc
        .content
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| ComposedPage {
            index,
            total,
            header_images: header_images.clone(),
            title_block: (index == 0).then(|| title_block(doc)),
            body: markdown::render(&page.content, &doc.images),
            footer_images: footer_images.clone(),
            footer_text: doc.content.footer.clone(),
        })
        .collect();

    Composition { pages, style: None }
}

fn title_block(doc: &Document) -> TitleBlock {
    let title = if doc.meta.title.is_empty() {
        UNTITLED_DOCUMENT.to_string()
    } else {
        doc.meta.title.clone()
    };
    let date = if doc.meta.date.is_empty() {
        String::new()
    } else {
        format!("| {}", doc.meta.date)
    };
    TitleBlock {
        title,
        meta_line: format!("{} {}", doc.meta.author, date),
    }
}

impl Composition {
    /// Apply style settings. Overwrites any previous style, so repeated calls
    /// converge on the same attributes and the content is never rebuilt.
    pub fn apply_style(&mut self, settings: &StyleSettings) {
        self.style = Some(AppliedStyle::from_settings(settings));
    }

    pub fn style(&self) -> Option<&AppliedStyle> {
        self.style.as_ref()
    }

    /// CSS class for the container that holds the pages.
    pub fn wrapper_class(&self) -> String {
        let template = self.style.as_ref().map(|s| s.template).unwrap_or_default();
        format!("template-{}", template.as_str())
    }

    pub fn bodies(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.body.as_str())
    }

    /// Serialize all pages as preview markup.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for page in &self.pages {
            self.write_page(&mut html, page);
        }
        html
    }

    fn write_page(&self, html: &mut String, page: &ComposedPage) {
        let (title_attr, body_attr) = match &self.style {
            Some(style) => (style.title_attr(), style.body_attr()),
            None => (String::new(), String::new()),
        };

        html.push_str("<div class=\"paper\">");
        for data in &page.header_images {
            html.push_str(&format!(
                "<img src=\"{}\" style=\"max-width:100%; max-height:80px; display:block; margin:0 auto 15px;\">",
                data
            ));
        }

        if let Some(block) = &page.title_block {
            html.push_str(&format!(
                "<h1 class=\"preview-doc-title\"{}>{}</h1><p class=\"preview-doc-meta\">{}</p><hr class=\"preview-divider\">",
                title_attr,
                escape_text(&block.title),
                escape_text(&block.meta_line)
            ));
        }

        html.push_str(&format!(
            "<div class=\"preview-body\"{}>{}</div>",
            body_attr, page.body
        ));

        html.push_str("<div class=\"preview-doc-footer\">");
        if !page.footer_images.is_empty() {
            html.push_str("<div style=\"text-align:center; margin-bottom:10px;\">");
            for data in &page.footer_images {
                html.push_str(&format!(
                    "<img src=\"{}\" style=\"max-height:50px; display:inline-block; margin:5px;\">",
                    data
                ));
            }
            html.push_str("</div>");
        }
        html.push_str(&format!(
            "<span>{}</span> <span style=\"float:right\">{}</span></div>",
            escape_text(&page.footer_text),
            page.marker()
        ));
        html.push_str("</div>");
    }
}

/// Escape plain text for element content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;").replace('\'', "&#39;")
}
