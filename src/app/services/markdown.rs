//! Markdown-lite rendering of page text into preview markup.
//!
//! This is deliberately not a Markdown parser. Each pass is a plain pattern
//! substitution applied in a fixed order, so nested or overlapping delimiters
//! produce whatever the passes happen to produce. Raw HTML in page text passes
//! through untouched.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::app::domain::{Image, ImagePosition};

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));
static UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.*?)__").expect("valid underline pattern"));

pub const LINE_BREAK: &str = "<br>";
pub const BULLET: &str = "\u{2022}";

/// Render one page of raw text. `images` is only read.
///
/// Only the first occurrence of each inline placeholder is replaced; repeats of
/// the same `[IMG:name]` token stay as literal text.
pub fn render(text: &str, images: &[Image]) -> String {
    if text.is_empty() {
        return String::new();
    }

    let html = text.replace('\n', LINE_BREAK);
    let html = BOLD.replace_all(&html, "<b>${1}</b>");
    // Italic runs after bold so `**x**` is never half-consumed as `*`.
    let html = ITALIC.replace_all(&html, "<i>${1}</i>");
    let mut html = UNDERLINE.replace_all(&html, "<u>${1}</u>").into_owned();

    if html.contains("- ") {
        html = html.replace("<br>- ", &format!("<br>{} ", BULLET));
    }

    for image in images.iter().filter(|i| i.position == ImagePosition::Inline) {
        let placeholder = image.placeholder();
        if html.contains(&placeholder) {
            html = html.replacen(&placeholder, &inline_image_tag(&image.data), 1);
        }
    }

    html
}

fn inline_image_tag(data: &str) -> String {
    format!(
        "<img src=\"{}\" style=\"max-width:100%; display:block; margin: 10px auto;\">",
        data
    )
}
