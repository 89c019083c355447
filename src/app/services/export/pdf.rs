//! Page layout for PDF export. All drawing goes through [`DrawingSurface`].

use std::sync::LazyLock;

use regex_lite::Regex;

use super::surface::{Align, BuiltinFont, DrawingSurface, FontStyle, Rgb};
use crate::app::domain::{Document, ImagePosition};
use crate::app::infrastructure::error::Result;

pub const MARGIN: f32 = 20.0;
pub const TOP: f32 = 20.0;
/// Distance from the bottom edge below which body content may not start.
pub const BOTTOM_RESERVE: f32 = 30.0;
pub const LINE_HEIGHT: f32 = 6.0;
pub const LINE_GAP: f32 = 2.0;

const HEADER_IMAGE_HEIGHT: f32 = 40.0;
const HEADER_IMAGE_GAP: f32 = 10.0;
const FOOTER_IMAGE_HEIGHT: f32 = 30.0;
const FOOTER_IMAGE_GAP: f32 = 5.0;
const INLINE_IMAGE_MAX_WIDTH: f32 = 100.0;
const INLINE_IMAGE_GAP: f32 = 10.0;

const TITLE_SIZE: f32 = 24.0;
const META_SIZE: f32 = 12.0;
const FOOTER_SIZE: f32 = 10.0;
const META_GRAY: u8 = 100;
const FOOTER_GRAY: u8 = 150;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[IMG:(.*?)\]").expect("valid placeholder pattern"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\*\*|__|[*])").expect("valid emphasis pattern"));

/// Remove bold, underline and italic delimiters.
pub fn strip_markdown(line: &str) -> String {
    EMPHASIS.replace_all(line, "").into_owned()
}

/// Lines starting with a table border or pipe are drawn in a fixed-width font.
pub fn is_table_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('+') || trimmed.starts_with('|')
}

/// Lay out every page of `doc` on `surface`.
pub fn draw_document<S: DrawingSurface>(doc: &Document, surface: &mut S) -> Result<()> {
    let mut layout = Layout::new(doc, surface);
    for index in 0..doc.content.pages.len() {
        if index > 0 {
            layout.surface.add_page();
        }
        layout.draw_page(index)?;
    }
    Ok(())
}

struct Layout<'a, S: DrawingSurface> {
    doc: &'a Document,
    surface: &'a mut S,
    width: f32,
    height: f32,
    title_font: BuiltinFont,
    body_font: BuiltinFont,
    y: f32,
}

impl<'a, S: DrawingSurface> Layout<'a, S> {
    fn new(doc: &'a Document, surface: &'a mut S) -> Self {
        let (width, height) = surface.page_size();
        Self {
            doc,
            surface,
            width,
            height,
            title_font: BuiltinFont::for_name(&doc.settings.font_title),
            body_font: BuiltinFont::for_name(&doc.settings.font_body),
            y: TOP,
        }
    }

    fn content_width(&self) -> f32 {
        self.width - MARGIN * 2.0
    }

    fn body_limit(&self) -> f32 {
        self.height - BOTTOM_RESERVE
    }

    fn break_page(&mut self) {
        self.surface.add_page();
        self.y = TOP;
    }

    fn draw_page(&mut self, index: usize) -> Result<()> {
        self.y = TOP;
        self.draw_header_images()?;
        if index == 0 {
            self.draw_title_block();
        }

        let doc = self.doc;
        self.surface.set_font_size(doc.settings.font_size.pdf_pt());
        self.surface.set_text_color(Rgb::from(&doc.settings.color_body));

        for line in doc.content.pages[index].content.split('\n') {
            self.draw_body_line(line)?;
        }

        self.draw_footer(index)
    }

    fn draw_header_images(&mut self) -> Result<()> {
        let doc = self.doc;
        for image in doc.images_at(ImagePosition::Header) {
            let (pw, ph) = self.surface.image_size(&image.data)?;
            let h = HEADER_IMAGE_HEIGHT;
            let w = pw * h / ph;
            self.surface
                .image(&image.data, (self.width - w) / 2.0, self.y, w, h)?;
            self.y += h + HEADER_IMAGE_GAP;
        }
        Ok(())
    }

    fn draw_title_block(&mut self) {
        let doc = self.doc;
        let center = self.width / 2.0;

        self.surface.set_font(self.title_font, FontStyle::Bold);
        self.surface.set_font_size(TITLE_SIZE);
        self.surface
            .set_text_color(Rgb::from(&doc.settings.color_title));
        self.surface.text(&doc.meta.title, center, self.y, Align::Center);
        self.y += 10.0;

        self.surface.set_font(self.body_font, FontStyle::Normal);
        self.surface.set_font_size(META_SIZE);
        self.surface.set_text_color(Rgb::gray(META_GRAY));
        let meta = format!("{} | {}", doc.meta.author, doc.meta.date);
        self.surface.text(&meta, center, self.y, Align::Center);
        self.y += 10.0;

        self.surface.line(MARGIN, self.y, self.width - MARGIN, self.y);
        self.y += 15.0;
    }

    fn draw_body_line(&mut self, line: &str) -> Result<()> {
        let doc = self.doc;
        let image = PLACEHOLDER
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|name| doc.inline_image(name.as_str()));

        if let Some(image) = image {
            let (pw, ph) = self.surface.image_size(&image.data)?;
            let w = self.content_width().min(INLINE_IMAGE_MAX_WIDTH);
            let h = ph * w / pw;
            if self.y + h > self.body_limit() {
                self.break_page();
            }
            self.surface.image(&image.data, MARGIN, self.y, w, h)?;
            self.y += h + INLINE_IMAGE_GAP;
            return Ok(());
        }

        if is_table_line(line) {
            self.surface.set_font(BuiltinFont::Courier, FontStyle::Normal);
        } else {
            self.surface.set_font(self.body_font, FontStyle::Normal);
        }

        if self.y > self.body_limit() {
            self.break_page();
        }

        let plain = strip_markdown(line);
        let wrapped = self
            .surface
            .split_text_to_size(&plain, self.content_width());
        for (i, part) in wrapped.iter().enumerate() {
            self.surface
                .text(part, MARGIN, self.y + i as f32 * LINE_HEIGHT, Align::Left);
        }
        self.y += wrapped.len().max(1) as f32 * LINE_HEIGHT + LINE_GAP;
        Ok(())
    }

    fn draw_footer(&mut self, index: usize) -> Result<()> {
        let doc = self.doc;
        let mut fy = self.height - BOTTOM_RESERVE;
        for image in doc.images_at(ImagePosition::Footer) {
            let (pw, ph) = self.surface.image_size(&image.data)?;
            let h = FOOTER_IMAGE_HEIGHT;
            let w = pw * h / ph;
            self.surface
                .image(&image.data, (self.width - w) / 2.0, fy - h, w, h)?;
            fy -= h + FOOTER_IMAGE_GAP;
        }

        self.surface.set_font(self.body_font, FontStyle::Italic);
        self.surface.set_font_size(FOOTER_SIZE);
        self.surface.set_text_color(Rgb::gray(FOOTER_GRAY));
        let footer = format!("{} - Page {}", doc.content.footer, index + 1);
        self.surface
            .text(&footer, self.width / 2.0, self.height - 10.0, Align::Center);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::app::domain::{FontSize, HexColor, Image, Page};
    use crate::app::infrastructure::error::AppError;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Font(BuiltinFont, FontStyle),
        Size(f32),
        Color(Rgb),
        Text(String, f32, f32, Align),
        Line(f32, f32, f32, f32),
        Image(String, f32, f32, f32, f32),
        AddPage,
    }

    /// A4 surface that records every call and wraps at one unit per char.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: Vec<Op>,
        pub sizes: HashMap<String, (f32, f32)>,
    }

    impl RecordingSurface {
        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(t, ..) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn page_count(&self) -> usize {
            1 + self.ops.iter().filter(|op| **op == Op::AddPage).count()
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn page_size(&self) -> (f32, f32) {
            (210.0, 297.0)
        }
        fn set_font(&mut self, family: BuiltinFont, style: FontStyle) {
            self.ops.push(Op::Font(family, style));
        }
        fn set_font_size(&mut self, size: f32) {
            self.ops.push(Op::Size(size));
        }
        fn set_text_color(&mut self, color: Rgb) {
            self.ops.push(Op::Color(color));
        }
        fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String> {
            crate::app::services::export::surface::wrap_words(text, max_width, |s| {
                s.chars().count() as f32
            })
        }
        fn text(&mut self, text: &str, x: f32, y: f32, align: Align) {
            self.ops.push(Op::Text(text.to_string(), x, y, align));
        }
        fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
            self.ops.push(Op::Line(x1, y1, x2, y2));
        }
        fn image_size(&mut self, data_url: &str) -> Result<(f32, f32)> {
            self.sizes
                .get(data_url)
                .copied()
                .ok_or_else(|| AppError::Image(format!("undecodable {}", data_url)))
        }
        fn image(&mut self, data_url: &str, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
            self.ops.push(Op::Image(data_url.to_string(), x, y, w, h));
            Ok(())
        }
        fn add_page(&mut self) {
            self.ops.push(Op::AddPage);
        }
    }

    fn doc(pages: &[&str]) -> Document {
        let mut doc = Document::default();
        doc.meta.title = "Report".to_string();
        doc.meta.author = "Ada".to_string();
        doc.meta.date = "2024-03-01".to_string();
        doc.content.pages = pages
            .iter()
            .enumerate()
            .map(|(i, t)| Page {
                id: format!("page_{}", i),
                content: t.to_string(),
            })
            .collect();
        doc.content.footer = "Confidential".to_string();
        doc
    }

    fn image(name: &str, position: ImagePosition) -> Image {
        Image {
            id: 1,
            name: name.to_string(),
            data: format!("data:{}", name),
            position,
        }
    }

    #[test]
    fn test_strip_markdown() {
        assert_eq!(strip_markdown("Hello **World** and __u__ *i*"), "Hello World and u i");
    }

    #[test]
    fn test_table_detection() {
        assert!(is_table_line("  +-----+"));
        assert!(is_table_line("| a | b |"));
        assert!(!is_table_line("plain - text"));
    }

    #[test]
    fn test_title_block_and_footer() {
        let mut surface = RecordingSurface::default();
        draw_document(&doc(&["Hello **World**"]), &mut surface).unwrap();
        assert_eq!(
            surface.texts(),
            vec!["Report", "Ada | 2024-03-01", "Hello World", "Confidential - Page 1"]
        );
        assert!(surface.ops.contains(&Op::Text("Report".into(), 105.0, 20.0, Align::Center)));
        assert!(surface.ops.contains(&Op::Line(20.0, 40.0, 190.0, 40.0)));
        // Body starts below the divider.
        assert!(surface.ops.contains(&Op::Text("Hello World".into(), 20.0, 55.0, Align::Left)));
        assert!(surface.ops.contains(&Op::Text(
            "Confidential - Page 1".into(),
            105.0,
            287.0,
            Align::Center
        )));
    }

    #[test]
    fn test_title_only_on_first_page() {
        let mut surface = RecordingSurface::default();
        draw_document(&doc(&["one", "two"]), &mut surface).unwrap();
        assert_eq!(surface.page_count(), 2);
        let texts = surface.texts();
        assert_eq!(texts.iter().filter(|t| **t == "Report").count(), 1);
        assert!(surface.ops.contains(&Op::Text("two".into(), 20.0, 20.0, Align::Left)));
        assert!(texts.contains(&"Confidential - Page 2"));
    }

    #[test]
    fn test_fonts_and_sizes() {
        let mut d = doc(&["+---+\nbody"]);
        d.settings.font_title = "Playfair Display".to_string();
        d.settings.font_body = "Roboto Slab".to_string();
        d.settings.font_size = FontSize::Large;
        d.settings.color_body = HexColor::parse("#010203").unwrap();
        let mut surface = RecordingSurface::default();
        draw_document(&d, &mut surface).unwrap();
        assert!(surface.ops.contains(&Op::Font(BuiltinFont::Times, FontStyle::Bold)));
        assert!(surface.ops.contains(&Op::Size(14.0)));
        assert!(surface.ops.contains(&Op::Color(Rgb(1, 2, 3))));
        assert!(surface.ops.contains(&Op::Font(BuiltinFont::Courier, FontStyle::Italic)));
    }

    #[test]
    fn test_table_lines_use_courier() {
        let mut surface = RecordingSurface::default();
        draw_document(&doc(&["| a |"]), &mut surface).unwrap();
        let table_at = surface
            .ops
            .iter()
            .position(|op| matches!(op, Op::Text(t, ..) if t == "| a |"))
            .unwrap();
        let last_font = surface.ops[..table_at]
            .iter()
            .rev()
            .find_map(|op| match op {
                Op::Font(f, s) => Some((*f, *s)),
                _ => None,
            });
        assert_eq!(last_font, Some((BuiltinFont::Courier, FontStyle::Normal)));
    }

    #[test]
    fn test_wrapped_lines_advance_cursor() {
        let long = vec!["word"; 60].join(" ");
        let text = format!("{}\nnext", long);
        let mut surface = RecordingSurface::default();
        draw_document(&doc(&[&text]), &mut surface).unwrap();
        // 60 four-letter words at 170 chars per line wrap to two lines.
        assert!(surface.ops.contains(&Op::Text("next".into(), 20.0, 55.0 + 2.0 * 6.0 + 2.0, Align::Left)));
    }

    #[test]
    fn test_header_and_footer_images() {
        let mut d = doc(&["a"]);
        d.images.push(image("logo", ImagePosition::Header));
        d.images.push(image("sig1", ImagePosition::Footer));
        d.images.push(image("sig2", ImagePosition::Footer));
        let mut surface = RecordingSurface::default();
        surface.sizes.insert("data:logo".into(), (200.0, 100.0));
        surface.sizes.insert("data:sig1".into(), (300.0, 100.0));
        surface.sizes.insert("data:sig2".into(), (100.0, 100.0));
        draw_document(&d, &mut surface).unwrap();

        assert!(surface.ops.contains(&Op::Image("data:logo".into(), 65.0, 20.0, 80.0, 40.0)));
        // Title moves down by image height + gap.
        assert!(surface.ops.contains(&Op::Text("Report".into(), 105.0, 70.0, Align::Center)));
        // Footer images stack upward from the reserve line.
        assert!(surface.ops.contains(&Op::Image("data:sig1".into(), 60.0, 237.0, 90.0, 30.0)));
        assert!(surface.ops.contains(&Op::Image("data:sig2".into(), 90.0, 202.0, 30.0, 30.0)));
    }

    #[test]
    fn test_inline_image_line() {
        let mut d = doc(&["[IMG:chart.png]\nafter"]);
        d.images.push(image("chart.png", ImagePosition::Inline));
        let mut surface = RecordingSurface::default();
        surface.sizes.insert("data:chart.png".into(), (200.0, 100.0));
        draw_document(&d, &mut surface).unwrap();
        assert!(surface.ops.contains(&Op::Image("data:chart.png".into(), 20.0, 55.0, 100.0, 50.0)));
        assert!(surface.ops.contains(&Op::Text("after".into(), 20.0, 115.0, Align::Left)));
        assert!(!surface.texts().contains(&"[IMG:chart.png]"));
    }

    #[test]
    fn test_dangling_placeholder_is_drawn_as_text() {
        let mut surface = RecordingSurface::default();
        draw_document(&doc(&["[IMG:nothing.png]"]), &mut surface).unwrap();
        assert!(surface.texts().contains(&"[IMG:nothing.png]"));
    }

    #[test]
    fn test_tall_inline_image_breaks_page() {
        let mut d = doc(&["[IMG:tall.png]"]);
        d.images.push(image("tall.png", ImagePosition::Inline));
        let mut surface = RecordingSurface::default();
        surface.sizes.insert("data:tall.png".into(), (100.0, 250.0));
        draw_document(&d, &mut surface).unwrap();
        let break_at = surface.ops.iter().position(|op| *op == Op::AddPage).unwrap();
        let image_at = surface
            .ops
            .iter()
            .position(|op| matches!(op, Op::Image(..)))
            .unwrap();
        assert!(break_at < image_at);
        assert!(surface.ops.contains(&Op::Image("data:tall.png".into(), 20.0, 20.0, 100.0, 250.0)));
    }

    #[test]
    fn test_long_content_forces_page_breaks() {
        let text = vec!["line"; 60].join("\n");
        let mut surface = RecordingSurface::default();
        draw_document(&doc(&[&text]), &mut surface).unwrap();
        assert!(surface.page_count() >= 2);
        // The footer is drawn once per document page.
        assert_eq!(
            surface.texts().iter().filter(|t| t.starts_with("Confidential")).count(),
            1
        );
    }

    #[test]
    fn test_undecodable_image_is_an_error() {
        let mut d = doc(&["a"]);
        d.images.push(image("broken", ImagePosition::Header));
        let mut surface = RecordingSurface::default();
        assert!(matches!(draw_document(&d, &mut surface), Err(AppError::Image(_))));
    }
}
