//! `DrawingSurface` backed by `pdf-writer`.
//!
//! Layout happens in millimetres from the top-left corner; everything is
//! converted to PDF points (bottom-left origin) at draw time. Text uses the
//! standard Type1 fonts with WinAnsi encoding, so no font files are embedded.

use std::collections::HashMap;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::font_metrics::text_width;
use crate::app::services::export::surface::{
    Align, BuiltinFont, DrawingSurface, FontStyle, Rgb, wrap_words,
};
use crate::app::services::ingest::DataUrl;

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);

fn mm(value: f32) -> f32 {
    value * PT_PER_MM
}

fn base_font(family: BuiltinFont, style: FontStyle) -> &'static [u8] {
    match (family, style) {
        (BuiltinFont::Helvetica, FontStyle::Normal) => b"Helvetica",
        (BuiltinFont::Helvetica, FontStyle::Bold) => b"Helvetica-Bold",
        (BuiltinFont::Helvetica, FontStyle::Italic) => b"Helvetica-Oblique",
        (BuiltinFont::Times, FontStyle::Normal) => b"Times-Roman",
        (BuiltinFont::Times, FontStyle::Bold) => b"Times-Bold",
        (BuiltinFont::Times, FontStyle::Italic) => b"Times-Italic",
        (BuiltinFont::Courier, FontStyle::Normal) => b"Courier",
        (BuiltinFont::Courier, FontStyle::Bold) => b"Courier-Bold",
        (BuiltinFont::Courier, FontStyle::Italic) => b"Courier-Oblique",
    }
}

/// Encode text for a WinAnsi font. Unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{20AC}' => 0x80,
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

struct FontEntry {
    name: String,
    id: Ref,
}

struct ImageEntry {
    name: String,
    id: Ref,
    width: u32,
    height: u32,
}

pub struct PdfWriterSurface {
    pdf: Pdf,
    next_id: i32,
    pages: Vec<Content>,
    fonts: HashMap<(BuiltinFont, FontStyle), FontEntry>,
    images: HashMap<String, ImageEntry>,
    font: (BuiltinFont, FontStyle),
    font_size: f32,
    color: Rgb,
}

impl Default for PdfWriterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriterSurface {
    /// A blank A4 document with one empty page.
    pub fn new() -> Self {
        Self {
            pdf: Pdf::new(),
            next_id: 3,
            pages: vec![Content::new()],
            fonts: HashMap::new(),
            images: HashMap::new(),
            font: (BuiltinFont::Helvetica, FontStyle::Normal),
            font_size: 12.0,
            color: Rgb(0, 0, 0),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn current(&mut self) -> &mut Content {
        // `pages` is never empty: `new` seeds one page and nothing removes them.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Resource name of the current font, registering it on first use.
    fn font_name(&mut self) -> String {
        if let Some(entry) = self.fonts.get(&self.font) {
            return entry.name.clone();
        }
        let id = self.alloc();
        let name = format!("F{}", self.fonts.len() + 1);
        let (family, style) = self.font;
        self.pdf
            .type1_font(id)
            .base_font(Name(base_font(family, style)))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        self.fonts.insert(self.font, FontEntry { name: name.clone(), id });
        name
    }

    /// Decode and embed the image behind `data_url` once; later calls reuse it.
    fn embed_image(&mut self, data_url: &str) -> Result<&ImageEntry> {
        if !self.images.contains_key(data_url) {
            let decoded = DataUrl::parse(data_url)?;
            let rgba = image::load_from_memory(&decoded.bytes)
                .map_err(|e| AppError::Image(e.to_string()))?
                .to_rgba8();
            let (width, height) = rgba.dimensions();
            let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
            let mut alpha = Vec::with_capacity(rgba.len() / 4);
            for pixel in rgba.pixels() {
                rgb.extend_from_slice(&pixel.0[..3]);
                alpha.push(pixel.0[3]);
            }

            // Fully opaque images need no soft mask.
            let mask = if alpha.iter().any(|&a| a < u8::MAX) {
                let mask_id = self.alloc();
                let mut smask = self.pdf.image_xobject(mask_id, &alpha);
                smask.width(width as i32);
                smask.height(height as i32);
                smask.color_space().device_gray();
                smask.bits_per_component(8);
                smask.finish();
                Some(mask_id)
            } else {
                None
            };

            let id = self.alloc();
            let mut xobject = self.pdf.image_xobject(id, &rgb);
            xobject.width(width as i32);
            xobject.height(height as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            if let Some(mask_id) = mask {
                xobject.s_mask(mask_id);
            }
            xobject.finish();

            let name = format!("Im{}", self.images.len() + 1);
            tracing::debug!("Embedded image {} ({}x{})", name, width, height);
            self.images.insert(
                data_url.to_string(),
                ImageEntry {
                    name,
                    id,
                    width,
                    height,
                },
            );
        }
        self.images
            .get(data_url)
            .ok_or_else(|| AppError::Image("image cache miss".to_string()))
    }

    /// Width of `text` in millimetres at the current font and size.
    fn measure(&self, text: &str) -> f32 {
        let (family, style) = self.font;
        text_width(family, style, self.font_size, &win_ansi(text)) / PT_PER_MM
    }

    /// Write the page tree and return the finished PDF bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let pages = std::mem::take(&mut self.pages);
        let mut page_ids = Vec::with_capacity(pages.len());
        let mut content_ids = Vec::with_capacity(pages.len());
        for _ in &pages {
            page_ids.push(self.alloc());
            content_ids.push(self.alloc());
        }

        self.pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
        self.pdf
            .pages(PAGE_TREE_ID)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        let media_box = Rect::new(0.0, 0.0, mm(A4_WIDTH_MM), mm(A4_HEIGHT_MM));
        for (i, content) in pages.into_iter().enumerate() {
            let mut page = self.pdf.page(page_ids[i]);
            page.media_box(media_box);
            page.parent(PAGE_TREE_ID);
            page.contents(content_ids[i]);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for entry in self.fonts.values() {
                fonts.pair(Name(entry.name.as_bytes()), entry.id);
            }
            fonts.finish();
            let mut x_objects = resources.x_objects();
            for entry in self.images.values() {
                x_objects.pair(Name(entry.name.as_bytes()), entry.id);
            }
            x_objects.finish();
            resources.finish();
            page.finish();

            self.pdf.stream(content_ids[i], &content.finish());
        }

        Ok(self.pdf.finish())
    }
}

impl DrawingSurface for PdfWriterSurface {
    fn page_size(&self) -> (f32, f32) {
        (A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    fn set_font(&mut self, family: BuiltinFont, style: FontStyle) {
        self.font = (family, style);
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String> {
        wrap_words(text, max_width, |s| self.measure(s))
    }

    fn text(&mut self, text: &str, x: f32, y: f32, align: Align) {
        let left = match align {
            Align::Left => x,
            Align::Center => x - self.measure(text) / 2.0,
        };
        let name = self.font_name();
        let size = self.font_size;
        let (r, g, b) = self.color.unit();
        let encoded = win_ansi(text);
        let content = self.current();
        content.begin_text();
        content.set_font(Name(name.as_bytes()), size);
        content.set_fill_rgb(r, g, b);
        content.next_line(mm(left), mm(A4_HEIGHT_MM - y));
        content.show(Str(&encoded));
        content.end_text();
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let content = self.current();
        content.set_line_width(0.5);
        content.move_to(mm(x1), mm(A4_HEIGHT_MM - y1));
        content.line_to(mm(x2), mm(A4_HEIGHT_MM - y2));
        content.stroke();
    }

    fn image_size(&mut self, data_url: &str) -> Result<(f32, f32)> {
        let entry = self.embed_image(data_url)?;
        Ok((entry.width as f32, entry.height as f32))
    }

    fn image(&mut self, data_url: &str, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let name = self.embed_image(data_url)?.name.clone();
        let content = self.current();
        content.save_state();
        content.transform([
            mm(width),
            0.0,
            0.0,
            mm(height),
            mm(x),
            mm(A4_HEIGHT_MM - y - height),
        ]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();
        Ok(())
    }

    fn add_page(&mut self) {
        self.pages.push(Content::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::ingest::to_data_url;
    use std::io::Cursor;

    fn png_data_url(width: u32, height: u32) -> String {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 10, 10]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        to_data_url("image/png", &bytes)
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("a\u{2022}b"), vec![b'a', 0x95, b'b']);
        assert_eq!(win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(win_ansi("\u{4e2d}"), vec![b'?']);
    }

    #[test]
    fn test_empty_document_is_pdf() {
        let bytes = PdfWriterSurface::new().finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains(&bytes, b"/Count 1"));
    }

    #[test]
    fn test_fonts_registered_once() {
        let mut surface = PdfWriterSurface::new();
        surface.set_font(BuiltinFont::Times, FontStyle::Bold);
        surface.text("one", 10.0, 10.0, Align::Left);
        surface.text("two", 10.0, 20.0, Align::Center);
        surface.add_page();
        surface.text("three", 10.0, 10.0, Align::Left);
        assert_eq!(surface.page_count(), 2);
        let bytes = surface.finish().unwrap();
        assert!(contains(&bytes, b"/Times-Bold"));
        assert!(contains(&bytes, b"/Count 2"));
        assert_eq!(bytes.windows(11).filter(|w| *w == b"/Times-Bold").count(), 1);
    }

    #[test]
    fn test_images_embedded_once() {
        let mut surface = PdfWriterSurface::new();
        let url = png_data_url(4, 2);
        assert_eq!(surface.image_size(&url).unwrap(), (4.0, 2.0));
        surface.image(&url, 20.0, 20.0, 40.0, 20.0).unwrap();
        surface.image(&url, 20.0, 60.0, 40.0, 20.0).unwrap();
        assert_eq!(surface.images.len(), 1);
        let bytes = surface.finish().unwrap();
        assert!(contains(&bytes, b"/Im1"));
        assert!(contains(&bytes, b"/DeviceRGB"));
        assert!(!contains(&bytes, b"/SMask"));
    }

    #[test]
    fn test_transparent_image_gets_soft_mask() {
        let mut img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255]));
        img.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let url = to_data_url("image/png", &bytes);

        let mut surface = PdfWriterSurface::new();
        surface.image(&url, 10.0, 10.0, 20.0, 20.0).unwrap();
        let pdf = surface.finish().unwrap();
        assert!(contains(&pdf, b"/SMask"));
        assert!(contains(&pdf, b"/DeviceGray"));
        assert!(contains(&pdf, b"/DeviceRGB"));
    }

    #[test]
    fn test_bad_image_is_an_error() {
        let mut surface = PdfWriterSurface::new();
        let url = to_data_url("image/png", b"not an image");
        assert!(matches!(surface.image_size(&url), Err(AppError::Image(_))));
    }

    #[test]
    fn test_wrapping_uses_font_metrics() {
        let mut surface = PdfWriterSurface::new();
        surface.set_font(BuiltinFont::Courier, FontStyle::Normal);
        surface.set_font_size(12.0);
        // Courier at 12pt is 7.2pt per glyph, about 2.54mm.
        let lines = surface.split_text_to_size("aaaa bbbb cccc", 26.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_wide_glyphs_wrap_in_proportional_fonts() {
        let mut surface = PdfWriterSurface::new();
        surface.set_font(BuiltinFont::Helvetica, FontStyle::Normal);
        surface.set_font_size(12.0);
        // Helvetica W is 944/1000 em, so 60 of them run to about 240mm.
        let wide = "W".repeat(60);
        let lines = surface.split_text_to_size(&wide, 170.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 42);
        assert!(lines.iter().all(|l| surface.measure(l) <= 170.0));

        let narrow = "i".repeat(60);
        assert_eq!(surface.split_text_to_size(&narrow, 170.0), vec![narrow.clone()]);
        assert!(surface.measure(&narrow) < surface.measure(&wide) / 4.0);
    }
}
