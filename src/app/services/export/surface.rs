//! The drawing contract the PDF exporter lays pages out against.
//!
//! Units are millimetres with the origin at the top-left corner of the page;
//! font sizes are points. Implementations own page management and text metrics.

use crate::app::domain::HexColor;
use crate::app::infrastructure::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    Times,
    Courier,
}

impl BuiltinFont {
    /// Map a configured font name onto one of the built-in families.
    /// Unknown names fall back to Helvetica.
    pub fn for_name(name: &str) -> Self {
        match name {
            "Playfair Display" | "Merriweather" => Self::Times,
            "Roboto Slab" => Self::Courier,
            // Orbitron, Montserrat, Rajdhani, Open Sans, Lato and anything unmapped
            _ => Self::Helvetica,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn gray(level: u8) -> Self {
        Self(level, level, level)
    }

    /// Components scaled to 0.0..=1.0.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

impl From<&HexColor> for Rgb {
    fn from(color: &HexColor) -> Self {
        let (r, g, b) = color.rgb();
        Self(r, g, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

pub trait DrawingSurface {
    /// Page width and height.
    fn page_size(&self) -> (f32, f32);

    fn set_font(&mut self, family: BuiltinFont, style: FontStyle);

    fn set_font_size(&mut self, size: f32);

    fn set_text_color(&mut self, color: Rgb);

    /// Wrap `text` into lines no wider than `max_width` in the current font.
    fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String>;

    /// Draw one line of text with its baseline at `y`. With `Align::Center`,
    /// `x` is the horizontal centre.
    fn text(&mut self, text: &str, x: f32, y: f32, align: Align);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Intrinsic pixel size of the image behind a data URL.
    fn image_size(&mut self, data_url: &str) -> Result<(f32, f32)>;

    /// Draw an image with its top-left corner at (`x`, `y`).
    fn image(&mut self, data_url: &str, x: f32, y: f32, width: f32, height: f32) -> Result<()>;

    fn add_page(&mut self);
}

/// Greedy word wrap shared by surfaces. `measure` returns the width of a string.
/// Words wider than `max_width` are broken by character. Always returns at
/// least one line.
pub fn wrap_words(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        // Break an overlong word into pieces that fit.
        for c in word.chars() {
            current.push(c);
            if measure(&current) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn test_font_lookup() {
        assert_eq!(BuiltinFont::for_name("Orbitron"), BuiltinFont::Helvetica);
        assert_eq!(BuiltinFont::for_name("Playfair Display"), BuiltinFont::Times);
        assert_eq!(BuiltinFont::for_name("Merriweather"), BuiltinFont::Times);
        assert_eq!(BuiltinFont::for_name("Roboto Slab"), BuiltinFont::Courier);
        assert_eq!(BuiltinFont::for_name("Comic Sans"), BuiltinFont::Helvetica);
    }

    #[test]
    fn test_rgb_from_hex() {
        let color = HexColor::parse("#ff0080").unwrap();
        assert_eq!(Rgb::from(&color), Rgb(255, 0, 128));
        assert_eq!(Rgb::gray(100), Rgb(100, 100, 100));
        assert_eq!(Rgb(255, 0, 0).unit(), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_words("aa bb cc", 5.0, by_chars), vec!["aa bb", "cc"]);
        assert_eq!(wrap_words("", 5.0, by_chars), vec![""]);
        assert_eq!(wrap_words("short", 10.0, by_chars), vec!["short"]);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        assert_eq!(wrap_words("abcdefg", 3.0, by_chars), vec!["abc", "def", "g"]);
        assert_eq!(wrap_words("x abcdef", 3.0, by_chars), vec!["x", "abc", "def"]);
    }
}
