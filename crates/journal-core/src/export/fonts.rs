//! Embedded DejaVu Sans faces and their metrics.
//!
//! The same bytes are embedded into every exported PDF and measured here
//! for line wrapping, so widths match what is drawn.

use ttf_parser::{Face, GlyphId};

use super::layout::FontStyle;
use crate::error::{JournalError, Result};

pub const PT_PER_MM: f32 = 72.0 / 25.4;

const REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
const ITALIC_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Oblique.ttf");

pub fn font_bytes(style: FontStyle) -> &'static [u8] {
    match style {
        FontStyle::Regular => REGULAR_TTF,
        FontStyle::Bold => BOLD_TTF,
        FontStyle::Italic => ITALIC_TTF,
    }
}

fn parse(style: FontStyle) -> Result<Face<'static>> {
    Face::parse(font_bytes(style), 0)
        .map_err(|e| JournalError::Export(format!("Failed to parse {:?} font: {}", style, e)))
}

/// Format characters that never produce a glyph of their own.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FE00}'..='\u{FE0F}' | '\u{FEFF}'
    )
}

pub struct FontMetrics {
    regular: Face<'static>,
    bold: Face<'static>,
    italic: Face<'static>,
}

impl FontMetrics {
    pub fn load() -> Result<Self> {
        Ok(Self {
            regular: parse(FontStyle::Regular)?,
            bold: parse(FontStyle::Bold)?,
            italic: parse(FontStyle::Italic)?,
        })
    }

    fn face(&self, style: FontStyle) -> &Face<'static> {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    fn glyph(face: &Face<'static>, c: char) -> Option<GlyphId> {
        face.glyph_index(c).filter(|id| id.0 != 0)
    }

    /// Advance width of `text` set at `size` points, in millimetres.
    pub fn text_width_mm(&self, text: &str, size: f32, style: FontStyle) -> f32 {
        let face = self.face(style);
        let units: u32 = text
            .chars()
            .filter_map(|c| Self::glyph(face, c))
            .filter_map(|id| face.glyph_hor_advance(id))
            .map(u32::from)
            .sum();
        units as f32 / f32::from(face.units_per_em()) * size / PT_PER_MM
    }

    /// Characters of `text` that at least one face cannot draw, deduplicated
    /// in first-seen order. Whitespace and zero-width format characters are
    /// never reported.
    pub fn unsupported_chars(&self, text: &str) -> Vec<char> {
        let mut missing = Vec::new();
        for c in text.chars() {
            if c.is_whitespace() || is_invisible(c) || missing.contains(&c) {
                continue;
            }
            let drawable = [&self.regular, &self.bold, &self.italic]
                .into_iter()
                .all(|face| Self::glyph(face, c).is_some());
            if !drawable {
                missing.push(c);
            }
        }
        missing
    }
}
