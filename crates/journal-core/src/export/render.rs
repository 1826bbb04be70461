//! Draws laid-out pages into a PDF document.

use printpdf::{Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, Point};

use super::fonts::font_bytes;
use super::layout::{FontStyle, Page, Rgb, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::error::{JournalError, Result};

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn pdf_color(color: Rgb) -> Color {
    let Rgb(r, g, b) = color;
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn embed_font(doc: &PdfDocumentReference, style: FontStyle) -> Result<IndirectFontRef> {
    doc.add_external_font(font_bytes(style)).map_err(pdf_error)
}

fn pdf_error(err: impl std::fmt::Display) -> JournalError {
    JournalError::Export(err.to_string())
}

/// Render `pages` and return the encoded document.
pub fn render(title: &str, pages: &[Page]) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let fonts = Fonts {
        regular: embed_font(&doc, FontStyle::Regular)?,
        bold: embed_font(&doc, FontStyle::Bold)?,
        italic: embed_font(&doc, FontStyle::Italic)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for rule in &page.rules {
            layer.set_outline_color(pdf_color(rule.color));
            layer.set_outline_thickness(rule.thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(MARGIN_MM), Mm(rule.y)), false),
                    (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(rule.y)), false),
                ],
                is_closed: false,
            });
        }

        for run in &page.runs {
            layer.set_fill_color(pdf_color(run.color));
            layer.use_text(
                run.text.as_str(),
                run.size,
                Mm(run.x),
                Mm(run.y),
                fonts.get(run.style),
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::{TextRun, Rule, TEXT};

    #[test]
    fn test_render_produces_pdf_bytes() {
        let page = Page {
            runs: vec![TextRun {
                text: "Hello Привет".to_string(),
                x: MARGIN_MM,
                y: 200.0,
                size: 12.0,
                style: FontStyle::Bold,
                color: TEXT,
            }],
            rules: vec![Rule {
                y: 190.0,
                thickness: 0.5,
                color: TEXT,
            }],
        };

        let bytes = render("Test", &[page.clone(), page]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
