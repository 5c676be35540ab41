//! In-process strategy: lays the flattened report text out with `printpdf`.
//!
//! No external binary and no CSS; tables come out as ` | `-separated rows.

use std::io::BufWriter;

use printpdf::*;

use super::html_text::{html_to_lines, TextLine};
use super::{ExportError, PdfStrategy};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 18.0;
const LINE_HEIGHT: f32 = 5.0;
const FONT_SIZE: f32 = 9.5;
const BOLD_FONT_SIZE: f32 = 11.0;

/// printpdf-backed layout of the report text.
pub struct InProcessLayout {
    /// Characters per line before wrapping.
    pub wrap_at: usize,
}

impl Default for InProcessLayout {
    fn default() -> Self {
        Self { wrap_at: 95 }
    }
}

impl PdfStrategy for InProcessLayout {
    fn name(&self) -> &'static str {
        "in_process_layout"
    }

    fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let lines = html_to_lines(html);
        layout_lines(&lines, self.wrap_at)
    }
}

fn layout_lines(lines: &[TextLine], wrap_at: usize) -> Result<Vec<u8>, ExportError> {
    let title = lines
        .iter()
        .find(|l| !l.rule)
        .map(|l| l.text.clone())
        .unwrap_or_else(|| "Pathology Report".to_string());

    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Layout(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Layout(format!("PDF font error: {e}")))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = Mm(TOP);

    for line in lines {
        let wrapped = if line.rule {
            vec!["-".repeat(wrap_at.min(110))]
        } else {
            wrap_text(&line.text, wrap_at)
        };

        for segment in wrapped {
            if y.0 < BOTTOM {
                let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = Mm(TOP);
            }
            let (size, face) = if line.bold {
                (BOLD_FONT_SIZE, &bold)
            } else {
                (FONT_SIZE, &font)
            };
            layer.use_text(segment, size, Mm(MARGIN_LEFT), y, face);
            y -= Mm(LINE_HEIGHT);
        }
        if line.bold {
            y -= Mm(1.5);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Layout(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Layout(format!("PDF buffer error: {e}")))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
