//! Last-resort strategy: a one-page PDF pointing the reader at the HTML
//! version. Needs nothing but `printpdf`, so the chain always has a PDF.

use std::io::BufWriter;

use printpdf::*;

use super::{ExportError, PdfStrategy};
use crate::config::ORGANIZATION_NAME;

pub struct PlaceholderPdf;

impl PlaceholderPdf {
    pub fn notice() -> String {
        format!("{ORGANIZATION_NAME} PATHOLOGY REPORT (HTML version available)")
    }
}

impl PdfStrategy for PlaceholderPdf {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn render_pdf(&self, _html: &str) -> Result<Vec<u8>, ExportError> {
        let notice = Self::notice();
        let (doc, page1, layer1) = PdfDocument::new(&notice, Mm(215.9), Mm(279.4), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Layout(format!("PDF font error: {e}")))?;
        doc.get_page(page1)
            .get_layer(layer1)
            .use_text(notice, 12.0, Mm(35.0), Mm(265.0), &font);

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| ExportError::Layout(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ExportError::Layout(format!("PDF buffer error: {e}")))
    }
}
