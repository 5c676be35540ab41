//! WeasyPrint strategy: full-CSS engine driven through its CLI.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

use super::binary::{read_pdf, run_converter, CONVERTER_TIMEOUT};
use super::wkhtmltopdf::write_temp_html;
use super::{ExportError, PdfStrategy};

pub struct WeasyPrint {
    binary: PathBuf,
    timeout: Duration,
}

impl WeasyPrint {
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            timeout: CONVERTER_TIMEOUT,
        }
    }
}

impl PdfStrategy for WeasyPrint {
    fn name(&self) -> &'static str {
        "weasyprint"
    }

    fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let html_path = write_temp_html(html)?;
        let pdf_path = tempfile::Builder::new()
            .prefix("report-")
            .suffix(".pdf")
            .tempfile()?
            .into_temp_path();

        run_converter(
            &self.binary,
            &[
                OsStr::new("--encoding"),
                OsStr::new("utf-8"),
                html_path.as_os_str(),
                pdf_path.as_os_str(),
            ],
            self.timeout,
        )?;

        read_pdf(&pdf_path)
    }
}
