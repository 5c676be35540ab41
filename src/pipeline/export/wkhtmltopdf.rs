//! wkhtmltopdf strategy: external binary, temp-file round trip.

use std::io::Write;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

use super::binary::{read_pdf, run_converter, CONVERTER_TIMEOUT};
use super::{ExportError, PdfStrategy};

pub struct Wkhtmltopdf {
    binary: PathBuf,
    timeout: Duration,
}

impl Wkhtmltopdf {
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            timeout: CONVERTER_TIMEOUT,
        }
    }
}

impl PdfStrategy for Wkhtmltopdf {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        // Both temp paths are removed on drop, on success and on every error path.
        let html_path = write_temp_html(html)?;
        let pdf_path = tempfile::Builder::new()
            .prefix("report-")
            .suffix(".pdf")
            .tempfile()?
            .into_temp_path();

        run_converter(
            &self.binary,
            &[
                OsStr::new("--quiet"),
                OsStr::new("--page-size"),
                OsStr::new("A4"),
                OsStr::new("--encoding"),
                OsStr::new("UTF-8"),
                html_path.as_os_str(),
                pdf_path.as_os_str(),
            ],
            self.timeout,
        )?;

        read_pdf(&pdf_path)
    }
}

/// Write `html` to a temp `.html` file that is deleted when the returned path drops.
pub(crate) fn write_temp_html(html: &str) -> Result<tempfile::TempPath, ExportError> {
    let mut file = tempfile::Builder::new()
        .prefix("report-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_fails_without_leaking_temp_files() {
        let strategy = Wkhtmltopdf::new(PathBuf::from("/definitely/not/here/wkhtmltopdf"));
        let err = strategy.render_pdf("<p>x</p>").unwrap_err();
        assert!(matches!(err, ExportError::BinaryNotFound(_)));
    }

    #[test]
    fn temp_html_removed_on_drop() {
        let path = write_temp_html("<p>hello</p>").unwrap();
        let owned = path.to_path_buf();
        assert_eq!(std::fs::read_to_string(&owned).unwrap(), "<p>hello</p>");
        drop(path);
        assert!(!owned.exists());
    }

    #[cfg(unix)]
    #[test]
    fn converter_that_writes_nothing_is_rejected() {
        // `true` ignores its arguments and exits 0 without writing a PDF.
        let strategy = Wkhtmltopdf::new(PathBuf::from("/bin/true"));
        if !std::path::Path::new("/bin/true").exists() {
            return;
        }
        let err = strategy.render_pdf("<p>x</p>").unwrap_err();
        assert!(matches!(err, ExportError::EmptyOutput));
    }
}
