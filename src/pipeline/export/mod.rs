//! Document exporter: report HTML → PDF bytes via an ordered strategy chain.
//!
//! The chain is assembled once at start-up by [`ExportCapabilities::detect`].
//! `export` tries each strategy in order and returns the first PDF produced;
//! every failure is logged and the next strategy is attempted. Only when
//! all of them fail does the caller see [`ExportOutcome::Unavailable`].

pub mod binary;
pub mod html_text;
pub mod layout;
pub mod placeholder;
pub mod weasyprint;
pub mod wkhtmltopdf;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

use thiserror::Error;

pub use layout::InProcessLayout;
pub use placeholder::PlaceholderPdf;
pub use weasyprint::WeasyPrint;
pub use wkhtmltopdf::Wkhtmltopdf;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Converter binary not found: {0}")]
    BinaryNotFound(String),

    #[error("Converter {binary} exited with {status}")]
    ConverterFailed { binary: String, status: String },

    #[error("Converter {binary} timed out after {secs}s")]
    ConverterTimeout { binary: String, secs: u64 },

    #[error("Converter produced no PDF output")]
    EmptyOutput,

    #[error("PDF layout error: {0}")]
    Layout(String),

    #[error("Strategy panicked: {0}")]
    Panicked(String),
}

/// One way of turning HTML into a PDF.
pub trait PdfStrategy: Send + Sync {
    /// Short name used in logs and the health endpoint.
    fn name(&self) -> &'static str;

    fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError>;
}

/// Result of [`DocumentExporter::export`].
#[derive(Debug)]
pub enum ExportOutcome {
    Pdf { bytes: Vec<u8>, strategy: &'static str },
    /// Every strategy failed or none is configured.
    Unavailable,
}

impl ExportOutcome {
    pub fn is_pdf(&self) -> bool {
        matches!(self, ExportOutcome::Pdf { .. })
    }

    /// PDF bytes, or `None` when the caller must fall back to HTML.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            ExportOutcome::Pdf { bytes, .. } => Some(bytes),
            ExportOutcome::Unavailable => None,
        }
    }
}

/// Ordered chain of PDF strategies.
pub struct DocumentExporter {
    strategies: Vec<Box<dyn PdfStrategy>>,
}

impl DocumentExporter {
    pub fn new(strategies: Vec<Box<dyn PdfStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn export(&self, html: &str) -> ExportOutcome {
        for strategy in &self.strategies {
            let attempt = catch_unwind(AssertUnwindSafe(|| strategy.render_pdf(html)))
                .unwrap_or_else(|panic| Err(ExportError::Panicked(panic_message(&panic))));

            match attempt {
                Ok(bytes) if !bytes.is_empty() => {
                    tracing::info!(
                        strategy = strategy.name(),
                        bytes = bytes.len(),
                        "PDF export succeeded"
                    );
                    return ExportOutcome::Pdf {
                        bytes,
                        strategy: strategy.name(),
                    };
                }
                Ok(_) => {
                    tracing::warn!(strategy = strategy.name(), "PDF export produced no bytes");
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "PDF export failed");
                }
            }
        }

        tracing::warn!(
            attempted = self.strategies.len(),
            "No PDF strategy succeeded, falling back to HTML"
        );
        ExportOutcome::Unavailable
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Well-known install locations for the wkhtmltopdf binary.
pub const WKHTMLTOPDF_LOCATIONS: &[&str] = &[
    "/usr/bin/wkhtmltopdf",
    "/usr/local/bin/wkhtmltopdf",
    r"C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe",
    r"C:\wkhtmltopdf\bin\wkhtmltopdf.exe",
];

/// Well-known install locations for the WeasyPrint CLI.
pub const WEASYPRINT_LOCATIONS: &[&str] = &["/usr/bin/weasyprint", "/usr/local/bin/weasyprint"];

/// Result of probing the runtime environment for PDF backends.
#[derive(Debug, Clone, Default)]
pub struct ExportCapabilities {
    pub weasyprint: Option<PathBuf>,
    pub wkhtmltopdf: Option<PathBuf>,
    pub in_process: bool,
    pub placeholder: bool,
}

impl ExportCapabilities {
    /// Probe well-known locations and `PATH` for the external converters.
    /// The in-process strategies are always available.
    pub fn detect() -> Self {
        let weasyprint = if cfg!(target_os = "windows") {
            // WeasyPrint needs GTK on Windows; not worth probing.
            None
        } else {
            binary::locate(WEASYPRINT_LOCATIONS, "weasyprint")
        };
        let wkhtmltopdf = binary::locate(WKHTMLTOPDF_LOCATIONS, "wkhtmltopdf");

        let caps = Self {
            weasyprint,
            wkhtmltopdf,
            in_process: true,
            placeholder: true,
        };
        tracing::info!(
            weasyprint = caps.weasyprint.is_some(),
            wkhtmltopdf = caps.wkhtmltopdf.is_some(),
            "PDF export capabilities detected"
        );
        caps
    }

    /// Build the exporter in priority order from what is available.
    pub fn into_exporter(self) -> DocumentExporter {
        let mut strategies: Vec<Box<dyn PdfStrategy>> = Vec::new();
        if let Some(path) = self.weasyprint {
            strategies.push(Box::new(WeasyPrint::new(path)));
        }
        if let Some(path) = self.wkhtmltopdf {
            strategies.push(Box::new(Wkhtmltopdf::new(path)));
        }
        if self.in_process {
            strategies.push(Box::new(InProcessLayout::default()));
        }
        if self.placeholder {
            strategies.push(Box::new(PlaceholderPdf));
        }
        DocumentExporter::new(strategies)
    }
}

// ═══════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════


#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::mock::MockPdfStrategy;
    use super::*;

    const HTML: &str = "<html><body><h2>Report</h2></body></html>";

    #[test]
    fn first_success_wins() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let exporter = DocumentExporter::new(vec![
            Box::new(MockPdfStrategy::ok("first", &calls)),
            Box::new(MockPdfStrategy::ok("second", &calls)),
        ]);
        match exporter.export(HTML) {
            ExportOutcome::Pdf { strategy, .. } => assert_eq!(strategy, "first"),
            other => panic!("expected PDF, got {other:?}"),
        }
        assert_eq!(*calls.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn failures_fall_through_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let exporter = DocumentExporter::new(vec![
            Box::new(MockPdfStrategy::failing("engine", &calls)),
            Box::new(MockPdfStrategy::failing("binary", &calls)),
            Box::new(MockPdfStrategy::ok("in_process", &calls)),
            Box::new(MockPdfStrategy::ok("placeholder", &calls)),
        ]);
        let outcome = exporter.export(HTML);
        assert!(outcome.is_pdf());
        assert_eq!(*calls.lock().unwrap(), vec!["engine", "binary", "in_process"]);
    }

    #[test]
    fn all_failing_is_unavailable() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let exporter = DocumentExporter::new(vec![
            Box::new(MockPdfStrategy::failing("a", &calls)),
            Box::new(MockPdfStrategy::failing("b", &calls)),
            Box::new(MockPdfStrategy::failing("c", &calls)),
            Box::new(MockPdfStrategy::failing("d", &calls)),
        ]);
        let outcome = exporter.export(HTML);
        assert!(!outcome.is_pdf());
        assert!(outcome.into_bytes().is_none());
        assert_eq!(calls.lock().unwrap().len(), 4);
    }

    #[test]
    fn panicking_strategy_is_swallowed() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let exporter = DocumentExporter::new(vec![
            Box::new(MockPdfStrategy::panicking("unstable", &calls)),
            Box::new(MockPdfStrategy::ok("fallback", &calls)),
        ]);
        let bytes = exporter.export(HTML).into_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-mock-fallback"));
    }

    #[test]
    fn empty_chain_is_unavailable() {
        let exporter = DocumentExporter::new(Vec::new());
        assert!(matches!(exporter.export(HTML), ExportOutcome::Unavailable));
    }

    #[test]
    fn capabilities_order_strategies_by_priority() {
        let caps = ExportCapabilities {
            weasyprint: Some(PathBuf::from("/opt/weasyprint")),
            wkhtmltopdf: Some(PathBuf::from("/opt/wkhtmltopdf")),
            in_process: true,
            placeholder: true,
        };
        let exporter = caps.into_exporter();
        assert_eq!(
            exporter.strategy_names(),
            vec!["weasyprint", "wkhtmltopdf", "in_process_layout", "placeholder"]
        );
    }

    #[test]
    fn missing_binaries_are_left_out() {
        let caps = ExportCapabilities {
            in_process: true,
            placeholder: true,
            ..Default::default()
        };
        assert_eq!(
            caps.into_exporter().strategy_names(),
            vec!["in_process_layout", "placeholder"]
        );
    }
}
