//! Shared application state.
//!
//! Built once at start-up and wrapped in `Arc`. Every field is read-only
//! after construction, so request handlers and blocking workers share it
//! without locks. Database access opens a fresh connection per operation.

use rusqlite::Connection;
use thiserror::Error;

use crate::catalog::TestCatalog;
use crate::config::AppConfig;
use crate::db::{self, DatabaseError};
use crate::pipeline::artifact::{ArtifactError, ArtifactStore};
use crate::pipeline::export::{DocumentExporter, ExportCapabilities};
use crate::pipeline::notify::NotificationDispatcher;
use crate::pipeline::submission::SubmissionOrchestrator;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Reports directory error: {0}")]
    Artifact(#[from] ArtifactError),
}

pub struct CoreState {
    pub config: AppConfig,
    pub catalog: TestCatalog,
    pub exporter: DocumentExporter,
    pub dispatcher: NotificationDispatcher,
    pub artifacts: ArtifactStore,
}

impl CoreState {
    pub fn new(
        config: AppConfig,
        exporter: DocumentExporter,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        let artifacts = ArtifactStore::new(config.reports_dir.clone());
        Self {
            config,
            catalog: TestCatalog::standard(),
            exporter,
            dispatcher,
            artifacts,
        }
    }

    /// Probe the environment for PDF backends and build the standard
    /// delivery chain.
    pub fn from_config(config: AppConfig) -> Self {
        let exporter = ExportCapabilities::detect().into_exporter();
        let dispatcher = NotificationDispatcher::from_config(&config);
        Self::new(config, exporter, dispatcher)
    }

    /// Create the reports directory and bring the schema up to date.
    pub fn initialize(&self) -> Result<(), CoreError> {
        self.artifacts.ensure_dir()?;
        self.open_db()?;
        tracing::info!(
            reports_dir = %self.artifacts.root().display(),
            database = %self.config.database_path.display(),
            export = ?self.exporter.strategy_names(),
            delivery = ?self.dispatcher.strategy_names(),
            "Core state initialized"
        );
        Ok(())
    }

    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.config.database_path)
    }

    pub fn orchestrator(&self) -> SubmissionOrchestrator<'_> {
        SubmissionOrchestrator {
            catalog: &self.catalog,
            exporter: &self.exporter,
            dispatcher: &self.dispatcher,
            artifacts: &self.artifacts,
            database_path: &self.config.database_path,
            public_base_url: &self.config.public_base_url,
        }
    }
}

#[cfg(test)]
impl CoreState {
    /// State rooted in `dir` with the in-process export chain and the
    /// standard (side-effect free) delivery chain.
    pub(crate) fn for_test(dir: &std::path::Path) -> Self {
        let config = AppConfig::for_data_dir(dir);
        let exporter = ExportCapabilities {
            in_process: true,
            placeholder: true,
            ..Default::default()
        }
        .into_exporter();
        let dispatcher = NotificationDispatcher::from_config(&config);
        Self::new(config, exporter, dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_reports_dir_and_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let state = CoreState::for_test(tmp.path());
        state.initialize().unwrap();

        assert!(state.artifacts.root().is_dir());
        let conn = state.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 3);
    }

    #[test]
    fn orchestrator_uses_configured_base_url() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = CoreState::for_test(tmp.path());
        state.config.public_base_url = "http://lab.local:8080/".into();
        assert_eq!(
            state.orchestrator().report_url("r.pdf"),
            "http://lab.local:8080/view-pdf/r.pdf"
        );
    }

    #[test]
    fn unusable_reports_dir_fails_initialize() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = CoreState::for_test(tmp.path());
        let file = tmp.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        state.artifacts = ArtifactStore::new(&file);
        assert!(matches!(state.initialize(), Err(CoreError::Artifact(_))));
    }
}
