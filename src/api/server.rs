//! Server lifecycle: bind → spawn background task → return handle with
//! shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::app_router;
use crate::core_state::CoreState;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running report server.
pub struct ReportServer {
    pub addr: SocketAddr,
    pub started_at: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ReportServer {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Report server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Report server task failed: {e}");
            }
        }
    }
}

/// Bind `host:port` and serve the application router in a background task.
/// Port 0 binds an ephemeral port; the chosen one is in `ReportServer::addr`.
pub async fn start_server(
    core: Arc<CoreState>,
    host: &str,
    port: u16,
) -> Result<ReportServer, ServerError> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{host}:{port}"),
            source,
        })?;
    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = app_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Report server received shutdown signal");
        };

        tracing::info!(%addr, "Report server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Report server error: {e}");
        }

        tracing::info!("Report server stopped");
    });

    Ok(ReportServer {
        addr,
        started_at: chrono::Local::now().to_rfc3339(),
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_core() -> (Arc<CoreState>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::for_test(tmp.path());
        core.initialize().unwrap();
        (Arc::new(core), tmp)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (core, _tmp) = test_core();
        let server = start_server(core, "127.0.0.1", 0)
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.stop().await;
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (core, _tmp) = test_core();
        let mut server = start_server(core, "127.0.0.1", 0).await.unwrap();

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (core, _tmp) = test_core();
        let mut server = start_server(core, "127.0.0.1", 0).await.unwrap();
        server.shutdown();
        server.shutdown();
    }

    #[tokio::test]
    async fn port_in_use_is_bind_error() {
        let (core, _tmp) = test_core();
        let first = start_server(core.clone(), "127.0.0.1", 0).await.unwrap();
        let err = start_server(core, "127.0.0.1", first.addr.port())
            .await
            .err()
            .expect("second bind should fail");
        assert!(matches!(err, ServerError::Bind { .. }));
        first.stop().await;
    }
}
