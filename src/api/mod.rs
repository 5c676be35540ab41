//! HTTP layer.
//!
//! Serves the intake form, the fillable results form, report submission,
//! artifact retrieval and a small JSON API. The router is composable:
//! `app_router()` returns a `Router` that can be mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server, ReportServer};
pub use types::ApiContext;
