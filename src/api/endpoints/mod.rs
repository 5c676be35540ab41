//! Endpoint handlers, one module per feature.

pub mod forms;
pub mod health;
pub mod reports;
