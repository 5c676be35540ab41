//! Notification dispatcher: mobile normalization, then an ordered chain of
//! delivery strategies (provider API → web hand-off → operator notice).
//!
//! `notify` never fails: every problem ends up in the returned
//! [`DeliveryOutcome`], which the orchestrator records as-is.

pub mod message;
pub mod operator;
pub mod phone;
pub mod web_handoff;
pub mod whatsapp_api;

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::PatientRecord;

pub use message::compose_message;
pub use operator::{LogNoticeSink, NoticeSink, OperatorNotice, OperatorNoticeStrategy};
pub use phone::normalize_mobile;
pub use web_handoff::{LinkOpener, SystemLinkOpener, WebHandoff};
pub use whatsapp_api::WhatsAppApi;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid mobile number format")]
    InvalidMobile,

    #[error("WhatsApp Business API not configured")]
    NotConfigured,

    #[error("API method failed: {0}")]
    Http(String),

    #[error("API Error: {status} - {body}")]
    ProviderRejected { status: u16, body: String },

    #[error("WhatsApp Web failed: {0}")]
    OpenFailed(String),

    #[error("Delivery strategy panicked: {0}")]
    Panicked(String),
}

/// Everything a strategy needs for one delivery attempt.
pub struct DeliveryRequest<'a> {
    /// Normalized number (`91` + 10 digits).
    pub mobile: &'a str,
    pub message: &'a str,
    pub report_url: &'a str,
    pub patient: &'a PatientRecord,
}

/// One way of getting the report link to the patient.
pub trait DeliveryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ok carries the human-readable success message.
    fn deliver(&self, request: &DeliveryRequest<'_>) -> Result<String, NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    pub message: String,
}

impl DeliveryOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            delivered: false,
            message: message.into(),
        }
    }
}

pub struct NotificationDispatcher {
    strategies: Vec<Box<dyn DeliveryStrategy>>,
}

impl NotificationDispatcher {
    pub fn new(strategies: Vec<Box<dyn DeliveryStrategy>>) -> Self {
        Self { strategies }
    }

    /// Standard chain for the running application.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut strategies: Vec<Box<dyn DeliveryStrategy>> =
            vec![Box::new(WhatsAppApi::new(config.whatsapp.clone()))];
        if config.web_handoff {
            strategies.push(Box::new(WebHandoff::new(Box::new(SystemLinkOpener))));
        }
        strategies.push(Box::new(OperatorNoticeStrategy::default()));

        if config.whatsapp.is_placeholder() {
            tracing::info!("WhatsApp Business API credentials not set, provider delivery disabled");
        }
        Self::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn notify(
        &self,
        raw_mobile: &str,
        patient: &PatientRecord,
        report_url: &str,
    ) -> DeliveryOutcome {
        self.notify_at(raw_mobile, patient, report_url, chrono::Local::now().naive_local())
    }

    /// As [`notify`](Self::notify) with an explicit message timestamp.
    pub fn notify_at(
        &self,
        raw_mobile: &str,
        patient: &PatientRecord,
        report_url: &str,
        now: NaiveDateTime,
    ) -> DeliveryOutcome {
        let mobile = match normalize_mobile(raw_mobile) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(error = %e, "Mobile number rejected, delivery skipped");
                return DeliveryOutcome::failed(format!("Mobile number error: {e}"));
            }
        };

        let message = compose_message(patient, report_url, now);
        let request = DeliveryRequest {
            mobile: &mobile,
            message: &message,
            report_url,
            patient,
        };

        let mut last_error = None;
        for strategy in &self.strategies {
            let attempt = catch_unwind(AssertUnwindSafe(|| strategy.deliver(&request)))
                .unwrap_or_else(|panic| Err(NotifyError::Panicked(panic_message(&panic))));

            match attempt {
                Ok(msg) => {
                    tracing::info!(strategy = strategy.name(), "Report notification delivered");
                    return DeliveryOutcome {
                        delivered: true,
                        message: msg,
                    };
                }
                Err(NotifyError::NotConfigured) => {
                    tracing::debug!(strategy = strategy.name(), "Delivery strategy not configured");
                    last_error = Some(NotifyError::NotConfigured);
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "Delivery strategy failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => DeliveryOutcome::failed(e.to_string()),
            None => DeliveryOutcome::failed("No delivery strategy configured"),
        }
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

// ═══════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════
