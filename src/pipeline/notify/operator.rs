//! Operator notice: last strategy in the chain. Surfaces the prepared
//! message so staff can forward it by hand. Always succeeds.

use super::{DeliveryRequest, DeliveryStrategy, NotifyError};

/// What the operator is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorNotice {
    pub patient_name: String,
    pub mobile: String,
    pub report_url: String,
    pub message: String,
}

/// Where operator notices go.
pub trait NoticeSink: Send + Sync {
    fn show(&self, notice: &OperatorNotice);
}

/// Writes the notice to the application log.
pub struct LogNoticeSink;

impl NoticeSink for LogNoticeSink {
    fn show(&self, notice: &OperatorNotice) {
        tracing::info!(
            patient = %notice.patient_name,
            mobile = %notice.mobile,
            report_url = %notice.report_url,
            "Report ready, message prepared for manual delivery:\n{}",
            notice.message
        );
    }
}

pub struct OperatorNoticeStrategy {
    sink: Box<dyn NoticeSink>,
}

impl OperatorNoticeStrategy {
    pub fn new(sink: Box<dyn NoticeSink>) -> Self {
        Self { sink }
    }
}

impl Default for OperatorNoticeStrategy {
    fn default() -> Self {
        Self::new(Box::new(LogNoticeSink))
    }
}

impl DeliveryStrategy for OperatorNoticeStrategy {
    fn name(&self) -> &'static str {
        "operator_notice"
    }

    fn deliver(&self, request: &DeliveryRequest<'_>) -> Result<String, NotifyError> {
        self.sink.show(&OperatorNotice {
            patient_name: request.patient.name.clone(),
            mobile: request.mobile.to_string(),
            report_url: request.report_url.to_string(),
            message: request.message.to_string(),
        });
        Ok(format!("Message prepared. URL: {}", request.report_url))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::PatientRecord;

    struct CollectingSink(Arc<Mutex<Vec<OperatorNotice>>>);

    impl NoticeSink for CollectingSink {
        fn show(&self, notice: &OperatorNotice) {
            self.0.lock().unwrap().push(notice.clone());
        }
    }

    #[test]
    fn notice_reaches_sink_and_reports_url() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let strategy = OperatorNoticeStrategy::new(Box::new(CollectingSink(seen.clone())));
        let patient = PatientRecord {
            name: "Ravi".into(),
            ..Default::default()
        };
        let msg = strategy
            .deliver(&DeliveryRequest {
                mobile: "919876543210",
                message: "body",
                report_url: "http://localhost:5000/view-pdf/r.pdf",
                patient: &patient,
            })
            .unwrap();

        assert_eq!(msg, "Message prepared. URL: http://localhost:5000/view-pdf/r.pdf");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].patient_name, "Ravi");
        assert_eq!(seen[0].message, "body");
    }
}
