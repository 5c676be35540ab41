//! WhatsApp Cloud API strategy.

use std::time::Duration;

use serde::Serialize;

use super::{DeliveryRequest, DeliveryStrategy, NotifyError};
use crate::config::{WhatsAppConfig, PROVIDER_TIMEOUT_SECS};

pub const API_SUCCESS_MESSAGE: &str = "WhatsApp message sent via Business API";

/// Request body for `POST {api_url}{phone_number_id}/messages`
#[derive(Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    text: MessageText<'a>,
}

#[derive(Serialize)]
struct MessageText<'a> {
    body: &'a str,
}

pub struct WhatsAppApi {
    config: WhatsAppConfig,
    timeout: Duration,
}

impl WhatsAppApi {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            config,
            timeout: Duration::from_secs(PROVIDER_TIMEOUT_SECS),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_url.trim_end_matches('/'),
            self.config.phone_number_id.trim()
        )
    }
}

impl DeliveryStrategy for WhatsAppApi {
    fn name(&self) -> &'static str {
        "whatsapp_api"
    }

    fn deliver(&self, request: &DeliveryRequest<'_>) -> Result<String, NotifyError> {
        if self.config.is_placeholder() {
            return Err(NotifyError::NotConfigured);
        }

        // Built per call: the blocking client must not be dropped on an async worker.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let body = SendMessageRequest {
            messaging_product: "whatsapp",
            to: request.mobile,
            kind: "text",
            text: MessageText {
                body: request.message,
            },
        };

        let response = client
            .post(self.endpoint())
            .bearer_auth(self.config.access_token.trim())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Http(format!(
                        "request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    NotifyError::Http(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if matches!(status, 200 | 201) {
            return Ok(API_SUCCESS_MESSAGE.to_string());
        }
        let body = response.text().unwrap_or_default();
        Err(NotifyError::ProviderRejected { status, body })
    }
}
