//! Web hand-off strategy: open a prefilled WhatsApp Web chat for the
//! operator to send manually.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{DeliveryRequest, DeliveryStrategy, NotifyError};

pub const WEB_SEND_URL: &str = "https://web.whatsapp.com/send";
pub const HANDOFF_MESSAGE: &str = "WhatsApp Web opened - please send manually";

/// Opens a URL somewhere the operator can see it.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), NotifyError>;
}

/// Opens links in the system browser.
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open(&self, url: &str) -> Result<(), NotifyError> {
        open_in_browser(url).map_err(|e| NotifyError::OpenFailed(e.to_string()))
    }
}

/// Spawn the platform's URL handler for `url`.
pub fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = std::process::Command::new("explorer");
    #[cfg(target_os = "macos")]
    let mut command = std::process::Command::new("open");
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = std::process::Command::new("xdg-open");

    command.arg(url).spawn()?;
    Ok(())
}

/// Everything except unreserved characters and `/` is escaped; space is `%20`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// `https://web.whatsapp.com/send?phone=<mobile>&text=<encoded message>`
pub fn handoff_url(mobile: &str, message: &str) -> Result<String, NotifyError> {
    let raw = format!(
        "{WEB_SEND_URL}?phone={}&text={}",
        utf8_percent_encode(mobile, QUERY_VALUE),
        utf8_percent_encode(message, QUERY_VALUE)
    );
    let url = reqwest::Url::parse(&raw).map_err(|e| NotifyError::OpenFailed(e.to_string()))?;
    Ok(url.into())
}

pub struct WebHandoff {
    opener: Box<dyn LinkOpener>,
}

impl WebHandoff {
    pub fn new(opener: Box<dyn LinkOpener>) -> Self {
        Self { opener }
    }
}

impl DeliveryStrategy for WebHandoff {
    fn name(&self) -> &'static str {
        "web_handoff"
    }

    fn deliver(&self, request: &DeliveryRequest<'_>) -> Result<String, NotifyError> {
        let url = handoff_url(request.mobile, request.message)?;
        self.opener.open(&url)?;
        Ok(HANDOFF_MESSAGE.to_string())
    }
}
