use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Pathology Desk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Organization printed on every report and notification.
pub const ORGANIZATION_NAME: &str = "UJJIVAN HOSPITAL";
pub const ORGANIZATION_ADDRESS: &str = "Vidyut Nagar, Gautam Budh Nagar, Uttar Pradesh - 201008";

/// Placeholder credentials shipped in the default configuration.
/// The provider API strategy is skipped while either value is still in place.
pub const PLACEHOLDER_PHONE_NUMBER_ID: &str = "YOUR_PHONE_NUMBER_ID";
pub const PLACEHOLDER_ACCESS_TOKEN: &str = "YOUR_ACCESS_TOKEN";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_WHATSAPP_API_URL: &str = "https://graph.facebook.com/v17.0/";

/// Timeout applied to every call to an external delivery provider.
pub const PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "pathology_desk_lib=info,tower_http=warn"
}

/// Get the application data directory.
/// `PATHOLOGY_DATA_DIR` when set, otherwise `~/PathologyDesk/`.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = env_non_empty("PATHOLOGY_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("PathologyDesk")
}

/// Directory holding generated report artifacts.
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports").join("completed_reports")
}

/// SQLite database holding drafts and completed reports.
pub fn database_path() -> PathBuf {
    app_data_dir().join("pathology_reports.db")
}

/// WhatsApp Cloud API settings.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub api_url: String,
    pub phone_number_id: String,
    pub access_token: String,
}

impl WhatsAppConfig {
    /// True while the credentials are still the shipped placeholders (or empty).
    pub fn is_placeholder(&self) -> bool {
        let id = self.phone_number_id.trim();
        let token = self.access_token.trim();
        id.is_empty()
            || token.is_empty()
            || id == PLACEHOLDER_PHONE_NUMBER_ID
            || token == PLACEHOLDER_ACCESS_TOKEN
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_WHATSAPP_API_URL.to_string(),
            phone_number_id: PLACEHOLDER_PHONE_NUMBER_ID.to_string(),
            access_token: PLACEHOLDER_ACCESS_TOKEN.to_string(),
        }
    }
}

/// Runtime configuration, resolved once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base of the links sent to patients (`<base>/view-pdf/<file>`).
    pub public_base_url: String,
    pub reports_dir: PathBuf,
    pub database_path: PathBuf,
    pub whatsapp: WhatsAppConfig,
    /// Open the intake form in the system browser after start-up.
    pub open_browser: bool,
    /// Allow the WhatsApp Web hand-off strategy to open a browser tab.
    pub web_handoff: bool,
}

impl AppConfig {
    /// Build the configuration from `PATHOLOGY_*` / `WHATSAPP_*` variables.
    pub fn from_env() -> Self {
        let port = env_non_empty("PATHOLOGY_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let defaults = WhatsAppConfig::default();

        Self {
            host: env_non_empty("PATHOLOGY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            public_base_url: env_non_empty("PATHOLOGY_PUBLIC_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            reports_dir: reports_dir(),
            database_path: database_path(),
            whatsapp: WhatsAppConfig {
                api_url: env_non_empty("WHATSAPP_API_URL").unwrap_or(defaults.api_url),
                phone_number_id: env_non_empty("WHATSAPP_PHONE_NUMBER_ID")
                    .unwrap_or(defaults.phone_number_id),
                access_token: env_non_empty("WHATSAPP_ACCESS_TOKEN")
                    .unwrap_or(defaults.access_token),
            },
            open_browser: env_flag("PATHOLOGY_OPEN_BROWSER", true),
            web_handoff: env_flag("PATHOLOGY_WEB_HANDOFF", true),
        }
    }

    /// Configuration rooted in `dir`, with every side-effecting option off.
    pub fn for_data_dir(dir: &std::path::Path) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            public_base_url: format!("http://localhost:{DEFAULT_PORT}"),
            reports_dir: dir.join("reports").join("completed_reports"),
            database_path: dir.join("pathology_reports.db"),
            whatsapp: WhatsAppConfig::default(),
            open_browser: false,
            web_handoff: false,
        }
    }

    /// Root URL of the intake form.
    pub fn root_url(&self) -> String {
        format!("{}/", self.public_base_url.trim_end_matches('/'))
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str, default: bool) -> bool {
    match env_non_empty(key) {
        Some(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}
