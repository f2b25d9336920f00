use std::time::Duration;

use crate::error::StartupError;

const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;

/// The three secrets the bot cannot run without.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth token for the Practicum homework API
    pub practicum_token: String,
    /// Telegram bot token
    pub telegram_token: String,
    /// Chat that receives every notification
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,

    /// Homework statuses endpoint
    pub practicum_endpoint: String,

    /// Telegram Bot API base URL (overridable for tests and proxies)
    pub telegram_api_url: String,

    /// Delay between the end of one poll cycle and the start of the next
    pub retry_period: Duration,

    /// How far before startup the first poll window begins, in seconds
    pub lookback_secs: u64,

    /// Per-request HTTP timeout; `None` keeps the client's default
    pub http_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, StartupError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, StartupError> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(StartupError::MissingCredential(key))
        };

        let credentials = Credentials {
            practicum_token: required("PRACTICUM_TOKEN")?,
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
        };

        let seconds = |key: &'static str| -> Result<Option<u64>, StartupError> {
            match lookup(key) {
                None => Ok(None),
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| StartupError::InvalidSetting { key, value }),
            }
        };

        let retry_period_secs = seconds("RETRY_PERIOD_SECS")?.unwrap_or(DEFAULT_RETRY_PERIOD_SECS);

        Ok(Self {
            credentials,
            practicum_endpoint: lookup("PRACTICUM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_PRACTICUM_ENDPOINT.to_string()),
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_period: Duration::from_secs(retry_period_secs),
            lookback_secs: seconds("LOOKBACK_SECS")?.unwrap_or(0),
            http_timeout: seconds("HTTP_TIMEOUT_SECS")?.map(Duration::from_secs),
        })
    }

    /// Lower bound of the first poll window, in unix seconds.
    pub fn initial_cursor(&self, now: chrono::DateTime<chrono::Utc>) -> i64 {
        let lookback = i64::try_from(self.lookback_secs).unwrap_or(i64::MAX);
        now.timestamp().saturating_sub(lookback)
    }
}
