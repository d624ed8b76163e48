use crate::i18n::Locale;
use std::{env, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_url: String,
    pub locale: Locale,
    pub message_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_url: DEFAULT_API_URL.to_string(),
            locale: Locale::default(),
            message_ttl: DEFAULT_MESSAGE_TTL,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_url = lookup("PAYMENTS_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let locale = match lookup("DASHBOARD_LOCALE") {
            Some(value) => value.parse().unwrap_or_else(|err| {
                warn!("{err}, falling back to the default locale");
                Locale::default()
            }),
            None => Locale::default(),
        };

        let message_ttl = lookup("MESSAGE_TTL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_MESSAGE_TTL);

        Self {
            port,
            api_url,
            locale,
            message_ttl,
        }
    }
}
