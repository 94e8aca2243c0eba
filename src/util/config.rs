use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use super::persistence::default_data_dir;

pub const API_URL_VAR: &str = "FREIGHT_DESK_API_URL";
pub const DATA_DIR_VAR: &str = "FREIGHT_DESK_DATA_DIR";
pub const HEALTH_INTERVAL_VAR: &str = "FREIGHT_DESK_HEALTH_INTERVAL_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8083/api/";
const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Always ends with `/` so endpoint paths can be joined onto it.
    pub api_base_url: Url,
    pub data_dir: PathBuf,
    pub health_interval: Duration,
    pub request_timeout: Duration,
    pub max_retries: u32,
    /// Retry `n` waits `n * retry_delay`.
    pub retry_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup(API_URL_VAR)
            .and_then(|raw| {
                parse_base_url(&raw)
                    .map_err(|err| warn!("Invalid {API_URL_VAR} value {raw:?}: {err}"))
                    .ok()
            })
            .unwrap_or_else(|| {
                info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
                default_base_url()
            });

        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_data_dir)
            .unwrap_or_else(|| {
                warn!("No platform data directory available, storing data in the working directory");
                PathBuf::from(".")
            });

        let health_interval = lookup(HEALTH_INTERVAL_VAR)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    warn!("Invalid {HEALTH_INTERVAL_VAR} value {raw:?}, using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_HEALTH_INTERVAL);

        Self {
            api_base_url,
            data_dir,
            health_interval,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Configuration pointed at `base_url` with retries disabled.
    pub fn for_api(base_url: &str, data_dir: impl Into<PathBuf>) -> Result<Self, url::ParseError> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            data_dir: data_dir.into(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
            request_timeout: Duration::from_secs(5),
            max_retries: 0,
            retry_delay: Duration::from_millis(10),
        })
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

fn default_base_url() -> Url {
    // The constant is a valid absolute URL.
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API URL is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[(DATA_DIR_VAR, "/tmp/freight")]));
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/freight"));
        assert_eq!(config.health_interval, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn api_url_gets_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            API_URL_VAR,
            "https://freight.example.com/api",
        )]));
        assert_eq!(config.api_base_url.as_str(), "https://freight.example.com/api/");
        assert_eq!(
            config.api_base_url.join("health").unwrap().as_str(),
            "https://freight.example.com/api/health"
        );
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (API_URL_VAR, "not a url"),
            (HEALTH_INTERVAL_VAR, "0"),
        ]));
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.health_interval, Duration::from_secs(30));

        let config = AppConfig::from_lookup(lookup_from(&[(HEALTH_INTERVAL_VAR, "5")]));
        assert_eq!(config.health_interval, Duration::from_secs(5));
    }
}
